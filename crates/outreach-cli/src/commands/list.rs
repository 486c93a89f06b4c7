//! `outreach list`

use std::path::PathBuf;

use clap::{Args, Subcommand};
use outreach_core::model::{ListType, NewListMember};
use outreach_engine::commands::lists;
use serde_json::json;

use super::{emit, CmdResult, Session};

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(subcommand)]
    pub command: ListCommand,
}

#[derive(Debug, Subcommand)]
pub enum ListCommand {
    /// Create an empty target list
    Create {
        #[arg(long)]
        name: String,
        /// prospect or profile
        #[arg(long = "type")]
        list_type: ListType,
        #[arg(long)]
        description: Option<String>,
    },
    /// Show a list with its member count
    Show {
        #[arg(long)]
        id: String,
    },
    /// Append members from a JSON array file
    Import {
        #[arg(long)]
        id: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Delete a list that was never enrolled
    Delete {
        #[arg(long)]
        id: String,
    },
}

pub fn execute(args: ListArgs, session: &mut Session) -> CmdResult {
    match args.command {
        ListCommand::Create {
            name,
            list_type,
            description,
        } => {
            let list = lists::create_target_list(
                &session.ctx,
                &session.conn,
                &session.clock,
                &name,
                description.as_deref(),
                list_type,
            )?;
            emit(&list)
        }
        ListCommand::Show { id } => {
            let list = lists::get_target_list(&session.ctx, &session.conn, &id)?;
            let members = lists::list_members(&session.ctx, &session.conn, &id)?;
            emit(&json!({ "list": list, "member_count": members.len() }))
        }
        ListCommand::Import { id, file } => {
            let text = std::fs::read_to_string(&file)
                .map_err(|e| format!("cannot read {}: {}", file.display(), e))?;
            let members: Vec<NewListMember> = serde_json::from_str(&text)?;
            let inserted = lists::add_list_members(
                &session.ctx,
                &mut session.conn,
                &session.clock,
                &id,
                members,
            )?;
            emit(&json!({ "list_id": id, "imported": inserted.len() }))
        }
        ListCommand::Delete { id } => {
            lists::delete_target_list(&session.ctx, &session.conn, &id)?;
            emit(&json!({ "deleted": id }))
        }
    }
}
