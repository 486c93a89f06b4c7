//! `outreach user`

use clap::{Args, Subcommand};
use outreach_engine::commands::users;

use super::{emit, CmdResult, Session};

#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Register a user; prints the new id
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
    },
}

pub fn execute(args: UserArgs, session: &Session) -> CmdResult {
    match args.command {
        UserCommand::Create { email, name } => {
            let user = users::create_user(&session.conn, &session.clock, &email, &name)?;
            emit(&user)
        }
    }
}
