//! `outreach ops`: per-recipient tracking, all routed through
//! `apply_engine_command`

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use outreach_core::model::EmailStatus;
use outreach_engine::{apply_engine_command, EngineCommand, EngineCommandResult};

use super::{emit, CmdResult, Session};

#[derive(Debug, Args)]
pub struct OpsArgs {
    #[command(subcommand)]
    pub command: OpsCommand,
}

#[derive(Debug, Subcommand)]
pub enum OpsCommand {
    /// Record an email event (sent, opened, clicked, replied, bounced, ...)
    Status {
        #[arg(long)]
        profile: String,
        #[arg(long)]
        status: EmailStatus,
    },
    Pause {
        #[arg(long)]
        profile: String,
    },
    Resume {
        #[arg(long)]
        profile: String,
    },
    Unsubscribe {
        #[arg(long)]
        profile: String,
    },
    /// Set the next contact time (RFC 3339)
    Schedule {
        #[arg(long)]
        profile: String,
        #[arg(long)]
        at: DateTime<Utc>,
        #[arg(long)]
        step: Option<i64>,
    },
    /// Move to the next sequence step
    Advance {
        #[arg(long)]
        profile: String,
    },
}

impl From<OpsCommand> for EngineCommand {
    fn from(cmd: OpsCommand) -> Self {
        match cmd {
            OpsCommand::Status { profile, status } => EngineCommand::UpdateEmailStatus {
                enrollment_profile_id: profile,
                status,
            },
            OpsCommand::Pause { profile } => EngineCommand::Pause {
                enrollment_profile_id: profile,
            },
            OpsCommand::Resume { profile } => EngineCommand::Resume {
                enrollment_profile_id: profile,
            },
            OpsCommand::Unsubscribe { profile } => EngineCommand::Unsubscribe {
                enrollment_profile_id: profile,
            },
            OpsCommand::Schedule { profile, at, step } => EngineCommand::Schedule {
                enrollment_profile_id: profile,
                at,
                step,
            },
            OpsCommand::Advance { profile } => EngineCommand::Advance {
                enrollment_profile_id: profile,
            },
        }
    }
}

pub fn execute(args: OpsArgs, session: &mut Session) -> CmdResult {
    let cmd = EngineCommand::from(args.command);
    match apply_engine_command(cmd, &session.ctx, &mut session.conn, &session.clock)? {
        EngineCommandResult::Operations(ops) => emit(&ops),
        EngineCommandResult::Enrolled(result) => emit(&result),
    }
}
