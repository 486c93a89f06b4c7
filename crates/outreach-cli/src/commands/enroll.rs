//! `outreach enroll`

use clap::Args;
use outreach_engine::{apply_engine_command, EngineCommand, EngineCommandResult};

use super::{emit, CmdResult, Session};

#[derive(Debug, Args)]
pub struct EnrollArgs {
    #[arg(long)]
    pub campaign: String,
    #[arg(long)]
    pub list: String,
}

pub fn execute(args: EnrollArgs, session: &mut Session) -> CmdResult {
    let cmd = EngineCommand::Enroll {
        campaign_id: args.campaign,
        list_id: args.list,
    };
    match apply_engine_command(cmd, &session.ctx, &mut session.conn, &session.clock)? {
        EngineCommandResult::Enrolled(result) => emit(&result),
        EngineCommandResult::Operations(ops) => emit(&ops),
    }
}
