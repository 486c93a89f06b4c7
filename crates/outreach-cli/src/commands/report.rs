//! `outreach due` and `outreach stats`

use clap::Args;
use outreach_engine::commands::queries;
use serde_json::json;

use super::{emit, CmdResult, Session};

#[derive(Debug, Args)]
pub struct DueArgs {
    #[arg(long)]
    pub campaign: String,
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    #[arg(long)]
    pub campaign: String,
}

pub fn due(args: DueArgs, session: &Session) -> CmdResult {
    let due = queries::due_contacts(&session.ctx, &session.conn, &session.clock, &args.campaign)?;
    emit(&due)
}

pub fn stats(args: StatsArgs, session: &Session) -> CmdResult {
    let stats = queries::campaign_stats(&session.ctx, &session.conn, &args.campaign)?;
    let (open_rate, click_rate, reply_rate) =
        (stats.open_rate(), stats.click_rate(), stats.reply_rate());
    emit(&json!({
        "stats": stats,
        "open_rate": open_rate,
        "click_rate": click_rate,
        "reply_rate": reply_rate,
    }))
}
