//! `outreach campaign`

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use outreach_engine::commands::campaigns;

use super::{emit, CmdResult, Session};

#[derive(Debug, Args)]
pub struct CampaignArgs {
    #[command(subcommand)]
    pub command: CampaignCommand,
}

#[derive(Debug, Subcommand)]
pub enum CampaignCommand {
    /// Create a draft campaign
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Add one email step to a campaign sequence
    Step {
        #[arg(long)]
        campaign: String,
        #[arg(long)]
        number: i64,
        #[arg(long)]
        delay_days: i64,
        #[arg(long)]
        subject: String,
        #[arg(long, default_value = "")]
        body: String,
    },
    /// Estimated send time per step (RFC 3339 `--start`, default now)
    Schedule {
        #[arg(long)]
        campaign: String,
        #[arg(long)]
        start: Option<DateTime<Utc>>,
    },
}

pub fn execute(args: CampaignArgs, session: &Session) -> CmdResult {
    match args.command {
        CampaignCommand::Create { name, description } => {
            let campaign = campaigns::create_campaign(
                &session.ctx,
                &session.conn,
                &session.clock,
                &name,
                description.as_deref(),
            )?;
            emit(&campaign)
        }
        CampaignCommand::Step {
            campaign,
            number,
            delay_days,
            subject,
            body,
        } => {
            let step = campaigns::add_sequence_step(
                &session.ctx,
                &session.conn,
                &session.clock,
                &campaign,
                number,
                delay_days,
                &subject,
                &body,
            )?;
            emit(&step)
        }
        CampaignCommand::Schedule { campaign, start } => {
            let plan = campaigns::send_schedule(
                &session.ctx,
                &session.conn,
                &session.clock,
                &campaign,
                start,
            )?;
            emit(&plan)
        }
    }
}
