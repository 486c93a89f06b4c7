//! Campaign and sequence-step command handlers.

#![allow(clippy::result_large_err)]

use std::time::Instant;

use chrono::{DateTime, Utc};
use outreach_core::model::{Campaign, CampaignStatus, SequenceStep};
use outreach_core::ops::{estimate_send_schedule, ScheduledSend};
use outreach_core::rules::validation::{require_non_blank, validate_sequence_step};
use outreach_core::{log_op_end, log_op_error, log_op_start, AuthContext, Clock};
use outreach_store::errors::Result;
use outreach_store::SqliteRepo;
use rusqlite::Connection;

use super::{boundary, correlate, elapsed_ms};

/// Create a draft campaign owned by the caller
pub fn create_campaign(
    ctx: &AuthContext,
    conn: &Connection,
    clock: &dyn Clock,
    name: &str,
    description: Option<&str>,
) -> Result<Campaign> {
    log_op_start!("create_campaign", request_id = %ctx.request.request_id);
    let start = Instant::now();

    let result = create_campaign_impl(ctx, conn, clock, name, description).map_err(|e| {
        let e = correlate(ctx, e);
        log_op_error!("create_campaign", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(
        "create_campaign",
        duration_ms = elapsed_ms(start),
        campaign_id = %result.id
    );
    Ok(result)
}

fn create_campaign_impl(
    ctx: &AuthContext,
    conn: &Connection,
    clock: &dyn Clock,
    name: &str,
    description: Option<&str>,
) -> Result<Campaign> {
    let user_id = ctx.require_user()?;
    let now = clock.now();
    let campaign = Campaign {
        id: uuid::Uuid::now_v7().to_string(),
        user_id: user_id.to_string(),
        name: require_non_blank("name", name)?,
        description: description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
        status: CampaignStatus::Draft,
        created_at: now,
        updated_at: now,
    };
    SqliteRepo::insert_campaign(conn, &campaign)?;
    Ok(campaign)
}

pub fn get_campaign(ctx: &AuthContext, conn: &Connection, campaign_id: &str) -> Result<Campaign> {
    boundary(ctx, "get_campaign", || {
        let user_id = ctx.require_user()?;
        SqliteRepo::require_owned_campaign(conn, user_id, campaign_id, "get_campaign")
    })
}

pub fn list_campaigns(ctx: &AuthContext, conn: &Connection) -> Result<Vec<Campaign>> {
    boundary(ctx, "list_campaigns", || {
        let user_id = ctx.require_user()?;
        SqliteRepo::list_campaigns_for_user(conn, user_id)
    })
}

pub fn set_campaign_status(
    ctx: &AuthContext,
    conn: &Connection,
    clock: &dyn Clock,
    campaign_id: &str,
    status: CampaignStatus,
) -> Result<Campaign> {
    const OP: &str = "set_campaign_status";
    boundary(ctx, OP, || {
        let user_id = ctx.require_user()?;
        SqliteRepo::require_owned_campaign(conn, user_id, campaign_id, OP)?;
        SqliteRepo::set_campaign_status(conn, campaign_id, status, clock.now())?;
        SqliteRepo::require_owned_campaign(conn, user_id, campaign_id, OP)
    })
}

/// Append a step to a campaign's sequence
///
/// ## Errors
///
/// - `InvalidInput`: step number below 1, negative delay or blank subject
/// - `AlreadyExists`: the step number is taken
#[allow(clippy::too_many_arguments)]
pub fn add_sequence_step(
    ctx: &AuthContext,
    conn: &Connection,
    clock: &dyn Clock,
    campaign_id: &str,
    step_number: i64,
    delay_days: i64,
    subject: &str,
    body_template: &str,
) -> Result<SequenceStep> {
    log_op_start!("add_sequence_step", campaign_id, step_number, delay_days);
    let start = Instant::now();

    let result = add_sequence_step_impl(
        ctx,
        conn,
        clock,
        campaign_id,
        step_number,
        delay_days,
        subject,
        body_template,
    )
    .map_err(|e| {
        let e = correlate(ctx, e);
        log_op_error!("add_sequence_step", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!("add_sequence_step", duration_ms = elapsed_ms(start), step_id = %result.id);
    Ok(result)
}

#[allow(clippy::too_many_arguments)]
fn add_sequence_step_impl(
    ctx: &AuthContext,
    conn: &Connection,
    clock: &dyn Clock,
    campaign_id: &str,
    step_number: i64,
    delay_days: i64,
    subject: &str,
    body_template: &str,
) -> Result<SequenceStep> {
    let user_id = ctx.require_user()?;
    SqliteRepo::require_owned_campaign(conn, user_id, campaign_id, "add_sequence_step")?;
    validate_sequence_step(step_number, delay_days, subject)?;
    let step = SequenceStep {
        id: uuid::Uuid::now_v7().to_string(),
        campaign_id: campaign_id.to_string(),
        step_number,
        subject: subject.trim().to_string(),
        body_template: body_template.to_string(),
        delay_days,
    };
    SqliteRepo::insert_sequence_step(conn, &step, clock.now())?;
    Ok(step)
}

pub fn list_sequence_steps(
    ctx: &AuthContext,
    conn: &Connection,
    campaign_id: &str,
) -> Result<Vec<SequenceStep>> {
    boundary(ctx, "list_sequence_steps", || {
        let user_id = ctx.require_user()?;
        SqliteRepo::require_owned_campaign(conn, user_id, campaign_id, "list_sequence_steps")?;
        SqliteRepo::list_sequence_steps(conn, campaign_id)
    })
}

/// Estimated send time of each step for a recipient enrolled at `start`
/// (now when absent)
pub fn send_schedule(
    ctx: &AuthContext,
    conn: &Connection,
    clock: &dyn Clock,
    campaign_id: &str,
    start: Option<DateTime<Utc>>,
) -> Result<Vec<ScheduledSend>> {
    boundary(ctx, "send_schedule", || {
        let user_id = ctx.require_user()?;
        SqliteRepo::require_owned_campaign(conn, user_id, campaign_id, "send_schedule")?;
        let steps = SqliteRepo::list_sequence_steps(conn, campaign_id)?;
        Ok(estimate_send_schedule(&steps, start.unwrap_or_else(|| clock.now())))
    })
}
