//! Read-side command handlers: due contacts and campaign statistics.

#![allow(clippy::result_large_err)]

use std::time::Instant;

use outreach_core::model::EnrolledRecipient;
use outreach_core::queries::CampaignStats;
use outreach_core::{log_op_end, log_op_error, log_op_start, AuthContext, Clock};
use outreach_store::enrollment::query;
use outreach_store::errors::Result;
use outreach_store::SqliteRepo;
use rusqlite::Connection;

use super::{correlate, elapsed_ms};

/// Recipients of a campaign that are active and scheduled at or before
/// `clock.now()`, ordered by scheduled time then recipient id
pub fn due_contacts(
    ctx: &AuthContext,
    conn: &Connection,
    clock: &dyn Clock,
    campaign_id: &str,
) -> Result<Vec<EnrolledRecipient>> {
    log_op_start!("due_contacts", request_id = %ctx.request.request_id, campaign_id);
    let start = Instant::now();

    let result = due_contacts_impl(ctx, conn, clock, campaign_id).map_err(|e| {
        let e = correlate(ctx, e);
        log_op_error!("due_contacts", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(
        "due_contacts",
        duration_ms = elapsed_ms(start),
        due_count = result.len()
    );
    Ok(result)
}

fn due_contacts_impl(
    ctx: &AuthContext,
    conn: &Connection,
    clock: &dyn Clock,
    campaign_id: &str,
) -> Result<Vec<EnrolledRecipient>> {
    let user_id = ctx.require_user()?;
    SqliteRepo::require_owned_campaign(conn, user_id, campaign_id, "due_contacts")?;
    query::due_recipients(conn, campaign_id, clock.now())
}

/// Aggregate engagement over every recipient of a campaign
pub fn campaign_stats(
    ctx: &AuthContext,
    conn: &Connection,
    campaign_id: &str,
) -> Result<CampaignStats> {
    log_op_start!("campaign_stats", request_id = %ctx.request.request_id, campaign_id);
    let start = Instant::now();

    let result = campaign_stats_impl(ctx, conn, campaign_id).map_err(|e| {
        let e = correlate(ctx, e);
        log_op_error!("campaign_stats", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(
        "campaign_stats",
        duration_ms = elapsed_ms(start),
        total_recipients = result.total_recipients
    );
    Ok(result)
}

fn campaign_stats_impl(
    ctx: &AuthContext,
    conn: &Connection,
    campaign_id: &str,
) -> Result<CampaignStats> {
    let user_id = ctx.require_user()?;
    SqliteRepo::require_owned_campaign(conn, user_id, campaign_id, "campaign_stats")?;
    let rows = query::campaign_operations(conn, campaign_id)?;
    Ok(CampaignStats::from_operations(campaign_id, &rows))
}
