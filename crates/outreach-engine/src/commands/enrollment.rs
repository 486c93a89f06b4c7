//! Enrollment command handlers.
//!
//! `create_campaign_enrollment` is the snapshot contract: members of a
//! target list are copied by value into campaign-scoped rows, each with one
//! operations row, in a single transaction.

#![allow(clippy::result_large_err)]

use std::time::Instant;

use outreach_core::model::{CampaignEnrollment, EnrolledRecipient, EnrollmentStatus};
use outreach_core::{log_op_end, log_op_error, log_op_start, AuthContext, Clock};
use outreach_store::enrollment::{self, query, EnrollmentResult};
use outreach_store::errors::{not_found, Result};
use rusqlite::Connection;

use super::{correlate, elapsed_ms};

/// Enroll a target list into a campaign as an immutable snapshot
///
/// ## Errors
///
/// - `Unauthorised`: no user in `ctx`
/// - `NotFound` / `Forbidden`: campaign or list missing or owned by someone else
/// - `EmptyList`: the list has no members
/// - `Persistence` / `Concurrency`: store failure; nothing was written and
///   the call may be retried when `is_retryable()`
pub fn create_campaign_enrollment(
    ctx: &AuthContext,
    conn: &mut Connection,
    clock: &dyn Clock,
    campaign_id: &str,
    list_id: &str,
) -> Result<EnrollmentResult> {
    log_op_start!(
        "create_campaign_enrollment",
        request_id = %ctx.request.request_id,
        campaign_id,
        list_id
    );
    let start = Instant::now();

    let result = ctx
        .require_user()
        .and_then(|user_id| {
            enrollment::create_enrollment(conn, user_id, campaign_id, list_id, clock.now())
        })
        .map_err(|e| {
            let e = correlate(ctx, e);
            log_op_error!(
                "create_campaign_enrollment",
                e.clone(),
                duration_ms = elapsed_ms(start)
            );
            e
        })?;

    log_op_end!(
        "create_campaign_enrollment",
        duration_ms = elapsed_ms(start),
        enrollment_id = %result.enrollment_id,
        profile_count = result.profile_count
    );

    Ok(result)
}

/// Enrollments of a campaign, oldest first
pub fn list_enrollments(
    ctx: &AuthContext,
    conn: &Connection,
    campaign_id: &str,
) -> Result<Vec<CampaignEnrollment>> {
    log_op_start!("list_enrollments", campaign_id);
    let start = Instant::now();

    let result = list_enrollments_impl(ctx, conn, campaign_id).map_err(|e| {
        let e = correlate(ctx, e);
        log_op_error!("list_enrollments", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!("list_enrollments", duration_ms = elapsed_ms(start));
    Ok(result)
}

fn list_enrollments_impl(
    ctx: &AuthContext,
    conn: &Connection,
    campaign_id: &str,
) -> Result<Vec<CampaignEnrollment>> {
    let user_id = ctx.require_user()?;
    outreach_store::SqliteRepo::require_owned_campaign(conn, user_id, campaign_id, "list_enrollments")?;
    query::list_enrollments(conn, campaign_id)
}

/// Snapshot rows of one enrollment with their operations rows
pub fn enrollment_profiles(
    ctx: &AuthContext,
    conn: &Connection,
    enrollment_id: &str,
) -> Result<Vec<EnrolledRecipient>> {
    log_op_start!("enrollment_profiles", enrollment_id);
    let start = Instant::now();

    let result = ctx
        .require_user()
        .and_then(|user_id| {
            outreach_store::SqliteRepo::require_owned_enrollment(
                conn,
                user_id,
                enrollment_id,
                "enrollment_profiles",
            )
        })
        .and_then(|_| query::enrolled_recipients(conn, enrollment_id))
        .map_err(|e| {
            let e = correlate(ctx, e);
            log_op_error!("enrollment_profiles", e.clone(), duration_ms = elapsed_ms(start));
            e
        })?;

    log_op_end!(
        "enrollment_profiles",
        duration_ms = elapsed_ms(start),
        profile_count = result.len()
    );
    Ok(result)
}

/// Change the lifecycle status of an enrollment; snapshot rows are untouched
pub fn set_enrollment_status(
    ctx: &AuthContext,
    conn: &Connection,
    clock: &dyn Clock,
    enrollment_id: &str,
    status: EnrollmentStatus,
) -> Result<CampaignEnrollment> {
    log_op_start!("set_enrollment_status", enrollment_id, status = %status);
    let start = Instant::now();

    let result = set_enrollment_status_impl(ctx, conn, clock, enrollment_id, status).map_err(|e| {
        let e = correlate(ctx, e);
        log_op_error!("set_enrollment_status", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!("set_enrollment_status", duration_ms = elapsed_ms(start));
    Ok(result)
}

fn set_enrollment_status_impl(
    ctx: &AuthContext,
    conn: &Connection,
    clock: &dyn Clock,
    enrollment_id: &str,
    status: EnrollmentStatus,
) -> Result<CampaignEnrollment> {
    const OP: &str = "set_enrollment_status";
    let user_id = ctx.require_user()?;
    outreach_store::SqliteRepo::require_owned_enrollment(conn, user_id, enrollment_id, OP)?;
    query::set_enrollment_status(conn, enrollment_id, status, clock.now())?;
    query::get_enrollment(conn, enrollment_id)?.ok_or_else(|| not_found(OP, "enrollment", enrollment_id))
}

/// Delete an enrollment with its snapshot and operations rows
///
/// The source list keeps `used_in_campaigns = true`.
pub fn delete_enrollment(ctx: &AuthContext, conn: &Connection, enrollment_id: &str) -> Result<()> {
    log_op_start!("delete_enrollment", enrollment_id);
    let start = Instant::now();

    ctx.require_user()
        .and_then(|user_id| {
            outreach_store::SqliteRepo::require_owned_enrollment(
                conn,
                user_id,
                enrollment_id,
                "delete_enrollment",
            )
        })
        .and_then(|_| query::delete_enrollment(conn, enrollment_id))
        .map_err(|e| {
            let e = correlate(ctx, e);
            log_op_error!("delete_enrollment", e.clone(), duration_ms = elapsed_ms(start));
            e
        })?;

    log_op_end!("delete_enrollment", duration_ms = elapsed_ms(start));
    Ok(())
}
