//! Operations-row command handlers.
//!
//! Each handler re-verifies ownership through
//! recipient → enrollment → campaign → user before writing. Writes are
//! single guarded `UPDATE`s; a guard miss is re-read to tell an idempotent
//! no-op from a concurrent unsubscribe.

#![allow(clippy::result_large_err)]

use std::time::Instant;

use chrono::{DateTime, Utc};
use outreach_core::errors::{ExError, OutreachError};
use outreach_core::model::{ActiveState, EmailStatus, ProfileOperations};
use outreach_core::ops::{advance_after_send, plan_status_update};
use outreach_core::rules::validation::ensure_contactable;
use outreach_core::{log_op_end, log_op_error, log_op_start, AuthContext, Clock};
use outreach_store::errors::{not_found, Result};
use outreach_store::{RecipientAccess, SqliteRepo};
use rusqlite::Connection;

use super::{correlate, elapsed_ms};

fn unsubscribed(enrollment_profile_id: &str, op: &str) -> ExError {
    ExError::from(OutreachError::Unsubscribed {
        enrollment_profile_id: enrollment_profile_id.to_string(),
    })
    .with_op(op.to_string())
}

fn reload(conn: &Connection, enrollment_profile_id: &str, op: &str) -> Result<ProfileOperations> {
    SqliteRepo::get_operations(conn, enrollment_profile_id)?
        .ok_or_else(|| not_found(op, "recipient", enrollment_profile_id))
}

/// Owned, not yet unsubscribed recipient
fn contactable(
    ctx: &AuthContext,
    conn: &Connection,
    enrollment_profile_id: &str,
    op: &str,
) -> Result<RecipientAccess> {
    let user_id = ctx.require_user()?;
    let access = SqliteRepo::require_owned_recipient(conn, user_id, enrollment_profile_id, op)?;
    ensure_contactable(enrollment_profile_id, access.operations.is_active)
        .map_err(|e| ExError::from(e).with_op(op.to_string()))?;
    Ok(access)
}

/// Wrap a handler body with boundary logging
fn logged<T>(
    ctx: &AuthContext,
    op: &'static str,
    enrollment_profile_id: &str,
    body: impl FnOnce() -> Result<T>,
) -> Result<T> {
    log_op_start!(
        op,
        request_id = %ctx.request.request_id,
        enrollment_profile_id
    );
    let start = Instant::now();

    let result = body().map_err(|e| {
        let e = correlate(ctx, e);
        log_op_error!(op, e.clone(), duration_ms = elapsed_ms(start), enrollment_profile_id);
        e
    })?;

    log_op_end!(op, duration_ms = elapsed_ms(start), enrollment_profile_id);
    Ok(result)
}

/// Record an email event for one recipient
///
/// ## Errors
///
/// - `Unauthorised` / `Forbidden` / `NotFound`: ownership check failed
/// - `Unsubscribed`: the recipient unsubscribed; nothing was written
pub fn update_profile_email_status(
    ctx: &AuthContext,
    conn: &Connection,
    clock: &dyn Clock,
    enrollment_profile_id: &str,
    status: EmailStatus,
) -> Result<ProfileOperations> {
    const OP: &str = "update_profile_email_status";
    logged(ctx, OP, enrollment_profile_id, || {
        contactable(ctx, conn, enrollment_profile_id, OP)?;
        let transition = plan_status_update(status);
        if !SqliteRepo::apply_status_transition(conn, enrollment_profile_id, &transition, clock.now())? {
            return Err(unsubscribed(enrollment_profile_id, OP));
        }
        reload(conn, enrollment_profile_id, OP)
    })
}

/// `true → paused`; already paused is a no-op
pub fn pause_profile(
    ctx: &AuthContext,
    conn: &Connection,
    clock: &dyn Clock,
    enrollment_profile_id: &str,
) -> Result<ProfileOperations> {
    const OP: &str = "pause_profile";
    logged(ctx, OP, enrollment_profile_id, || {
        contactable(ctx, conn, enrollment_profile_id, OP)?;
        SqliteRepo::pause_operations(conn, enrollment_profile_id, clock.now())?;
        settled(conn, enrollment_profile_id, OP)
    })
}

/// `paused → true`, clearing `paused_at`; already active is a no-op
pub fn resume_profile(
    ctx: &AuthContext,
    conn: &Connection,
    clock: &dyn Clock,
    enrollment_profile_id: &str,
) -> Result<ProfileOperations> {
    const OP: &str = "resume_profile";
    logged(ctx, OP, enrollment_profile_id, || {
        contactable(ctx, conn, enrollment_profile_id, OP)?;
        SqliteRepo::resume_operations(conn, enrollment_profile_id, clock.now())?;
        settled(conn, enrollment_profile_id, OP)
    })
}

/// Current row after a pause/resume; an unsubscribe that raced in wins
fn settled(conn: &Connection, enrollment_profile_id: &str, op: &str) -> Result<ProfileOperations> {
    let ops = reload(conn, enrollment_profile_id, op)?;
    if ops.is_active == ActiveState::Unsubscribed {
        return Err(unsubscribed(enrollment_profile_id, op));
    }
    Ok(ops)
}

/// Terminal transition: clears the schedule and marks the response
pub fn unsubscribe_profile(
    ctx: &AuthContext,
    conn: &Connection,
    clock: &dyn Clock,
    enrollment_profile_id: &str,
) -> Result<ProfileOperations> {
    const OP: &str = "unsubscribe_profile";
    logged(ctx, OP, enrollment_profile_id, || {
        contactable(ctx, conn, enrollment_profile_id, OP)?;
        if !SqliteRepo::unsubscribe_operations(conn, enrollment_profile_id, clock.now())? {
            return Err(unsubscribed(enrollment_profile_id, OP));
        }
        reload(conn, enrollment_profile_id, OP)
    })
}

/// Set the next contact time; `step = None` increments the stored step
pub fn schedule_next_contact(
    ctx: &AuthContext,
    conn: &Connection,
    clock: &dyn Clock,
    enrollment_profile_id: &str,
    at: DateTime<Utc>,
    step: Option<i64>,
) -> Result<ProfileOperations> {
    const OP: &str = "schedule_next_contact";
    logged(ctx, OP, enrollment_profile_id, || {
        contactable(ctx, conn, enrollment_profile_id, OP)?;
        if !SqliteRepo::schedule_operations(conn, enrollment_profile_id, Some(at), step, clock.now())? {
            return Err(unsubscribed(enrollment_profile_id, OP));
        }
        reload(conn, enrollment_profile_id, OP)
    })
}

/// Move past the pending sequence step and schedule the following one from
/// the campaign's steps. Past the last step the schedule is cleared.
pub fn advance_sequence(
    ctx: &AuthContext,
    conn: &Connection,
    clock: &dyn Clock,
    enrollment_profile_id: &str,
) -> Result<ProfileOperations> {
    const OP: &str = "advance_sequence";
    logged(ctx, OP, enrollment_profile_id, || {
        let access = contactable(ctx, conn, enrollment_profile_id, OP)?;
        let now = clock.now();
        let steps = SqliteRepo::list_sequence_steps(conn, &access.campaign_id)?;
        let sent_at = access.operations.last_email_sent.unwrap_or(now);
        let advance = advance_after_send(&steps, access.operations.current_sequence_step, sent_at);

        tracing::debug!(
            current_step = advance.current_step,
            finished = advance.next_contact.is_none(),
            "Advancing sequence"
        );

        if !SqliteRepo::schedule_operations(
            conn,
            enrollment_profile_id,
            advance.next_contact,
            Some(advance.current_step),
            now,
        )? {
            return Err(unsubscribed(enrollment_profile_id, OP));
        }
        reload(conn, enrollment_profile_id, OP)
    })
}
