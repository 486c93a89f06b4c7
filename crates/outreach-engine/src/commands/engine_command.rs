//! Engine-level command dispatch for state-changing operations.

#![allow(clippy::result_large_err)]

use chrono::{DateTime, Utc};
use outreach_core::model::{EmailStatus, ProfileOperations};
use outreach_core::{AuthContext, Clock};
use outreach_store::enrollment::EnrollmentResult;
use outreach_store::errors::Result;
use rusqlite::Connection;

use crate::commands::{enrollment, operations};

/// Engine commands that write enrollment or operations rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    /// Snapshot a target list into a campaign
    Enroll {
        campaign_id: String,
        list_id: String,
    },
    /// Record an email event for one recipient
    UpdateEmailStatus {
        enrollment_profile_id: String,
        status: EmailStatus,
    },
    Pause {
        enrollment_profile_id: String,
    },
    Resume {
        enrollment_profile_id: String,
    },
    Unsubscribe {
        enrollment_profile_id: String,
    },
    /// Set the next contact; `step = None` increments the stored step
    Schedule {
        enrollment_profile_id: String,
        at: DateTime<Utc>,
        step: Option<i64>,
    },
    /// Advance past the pending sequence step
    Advance {
        enrollment_profile_id: String,
    },
}

/// Result of applying an engine command
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommandResult {
    Enrolled(EnrollmentResult),
    Operations(ProfileOperations),
}

/// Apply an engine command on behalf of `ctx`
pub fn apply_engine_command(
    cmd: EngineCommand,
    ctx: &AuthContext,
    conn: &mut Connection,
    clock: &dyn Clock,
) -> Result<EngineCommandResult> {
    let ops = match cmd {
        EngineCommand::Enroll {
            campaign_id,
            list_id,
        } => {
            let result = enrollment::create_campaign_enrollment(ctx, conn, clock, &campaign_id, &list_id)?;
            return Ok(EngineCommandResult::Enrolled(result));
        }
        EngineCommand::UpdateEmailStatus {
            enrollment_profile_id,
            status,
        } => operations::update_profile_email_status(ctx, conn, clock, &enrollment_profile_id, status)?,
        EngineCommand::Pause {
            enrollment_profile_id,
        } => operations::pause_profile(ctx, conn, clock, &enrollment_profile_id)?,
        EngineCommand::Resume {
            enrollment_profile_id,
        } => operations::resume_profile(ctx, conn, clock, &enrollment_profile_id)?,
        EngineCommand::Unsubscribe {
            enrollment_profile_id,
        } => operations::unsubscribe_profile(ctx, conn, clock, &enrollment_profile_id)?,
        EngineCommand::Schedule {
            enrollment_profile_id,
            at,
            step,
        } => operations::schedule_next_contact(ctx, conn, clock, &enrollment_profile_id, at, step)?,
        EngineCommand::Advance {
            enrollment_profile_id,
        } => operations::advance_sequence(ctx, conn, clock, &enrollment_profile_id)?,
    };
    Ok(EngineCommandResult::Operations(ops))
}
