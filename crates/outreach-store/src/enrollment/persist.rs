//! Transactional enrollment of a target list into a campaign
//!
//! One `IMMEDIATE` transaction covers the ownership reads, the empty-list
//! check, the enrollment row, every snapshot row, every operations row and
//! the list flag update. Any error drops the transaction, which rolls it
//! back, so a failed enrollment leaves no rows behind.

#![allow(clippy::result_large_err)]

use chrono::{DateTime, Utc};
use outreach_core::errors::OutreachError;
use outreach_core::model::{
    CampaignEnrollment, EnrollmentSnapshotData, EnrollmentStatus, ProfileOperations,
    ProfileSnapshot,
};
use outreach_core::ops::first_contact_at;
use outreach_core::rules::snapshot_member;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use serde::Serialize;

use crate::errors::{from_json, from_rusqlite, Result};
use crate::repo::{field_columns, ms, new_id, stored_precision, SqliteRepo};

const OP: &str = "create_enrollment";

/// Outcome of a committed enrollment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrollmentResult {
    pub enrollment_id: String,
    pub profile_count: usize,
    pub enrollment_date: DateTime<Utc>,
}

/// Snapshot `list_id` into `campaign_id` on behalf of `user_id`
///
/// ## Errors
///
/// - `NotFound`: campaign or list does not exist
/// - `Forbidden`: campaign or list belongs to another user
/// - `EmptyList`: the list has no members
/// - `Persistence` / `Concurrency`: SQLite failure; nothing was written
pub fn create_enrollment(
    conn: &mut Connection,
    user_id: &str,
    campaign_id: &str,
    list_id: &str,
    now: DateTime<Utc>,
) -> Result<EnrollmentResult> {
    let now = stored_precision(now);
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(from_rusqlite)?;

    SqliteRepo::require_owned_campaign(&tx, user_id, campaign_id, OP)?;
    let list = SqliteRepo::require_owned_list(&tx, user_id, list_id, OP)?;

    let members = SqliteRepo::list_members(&tx, list_id)?;
    if members.is_empty() {
        return Err(OutreachError::EmptyList {
            list_id: list_id.to_string(),
        }
        .into());
    }

    let steps = SqliteRepo::list_sequence_steps(&tx, campaign_id)?;
    let next_contact = first_contact_at(&steps, now);

    let enrollment = CampaignEnrollment {
        id: new_id(),
        campaign_id: campaign_id.to_string(),
        list_id: list_id.to_string(),
        enrollment_date: now,
        status: EnrollmentStatus::Active,
        snapshot_data: EnrollmentSnapshotData {
            list_name: list.name.clone(),
            list_description: list.description.clone(),
            list_type: list.list_type,
            member_count: members.len() as i64,
        },
        created_at: now,
        updated_at: now,
    };
    insert_enrollment(&tx, &enrollment)?;

    for member in &members {
        let profile_id = new_id();
        insert_profile(
            &tx,
            &profile_id,
            &enrollment.id,
            &member.id,
            &snapshot_member(&member.source),
            now,
        )?;
        SqliteRepo::insert_operations(
            &tx,
            &ProfileOperations::initial(new_id(), profile_id, next_contact, now),
        )?;
    }

    SqliteRepo::mark_list_used(&tx, list_id, now)?;

    tx.commit().map_err(from_rusqlite)?;

    tracing::debug!(
        enrollment_id = %enrollment.id,
        campaign_id,
        list_id,
        profile_count = members.len(),
        "Committed enrollment snapshot"
    );

    Ok(EnrollmentResult {
        enrollment_id: enrollment.id,
        profile_count: members.len(),
        enrollment_date: now,
    })
}

fn insert_enrollment(tx: &Transaction, enrollment: &CampaignEnrollment) -> Result<()> {
    let snapshot_data =
        serde_json::to_value(&enrollment.snapshot_data).map_err(|e| from_json(OP, e))?;
    tx.execute(
        "INSERT INTO campaign_enrollments (id, campaign_id, list_id, enrollment_date, status,
            snapshot_data, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            enrollment.id,
            enrollment.campaign_id,
            enrollment.list_id,
            ms(enrollment.enrollment_date),
            enrollment.status.as_str(),
            snapshot_data,
            ms(enrollment.created_at),
            ms(enrollment.updated_at),
        ],
    )
    .map_err(from_rusqlite)?;
    Ok(())
}

fn insert_profile(
    tx: &Transaction,
    profile_id: &str,
    enrollment_id: &str,
    source_member_id: &str,
    snap: &ProfileSnapshot,
    now: DateTime<Utc>,
) -> Result<()> {
    let mut stmt = tx
        .prepare_cached(&format!(
            "INSERT INTO enrollment_profiles (id, enrollment_id, source_member_id, {},
                enrichment, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            field_columns()
        ))
        .map_err(from_rusqlite)?;
    stmt.execute(rusqlite::params![
        profile_id,
        enrollment_id,
        source_member_id,
        snap.full_name,
        snap.first_name,
        snap.last_name,
        snap.email,
        snap.title,
        snap.company,
        snap.company_domain,
        snap.location,
        snap.linkedin_url,
        snap.enrichment,
        ms(now),
    ])
    .map_err(from_rusqlite)?;
    Ok(())
}
