//! Enrollment read queries

#![allow(clippy::result_large_err)]

use chrono::{DateTime, Utc};
use outreach_core::model::{
    ActiveState, CampaignEnrollment, EnrolledRecipient, EnrollmentProfile,
    EnrollmentSnapshotData, EnrollmentStatus, ProfileOperations, ProfileSnapshot,
};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row};
use serde_json::Value;

use crate::errors::{from_rusqlite, Result};
use crate::repo::{enum_col, fields_at, ms, time_col};
use crate::repo::{operations_from_row, OPERATIONS_COLUMNS};

const ENROLLMENT_COLUMNS: &str = "ce.id, ce.campaign_id, ce.list_id, ce.enrollment_date, \
    ce.status, ce.snapshot_data, ce.created_at, ce.updated_at";

const PROFILE_COLUMNS: &str = "ep.id, ep.enrollment_id, ep.source_member_id, ep.full_name, \
    ep.first_name, ep.last_name, ep.email, ep.title, ep.company, ep.company_domain, \
    ep.location, ep.linkedin_url, ep.enrichment, ep.created_at";

const PROFILE_WIDTH: usize = 14;

fn enrollment_from_row(row: &Row) -> rusqlite::Result<CampaignEnrollment> {
    let raw: Value = row.get(5)?;
    let snapshot_data: EnrollmentSnapshotData = serde_json::from_value(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;
    Ok(CampaignEnrollment {
        id: row.get(0)?,
        campaign_id: row.get(1)?,
        list_id: row.get(2)?,
        enrollment_date: time_col(row, 3)?,
        status: enum_col(row, 4)?,
        snapshot_data,
        created_at: time_col(row, 6)?,
        updated_at: time_col(row, 7)?,
    })
}

fn profile_from_row(row: &Row, s: usize) -> rusqlite::Result<EnrollmentProfile> {
    let fields = fields_at(row, s + 3)?;
    Ok(EnrollmentProfile {
        id: row.get(s)?,
        enrollment_id: row.get(s + 1)?,
        source_member_id: row.get(s + 2)?,
        snapshot: ProfileSnapshot {
            full_name: fields.full_name.unwrap_or_default(),
            first_name: fields.first_name,
            last_name: fields.last_name,
            email: fields.email,
            title: fields.title,
            company: fields.company,
            company_domain: fields.company_domain,
            location: fields.location,
            linkedin_url: fields.linkedin_url,
            enrichment: row.get(s + 12)?,
        },
        created_at: time_col(row, s + 13)?,
    })
}

fn recipient_from_row(row: &Row) -> rusqlite::Result<EnrolledRecipient> {
    Ok(EnrolledRecipient {
        profile: profile_from_row(row, 0)?,
        operations: operations_from_row(row, PROFILE_WIDTH)?,
    })
}

fn recipient_select() -> String {
    format!(
        "SELECT {}, {}
         FROM enrollment_profiles ep
         JOIN profile_operations po ON po.enrollment_profile_id = ep.id
         JOIN campaign_enrollments ce ON ce.id = ep.enrollment_id",
        PROFILE_COLUMNS, OPERATIONS_COLUMNS
    )
}

fn collect_recipients(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<EnrolledRecipient>> {
    let mut stmt = conn.prepare(sql).map_err(from_rusqlite)?;
    let rows = stmt
        .query_map(params, recipient_from_row)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(rows)
}

pub fn get_enrollment(conn: &Connection, enrollment_id: &str) -> Result<Option<CampaignEnrollment>> {
    conn.query_row(
        &format!(
            "SELECT {} FROM campaign_enrollments ce WHERE ce.id = ?1",
            ENROLLMENT_COLUMNS
        ),
        [enrollment_id],
        enrollment_from_row,
    )
    .optional()
    .map_err(from_rusqlite)
}

/// Enrollments of a campaign, oldest first
pub fn list_enrollments(conn: &Connection, campaign_id: &str) -> Result<Vec<CampaignEnrollment>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {} FROM campaign_enrollments ce
             WHERE ce.campaign_id = ?1 ORDER BY ce.enrollment_date, ce.id",
            ENROLLMENT_COLUMNS
        ))
        .map_err(from_rusqlite)?;
    let rows = stmt
        .query_map([campaign_id], enrollment_from_row)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(rows)
}

/// Snapshot rows of one enrollment with their operations rows, in the
/// order the members were copied
pub fn enrolled_recipients(conn: &Connection, enrollment_id: &str) -> Result<Vec<EnrolledRecipient>> {
    collect_recipients(
        conn,
        &format!("{} WHERE ep.enrollment_id = ?1 ORDER BY ep.rowid", recipient_select()),
        [enrollment_id],
    )
}

/// Active recipients of a campaign's active enrollments scheduled at or
/// before `now`, ordered by scheduled time then recipient id
///
/// A paused, completed or cancelled enrollment hides all of its recipients
/// without touching their operations rows.
pub fn due_recipients(
    conn: &Connection,
    campaign_id: &str,
    now: DateTime<Utc>,
) -> Result<Vec<EnrolledRecipient>> {
    collect_recipients(
        conn,
        &format!(
            "{} WHERE ce.campaign_id = ?1
               AND ce.status = ?3
               AND po.is_active = ?4
               AND po.next_scheduled_contact IS NOT NULL
               AND po.next_scheduled_contact <= ?2
             ORDER BY po.next_scheduled_contact, ep.id",
            recipient_select()
        ),
        rusqlite::params![
            campaign_id,
            ms(now),
            EnrollmentStatus::Active.as_str(),
            ActiveState::Active.as_str()
        ],
    )
}

/// Every operations row across a campaign's enrollments
pub fn campaign_operations(conn: &Connection, campaign_id: &str) -> Result<Vec<ProfileOperations>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {}
             FROM profile_operations po
             JOIN enrollment_profiles ep ON ep.id = po.enrollment_profile_id
             JOIN campaign_enrollments ce ON ce.id = ep.enrollment_id
             WHERE ce.campaign_id = ?1",
            OPERATIONS_COLUMNS
        ))
        .map_err(from_rusqlite)?;
    let rows = stmt
        .query_map([campaign_id], |row| operations_from_row(row, 0))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(rows)
}

pub fn set_enrollment_status(
    conn: &Connection,
    enrollment_id: &str,
    status: EnrollmentStatus,
    now: DateTime<Utc>,
) -> Result<()> {
    conn.execute(
        "UPDATE campaign_enrollments SET status = ?2, updated_at = ?3 WHERE id = ?1",
        rusqlite::params![enrollment_id, status.as_str(), ms(now)],
    )
    .map_err(from_rusqlite)?;
    Ok(())
}

/// Delete an enrollment; snapshot and operations rows go with it by cascade
pub fn delete_enrollment(conn: &Connection, enrollment_id: &str) -> Result<bool> {
    let changed = conn
        .execute("DELETE FROM campaign_enrollments WHERE id = ?1", [enrollment_id])
        .map_err(from_rusqlite)?;
    Ok(changed == 1)
}
