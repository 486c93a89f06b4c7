//! Operations-row statements
//!
//! Every write is one `UPDATE` guarded on `is_active`, so a concurrent
//! unsubscribe can never be overwritten. Callers learn whether the guard
//! matched from the returned flag.

#![allow(clippy::result_large_err)]

use chrono::{DateTime, Utc};
use outreach_core::model::ProfileOperations;
use outreach_core::ops::StatusTransition;
use rusqlite::{Connection, OptionalExtension, Row};

use super::{enum_col, ms, opt_ms, opt_time_col, time_col, SqliteRepo};
use crate::errors::{from_rusqlite, Result};

/// Column list of `profile_operations`, qualified with alias `po`
pub(crate) const OPERATIONS_COLUMNS: &str = "po.id, po.enrollment_profile_id, po.email_status, \
    po.response_status, po.emails_sent_count, po.open_count, po.click_count, po.reply_count, \
    po.next_scheduled_contact, po.current_sequence_step, po.is_active, po.last_email_sent, \
    po.first_response_date, po.last_response_date, po.paused_at, po.unsubscribed_at, \
    po.created_at, po.updated_at";

/// Map `OPERATIONS_COLUMNS` starting at column `s`
pub(crate) fn operations_from_row(row: &Row, s: usize) -> rusqlite::Result<ProfileOperations> {
    Ok(ProfileOperations {
        id: row.get(s)?,
        enrollment_profile_id: row.get(s + 1)?,
        email_status: enum_col(row, s + 2)?,
        response_status: enum_col(row, s + 3)?,
        emails_sent_count: row.get(s + 4)?,
        open_count: row.get(s + 5)?,
        click_count: row.get(s + 6)?,
        reply_count: row.get(s + 7)?,
        next_scheduled_contact: opt_time_col(row, s + 8)?,
        current_sequence_step: row.get(s + 9)?,
        is_active: enum_col(row, s + 10)?,
        last_email_sent: opt_time_col(row, s + 11)?,
        first_response_date: opt_time_col(row, s + 12)?,
        last_response_date: opt_time_col(row, s + 13)?,
        paused_at: opt_time_col(row, s + 14)?,
        unsubscribed_at: opt_time_col(row, s + 15)?,
        created_at: time_col(row, s + 16)?,
        updated_at: time_col(row, s + 17)?,
    })
}

impl SqliteRepo {
    /// Insert the operations row of a freshly snapshotted recipient
    pub fn insert_operations(conn: &Connection, ops: &ProfileOperations) -> Result<()> {
        let mut stmt = conn
            .prepare_cached(
                "INSERT INTO profile_operations (id, enrollment_profile_id, email_status,
                    response_status, emails_sent_count, open_count, click_count, reply_count,
                    next_scheduled_contact, current_sequence_step, is_active, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            )
            .map_err(from_rusqlite)?;
        stmt.execute(rusqlite::params![
            ops.id,
            ops.enrollment_profile_id,
            ops.email_status.as_str(),
            ops.response_status.as_str(),
            ops.emails_sent_count,
            ops.open_count,
            ops.click_count,
            ops.reply_count,
            opt_ms(ops.next_scheduled_contact),
            ops.current_sequence_step,
            ops.is_active.as_str(),
            ms(ops.created_at),
            ms(ops.updated_at),
        ])
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn get_operations(
        conn: &Connection,
        enrollment_profile_id: &str,
    ) -> Result<Option<ProfileOperations>> {
        conn.query_row(
            &format!(
                "SELECT {} FROM profile_operations po WHERE po.enrollment_profile_id = ?1",
                OPERATIONS_COLUMNS
            ),
            [enrollment_profile_id],
            |row| operations_from_row(row, 0),
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Record one email event. Returns false when the recipient is
    /// unsubscribed (or missing) and nothing was written.
    pub fn apply_status_transition(
        conn: &Connection,
        enrollment_profile_id: &str,
        transition: &StatusTransition,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let changed = conn
            .execute(
                "UPDATE profile_operations SET
                    email_status = ?2,
                    response_status = COALESCE(?3, response_status),
                    emails_sent_count = emails_sent_count + ?4,
                    open_count = open_count + ?5,
                    click_count = click_count + ?6,
                    reply_count = reply_count + ?7,
                    last_email_sent = CASE WHEN ?8 THEN ?10 ELSE last_email_sent END,
                    first_response_date = CASE WHEN ?9
                        THEN COALESCE(first_response_date, ?10) ELSE first_response_date END,
                    last_response_date = CASE WHEN ?9 THEN ?10 ELSE last_response_date END,
                    updated_at = ?10
                 WHERE enrollment_profile_id = ?1 AND is_active <> 'unsubscribed'",
                rusqlite::params![
                    enrollment_profile_id,
                    transition.email_status.as_str(),
                    transition.response_status.map(|r| r.as_str()),
                    i64::from(transition.increment_sent),
                    i64::from(transition.increment_open),
                    i64::from(transition.increment_click),
                    i64::from(transition.increment_reply),
                    transition.touch_last_email_sent,
                    transition.record_response,
                    ms(now),
                ],
            )
            .map_err(from_rusqlite)?;
        Ok(changed == 1)
    }

    /// `true → paused`. Returns false when the row was not active.
    pub fn pause_operations(
        conn: &Connection,
        enrollment_profile_id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let changed = conn
            .execute(
                "UPDATE profile_operations SET is_active = 'paused', paused_at = ?2, updated_at = ?2
                 WHERE enrollment_profile_id = ?1 AND is_active = 'true'",
                rusqlite::params![enrollment_profile_id, ms(now)],
            )
            .map_err(from_rusqlite)?;
        Ok(changed == 1)
    }

    /// `paused → true`. Returns false when the row was not paused.
    pub fn resume_operations(
        conn: &Connection,
        enrollment_profile_id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let changed = conn
            .execute(
                "UPDATE profile_operations SET is_active = 'true', paused_at = NULL, updated_at = ?2
                 WHERE enrollment_profile_id = ?1 AND is_active = 'paused'",
                rusqlite::params![enrollment_profile_id, ms(now)],
            )
            .map_err(from_rusqlite)?;
        Ok(changed == 1)
    }

    /// Terminal transition. Returns false when already unsubscribed.
    pub fn unsubscribe_operations(
        conn: &Connection,
        enrollment_profile_id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let changed = conn
            .execute(
                "UPDATE profile_operations SET
                    is_active = 'unsubscribed',
                    response_status = 'unsubscribed',
                    unsubscribed_at = ?2,
                    next_scheduled_contact = NULL,
                    updated_at = ?2
                 WHERE enrollment_profile_id = ?1 AND is_active <> 'unsubscribed'",
                rusqlite::params![enrollment_profile_id, ms(now)],
            )
            .map_err(from_rusqlite)?;
        Ok(changed == 1)
    }

    /// Set the next contact time. Without an explicit `step` the stored step
    /// is incremented in SQL. Returns false when unsubscribed.
    pub fn schedule_operations(
        conn: &Connection,
        enrollment_profile_id: &str,
        at: Option<DateTime<Utc>>,
        step: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let changed = conn
            .execute(
                "UPDATE profile_operations SET
                    next_scheduled_contact = ?2,
                    current_sequence_step = COALESCE(?3, current_sequence_step + 1),
                    updated_at = ?4
                 WHERE enrollment_profile_id = ?1 AND is_active <> 'unsubscribed'",
                rusqlite::params![enrollment_profile_id, opt_ms(at), step, ms(now)],
            )
            .map_err(from_rusqlite)?;
        Ok(changed == 1)
    }
}
