#![allow(clippy::result_large_err)]

use chrono::{DateTime, Utc};
use outreach_core::errors::OutreachError;
use outreach_core::model::{Campaign, CampaignStatus, SequenceStep};
use rusqlite::{Connection, OptionalExtension, Row};

use super::{enum_col, ms, time_col, SqliteRepo};
use crate::errors::{from_rusqlite, Result};

const CAMPAIGN_COLUMNS: &str = "id, user_id, name, description, status, created_at, updated_at";
const STEP_COLUMNS: &str = "id, campaign_id, step_number, subject, body_template, delay_days";

fn campaign_from_row(row: &Row) -> rusqlite::Result<Campaign> {
    Ok(Campaign {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        status: enum_col(row, 4)?,
        created_at: time_col(row, 5)?,
        updated_at: time_col(row, 6)?,
    })
}

fn step_from_row(row: &Row) -> rusqlite::Result<SequenceStep> {
    Ok(SequenceStep {
        id: row.get(0)?,
        campaign_id: row.get(1)?,
        step_number: row.get(2)?,
        subject: row.get(3)?,
        body_template: row.get(4)?,
        delay_days: row.get(5)?,
    })
}

impl SqliteRepo {
    pub fn insert_campaign(conn: &Connection, campaign: &Campaign) -> Result<()> {
        conn.execute(
            "INSERT INTO campaigns (id, user_id, name, description, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                campaign.id,
                campaign.user_id,
                campaign.name,
                campaign.description,
                campaign.status.as_str(),
                ms(campaign.created_at),
                ms(campaign.updated_at),
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    pub fn get_campaign(conn: &Connection, id: &str) -> Result<Option<Campaign>> {
        conn.query_row(
            &format!("SELECT {} FROM campaigns WHERE id = ?1", CAMPAIGN_COLUMNS),
            [id],
            campaign_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    pub fn list_campaigns_for_user(conn: &Connection, user_id: &str) -> Result<Vec<Campaign>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM campaigns WHERE user_id = ?1 ORDER BY created_at, id",
                CAMPAIGN_COLUMNS
            ))
            .map_err(from_rusqlite)?;
        let campaigns = stmt
            .query_map([user_id], campaign_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(campaigns)
    }

    pub fn set_campaign_status(
        conn: &Connection,
        campaign_id: &str,
        status: CampaignStatus,
        now: DateTime<Utc>,
    ) -> Result<()> {
        conn.execute(
            "UPDATE campaigns SET status = ?2, updated_at = ?3 WHERE id = ?1",
            rusqlite::params![campaign_id, status.as_str(), ms(now)],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    /// # Errors
    ///
    /// `AlreadyExists` when the campaign already has this step number.
    pub fn insert_sequence_step(
        conn: &Connection,
        step: &SequenceStep,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let taken: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sequence_steps WHERE campaign_id = ?1 AND step_number = ?2)",
                rusqlite::params![step.campaign_id, step.step_number],
                |row| row.get(0),
            )
            .map_err(from_rusqlite)?;
        if taken {
            return Err(OutreachError::DuplicateSequenceStep {
                campaign_id: step.campaign_id.clone(),
                step_number: step.step_number,
            }
            .into());
        }

        conn.execute(
            "INSERT INTO sequence_steps (id, campaign_id, step_number, subject, body_template,
                delay_days, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                step.id,
                step.campaign_id,
                step.step_number,
                step.subject,
                step.body_template,
                step.delay_days,
                ms(now),
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    /// Steps of a campaign ordered by step number
    pub fn list_sequence_steps(conn: &Connection, campaign_id: &str) -> Result<Vec<SequenceStep>> {
        let mut stmt = conn
            .prepare_cached(&format!(
                "SELECT {} FROM sequence_steps WHERE campaign_id = ?1 ORDER BY step_number",
                STEP_COLUMNS
            ))
            .map_err(from_rusqlite)?;
        let steps = stmt
            .query_map([campaign_id], step_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(steps)
    }
}
