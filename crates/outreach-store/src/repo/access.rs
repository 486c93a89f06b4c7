//! Owner-scoped loads
//!
//! Each loader returns `NotFound` for an unknown id and `Forbidden` when
//! the entity exists but belongs to another user.

#![allow(clippy::result_large_err)]

use outreach_core::model::{Campaign, CampaignEnrollment, ProfileOperations, TargetList};
use rusqlite::{Connection, OptionalExtension};

use super::operations::{operations_from_row, OPERATIONS_COLUMNS};
use super::SqliteRepo;
use crate::enrollment::query::get_enrollment;
use crate::errors::{forbidden, from_rusqlite, not_found, Result};

/// Operations row of a recipient plus the ids it hangs off
#[derive(Debug, Clone)]
pub struct RecipientAccess {
    pub campaign_id: String,
    pub enrollment_id: String,
    pub operations: ProfileOperations,
}

impl SqliteRepo {
    pub fn require_owned_campaign(
        conn: &Connection,
        user_id: &str,
        campaign_id: &str,
        op: &str,
    ) -> Result<Campaign> {
        let campaign = Self::get_campaign(conn, campaign_id)?
            .ok_or_else(|| not_found(op, "campaign", campaign_id))?;
        if !campaign.is_owned_by(user_id) {
            return Err(forbidden(op, "campaign", campaign_id));
        }
        Ok(campaign)
    }

    pub fn require_owned_list(
        conn: &Connection,
        user_id: &str,
        list_id: &str,
        op: &str,
    ) -> Result<TargetList> {
        let list = Self::get_target_list(conn, list_id)?
            .ok_or_else(|| not_found(op, "target list", list_id))?;
        if !list.is_owned_by(user_id) {
            return Err(forbidden(op, "target list", list_id));
        }
        Ok(list)
    }

    /// Enrollment whose campaign belongs to `user_id`
    pub fn require_owned_enrollment(
        conn: &Connection,
        user_id: &str,
        enrollment_id: &str,
        op: &str,
    ) -> Result<CampaignEnrollment> {
        let enrollment = get_enrollment(conn, enrollment_id)?
            .ok_or_else(|| not_found(op, "enrollment", enrollment_id))?;
        Self::require_owned_campaign(conn, user_id, &enrollment.campaign_id, op)
            .map_err(|e| e.with_entity_id(enrollment_id))?;
        Ok(enrollment)
    }

    /// Walk recipient → enrollment → campaign and check the campaign owner
    pub fn require_owned_recipient(
        conn: &Connection,
        user_id: &str,
        enrollment_profile_id: &str,
        op: &str,
    ) -> Result<RecipientAccess> {
        let found = conn
            .query_row(
                &format!(
                    "SELECT c.user_id, ce.campaign_id, ep.enrollment_id, {}
                     FROM profile_operations po
                     JOIN enrollment_profiles ep ON ep.id = po.enrollment_profile_id
                     JOIN campaign_enrollments ce ON ce.id = ep.enrollment_id
                     JOIN campaigns c ON c.id = ce.campaign_id
                     WHERE po.enrollment_profile_id = ?1",
                    OPERATIONS_COLUMNS
                ),
                [enrollment_profile_id],
                |row| {
                    let owner: String = row.get(0)?;
                    let access = RecipientAccess {
                        campaign_id: row.get(1)?,
                        enrollment_id: row.get(2)?,
                        operations: operations_from_row(row, 3)?,
                    };
                    Ok((owner, access))
                },
            )
            .optional()
            .map_err(from_rusqlite)?;

        match found {
            None => Err(not_found(op, "recipient", enrollment_profile_id)),
            Some((owner, _)) if owner != user_id => {
                Err(forbidden(op, "recipient", enrollment_profile_id))
            }
            Some((_, access)) => Ok(access),
        }
    }
}
