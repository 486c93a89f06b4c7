use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::{ActiveState, EmailStatus, ResponseStatus};

/// Mutable outreach state of one recipient within one enrollment
///
/// Exactly one row exists per `EnrollmentProfile`. This is the only
/// per-recipient data that changes after enrollment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileOperations {
    pub id: String,
    pub enrollment_profile_id: String,
    pub email_status: EmailStatus,
    pub response_status: ResponseStatus,
    pub emails_sent_count: i64,
    pub open_count: i64,
    pub click_count: i64,
    pub reply_count: i64,
    pub next_scheduled_contact: Option<DateTime<Utc>>,
    pub current_sequence_step: i64,
    pub is_active: ActiveState,
    pub last_email_sent: Option<DateTime<Utc>>,
    pub first_response_date: Option<DateTime<Utc>>,
    pub last_response_date: Option<DateTime<Utc>>,
    pub paused_at: Option<DateTime<Utc>>,
    pub unsubscribed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileOperations {
    /// Fresh operational state for a newly enrolled recipient
    pub fn initial(
        id: String,
        enrollment_profile_id: String,
        next_scheduled_contact: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            enrollment_profile_id,
            email_status: EmailStatus::Pending,
            response_status: ResponseStatus::None,
            emails_sent_count: 0,
            open_count: 0,
            click_count: 0,
            reply_count: 0,
            next_scheduled_contact,
            current_sequence_step: 0,
            is_active: ActiveState::Active,
            last_email_sent: None,
            first_response_date: None,
            last_response_date: None,
            paused_at: None,
            unsubscribed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Active and scheduled no later than `now`
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.is_active == ActiveState::Active
            && self.next_scheduled_contact.is_some_and(|at| at <= now)
    }
}
