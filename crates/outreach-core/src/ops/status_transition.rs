//! Planning of email-status updates
//!
//! The store turns a `StatusTransition` into one `UPDATE` with increment
//! expressions, so concurrent deliveries of the same event never lose a
//! count. `apply_to` is the same transition on an in-memory row.

use chrono::{DateTime, Utc};

use crate::model::{EmailStatus, ProfileOperations, ResponseStatus};

/// Column effects of recording one email event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    pub email_status: EmailStatus,
    pub response_status: Option<ResponseStatus>,
    pub increment_sent: bool,
    pub increment_open: bool,
    pub increment_click: bool,
    pub increment_reply: bool,
    /// Set `last_email_sent = now`
    pub touch_last_email_sent: bool,
    /// `first_response_date` first-write-wins, `last_response_date = now`
    pub record_response: bool,
}

/// Decide the effects of moving a recipient to `status`
pub fn plan_status_update(status: EmailStatus) -> StatusTransition {
    let engaged = matches!(status, EmailStatus::Replied | EmailStatus::Clicked);
    let response_status = match status {
        EmailStatus::Replied | EmailStatus::Clicked => Some(ResponseStatus::Engaged),
        EmailStatus::Bounced => Some(ResponseStatus::Bounced),
        _ => None,
    };

    StatusTransition {
        email_status: status,
        response_status,
        increment_sent: status == EmailStatus::Sent,
        increment_open: status == EmailStatus::Opened,
        increment_click: status == EmailStatus::Clicked,
        increment_reply: status == EmailStatus::Replied,
        touch_last_email_sent: status == EmailStatus::Sent,
        record_response: engaged,
    }
}

impl StatusTransition {
    /// Apply to an in-memory operations row
    pub fn apply_to(&self, ops: &mut ProfileOperations, now: DateTime<Utc>) {
        ops.email_status = self.email_status;
        if let Some(response) = self.response_status {
            ops.response_status = response;
        }
        if self.increment_sent {
            ops.emails_sent_count += 1;
        }
        if self.increment_open {
            ops.open_count += 1;
        }
        if self.increment_click {
            ops.click_count += 1;
        }
        if self.increment_reply {
            ops.reply_count += 1;
        }
        if self.touch_last_email_sent {
            ops.last_email_sent = Some(now);
        }
        if self.record_response {
            ops.first_response_date.get_or_insert(now);
            ops.last_response_date = Some(now);
        }
        ops.updated_at = now;
    }
}
