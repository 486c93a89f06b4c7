use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::CampaignStatus;

/// Multi-step email campaign owned by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: CampaignStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

/// One email of a campaign's sequence
///
/// `delay_days` counts from the previous step's send, or from enrollment
/// for step 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceStep {
    pub id: String,
    pub campaign_id: String,
    pub step_number: i64,
    pub subject: String,
    pub body_template: String,
    pub delay_days: i64,
}
