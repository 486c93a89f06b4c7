use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::ListType;

/// Named, user-owned collection of prospects or profiles
///
/// Once `used_in_campaigns` is set it is never cleared: enrollments keep
/// referring to the list for their history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetList {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub list_type: ListType,
    pub used_in_campaigns: bool,
    /// Number of enrollments created from this list
    pub campaign_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TargetList {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}
