use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account that owns target lists and campaigns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}
