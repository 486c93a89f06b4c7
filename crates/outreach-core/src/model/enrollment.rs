use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::operations::ProfileOperations;
use super::status::{EnrollmentStatus, ListType};

/// List metadata frozen at enrollment time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentSnapshotData {
    pub list_name: String,
    pub list_description: Option<String>,
    pub list_type: ListType,
    pub member_count: i64,
}

/// One list enrolled into one campaign at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignEnrollment {
    pub id: String,
    pub campaign_id: String,
    pub list_id: String,
    pub enrollment_date: DateTime<Utc>,
    pub status: EnrollmentStatus,
    pub snapshot_data: EnrollmentSnapshotData,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Personalization values resolved from a list member, by value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub full_name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub company_domain: Option<String>,
    pub location: Option<String>,
    pub linkedin_url: Option<String>,
    /// Copy of the member's JSON blob at enrollment time
    pub enrichment: Option<Value>,
}

/// Immutable snapshot row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentProfile {
    pub id: String,
    pub enrollment_id: String,
    /// Member the row was copied from; may no longer exist
    pub source_member_id: String,
    #[serde(flatten)]
    pub snapshot: ProfileSnapshot,
    pub created_at: DateTime<Utc>,
}

/// Snapshot row together with its operations row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrolledRecipient {
    pub profile: EnrollmentProfile,
    pub operations: ProfileOperations,
}
