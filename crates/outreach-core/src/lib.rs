//! Outreach Core - domain model and pure rules for campaign outreach
//!
//! This crate holds everything that does not touch storage:
//! - Target list, campaign, enrollment snapshot and operations models
//! - Field resolution from list members into snapshot rows
//! - Email-status transition planning and sequence scheduling
//! - Campaign statistics aggregation
//! - The error facility, caller context and logging facility shared by
//!   the store, engine and CLI crates

pub mod context;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod queries;
pub mod rules;

pub use outreach_core_types::schema;

// Re-export commonly used types
pub use context::{AuthContext, Clock, FixedClock, SystemClock};
pub use errors::{ExError, ExErrorKind, OutreachError, Result};
pub use model::{
    ActiveState, Campaign, CampaignEnrollment, CampaignStatus, EmailStatus, EnrolledRecipient,
    EnrollmentProfile, EnrollmentStatus, ListMember, ListType, MemberSource, NewListMember,
    ProfileOperations, ProfileSnapshot, ResponseStatus, SequenceStep, TargetList, User,
};
pub use queries::CampaignStats;
