//! Pure operational planning: status transitions and sequence scheduling

pub mod schedule;
pub mod status_transition;

pub use schedule::{
    advance_after_send, estimate_send_schedule, first_contact_at, ScheduledSend, SequenceAdvance,
};
pub use status_transition::{plan_status_update, StatusTransition};
