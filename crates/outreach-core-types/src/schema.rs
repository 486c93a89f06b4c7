//! Keys of structured log events
//!
//! The `log_op_*` macros write these fields; log consumers and the test
//! capture read them back under the same names.

pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";

pub const FIELD_CAMPAIGN_ID: &str = "campaign_id";
pub const FIELD_ENROLLMENT_ID: &str = "enrollment_id";
pub const FIELD_ENROLLMENT_PROFILE_ID: &str = "enrollment_profile_id";

/// Rows written by an enrollment
pub const FIELD_PROFILE_COUNT: &str = "profile_count";
/// Recipients returned by a due-contact query
pub const FIELD_DUE_COUNT: &str = "due_count";

pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

/// Values of the `event` field
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
