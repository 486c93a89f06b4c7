#![allow(clippy::unwrap_used, clippy::expect_used)]

use outreach_core::errors::{ExErrorKind, OutreachError};
use outreach_core::logging_facility::test_capture::init_test_capture;
use outreach_core::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_CAMPAIGN_ID, FIELD_DURATION_MS, FIELD_ERR_CODE,
    FIELD_ERR_KIND, FIELD_PROFILE_COUNT,
};
use outreach_core::{log_op_end, log_op_error, log_op_start};

#[test]
fn test_log_op_start_macro_with_fields() {
    let capture = init_test_capture();
    let op_name = "outreach_log_start_unique_1";

    log_op_start!(op_name, campaign_id = "c-42");

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_START));
    assert_eq!(
        events[0].fields.get(FIELD_CAMPAIGN_ID).map(String::as_str),
        Some("c-42")
    );
    assert!(events[0]
        .component
        .as_deref()
        .is_some_and(|c| c.starts_with("logging_facility_tests")));
}

#[test]
fn test_log_op_end_records_duration() {
    let capture = init_test_capture();
    let op_name = "outreach_log_end_unique_2";

    log_op_end!(op_name, duration_ms = 42u64, profile_count = 7usize);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END));
    assert_eq!(events[0].fields.get(FIELD_DURATION_MS), Some(&"42".to_string()));
    assert_eq!(events[0].fields.get(FIELD_PROFILE_COUNT), Some(&"7".to_string()));
}

#[test]
fn test_log_op_error_includes_kind_and_code() {
    let capture = init_test_capture();
    let op_name = "outreach_log_error_unique_3";

    let err = OutreachError::EmptyList {
        list_id: "list-9".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10u64);

    capture.assert_event_exists(op_name, EVENT_END_ERROR);
    let event = &capture.events_for_op(op_name)[0];
    assert_eq!(event.level, tracing::Level::ERROR);
    assert_eq!(
        event.fields.get(FIELD_ERR_CODE).map(String::as_str),
        Some(ExErrorKind::EmptyList.code())
    );
    assert_eq!(
        event.fields.get(FIELD_ERR_KIND).map(String::as_str),
        Some("EmptyList")
    );
}

#[test]
fn test_count_events_filters_by_predicate() {
    let capture = init_test_capture();
    let op_name = "outreach_log_count_unique_4";

    log_op_start!(op_name);
    log_op_end!(op_name, duration_ms = 1u64);

    let n = capture.count_events(|e| e.op.as_deref() == Some(op_name));
    assert_eq!(n, 2);
}
