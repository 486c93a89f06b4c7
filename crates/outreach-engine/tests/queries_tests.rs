#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{days, setup, start};
use outreach_core::errors::ExErrorKind;
use chrono::Duration;
use outreach_core::model::{CampaignStatus, EmailStatus, EnrollmentStatus, ResponseStatus};
use outreach_core::logging_facility::init_test_capture;
use outreach_core::schema::{EVENT_END, FIELD_CAMPAIGN_ID, FIELD_DUE_COUNT};
use outreach_core::AuthContext;
use outreach_engine::commands::{campaigns, enrollment, lists, operations, queries};

#[test]
fn test_due_contacts_are_active_and_ordered_by_time() {
    let mut env = setup();
    let list_id = env.alice_list(4);
    let campaign_id = env.alice_campaign();
    let result = env.enroll(&campaign_id, &list_id);
    let ids = env.profile_ids(&result.enrollment_id);

    let at = |d| start() + days(d);
    for (id, when) in [(&ids[0], at(2)), (&ids[1], at(1)), (&ids[2], at(1)), (&ids[3], at(5))] {
        operations::schedule_next_contact(&env.alice, &env.conn, &env.clock, id, when, None)
            .unwrap();
    }
    operations::pause_profile(&env.alice, &env.conn, &env.clock, &ids[2]).unwrap();

    assert!(queries::due_contacts(&env.alice, &env.conn, &env.clock, &campaign_id)
        .unwrap()
        .is_empty());

    env.clock.set(at(2));
    let due: Vec<String> = queries::due_contacts(&env.alice, &env.conn, &env.clock, &campaign_id)
        .unwrap()
        .into_iter()
        .map(|r| r.profile.id)
        .collect();
    assert_eq!(due, vec![ids[1].clone(), ids[0].clone()]);

    operations::unsubscribe_profile(&env.alice, &env.conn, &env.clock, &ids[1]).unwrap();
    env.clock.set(at(10));
    let due: Vec<String> = queries::due_contacts(&env.alice, &env.conn, &env.clock, &campaign_id)
        .unwrap()
        .into_iter()
        .map(|r| r.profile.id)
        .collect();
    assert_eq!(due, vec![ids[0].clone(), ids[3].clone()]);
}

#[test]
fn test_campaign_stats_aggregate_all_enrollments() {
    let mut env = setup();
    let first = env.alice_list(3);
    let second = env.alice_list(2);
    let campaign_id = env.alice_campaign();
    let a = env.enroll(&campaign_id, &first);
    let b = env.enroll(&campaign_id, &second);
    let a_ids = env.profile_ids(&a.enrollment_id);
    let b_ids = env.profile_ids(&b.enrollment_id);

    let all: Vec<&String> = a_ids.iter().chain(b_ids.iter()).collect();
    for id in &all {
        operations::update_profile_email_status(&env.alice, &env.conn, &env.clock, id, EmailStatus::Sent)
            .unwrap();
    }
    operations::update_profile_email_status(&env.alice, &env.conn, &env.clock, &a_ids[0], EmailStatus::Opened)
        .unwrap();
    operations::update_profile_email_status(&env.alice, &env.conn, &env.clock, &a_ids[0], EmailStatus::Replied)
        .unwrap();
    operations::update_profile_email_status(&env.alice, &env.conn, &env.clock, &b_ids[0], EmailStatus::Bounced)
        .unwrap();
    operations::pause_profile(&env.alice, &env.conn, &env.clock, &a_ids[1]).unwrap();
    operations::unsubscribe_profile(&env.alice, &env.conn, &env.clock, &b_ids[1]).unwrap();

    let stats = queries::campaign_stats(&env.alice, &env.conn, &campaign_id).unwrap();
    assert_eq!(stats.total_recipients, 5);
    assert_eq!(stats.active, 3);
    assert_eq!(stats.paused, 1);
    assert_eq!(stats.unsubscribed, 1);
    assert_eq!(stats.emails_sent, 5);
    assert_eq!(stats.opens, 1);
    assert_eq!(stats.replies, 1);
    assert!((stats.reply_rate() - 0.2).abs() < 1e-9);
    assert_eq!(stats.email_status_counts.get(&EmailStatus::Sent), Some(&3));
    assert_eq!(stats.email_status_counts.get(&EmailStatus::Replied), Some(&1));
    assert_eq!(stats.email_status_counts.get(&EmailStatus::Bounced), Some(&1));
    assert_eq!(stats.response_status_counts.get(&ResponseStatus::Engaged), Some(&1));
    assert_eq!(stats.response_status_counts.get(&ResponseStatus::Unsubscribed), Some(&1));
}

#[test]
fn test_stats_for_empty_campaign() {
    let env = setup();
    let campaign_id = env.alice_campaign();
    let stats = queries::campaign_stats(&env.alice, &env.conn, &campaign_id).unwrap();
    assert_eq!(stats.total_recipients, 0);
    assert_eq!(stats.open_rate(), 0.0);
}

#[test]
fn test_read_queries_enforce_ownership() {
    let env = setup();
    let campaign_id = env.alice_campaign();

    let err = queries::campaign_stats(&env.bob, &env.conn, &campaign_id).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Forbidden);
    let err = queries::due_contacts(&env.bob, &env.conn, &env.clock, &campaign_id).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Forbidden);
    let err = queries::campaign_stats(&AuthContext::anonymous(), &env.conn, &campaign_id)
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Unauthorised);
    let err = campaigns::get_campaign(&env.alice, &env.conn, "nope").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_send_schedule_is_cumulative() {
    let env = setup();
    let campaign_id = env.alice_campaign();
    for (n, delay) in [(2, 3), (1, 1)] {
        campaigns::add_sequence_step(&env.alice, &env.conn, &env.clock, &campaign_id, n, delay, "s", "b")
            .unwrap();
    }
    let err = campaigns::add_sequence_step(&env.alice, &env.conn, &env.clock, &campaign_id, 1, 0, "dup", "")
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::AlreadyExists);

    let plan = campaigns::send_schedule(&env.alice, &env.conn, &env.clock, &campaign_id, None).unwrap();
    let got: Vec<_> = plan.iter().map(|s| (s.step_number, s.send_at)).collect();
    assert_eq!(got, vec![(1, start() + days(1)), (2, start() + days(4))]);
}

#[test]
fn test_due_contacts_logs_due_count() {
    let capture = init_test_capture();
    let mut env = setup();
    let list_id = env.alice_list(3);
    let campaign_id = env.alice_campaign();
    campaigns::add_sequence_step(&env.alice, &env.conn, &env.clock, &campaign_id, 1, 0, "Now", "")
        .unwrap();
    env.enroll(&campaign_id, &list_id);

    let due = queries::due_contacts(&env.alice, &env.conn, &env.clock, &campaign_id).unwrap();
    assert_eq!(due.len(), 3);

    let started = capture.count_events(|e| {
        e.op.as_deref() == Some("due_contacts")
            && e.fields.get(FIELD_CAMPAIGN_ID) == Some(&campaign_id)
    });
    assert_eq!(started, 1);
    let ends = capture.count_events(|e| {
        e.op.as_deref() == Some("due_contacts")
            && e.event.as_deref() == Some(EVENT_END)
            && e.fields.get(FIELD_DUE_COUNT).map(String::as_str) == Some("3")
    });
    assert!(ends >= 1);
}

#[test]
fn test_cancelled_enrollment_has_no_due_contacts() {
    let mut env = setup();
    let list_id = env.alice_list(2);
    let campaign_id = env.alice_campaign();
    campaigns::add_sequence_step(&env.alice, &env.conn, &env.clock, &campaign_id, 1, 0, "Hi", "")
        .unwrap();
    let result = env.enroll(&campaign_id, &list_id);

    enrollment::set_enrollment_status(
        &env.alice,
        &env.conn,
        &env.clock,
        &result.enrollment_id,
        EnrollmentStatus::Cancelled,
    )
    .unwrap();
    env.clock.advance(Duration::hours(1));
    assert!(queries::due_contacts(&env.alice, &env.conn, &env.clock, &campaign_id)
        .unwrap()
        .is_empty());

    enrollment::set_enrollment_status(
        &env.alice,
        &env.conn,
        &env.clock,
        &result.enrollment_id,
        EnrollmentStatus::Active,
    )
    .unwrap();
    let due = queries::due_contacts(&env.alice, &env.conn, &env.clock, &campaign_id).unwrap();
    assert_eq!(due.len(), 2);
}

#[test]
fn test_campaign_and_list_listings_are_owner_scoped() {
    let mut env = setup();
    let list_id = env.alice_list(1);
    let campaign_id = env.alice_campaign();

    let mine = campaigns::list_campaigns(&env.alice, &env.conn).unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, campaign_id);
    assert!(campaigns::list_campaigns(&env.bob, &env.conn).unwrap().is_empty());

    let lists_mine = lists::list_target_lists(&env.alice, &env.conn).unwrap();
    assert_eq!(lists_mine.len(), 1);
    assert_eq!(lists_mine[0].id, list_id);
    assert!(lists::list_target_lists(&env.bob, &env.conn).unwrap().is_empty());

    let err = campaigns::list_campaigns(&AuthContext::anonymous(), &env.conn).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Unauthorised);
}

#[test]
fn test_campaign_get_and_status_change_are_owner_only() {
    let env = setup();
    let campaign_id = env.alice_campaign();

    let campaign = campaigns::get_campaign(&env.alice, &env.conn, &campaign_id).unwrap();
    assert_eq!(campaign.status, CampaignStatus::Draft);
    let err = campaigns::get_campaign(&env.bob, &env.conn, &campaign_id).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Forbidden);

    let err = campaigns::set_campaign_status(
        &env.bob,
        &env.conn,
        &env.clock,
        &campaign_id,
        CampaignStatus::Active,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Forbidden);

    let updated = campaigns::set_campaign_status(
        &env.alice,
        &env.conn,
        &env.clock,
        &campaign_id,
        CampaignStatus::Active,
    )
    .unwrap();
    assert_eq!(updated.status, CampaignStatus::Active);
    assert_eq!(
        campaigns::get_campaign(&env.alice, &env.conn, &campaign_id).unwrap().status,
        CampaignStatus::Active
    );
}
