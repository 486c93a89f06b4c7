#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{seed_campaign, seed_list, seed_members, seed_user, setup_db, t};
use outreach_core::errors::ExErrorKind;
use outreach_core::model::{ActiveState, EmailStatus, EnrollmentStatus, ResponseStatus};
use outreach_core::ops::plan_status_update;
use outreach_store::enrollment::{create_enrollment, query};
use outreach_store::SqliteRepo;
use rusqlite::Connection;

/// Enroll `n` members and return the enrollment profile ids
fn enrolled(conn: &mut Connection, n: usize) -> Vec<String> {
    seed_user(conn, "u1");
    seed_campaign(conn, "u1", "c1");
    seed_list(conn, "u1", "l1");
    seed_members(conn, "l1", n);
    let result = create_enrollment(conn, "u1", "c1", "l1", t(0)).unwrap();
    query::enrolled_recipients(conn, &result.enrollment_id)
        .unwrap()
        .into_iter()
        .map(|r| r.profile.id)
        .collect()
}

#[test]
fn test_counters_increment_in_sql() {
    let (_dir, mut conn) = setup_db();
    let ep = enrolled(&mut conn, 1).remove(0);

    for (i, status) in [EmailStatus::Sent, EmailStatus::Sent, EmailStatus::Opened]
        .into_iter()
        .enumerate()
    {
        let applied = SqliteRepo::apply_status_transition(
            &conn,
            &ep,
            &plan_status_update(status),
            t(100 + i as i64),
        )
        .unwrap();
        assert!(applied);
    }

    let ops = SqliteRepo::get_operations(&conn, &ep).unwrap().unwrap();
    assert_eq!(ops.emails_sent_count, 2);
    assert_eq!(ops.open_count, 1);
    assert_eq!(ops.email_status, EmailStatus::Opened);
    assert_eq!(ops.last_email_sent, Some(t(101)));
    assert_eq!(ops.updated_at, t(102));
}

#[test]
fn test_first_response_date_is_write_once() {
    let (_dir, mut conn) = setup_db();
    let ep = enrolled(&mut conn, 1).remove(0);

    SqliteRepo::apply_status_transition(&conn, &ep, &plan_status_update(EmailStatus::Replied), t(200))
        .unwrap();
    SqliteRepo::apply_status_transition(&conn, &ep, &plan_status_update(EmailStatus::Clicked), t(300))
        .unwrap();

    let ops = SqliteRepo::get_operations(&conn, &ep).unwrap().unwrap();
    assert_eq!(ops.first_response_date, Some(t(200)));
    assert_eq!(ops.last_response_date, Some(t(300)));
    assert_eq!(ops.response_status, ResponseStatus::Engaged);
    assert_eq!(ops.reply_count, 1);
    assert_eq!(ops.click_count, 1);

    let rewrite = conn.execute(
        "UPDATE profile_operations SET first_response_date = 1 WHERE enrollment_profile_id = ?1",
        [&ep],
    );
    assert!(rewrite.is_err());
}

#[test]
fn test_counter_decrease_is_rejected_by_trigger() {
    let (_dir, mut conn) = setup_db();
    let ep = enrolled(&mut conn, 1).remove(0);
    SqliteRepo::apply_status_transition(&conn, &ep, &plan_status_update(EmailStatus::Sent), t(1))
        .unwrap();

    let result = conn.execute(
        "UPDATE profile_operations SET emails_sent_count = 0 WHERE enrollment_profile_id = ?1",
        [&ep],
    );
    assert!(result.is_err());
}

#[test]
fn test_pause_resume_guards() {
    let (_dir, mut conn) = setup_db();
    let ep = enrolled(&mut conn, 1).remove(0);

    assert!(SqliteRepo::pause_operations(&conn, &ep, t(10)).unwrap());
    assert!(!SqliteRepo::pause_operations(&conn, &ep, t(11)).unwrap());
    let ops = SqliteRepo::get_operations(&conn, &ep).unwrap().unwrap();
    assert_eq!(ops.is_active, ActiveState::Paused);
    assert_eq!(ops.paused_at, Some(t(10)));

    assert!(SqliteRepo::resume_operations(&conn, &ep, t(20)).unwrap());
    assert!(!SqliteRepo::resume_operations(&conn, &ep, t(21)).unwrap());
    let ops = SqliteRepo::get_operations(&conn, &ep).unwrap().unwrap();
    assert_eq!(ops.is_active, ActiveState::Active);
    assert_eq!(ops.paused_at, None);
}

#[test]
fn test_unsubscribe_blocks_later_writes() {
    let (_dir, mut conn) = setup_db();
    let ep = enrolled(&mut conn, 1).remove(0);
    SqliteRepo::schedule_operations(&conn, &ep, Some(t(500)), None, t(1)).unwrap();

    assert!(SqliteRepo::unsubscribe_operations(&conn, &ep, t(30)).unwrap());
    let ops = SqliteRepo::get_operations(&conn, &ep).unwrap().unwrap();
    assert_eq!(ops.is_active, ActiveState::Unsubscribed);
    assert_eq!(ops.response_status, ResponseStatus::Unsubscribed);
    assert_eq!(ops.unsubscribed_at, Some(t(30)));
    assert_eq!(ops.next_scheduled_contact, None);

    let sent = plan_status_update(EmailStatus::Sent);
    assert!(!SqliteRepo::apply_status_transition(&conn, &ep, &sent, t(40)).unwrap());
    assert!(!SqliteRepo::unsubscribe_operations(&conn, &ep, t(41)).unwrap());
    assert!(!SqliteRepo::schedule_operations(&conn, &ep, Some(t(900)), Some(2), t(42)).unwrap());
    assert!(!SqliteRepo::resume_operations(&conn, &ep, t(43)).unwrap());
    assert_eq!(
        SqliteRepo::get_operations(&conn, &ep).unwrap().unwrap().emails_sent_count,
        0
    );
}

#[test]
fn test_schedule_increments_step_without_explicit_value() {
    let (_dir, mut conn) = setup_db();
    let ep = enrolled(&mut conn, 1).remove(0);

    SqliteRepo::schedule_operations(&conn, &ep, Some(t(1_000)), None, t(1)).unwrap();
    SqliteRepo::schedule_operations(&conn, &ep, Some(t(2_000)), None, t(2)).unwrap();
    let ops = SqliteRepo::get_operations(&conn, &ep).unwrap().unwrap();
    assert_eq!(ops.current_sequence_step, 2);
    assert_eq!(ops.next_scheduled_contact, Some(t(2_000)));

    SqliteRepo::schedule_operations(&conn, &ep, None, Some(7), t(3)).unwrap();
    let ops = SqliteRepo::get_operations(&conn, &ep).unwrap().unwrap();
    assert_eq!(ops.current_sequence_step, 7);
    assert_eq!(ops.next_scheduled_contact, None);
}

#[test]
fn test_due_recipients_order_and_filter() {
    let (_dir, mut conn) = setup_db();
    let eps = enrolled(&mut conn, 4);

    SqliteRepo::schedule_operations(&conn, &eps[0], Some(t(300)), Some(0), t(1)).unwrap();
    SqliteRepo::schedule_operations(&conn, &eps[1], Some(t(100)), Some(0), t(1)).unwrap();
    SqliteRepo::schedule_operations(&conn, &eps[2], Some(t(200)), Some(0), t(1)).unwrap();
    SqliteRepo::schedule_operations(&conn, &eps[3], Some(t(50)), Some(0), t(1)).unwrap();
    SqliteRepo::pause_operations(&conn, &eps[3], t(2)).unwrap();

    let due = query::due_recipients(&conn, "c1", t(250)).unwrap();
    let ids: Vec<&str> = due.iter().map(|r| r.profile.id.as_str()).collect();
    assert_eq!(ids, vec![eps[1].as_str(), eps[2].as_str()]);
}

#[test]
fn test_due_recipients_skip_inactive_enrollments() {
    let (_dir, mut conn) = setup_db();
    let eps = enrolled(&mut conn, 2);
    for ep in &eps {
        SqliteRepo::schedule_operations(&conn, ep, Some(t(100)), Some(0), t(1)).unwrap();
    }
    let enrollment_id = query::list_enrollments(&conn, "c1").unwrap().remove(0).id;

    for status in [EnrollmentStatus::Paused, EnrollmentStatus::Cancelled, EnrollmentStatus::Completed] {
        query::set_enrollment_status(&conn, &enrollment_id, status, t(2)).unwrap();
        assert!(query::due_recipients(&conn, "c1", t(500)).unwrap().is_empty());
    }

    query::set_enrollment_status(&conn, &enrollment_id, EnrollmentStatus::Active, t(3)).unwrap();
    assert_eq!(query::due_recipients(&conn, "c1", t(500)).unwrap().len(), 2);
    let ops = SqliteRepo::get_operations(&conn, &eps[0]).unwrap().unwrap();
    assert_eq!(ops.is_active, ActiveState::Active);
}

#[test]
fn test_recipient_access_checks_campaign_owner() {
    let (_dir, mut conn) = setup_db();
    let ep = enrolled(&mut conn, 1).remove(0);
    seed_user(&conn, "intruder");

    let access = SqliteRepo::require_owned_recipient(&conn, "u1", &ep, "test").unwrap();
    assert_eq!(access.campaign_id, "c1");

    let err = SqliteRepo::require_owned_recipient(&conn, "intruder", &ep, "test").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Forbidden);
    let err = SqliteRepo::require_owned_recipient(&conn, "u1", "missing", "test").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}
