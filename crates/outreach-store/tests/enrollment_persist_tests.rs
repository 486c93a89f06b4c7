#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{count, seed_campaign, seed_list, seed_members, seed_user, setup_db, t};
use outreach_core::errors::ExErrorKind;
use outreach_core::model::{
    ActiveState, EmailStatus, EnrollmentStatus, ListType, ResponseStatus, SequenceStep,
};
use outreach_store::enrollment::{create_enrollment, query};
use outreach_store::SqliteRepo;

#[test]
fn test_enrollment_copies_every_member_with_operations() {
    let (_dir, mut conn) = setup_db();
    seed_user(&conn, "u1");
    seed_campaign(&conn, "u1", "c1");
    seed_list(&conn, "u1", "l1");
    seed_members(&conn, "l1", 3);

    let result = create_enrollment(&mut conn, "u1", "c1", "l1", t(1_000)).unwrap();
    assert_eq!(result.profile_count, 3);
    assert_eq!(result.enrollment_date, t(1_000));

    let recipients = query::enrolled_recipients(&conn, &result.enrollment_id).unwrap();
    assert_eq!(recipients.len(), 3);
    assert_eq!(recipients[0].profile.snapshot.full_name, "Member 0");
    for r in &recipients {
        assert_eq!(r.operations.enrollment_profile_id, r.profile.id);
        assert_eq!(r.operations.email_status, EmailStatus::Pending);
        assert_eq!(r.operations.response_status, ResponseStatus::None);
        assert_eq!(r.operations.is_active, ActiveState::Active);
        assert_eq!(r.operations.current_sequence_step, 0);
        assert_eq!(r.operations.next_scheduled_contact, None);
    }
    assert_eq!(count(&conn, "enrollment_profiles"), 3);
    assert_eq!(count(&conn, "profile_operations"), 3);

    let enrollment = query::get_enrollment(&conn, &result.enrollment_id)
        .unwrap()
        .unwrap();
    assert_eq!(enrollment.status, EnrollmentStatus::Active);
    assert_eq!(enrollment.snapshot_data.list_name, "List l1");
    assert_eq!(enrollment.snapshot_data.list_type, ListType::Prospect);
    assert_eq!(enrollment.snapshot_data.member_count, 3);

    let list = SqliteRepo::get_target_list(&conn, "l1").unwrap().unwrap();
    assert!(list.used_in_campaigns);
    assert_eq!(list.campaign_count, 1);
}

#[test]
fn test_first_contact_follows_first_step_delay() {
    let (_dir, mut conn) = setup_db();
    seed_user(&conn, "u1");
    seed_campaign(&conn, "u1", "c1");
    seed_list(&conn, "u1", "l1");
    seed_members(&conn, "l1", 1);
    SqliteRepo::insert_sequence_step(
        &conn,
        &SequenceStep {
            id: "s1".to_string(),
            campaign_id: "c1".to_string(),
            step_number: 1,
            subject: "Hello".to_string(),
            body_template: String::new(),
            delay_days: 2,
        },
        t(0),
    )
    .unwrap();

    let result = create_enrollment(&mut conn, "u1", "c1", "l1", t(0)).unwrap();
    let recipients = query::enrolled_recipients(&conn, &result.enrollment_id).unwrap();
    assert_eq!(
        recipients[0].operations.next_scheduled_contact,
        Some(t(2 * 86_400_000))
    );
}

#[test]
fn test_empty_list_writes_nothing() {
    let (_dir, mut conn) = setup_db();
    seed_user(&conn, "u1");
    seed_campaign(&conn, "u1", "c1");
    seed_list(&conn, "u1", "l1");

    let err = create_enrollment(&mut conn, "u1", "c1", "l1", t(0)).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::EmptyList);
    assert_eq!(count(&conn, "campaign_enrollments"), 0);
    let list = SqliteRepo::get_target_list(&conn, "l1").unwrap().unwrap();
    assert!(!list.used_in_campaigns);
}

#[test]
fn test_failure_mid_copy_rolls_back_everything() {
    let (_dir, mut conn) = setup_db();
    seed_user(&conn, "u1");
    seed_campaign(&conn, "u1", "c1");
    seed_list(&conn, "u1", "l1");
    seed_members(&conn, "l1", 3);

    conn.execute_batch(
        "CREATE TRIGGER fail_third_operations_row BEFORE INSERT ON profile_operations
         WHEN (SELECT COUNT(*) FROM profile_operations) >= 2
         BEGIN SELECT RAISE(ABORT, 'injected failure'); END;",
    )
    .unwrap();

    let err = create_enrollment(&mut conn, "u1", "c1", "l1", t(0)).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Persistence);
    assert!(err.message().contains("injected failure"));

    assert_eq!(count(&conn, "campaign_enrollments"), 0);
    assert_eq!(count(&conn, "enrollment_profiles"), 0);
    assert_eq!(count(&conn, "profile_operations"), 0);
    let list = SqliteRepo::get_target_list(&conn, "l1").unwrap().unwrap();
    assert!(!list.used_in_campaigns);
    assert_eq!(list.campaign_count, 0);
}

#[test]
fn test_snapshot_rows_reject_updates() {
    let (_dir, mut conn) = setup_db();
    seed_user(&conn, "u1");
    seed_campaign(&conn, "u1", "c1");
    seed_list(&conn, "u1", "l1");
    seed_members(&conn, "l1", 1);
    create_enrollment(&mut conn, "u1", "c1", "l1", t(0)).unwrap();

    let result = conn.execute("UPDATE enrollment_profiles SET full_name = 'Changed'", []);
    assert!(result.is_err());
}

#[test]
fn test_snapshot_survives_source_changes() {
    let (_dir, mut conn) = setup_db();
    seed_user(&conn, "u1");
    seed_campaign(&conn, "u1", "c1");
    seed_list(&conn, "u1", "l1");
    let members = seed_members(&conn, "l1", 2);
    let result = create_enrollment(&mut conn, "u1", "c1", "l1", t(0)).unwrap();

    SqliteRepo::update_list_member(&conn, &members[0].id, &common::member("Someone Else"), t(5))
        .unwrap();
    conn.execute("DELETE FROM list_members WHERE id = ?1", [&members[1].id])
        .unwrap();

    let recipients = query::enrolled_recipients(&conn, &result.enrollment_id).unwrap();
    let names: Vec<&str> = recipients
        .iter()
        .map(|r| r.profile.snapshot.full_name.as_str())
        .collect();
    assert_eq!(names, vec!["Member 0", "Member 1"]);
    assert_eq!(recipients[1].profile.source_member_id, members[1].id);
}

#[test]
fn test_enrollment_date_matches_stored_value() {
    let (_dir, mut conn) = setup_db();
    seed_user(&conn, "u1");
    seed_campaign(&conn, "u1", "c1");
    seed_list(&conn, "u1", "l1");
    seed_members(&conn, "l1", 1);

    let now = t(1_234) + chrono::Duration::microseconds(567);
    let result = create_enrollment(&mut conn, "u1", "c1", "l1", now).unwrap();
    assert_eq!(result.enrollment_date, t(1_234));

    let stored = query::get_enrollment(&conn, &result.enrollment_id).unwrap().unwrap();
    assert_eq!(stored.enrollment_date, result.enrollment_date);
}

#[test]
fn test_delete_enrollment_cascades() {
    let (_dir, mut conn) = setup_db();
    seed_user(&conn, "u1");
    seed_campaign(&conn, "u1", "c1");
    seed_list(&conn, "u1", "l1");
    seed_members(&conn, "l1", 2);
    let result = create_enrollment(&mut conn, "u1", "c1", "l1", t(0)).unwrap();

    assert!(query::delete_enrollment(&conn, &result.enrollment_id).unwrap());
    assert_eq!(count(&conn, "enrollment_profiles"), 0);
    assert_eq!(count(&conn, "profile_operations"), 0);
    let list = SqliteRepo::get_target_list(&conn, "l1").unwrap().unwrap();
    assert!(list.used_in_campaigns);
}

#[test]
fn test_enrolling_twice_counts_both() {
    let (_dir, mut conn) = setup_db();
    seed_user(&conn, "u1");
    seed_campaign(&conn, "u1", "c1");
    seed_campaign(&conn, "u1", "c2");
    seed_list(&conn, "u1", "l1");
    seed_members(&conn, "l1", 1);

    create_enrollment(&mut conn, "u1", "c1", "l1", t(0)).unwrap();
    create_enrollment(&mut conn, "u1", "c2", "l1", t(1)).unwrap();

    let list = SqliteRepo::get_target_list(&conn, "l1").unwrap().unwrap();
    assert_eq!(list.campaign_count, 2);
    assert_eq!(query::list_enrollments(&conn, "c1").unwrap().len(), 1);
}
