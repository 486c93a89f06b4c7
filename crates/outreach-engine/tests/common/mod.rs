#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use chrono::{DateTime, Duration, Utc};
use outreach_core::model::{ListType, NewListMember, NormalizedFields};
use outreach_core::{AuthContext, FixedClock};
use outreach_engine::commands::{campaigns, enrollment, lists, users};
use outreach_store::enrollment::EnrollmentResult;
use outreach_store::{db, migrations};
use rusqlite::Connection;
use serde_json::json;
use tempfile::TempDir;

pub struct TestEnv {
    pub _dir: TempDir,
    pub conn: Connection,
    pub clock: FixedClock,
    pub alice: AuthContext,
    pub bob: AuthContext,
}

pub fn start() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

pub fn days(n: i64) -> Duration {
    Duration::days(n)
}

/// Fresh database with two users, alice and bob
pub fn setup() -> TestEnv {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut conn = db::open(dir.path().join("engine.db")).expect("open");
    db::configure(&conn, 1_000).expect("configure");
    migrations::apply_migrations(&mut conn).expect("migrations");

    let clock = FixedClock::new(start());
    let alice = users::create_user(&conn, &clock, "alice@example.com", "Alice").unwrap();
    let bob = users::create_user(&conn, &clock, "bob@example.com", "Bob").unwrap();

    TestEnv {
        _dir: dir,
        conn,
        clock,
        alice: AuthContext::for_user(alice.id),
        bob: AuthContext::for_user(bob.id),
    }
}

pub fn prospect(name: &str, email: &str) -> NewListMember {
    NewListMember {
        fields: NormalizedFields {
            full_name: Some(name.to_string()),
            email: Some(email.to_string()),
            ..Default::default()
        },
        additional_data: None,
    }
}

/// Legacy-shaped member: only a JSON blob
pub fn legacy(blob: serde_json::Value) -> NewListMember {
    NewListMember {
        fields: NormalizedFields::default(),
        additional_data: Some(blob),
    }
}

impl TestEnv {
    /// List owned by alice with `n` normalized members
    pub fn alice_list(&mut self, n: usize) -> String {
        let list = lists::create_target_list(
            &self.alice,
            &self.conn,
            &self.clock,
            "Q3 prospects",
            Some("warm leads"),
            ListType::Prospect,
        )
        .unwrap();
        let members = (0..n)
            .map(|i| prospect(&format!("Prospect {}", i), &format!("p{}@acme.test", i)))
            .collect();
        lists::add_list_members(&self.alice, &mut self.conn, &self.clock, &list.id, members)
            .unwrap();
        list.id
    }

    pub fn alice_campaign(&self) -> String {
        campaigns::create_campaign(&self.alice, &self.conn, &self.clock, "Outbound", None)
            .unwrap()
            .id
    }

    pub fn enroll(&mut self, campaign_id: &str, list_id: &str) -> EnrollmentResult {
        enrollment::create_campaign_enrollment(
            &self.alice,
            &mut self.conn,
            &self.clock,
            campaign_id,
            list_id,
        )
        .unwrap()
    }

    /// Enrollment profile ids of one enrollment, in member order
    pub fn profile_ids(&self, enrollment_id: &str) -> Vec<String> {
        enrollment::enrollment_profiles(&self.alice, &self.conn, enrollment_id)
            .unwrap()
            .into_iter()
            .map(|r| r.profile.id)
            .collect()
    }

    pub fn count(&self, table: &str) -> i64 {
        self.conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })
            .unwrap()
    }
}

pub fn sample_blob() -> serde_json::Value {
    json!({
        "firstName": "Grace",
        "lastName": "Hopper",
        "headline": "Rear Admiral",
        "organization": {"name": "US Navy", "primary_domain": "navy.mil"},
        "linkedin": "https://linkedin.com/in/grace"
    })
}
