#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use chrono::{DateTime, Utc};
use outreach_core::model::{
    Campaign, CampaignStatus, ListMember, ListType, MemberSource, NormalizedFields, TargetList,
    User,
};
use outreach_store::{db, migrations, SqliteRepo};
use rusqlite::Connection;
use tempfile::TempDir;

/// File-backed database with migrations applied; keep the TempDir alive
pub fn setup_db() -> (TempDir, Connection) {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut conn = db::open(dir.path().join("outreach.db")).expect("open");
    db::configure(&conn, 1_000).expect("configure");
    migrations::apply_migrations(&mut conn).expect("migrations");
    (dir, conn)
}

pub fn t(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap()
}

pub fn seed_user(conn: &Connection, id: &str) -> User {
    let user = User {
        id: id.to_string(),
        email: format!("{}@example.com", id),
        display_name: id.to_string(),
        created_at: t(0),
    };
    SqliteRepo::insert_user(conn, &user).unwrap();
    user
}

pub fn seed_list(conn: &Connection, user_id: &str, id: &str) -> TargetList {
    let list = TargetList {
        id: id.to_string(),
        user_id: user_id.to_string(),
        name: format!("List {}", id),
        description: Some("seeded".to_string()),
        list_type: ListType::Prospect,
        used_in_campaigns: false,
        campaign_count: 0,
        created_at: t(0),
        updated_at: t(0),
    };
    SqliteRepo::insert_target_list(conn, &list).unwrap();
    list
}

pub fn member(name: &str) -> MemberSource {
    MemberSource::Normalized {
        fields: NormalizedFields {
            full_name: Some(name.to_string()),
            email: Some(format!("{}@prospect.test", name.to_lowercase().replace(' ', "."))),
            ..Default::default()
        },
        additional_data: None,
    }
}

pub fn seed_members(conn: &Connection, list_id: &str, n: usize) -> Vec<ListMember> {
    let sources: Vec<MemberSource> = (0..n).map(|i| member(&format!("Member {}", i))).collect();
    SqliteRepo::insert_list_members(conn, list_id, &sources, t(1)).unwrap()
}

pub fn seed_campaign(conn: &Connection, user_id: &str, id: &str) -> Campaign {
    let campaign = Campaign {
        id: id.to_string(),
        user_id: user_id.to_string(),
        name: format!("Campaign {}", id),
        description: None,
        status: CampaignStatus::Draft,
        created_at: t(0),
        updated_at: t(0),
    };
    SqliteRepo::insert_campaign(conn, &campaign).unwrap();
    campaign
}

pub fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })
    .unwrap()
}
