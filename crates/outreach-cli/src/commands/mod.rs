//! Subcommand handlers
//!
//! Each handler builds its engine call from the parsed args and the shared
//! `Session`, then prints the result as pretty JSON on stdout.

pub mod campaign;
pub mod enroll;
pub mod list;
pub mod ops;
pub mod report;
pub mod user;

use outreach_core::{AuthContext, SystemClock};
use outreach_store::{db, migrations};
use rusqlite::Connection;
use serde::Serialize;
use serde_json::json;

use crate::config::Settings;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Open connection plus the caller identity and clock for one invocation
pub struct Session {
    pub conn: Connection,
    pub ctx: AuthContext,
    pub clock: SystemClock,
}

impl Session {
    /// Open and migrate the configured database
    pub fn open(settings: &Settings) -> Result<Self, Box<dyn std::error::Error>> {
        let mut conn = db::open(&settings.database_path)?;
        db::configure(&conn, settings.busy_timeout_ms)?;
        migrations::apply_migrations(&mut conn)?;

        let ctx = match &settings.user_id {
            Some(user_id) => AuthContext::for_user(user_id.clone()),
            None => AuthContext::anonymous(),
        };

        Ok(Self {
            conn,
            ctx,
            clock: SystemClock,
        })
    }
}

pub fn emit<T: Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `outreach migrate`
pub fn migrate(session: &Session) -> CmdResult {
    let applied: Vec<_> = migrations::applied_migrations(&session.conn)?
        .into_iter()
        .map(|m| {
            json!({
                "migration_id": m.migration_id,
                "applied_at": m.applied_at,
                "checksum": m.checksum,
            })
        })
        .collect();
    emit(&applied)
}
