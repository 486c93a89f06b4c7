//! User command handlers.

#![allow(clippy::result_large_err)]

use std::time::Instant;

use outreach_core::model::User;
use outreach_core::rules::validation::require_non_blank;
use outreach_core::{log_op_end, log_op_error, log_op_start, Clock};
use outreach_core_types::Sensitive;
use outreach_store::errors::Result;
use outreach_store::SqliteRepo;
use rusqlite::Connection;

use super::elapsed_ms;

/// Register a user. Emails are unique (`AlreadyExists` otherwise).
///
/// Needs no caller context: this is how callers come to exist.
pub fn create_user(
    conn: &Connection,
    clock: &dyn Clock,
    email: &str,
    display_name: &str,
) -> Result<User> {
    log_op_start!("create_user", email = ?Sensitive::new(email));
    let start = Instant::now();

    let result = create_user_impl(conn, clock, email, display_name).map_err(|e| {
        log_op_error!("create_user", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(
        "create_user",
        duration_ms = elapsed_ms(start),
        user_id = %result.id
    );
    Ok(result)
}

fn create_user_impl(
    conn: &Connection,
    clock: &dyn Clock,
    email: &str,
    display_name: &str,
) -> Result<User> {
    let user = User {
        id: uuid::Uuid::now_v7().to_string(),
        email: require_non_blank("email", email)?.to_lowercase(),
        display_name: require_non_blank("display_name", display_name)?,
        created_at: clock.now(),
    };
    SqliteRepo::insert_user(conn, &user)?;
    Ok(user)
}
