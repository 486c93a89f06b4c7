#![allow(clippy::result_large_err)]

use outreach_core::errors::{ExError, ExErrorKind};
use outreach_core::model::User;
use rusqlite::{Connection, OptionalExtension, Row};

use super::{ms, time_col, SqliteRepo};
use crate::errors::{from_rusqlite, Result};

const USER_COLUMNS: &str = "id, email, display_name, created_at";

fn user_from_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        display_name: row.get(2)?,
        created_at: time_col(row, 3)?,
    })
}

impl SqliteRepo {
    /// Insert a user; emails are unique
    pub fn insert_user(conn: &Connection, user: &User) -> Result<()> {
        if Self::find_user_by_email(conn, &user.email)?.is_some() {
            return Err(ExError::new(ExErrorKind::AlreadyExists)
                .with_op("insert_user")
                .with_message(format!("user with email {} already exists", user.email)));
        }

        conn.execute(
            "INSERT INTO users (id, email, display_name, created_at) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![user.id, user.email, user.display_name, ms(user.created_at)],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    pub fn find_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
        conn.query_row(
            &format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS),
            [email],
            user_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }
}
