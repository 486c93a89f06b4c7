//! SQLite repositories
//!
//! `SqliteRepo` is a namespace: each submodule adds the statements for one
//! aggregate. Every function takes a `&Connection`, so the same calls work
//! inside a `Transaction`.

#![allow(clippy::result_large_err)]

mod access;
mod campaigns;
mod lists;
mod operations;
mod users;

pub use access::RecipientAccess;
pub(crate) use operations::{operations_from_row, OPERATIONS_COLUMNS};

use std::str::FromStr;

use chrono::{DateTime, Utc};
use outreach_core::errors::OutreachError;
use outreach_core::model::{NormalizedFields, ProfileField};
use rusqlite::types::Type;
use rusqlite::Row;

/// SQLite repository
pub struct SqliteRepo;

pub(crate) fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

pub(crate) fn ms(t: DateTime<Utc>) -> i64 {
    t.timestamp_millis()
}

/// `t` at the millisecond precision of stored timestamps
pub(crate) fn stored_precision(t: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms(t)).unwrap_or(t)
}

pub(crate) fn opt_ms(t: Option<DateTime<Utc>>) -> Option<i64> {
    t.map(ms)
}

pub(crate) fn time_col(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let value: i64 = row.get(idx)?;
    DateTime::from_timestamp_millis(value)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, value))
}

pub(crate) fn opt_time_col(row: &Row, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let value: Option<i64> = row.get(idx)?;
    value
        .map(|v| {
            DateTime::from_timestamp_millis(v)
                .ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, v))
        })
        .transpose()
}

/// Parse a TEXT column holding one of the closed status enums
pub(crate) fn enum_col<T>(row: &Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = OutreachError>,
{
    let text: String = row.get(idx)?;
    text.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Read the nine personalization columns starting at `start`
pub(crate) fn fields_at(row: &Row, start: usize) -> rusqlite::Result<NormalizedFields> {
    let mut fields = NormalizedFields::default();
    for (offset, field) in ProfileField::ALL.iter().enumerate() {
        let value: Option<String> = row.get(start + offset)?;
        let slot = match field {
            ProfileField::FullName => &mut fields.full_name,
            ProfileField::FirstName => &mut fields.first_name,
            ProfileField::LastName => &mut fields.last_name,
            ProfileField::Email => &mut fields.email,
            ProfileField::Title => &mut fields.title,
            ProfileField::Company => &mut fields.company,
            ProfileField::CompanyDomain => &mut fields.company_domain,
            ProfileField::Location => &mut fields.location,
            ProfileField::LinkedinUrl => &mut fields.linkedin_url,
        };
        *slot = value;
    }
    Ok(fields)
}

/// Comma-separated personalization column names, in `ProfileField::ALL` order
pub(crate) fn field_columns() -> String {
    ProfileField::ALL
        .iter()
        .map(|f| f.column())
        .collect::<Vec<_>>()
        .join(", ")
}
