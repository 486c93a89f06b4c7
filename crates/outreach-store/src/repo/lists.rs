#![allow(clippy::result_large_err)]

use chrono::{DateTime, Utc};
use outreach_core::model::{ListMember, ListType, MemberSource, TargetList};
use outreach_core::rules::validation::ensure_list_mutable;
use rusqlite::{Connection, OptionalExtension, Row};
use serde_json::Value;

use super::{enum_col, field_columns, fields_at, ms, new_id, time_col, SqliteRepo};
use crate::errors::{from_rusqlite, Result};

const LIST_COLUMNS: &str = "id, user_id, name, description, list_type, used_in_campaigns, \
                            campaign_count, created_at, updated_at";

fn list_from_row(row: &Row) -> rusqlite::Result<TargetList> {
    Ok(TargetList {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        list_type: enum_col(row, 4)?,
        used_in_campaigns: row.get(5)?,
        campaign_count: row.get(6)?,
        created_at: time_col(row, 7)?,
        updated_at: time_col(row, 8)?,
    })
}

fn member_select() -> String {
    format!(
        "SELECT id, list_id, {}, additional_data, created_at, updated_at FROM list_members",
        field_columns()
    )
}

fn member_from_row(row: &Row) -> rusqlite::Result<ListMember> {
    let fields = fields_at(row, 2)?;
    let additional_data: Option<Value> = row.get(11)?;
    Ok(ListMember {
        id: row.get(0)?,
        list_id: row.get(1)?,
        source: MemberSource::from_parts(fields, additional_data),
        created_at: time_col(row, 12)?,
        updated_at: time_col(row, 13)?,
    })
}

impl SqliteRepo {
    pub fn insert_target_list(conn: &Connection, list: &TargetList) -> Result<()> {
        conn.execute(
            "INSERT INTO target_lists (id, user_id, name, description, list_type,
                used_in_campaigns, campaign_count, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                list.id,
                list.user_id,
                list.name,
                list.description,
                list.list_type.as_str(),
                list.used_in_campaigns,
                list.campaign_count,
                ms(list.created_at),
                ms(list.updated_at),
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    pub fn get_target_list(conn: &Connection, id: &str) -> Result<Option<TargetList>> {
        conn.query_row(
            &format!("SELECT {} FROM target_lists WHERE id = ?1", LIST_COLUMNS),
            [id],
            list_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Lists owned by a user, oldest first
    pub fn list_target_lists_for_user(conn: &Connection, user_id: &str) -> Result<Vec<TargetList>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM target_lists WHERE user_id = ?1 ORDER BY created_at, id",
                LIST_COLUMNS
            ))
            .map_err(from_rusqlite)?;
        let lists = stmt
            .query_map([user_id], list_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(lists)
    }

    /// Insert members into a list and bump its `updated_at`
    ///
    /// Call inside a transaction to make a bulk import all-or-nothing.
    pub fn insert_list_members(
        conn: &Connection,
        list_id: &str,
        sources: &[MemberSource],
        now: DateTime<Utc>,
    ) -> Result<Vec<ListMember>> {
        let mut stmt = conn
            .prepare_cached(&format!(
                "INSERT INTO list_members (id, list_id, {}, additional_data, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                field_columns()
            ))
            .map_err(from_rusqlite)?;

        let mut inserted = Vec::with_capacity(sources.len());
        for source in sources {
            let id = new_id();
            let (f, additional_data) = source.to_parts();
            stmt.execute(rusqlite::params![
                id,
                list_id,
                f.full_name,
                f.first_name,
                f.last_name,
                f.email,
                f.title,
                f.company,
                f.company_domain,
                f.location,
                f.linkedin_url,
                additional_data,
                ms(now),
                ms(now),
            ])
            .map_err(from_rusqlite)?;

            inserted.push(ListMember {
                id,
                list_id: list_id.to_string(),
                source: source.clone(),
                created_at: now,
                updated_at: now,
            });
        }

        Self::touch_target_list(conn, list_id, now)?;
        tracing::debug!(list_id, count = inserted.len(), "Inserted list members");

        Ok(inserted)
    }

    /// Members of a list in insertion order
    pub fn list_members(conn: &Connection, list_id: &str) -> Result<Vec<ListMember>> {
        let mut stmt = conn
            .prepare(&format!(
                "{} WHERE list_id = ?1 ORDER BY created_at, rowid",
                member_select()
            ))
            .map_err(from_rusqlite)?;
        let members = stmt
            .query_map([list_id], member_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(members)
    }

    pub fn count_list_members(conn: &Connection, list_id: &str) -> Result<i64> {
        conn.query_row(
            "SELECT COUNT(*) FROM list_members WHERE list_id = ?1",
            [list_id],
            |row| row.get(0),
        )
        .map_err(from_rusqlite)
    }

    pub fn get_list_member(conn: &Connection, member_id: &str) -> Result<Option<ListMember>> {
        conn.query_row(
            &format!("{} WHERE id = ?1", member_select()),
            [member_id],
            member_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Replace a member's content. Allowed on used lists: snapshots hold
    /// their own copies.
    pub fn update_list_member(
        conn: &Connection,
        member_id: &str,
        source: &MemberSource,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let (f, additional_data) = source.to_parts();
        let changed = conn
            .execute(
                "UPDATE list_members SET
                    full_name = ?2, first_name = ?3, last_name = ?4, email = ?5, title = ?6,
                    company = ?7, company_domain = ?8, location = ?9, linkedin_url = ?10,
                    additional_data = ?11, updated_at = ?12
                 WHERE id = ?1",
                rusqlite::params![
                    member_id,
                    f.full_name,
                    f.first_name,
                    f.last_name,
                    f.email,
                    f.title,
                    f.company,
                    f.company_domain,
                    f.location,
                    f.linkedin_url,
                    additional_data,
                    ms(now),
                ],
            )
            .map_err(from_rusqlite)?;
        Ok(changed == 1)
    }

    /// Remove one member of `list`
    ///
    /// # Errors
    ///
    /// `ListInUse` once the list has been enrolled; a used list only grows.
    pub fn delete_list_member(conn: &Connection, list: &TargetList, member_id: &str) -> Result<bool> {
        ensure_list_mutable(list, "shrunk")?;
        let changed = conn
            .execute(
                "DELETE FROM list_members WHERE id = ?1 AND list_id = ?2",
                [member_id, list.id.as_str()],
            )
            .map_err(from_rusqlite)?;
        Ok(changed == 1)
    }

    /// # Errors
    ///
    /// `ListInUse` once the list has been enrolled.
    pub fn set_list_type(
        conn: &Connection,
        list: &TargetList,
        list_type: ListType,
        now: DateTime<Utc>,
    ) -> Result<()> {
        ensure_list_mutable(list, "retyped")?;
        conn.execute(
            "UPDATE target_lists SET list_type = ?2, updated_at = ?3 WHERE id = ?1",
            rusqlite::params![list.id, list_type.as_str(), ms(now)],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    /// Remove every member of a list
    ///
    /// # Errors
    ///
    /// `ListInUse` once the list has been enrolled.
    pub fn clear_list_members(conn: &Connection, list: &TargetList, now: DateTime<Utc>) -> Result<usize> {
        ensure_list_mutable(list, "cleared")?;
        let removed = conn
            .execute("DELETE FROM list_members WHERE list_id = ?1", [&list.id])
            .map_err(from_rusqlite)?;
        Self::touch_target_list(conn, &list.id, now)?;
        Ok(removed)
    }

    /// Delete a list and its members
    ///
    /// # Errors
    ///
    /// `ListInUse` once the list has been enrolled. The
    /// `target_lists_used_no_delete` trigger rejects the same delete if the
    /// flag was set after `list` was read.
    pub fn delete_target_list(conn: &Connection, list: &TargetList) -> Result<()> {
        ensure_list_mutable(list, "deleted")?;
        conn.execute("DELETE FROM target_lists WHERE id = ?1", [&list.id])
            .map_err(from_rusqlite)?;
        Ok(())
    }

    /// Flag a list as enrolled and count the enrollment
    pub fn mark_list_used(conn: &Connection, list_id: &str, now: DateTime<Utc>) -> Result<()> {
        conn.execute(
            "UPDATE target_lists
             SET used_in_campaigns = 1, campaign_count = campaign_count + 1, updated_at = ?2
             WHERE id = ?1",
            rusqlite::params![list_id, ms(now)],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    fn touch_target_list(conn: &Connection, list_id: &str, now: DateTime<Utc>) -> Result<()> {
        conn.execute(
            "UPDATE target_lists SET updated_at = ?2 WHERE id = ?1",
            rusqlite::params![list_id, ms(now)],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }
}
