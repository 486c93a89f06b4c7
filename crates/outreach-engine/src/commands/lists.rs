//! Target list command handlers.
//!
//! Lists are owner-scoped. Once a list has been enrolled it keeps
//! `used_in_campaigns = true` and refuses deletion, retyping and any member
//! removal. Member edits and new imports stay allowed because snapshots hold
//! copies.

#![allow(clippy::result_large_err)]

use std::time::Instant;

use outreach_core::model::{ListMember, ListType, NewListMember, TargetList};
use outreach_core::rules::validation::{require_non_blank, validate_members};
use outreach_core::{log_op_end, log_op_error, log_op_start, AuthContext, Clock};
use outreach_store::errors::{from_rusqlite, not_found, Result};
use outreach_store::SqliteRepo;
use rusqlite::Connection;

use super::{boundary, correlate, elapsed_ms};

/// Create an empty list owned by the caller
pub fn create_target_list(
    ctx: &AuthContext,
    conn: &Connection,
    clock: &dyn Clock,
    name: &str,
    description: Option<&str>,
    list_type: ListType,
) -> Result<TargetList> {
    log_op_start!("create_target_list", request_id = %ctx.request.request_id, list_type = %list_type);
    let start = Instant::now();

    let result = create_target_list_impl(ctx, conn, clock, name, description, list_type)
        .map_err(|e| {
            let e = correlate(ctx, e);
            log_op_error!("create_target_list", e.clone(), duration_ms = elapsed_ms(start));
            e
        })?;

    log_op_end!(
        "create_target_list",
        duration_ms = elapsed_ms(start),
        list_id = %result.id
    );
    Ok(result)
}

fn create_target_list_impl(
    ctx: &AuthContext,
    conn: &Connection,
    clock: &dyn Clock,
    name: &str,
    description: Option<&str>,
    list_type: ListType,
) -> Result<TargetList> {
    let user_id = ctx.require_user()?;
    let now = clock.now();
    let list = TargetList {
        id: uuid::Uuid::now_v7().to_string(),
        user_id: user_id.to_string(),
        name: require_non_blank("name", name)?,
        description: description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
        list_type,
        used_in_campaigns: false,
        campaign_count: 0,
        created_at: now,
        updated_at: now,
    };
    SqliteRepo::insert_target_list(conn, &list)?;
    Ok(list)
}

pub fn get_target_list(ctx: &AuthContext, conn: &Connection, list_id: &str) -> Result<TargetList> {
    boundary(ctx, "get_target_list", || {
        let user_id = ctx.require_user()?;
        SqliteRepo::require_owned_list(conn, user_id, list_id, "get_target_list")
    })
}

/// Every list the caller owns
pub fn list_target_lists(ctx: &AuthContext, conn: &Connection) -> Result<Vec<TargetList>> {
    boundary(ctx, "list_target_lists", || {
        let user_id = ctx.require_user()?;
        SqliteRepo::list_target_lists_for_user(conn, user_id)
    })
}

/// Members of an owned list in insertion order
pub fn list_members(ctx: &AuthContext, conn: &Connection, list_id: &str) -> Result<Vec<ListMember>> {
    boundary(ctx, "list_members", || {
        let user_id = ctx.require_user()?;
        SqliteRepo::require_owned_list(conn, user_id, list_id, "list_members")?;
        SqliteRepo::list_members(conn, list_id)
    })
}

/// Bulk import; all members are written or none
///
/// ## Errors
///
/// `InvalidInput` when any member carries no usable data.
pub fn add_list_members(
    ctx: &AuthContext,
    conn: &mut Connection,
    clock: &dyn Clock,
    list_id: &str,
    members: Vec<NewListMember>,
) -> Result<Vec<ListMember>> {
    log_op_start!(
        "add_list_members",
        request_id = %ctx.request.request_id,
        list_id,
        member_count = members.len()
    );
    let start = Instant::now();

    let result = add_list_members_impl(ctx, conn, clock, list_id, members).map_err(|e| {
        let e = correlate(ctx, e);
        log_op_error!("add_list_members", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(
        "add_list_members",
        duration_ms = elapsed_ms(start),
        member_count = result.len()
    );
    Ok(result)
}

fn add_list_members_impl(
    ctx: &AuthContext,
    conn: &mut Connection,
    clock: &dyn Clock,
    list_id: &str,
    members: Vec<NewListMember>,
) -> Result<Vec<ListMember>> {
    let user_id = ctx.require_user()?;
    let sources: Vec<_> = members.into_iter().map(NewListMember::into_source).collect();
    validate_members(&sources)?;

    let tx = conn.transaction().map_err(from_rusqlite)?;
    SqliteRepo::require_owned_list(&tx, user_id, list_id, "add_list_members")?;
    let inserted = SqliteRepo::insert_list_members(&tx, list_id, &sources, clock.now())?;
    tx.commit().map_err(from_rusqlite)?;
    Ok(inserted)
}

/// Owned member plus its list
fn owned_member(
    ctx: &AuthContext,
    conn: &Connection,
    member_id: &str,
    op: &str,
) -> Result<(ListMember, TargetList)> {
    let user_id = ctx.require_user()?;
    let member = SqliteRepo::get_list_member(conn, member_id)?
        .ok_or_else(|| not_found(op, "list member", member_id))?;
    let list = SqliteRepo::require_owned_list(conn, user_id, &member.list_id, op)?;
    Ok((member, list))
}

/// Replace one member's content; allowed on used lists
pub fn update_list_member(
    ctx: &AuthContext,
    conn: &Connection,
    clock: &dyn Clock,
    member_id: &str,
    member: NewListMember,
) -> Result<ListMember> {
    const OP: &str = "update_list_member";
    boundary(ctx, OP, || {
        owned_member(ctx, conn, member_id, OP)?;
        let source = member.into_source();
        validate_members(std::slice::from_ref(&source))?;
        SqliteRepo::update_list_member(conn, member_id, &source, clock.now())?;
        SqliteRepo::get_list_member(conn, member_id)?
            .ok_or_else(|| not_found(OP, "list member", member_id))
    })
}

/// Remove one member
///
/// ## Errors
///
/// `ListInUse` once the list has been enrolled.
pub fn remove_list_member(ctx: &AuthContext, conn: &Connection, member_id: &str) -> Result<()> {
    const OP: &str = "remove_list_member";
    boundary(ctx, OP, || {
        let (_, list) = owned_member(ctx, conn, member_id, OP)?;
        SqliteRepo::delete_list_member(conn, &list, member_id)?;
        Ok(())
    })
}

/// ## Errors
///
/// `ListInUse` once the list has been enrolled.
pub fn set_list_type(
    ctx: &AuthContext,
    conn: &Connection,
    clock: &dyn Clock,
    list_id: &str,
    list_type: ListType,
) -> Result<TargetList> {
    const OP: &str = "set_list_type";
    boundary(ctx, OP, || {
        let user_id = ctx.require_user()?;
        let list = SqliteRepo::require_owned_list(conn, user_id, list_id, OP)?;
        SqliteRepo::set_list_type(conn, &list, list_type, clock.now())?;
        SqliteRepo::require_owned_list(conn, user_id, list_id, OP)
    })
}

/// Remove every member. Returns the number removed.
///
/// ## Errors
///
/// `ListInUse` once the list has been enrolled.
pub fn clear_list_members(
    ctx: &AuthContext,
    conn: &Connection,
    clock: &dyn Clock,
    list_id: &str,
) -> Result<usize> {
    const OP: &str = "clear_list_members";
    boundary(ctx, OP, || {
        let user_id = ctx.require_user()?;
        let list = SqliteRepo::require_owned_list(conn, user_id, list_id, OP)?;
        SqliteRepo::clear_list_members(conn, &list, clock.now())
    })
}

/// ## Errors
///
/// `ListInUse` once the list has been enrolled.
pub fn delete_target_list(ctx: &AuthContext, conn: &Connection, list_id: &str) -> Result<()> {
    const OP: &str = "delete_target_list";
    boundary(ctx, OP, || {
        let user_id = ctx.require_user()?;
        let list = SqliteRepo::require_owned_list(conn, user_id, list_id, OP)?;
        SqliteRepo::delete_target_list(conn, &list)
    })
}
