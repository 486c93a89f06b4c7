//! Command orchestration layer.
//!
//! ## Logging Ownership
//!
//! Every public command emits `log_op_start!` at entry and then exactly one
//! of `log_op_end!` or `log_op_error!`. Lower layers (store, core) use only
//! `tracing::debug!()`.

pub mod campaigns;
pub mod engine_command;
pub mod enrollment;
pub mod lists;
pub mod operations;
pub mod queries;
pub mod users;

use std::time::Instant;

use outreach_core::errors::ExError;
use outreach_core::AuthContext;

/// Milliseconds since `start`, for the `duration_ms` log field
pub(crate) fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// Attach the caller's correlation ids to an outgoing error
pub(crate) fn correlate(ctx: &AuthContext, err: ExError) -> ExError {
    let err = match err.request_id() {
        Some(_) => err,
        None => err.with_request_id(ctx.request.request_id.clone()),
    };
    match (err.trace_id(), &ctx.request.trace_id) {
        (None, Some(trace_id)) => err.with_trace_id(trace_id.clone()),
        _ => err,
    }
}

/// Boundary logging around a command body, for handlers whose only
/// log field is the request id
pub(crate) fn boundary<T>(
    ctx: &AuthContext,
    op: &'static str,
    body: impl FnOnce() -> outreach_store::errors::Result<T>,
) -> outreach_store::errors::Result<T> {
    outreach_core::log_op_start!(op, request_id = %ctx.request.request_id);
    let start = Instant::now();

    let result = body().map_err(|e| {
        let e = correlate(ctx, e);
        outreach_core::log_op_error!(op, e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    outreach_core::log_op_end!(op, duration_ms = elapsed_ms(start));
    Ok(result)
}
