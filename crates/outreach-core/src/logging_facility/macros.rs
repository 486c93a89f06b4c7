//! Boundary logging macros
//!
//! Every engine command emits exactly one `start` and then either one `end`
//! or one `end_error` event. All three carry `component` (the calling
//! module), `op` and `event`; extra fields use `tracing` field syntax.

#[doc(hidden)]
#[macro_export]
macro_rules! __op_event {
    ($level:expr, $event:expr, $op:expr $(, $($field:tt)*)?) => {
        tracing::event!(
            $level,
            component = module_path!(),
            op = $op,
            event = $event,
            $($($field)*)?
        )
    };
}

/// Log the start of an operation
///
/// ```
/// # use outreach_core::log_op_start;
/// log_op_start!("create_campaign_enrollment");
/// log_op_start!("create_campaign_enrollment", campaign_id = "c1");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__op_event!(
            tracing::Level::INFO,
            $crate::schema::EVENT_START,
            $op
            $(, $($field)*)?
        )
    };
}

/// Log the successful end of an operation; `duration_ms` is required
///
/// ```
/// # use outreach_core::log_op_end;
/// log_op_end!("campaign_stats", duration_ms = 3);
/// log_op_end!("due_contacts", duration_ms = 3, due_count = 2usize);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__op_event!(
            tracing::Level::INFO,
            $crate::schema::EVENT_END,
            $op,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
}

/// Log an operation failure with its stable kind and code
///
/// Accepts anything convertible into `ExError`.
///
/// ```
/// # use outreach_core::log_op_error;
/// # use outreach_core::errors::{ExError, ExErrorKind};
/// let err = ExError::new(ExErrorKind::Forbidden);
/// log_op_error!("due_contacts", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__op_event!(
            tracing::Level::ERROR,
            $crate::schema::EVENT_END_ERROR,
            $op,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code()
            $(, $($field)*)?
        )
    }};
}
