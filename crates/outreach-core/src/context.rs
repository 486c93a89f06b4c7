//! Caller identity and time source
//!
//! Both are injected into every engine command. There is no ambient
//! "current user" and no ambient clock.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use outreach_core_types::RequestContext;

use crate::errors::{ExError, ExErrorKind};

/// Identity of the caller plus correlation ids
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    pub user_id: Option<String>,
    pub request: RequestContext,
}

impl AuthContext {
    /// Context for an authenticated user
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            request: RequestContext::new(),
        }
    }

    /// Context with no authenticated user; every command rejects it
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Return the authenticated user id
    ///
    /// # Errors
    ///
    /// `Unauthorised` when no user is attached to the context.
    pub fn require_user(&self) -> std::result::Result<&str, ExError> {
        self.user_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                ExError::new(ExErrorKind::Unauthorised)
                    .with_request_id(self.request.request_id.clone())
                    .with_message("no authenticated user")
            })
    }
}

/// Time source
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests and replays
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Clock pinned to a Unix millisecond timestamp
    pub fn at_millis(ms: i64) -> Self {
        Self::new(DateTime::from_timestamp_millis(ms).unwrap_or_default())
    }

    pub fn set(&self, now: DateTime<Utc>) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut guard) = self.now.lock() {
            *guard += by;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.lock().map(|g| *g).unwrap_or_default()
    }
}
