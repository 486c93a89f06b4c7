//! Types shared by the outreach error and logging facilities
//!
//! Kept free of domain types so `outreach-core` and every crate above it can
//! depend on it: request/trace correlation ids, the `Sensitive<T>` wrapper
//! that keeps recipient PII out of log output, and the field keys that log
//! consumers and tests look events up by.

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::{RequestContext, RequestId, TraceId};
pub use sensitive::Sensitive;
