//! Campaign enrollment snapshots
//!
//! - `persist`: the transactional enrollment write
//! - `query`: read models over enrollments, snapshot rows and operations rows

pub mod persist;
pub mod query;

pub use persist::{create_enrollment, EnrollmentResult};
