//! Pure domain rules: field resolution and input/state validation

pub mod field_resolution;
pub mod validation;

pub use field_resolution::{resolve_field, snapshot_member};
