//! Outreach Store - SQLite persistence for lists, campaigns and enrollments
//!
//! Provides:
//! - Connection bootstrap and pragmas
//! - Embedded, checksummed schema migrations (including the triggers that
//!   keep snapshot rows immutable and used lists undeletable)
//! - Repositories for users, target lists, campaigns and operations rows
//! - Transactional enrollment snapshot creation and its read queries

pub mod db;
pub mod enrollment;
pub mod errors;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use errors::Result;
pub use repo::{RecipientAccess, SqliteRepo};
