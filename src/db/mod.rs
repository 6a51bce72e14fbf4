//! SQLite store access.
//!
//! Connection handling, the table registry and bulk insertion. The diesel
//! `table!` declarations in `schema` back the typed entity read-back.

pub mod bulk_insert;
pub mod database;
pub mod registry;
pub mod schema;

// Re-export key types
pub use bulk_insert::{insert_records, upsert_statement, validate_identifier};
pub use database::{Database, DatabaseConfig, DbConnection};
pub use registry::{drop_tables, ensure_tables, table_specs, TableSpec};
