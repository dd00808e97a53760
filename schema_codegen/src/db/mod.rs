//! Database module for schema_codegen
//!
//! This module handles the database connection and the sources of schema
//! metadata.

pub mod connection;
pub mod metadata;
pub mod snapshot;

// Re-export key types
pub use connection::DatabaseConnection;
pub use metadata::{ColumnRow, MetadataSource, MySqlMetadataSource, ProbedColumn, SchemaFilter, TableRow};
pub use snapshot::Snapshot;
