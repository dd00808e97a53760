//! Schema module for schema_codegen
//!
//! This module builds the in-memory schema model and renders it into class
//! files and wiki pages.

pub mod analyzer;
pub mod builder;
pub mod generator;
pub mod types;
pub mod wiki;

// Re-export key types
pub use analyzer::SchemaAnalyzer;
pub use builder::SchemaBuilder;
pub use generator::ClassGenerator;
pub use types::{Column, Database, SemanticType, Table};
pub use wiki::WikiGenerator;
