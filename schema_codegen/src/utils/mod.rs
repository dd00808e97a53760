//! Utilities for schema_codegen
//!
//! This module provides utility functions used across the library.

pub mod logging;
pub mod naming;

// Re-export key utility functions
pub use naming::{apply_naming_convention, classify, first_char_upper, GroupingDecision};
