//! pkgdiff Core - snapshot comparison kernel
//!
//! This crate provides the comparison logic for two successive snapshots of a
//! record export:
//! - Record and dictionary document models
//! - Record-diff engine (keyed matching, fixed-priority change reasons)
//! - Schema-diff engine (added/removed/type-changed fields) and file-set diff
//! - Plain-text renderers for the update and package reports
//! - Structured error and logging facilities shared by the other crates
//!
//! Nothing here writes to disk; reading the files being compared is the only I/O.

pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod render;

#[doc(hidden)]
pub use pkgdiff_core_types as core_types;

// Re-export commonly used types
pub use diff::{diff_file_sets, diff_records, diff_schema, load_schema};
pub use errors::{ExError, ExErrorKind, RecordIssue, Result, Side};
pub use model::{Record, SchemaDocument};
