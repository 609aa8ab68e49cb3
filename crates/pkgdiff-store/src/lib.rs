//! pkgdiff Store - snapshot and report I/O
//!
//! Provides:
//! - Archive extraction (tar, gzip detected by magic bytes)
//! - Directory listing with record/dictionary file patterns
//! - Snapshot workspace: concurrent preparation and policy-driven cleanup
//! - Atomic report writing

pub mod archive;
pub mod errors;
pub mod listing;
pub mod reports;
pub mod workspace;

// Re-export key types
pub use errors::Result;
pub use workspace::{CleanupPolicy, SnapshotSource, SnapshotWorkspace};
