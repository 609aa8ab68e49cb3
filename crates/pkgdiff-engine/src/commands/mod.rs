//! Command orchestration layer.
//!
//! Provides high-level command functions that coordinate between
//! core comparison logic and the store's snapshot and report I/O.

pub mod compare;
