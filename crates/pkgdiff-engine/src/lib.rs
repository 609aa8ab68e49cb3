//! pkgdiff Engine - Orchestration layer
//!
//! Provides the run pipeline that coordinates snapshot preparation in the
//! store layer with the comparison engines and renderers in core.

pub mod commands;

pub use commands::compare::{run_comparison, RunConfig, RunSummary};
