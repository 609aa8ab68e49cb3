//! Snapshot comparison command

use clap::Args;
use pkgdiff_engine::{run_comparison, RunConfig};
use pkgdiff_store::CleanupPolicy;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Old snapshot archive (.tar.gz, .tgz, .tar) or directory
    pub old_package: PathBuf,

    /// New snapshot archive (.tar.gz, .tgz, .tar) or directory
    pub new_package: PathBuf,

    /// Directory where oldPackage/ and newPackage/ are extracted
    #[arg(long, default_value = ".")]
    pub work_dir: PathBuf,

    /// Directory where reports are written
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Remove extracted snapshots without asking
    #[arg(long, conflicts_with = "keep")]
    pub yes: bool,

    /// Keep extracted snapshots without asking
    #[arg(long, conflicts_with = "yes")]
    pub keep: bool,
}

impl CompareArgs {
    fn cleanup_policy(&self) -> CleanupPolicy {
        match (self.yes, self.keep) {
            (true, _) => CleanupPolicy::Always,
            (_, true) => CleanupPolicy::Never,
            _ => CleanupPolicy::Ask,
        }
    }
}

pub fn execute(args: CompareArgs) -> Result<(), Box<dyn std::error::Error>> {
    let cleanup = args.cleanup_policy();
    let config = RunConfig {
        old: args.old_package,
        new: args.new_package,
        work_dir: args.work_dir,
        out_dir: args.out_dir,
        cleanup,
    };

    let summary = run_comparison(&config)?;

    println!(
        "✓ Compared {} record file(s) and {} dictionar{}",
        summary.record_files,
        summary.documents,
        if summary.documents == 1 { "y" } else { "ies" }
    );
    println!(
        "  {} added, {} changed, {} removed, {} line(s) skipped",
        summary.added, summary.changed, summary.removed, summary.skipped
    );
    for report in &summary.reports {
        println!("  Report: {}", report.display());
    }
    if summary.cleaned_up {
        println!("  Extracted snapshots removed");
    }

    Ok(())
}
