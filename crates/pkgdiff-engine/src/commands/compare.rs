//! Snapshot comparison run.
//!
//! ## Pipeline (in order):
//! 1. Resolve both sources (archive or directory; missing is a hard stop)
//! 2. Prepare the workspace: reject overlapping sources, extract archives concurrently
//! 3. Pair record files by name and run the record-diff engine per pair
//! 4. Run the schema-diff engine for each old dictionary found in the new snapshot
//! 5. File-set diff over the full listings
//! 6. Render and write the three reports
//! 7. Cleanup decision for extracted directories
//!
//! Any failure in steps 1-6 aborts the run before cleanup, leaving the
//! extracted directories in place for inspection.

use pkgdiff_core::diff::model::{PackageReport, RecordDiff, SchemaDiff};
use pkgdiff_core::diff::{diff_file_sets, diff_records, diff_schema, load_schema};
use pkgdiff_core::render::{
    render_package_report, render_update_report, render_update_report_ext, ReportLabels,
};
use pkgdiff_core::{log_op_end, log_op_error, log_op_start};
use pkgdiff_core_types::RunId;
use pkgdiff_store::errors::Result;
use pkgdiff_store::listing::{dict_files, list_files, record_files};
use pkgdiff_store::reports::{
    update_report_ext_file, update_report_file, write_report, PACKAGE_REPORT_FILE,
};
use pkgdiff_store::{CleanupPolicy, SnapshotSource, SnapshotWorkspace};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Options for one comparison run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Old snapshot: archive or directory
    pub old: PathBuf,
    /// New snapshot: archive or directory
    pub new: PathBuf,
    /// Parent of the `oldPackage`/`newPackage` extraction directories
    pub work_dir: PathBuf,
    /// Where reports are written
    pub out_dir: PathBuf,
    pub cleanup: CleanupPolicy,
}

impl RunConfig {
    /// Config with work and output directories in the current directory and
    /// an interactive cleanup prompt
    pub fn new(old: impl Into<PathBuf>, new: impl Into<PathBuf>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
            work_dir: PathBuf::from("."),
            out_dir: PathBuf::from("."),
            cleanup: CleanupPolicy::Ask,
        }
    }
}

/// Totals of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: RunId,
    /// Record files compared (present in both snapshots)
    pub record_files: usize,
    /// Dictionary sections in the package report (one per old dictionary)
    pub documents: usize,
    pub added: usize,
    pub changed: usize,
    pub removed: usize,
    /// Record lines skipped as malformed or duplicate
    pub skipped: usize,
    /// Written report paths: terse, extended, package
    pub reports: Vec<PathBuf>,
    /// Whether extracted directories were removed
    pub cleaned_up: bool,
}

/// Run one comparison of `config.old` against `config.new`.
///
/// # Errors
///
/// - `NotFound`: a snapshot path does not exist
/// - `Extraction` / `Concurrency`: preparing a snapshot failed
/// - `Io` / `InvalidSchema`: reading a record or dictionary file failed
/// - `ReportWrite`: a report could not be written
pub fn run_comparison(config: &RunConfig) -> Result<RunSummary> {
    let run_id = RunId::new();
    let span = tracing::info_span!("run", run_id = %run_id);
    let _guard = span.enter();

    log_op_start!(
        "run_comparison",
        old = %config.old.display(),
        new = %config.new.display()
    );
    let start = Instant::now();

    let result = execute(config, run_id);

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(summary) => {
            log_op_end!(
                "run_comparison",
                duration_ms = duration_ms,
                added = summary.added,
                changed = summary.changed,
                removed = summary.removed,
                skipped = summary.skipped
            );
        }
        Err(err) => {
            log_op_error!("run_comparison", err, duration_ms = duration_ms);
        }
    }
    result
}

fn execute(config: &RunConfig, run_id: RunId) -> Result<RunSummary> {
    let old_source = SnapshotSource::resolve(&config.old)?;
    let new_source = SnapshotSource::resolve(&config.new)?;
    let labels = ReportLabels::from_paths(old_source.path(), new_source.path());

    tracing::info!("unpacking snapshots");
    let workspace = SnapshotWorkspace::prepare(&old_source, &new_source, &config.work_dir)?;

    tracing::info!("comparing record files");
    let record_diffs = compare_record_files(workspace.old_root(), workspace.new_root())?;

    tracing::info!("comparing dictionaries and file sets");
    let package = compare_package(workspace.old_root(), workspace.new_root())?;

    let reports = vec![
        write_report(
            &config.out_dir,
            &update_report_file(&labels.new),
            &render_update_report(&labels, &record_diffs),
        )?,
        write_report(
            &config.out_dir,
            &update_report_ext_file(&labels.new),
            &render_update_report_ext(&labels, &record_diffs),
        )?,
        write_report(
            &config.out_dir,
            PACKAGE_REPORT_FILE,
            &render_package_report(&labels, &package),
        )?,
    ];

    let cleaned_up = workspace.cleanup(config.cleanup)?;

    Ok(RunSummary {
        run_id,
        record_files: record_diffs.len(),
        documents: package.documents.len(),
        added: record_diffs.iter().map(RecordDiff::added_count).sum(),
        changed: record_diffs.iter().map(RecordDiff::changed_count).sum(),
        removed: record_diffs.iter().map(RecordDiff::removed_count).sum(),
        skipped: record_diffs.iter().map(|d| d.issues.len()).sum(),
        reports,
        cleaned_up,
    })
}

/// Diff every record file present in both snapshots, in new-listing order.
fn compare_record_files(old_root: &Path, new_root: &Path) -> Result<Vec<RecordDiff>> {
    let old_files = record_files(old_root)?;
    let new_files = record_files(new_root)?;
    let pairs = paired(&old_files, &new_files);

    if pairs.is_empty() {
        tracing::info!("no record files present in both snapshots");
    }

    pairs
        .into_iter()
        .map(|name| diff_records(&old_root.join(name), &new_root.join(name)))
        .collect()
}

/// Schema diffs of the old snapshot's dictionaries plus the overall
/// file-set diff.
///
/// Every old dictionary gets a section. One missing from the new snapshot
/// keeps an empty section and shows up under the removed files.
fn compare_package(old_root: &Path, new_root: &Path) -> Result<PackageReport> {
    let old_dicts = dict_files(old_root)?;
    let new_dicts: HashSet<String> = dict_files(new_root)?.into_iter().collect();

    let mut documents = BTreeMap::new();
    for name in &old_dicts {
        let section = name.strip_suffix(".json").unwrap_or(name).to_string();
        if !new_dicts.contains(name) {
            tracing::info!(file = %name, "dictionary missing from new snapshot");
            documents.insert(section, SchemaDiff::default());
            continue;
        }
        let old = load_schema(&old_root.join(name))?;
        let new = load_schema(&new_root.join(name))?;
        let diff = diff_schema(&old, &new);
        tracing::debug!(
            file = %name,
            added = diff.added.len(),
            removed = diff.removed.len(),
            changed = diff.type_changed.len(),
            "dictionary compared"
        );
        documents.insert(section, diff);
    }

    let files = diff_file_sets(&list_files(old_root, None)?, &list_files(new_root, None)?);

    Ok(PackageReport { documents, files })
}

/// Names in both listings, in `new` order. Unpaired names are logged.
fn paired<'a>(old: &[String], new: &'a [String]) -> Vec<&'a str> {
    let old_set: HashSet<&str> = old.iter().map(String::as_str).collect();
    let new_set: HashSet<&str> = new.iter().map(String::as_str).collect();

    for name in old.iter().filter(|n| !new_set.contains(n.as_str())) {
        tracing::info!(file = %name, side = "old", "file has no counterpart, skipping");
    }

    new.iter()
        .map(String::as_str)
        .filter(|name| {
            let found = old_set.contains(name);
            if !found {
                tracing::info!(file = %name, side = "new", "file has no counterpart, skipping");
            }
            found
        })
        .collect()
}
