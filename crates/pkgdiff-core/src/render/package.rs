//! Final package report renderer.

use super::ReportLabels;
use crate::diff::model::PackageReport;

/// Render the final package report.
///
/// ```text
/// Final package report (old - new)
///
/// -> dictA
/// 1 fields added
/// - email
/// 1 fields removed
/// - age
/// 1 changes detected
/// - score (from: `integer` to: `string`)
///
/// -> Removed files
/// - 2.json
///
/// -> Added files
/// - 3.json
/// ```
///
/// Every dictionary section lists all three buckets, empty ones with a zero
/// count. File sections are omitted when empty.
pub fn render_package_report(labels: &ReportLabels, report: &PackageReport) -> String {
    let mut out = labels.header("Final package report");

    for (name, diff) in &report.documents {
        out.push_str(&format!("\n-> {}\n", name));

        out.push_str(&format!("{} fields added\n", diff.added.len()));
        for field in &diff.added {
            out.push_str(&format!("- {}\n", field));
        }

        out.push_str(&format!("{} fields removed\n", diff.removed.len()));
        for field in &diff.removed {
            out.push_str(&format!("- {}\n", field));
        }

        out.push_str(&format!("{} changes detected\n", diff.type_changed.len()));
        for (field, change) in &diff.type_changed {
            out.push_str(&format!(
                "- {} (from: `{}` to: `{}`)\n",
                field, change.from, change.to
            ));
        }
    }

    if !report.files.removed.is_empty() {
        out.push_str("\n-> Removed files\n");
        for file in &report.files.removed {
            out.push_str(&format!("- {}\n", file));
        }
    }
    if !report.files.added.is_empty() {
        out.push_str("\n-> Added files\n");
        for file in &report.files.added {
            out.push_str(&format!("- {}\n", file));
        }
    }

    out
}
