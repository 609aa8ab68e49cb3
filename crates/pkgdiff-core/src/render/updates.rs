//! Update (record-level) report renderers.
//!
//! Two variants over the same entries: the terse report lists ids only,
//! the extended report annotates each id with a reason code.

use super::ReportLabels;
use crate::diff::model::{Classification, FieldChange, RecordDiff, RecordEntry};

/// Render the terse update report: one reported id per line.
pub fn render_update_report(labels: &ReportLabels, diffs: &[RecordDiff]) -> String {
    render(labels, diffs, |entry| entry.id.to_string())
}

/// Render the extended update report.
///
/// Lines look like `5 - NEW`, `5 - DEL`, `5 - SPL` or, for single-valued
/// fields, `5 - NPI 111!=222`.
pub fn render_update_report_ext(labels: &ReportLabels, diffs: &[RecordDiff]) -> String {
    render(labels, diffs, |entry| {
        let annotation = match &entry.classification {
            Classification::Added => "NEW".to_string(),
            Classification::Removed => "DEL".to_string(),
            Classification::Changed { reason } => match reason {
                FieldChange::Scalar { field, old, new } => {
                    format!("{} {}!={}", field.tag(), old, new)
                }
                FieldChange::Specialties { .. } => reason.tag().to_string(),
            },
        };
        format!("{} - {}", entry.id, annotation)
    })
}

fn render(
    labels: &ReportLabels,
    diffs: &[RecordDiff],
    line: impl Fn(&RecordEntry) -> String,
) -> String {
    let mut out = labels.header("Update report");
    for entry in diffs.iter().flat_map(|d| d.entries.iter()) {
        out.push_str(&line(entry));
        out.push('\n');
    }
    out
}
