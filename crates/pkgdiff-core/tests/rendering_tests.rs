#![allow(clippy::unwrap_used, clippy::expect_used)]

use pkgdiff_core::diff::model::{
    Classification, FieldChange, FileSetDiff, PackageReport, RecordDiff, RecordEntry,
    RecordField, SchemaDiff, TypeChange,
};
use pkgdiff_core::render::{
    render_package_report, render_update_report, render_update_report_ext, ReportLabels,
};

fn labels() -> ReportLabels {
    ReportLabels::new("export_2024_01", "export_2024_02")
}

fn sample_diffs() -> Vec<RecordDiff> {
    vec![
        RecordDiff {
            file: "1.json".to_string(),
            entries: vec![
                RecordEntry {
                    id: 7,
                    classification: Classification::Added,
                },
                RecordEntry {
                    id: 5,
                    classification: Classification::Changed {
                        reason: FieldChange::Scalar {
                            field: RecordField::Npi,
                            old: "111".to_string(),
                            new: "222".to_string(),
                        },
                    },
                },
                RecordEntry {
                    id: 2,
                    classification: Classification::Removed,
                },
            ],
            issues: Vec::new(),
        },
        RecordDiff {
            file: "2.json".to_string(),
            entries: vec![RecordEntry {
                id: 40,
                classification: Classification::Changed {
                    reason: FieldChange::Specialties {
                        old: vec!["cardiology".to_string()],
                        new: vec![],
                    },
                },
            }],
            issues: Vec::new(),
        },
    ]
}

// ===== UPDATE REPORTS =====

#[test]
fn test_update_report_lists_ids_in_order() {
    let out = render_update_report(&labels(), &sample_diffs());
    assert_eq!(
        out,
        "Update report (export_2024_01 - export_2024_02)\n7\n5\n2\n40\n"
    );
}

#[test]
fn test_update_report_ext_annotates_each_id() {
    let out = render_update_report_ext(&labels(), &sample_diffs());
    assert_eq!(
        out,
        "Update report (export_2024_01 - export_2024_02)\n\
         7 - NEW\n\
         5 - NPI 111!=222\n\
         2 - DEL\n\
         40 - SPL\n"
    );
}

#[test]
fn test_update_reports_with_no_changes_are_header_only() {
    let empty = vec![RecordDiff::default()];
    let header = "Update report (export_2024_01 - export_2024_02)\n";
    assert_eq!(render_update_report(&labels(), &empty), header);
    assert_eq!(render_update_report_ext(&labels(), &[]), header);
}

// ===== PACKAGE REPORT =====

#[test]
fn test_package_report_sections() {
    let mut dict_a = SchemaDiff::default();
    dict_a.added.insert("email".to_string());
    dict_a.removed.insert("age".to_string());
    dict_a.type_changed.insert(
        "score".to_string(),
        TypeChange {
            from: "integer".to_string(),
            to: "string".to_string(),
        },
    );

    let mut report = PackageReport {
        files: FileSetDiff {
            added: vec!["3.json".to_string()],
            removed: vec!["2.json".to_string()],
        },
        ..PackageReport::default()
    };
    report.documents.insert("dictA".to_string(), dict_a);
    report
        .documents
        .insert("dictB".to_string(), SchemaDiff::default());

    let out = render_package_report(&labels(), &report);

    assert_eq!(
        out,
        "Final package report (export_2024_01 - export_2024_02)\n\
         \n-> dictA\n\
         1 fields added\n\
         - email\n\
         1 fields removed\n\
         - age\n\
         1 changes detected\n\
         - score (from: `integer` to: `string`)\n\
         \n-> dictB\n\
         0 fields added\n\
         0 fields removed\n\
         0 changes detected\n\
         \n-> Removed files\n\
         - 2.json\n\
         \n-> Added files\n\
         - 3.json\n"
    );
}

#[test]
fn test_package_report_omits_empty_file_sections() {
    let out = render_package_report(&labels(), &PackageReport::default());
    assert_eq!(
        out,
        "Final package report (export_2024_01 - export_2024_02)\n"
    );
    assert!(!out.contains("files"));
}

#[test]
fn test_rendering_is_deterministic() {
    let diffs = sample_diffs();
    assert_eq!(
        render_update_report_ext(&labels(), &diffs),
        render_update_report_ext(&labels(), &diffs)
    );
}
