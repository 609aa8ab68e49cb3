#![allow(clippy::unwrap_used, clippy::expect_used)]

use pkgdiff_core::diff::diff_records;
use pkgdiff_core::errors::{ExError, ExErrorKind};
use pkgdiff_core::logging_facility::test_capture::init_test_capture;
use pkgdiff_core::{log_op_end, log_op_error, log_op_start};
use pkgdiff_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    let events = capture.events();
    let start_events: Vec<_> = events
        .iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START))
        .collect();

    assert!(
        !start_events.is_empty(),
        "Should have captured at least one start event"
    );
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events();
    let end_events: Vec<_> = events
        .iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(end_events.len(), 1, "Should have exactly one end event");

    let end_event = end_events[0];
    assert_eq!(end_event.fields.get("duration_ms"), Some(&"42".to_string()));
}

#[test]
fn test_log_op_error_includes_kind() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = ExError::new(ExErrorKind::Extraction).with_path("old.tar.gz");
    log_op_error!(op_name, err, duration_ms = 10);

    let events = capture.events();
    let error_events: Vec<_> = events
        .iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();

    assert_eq!(error_events.len(), 1);
    let fields = &error_events[0].fields;
    assert_eq!(fields.get("err_kind"), Some(&"Extraction".to_string()));
    assert_eq!(fields.get("err_code"), Some(&"ERR_EXTRACTION".to_string()));
    assert!(fields.get("error").unwrap().contains("old.tar.gz"));

    // error is borrowed, still usable
    assert_eq!(err.kind(), ExErrorKind::Extraction);
}

#[test]
fn test_component_is_module_path() {
    let capture = init_test_capture();
    let op_name = "test_component_unique_4";

    log_op_start!(op_name);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0].component.as_deref(),
        Some("logging_facility_tests")
    );
}

#[test]
fn test_diff_records_logs_start_and_end_with_counts() {
    let capture = init_test_capture();
    let dir = TempDir::new().unwrap();
    let old = dir.path().join("old");
    let new = dir.path().join("new");
    fs::create_dir_all(&old).unwrap();
    fs::create_dir_all(&new).unwrap();
    // unique file name so concurrent tests do not collide on the shared capture
    let name = "logging_counts_81.json";
    fs::write(old.join(name), "{\"id\":1}\n{\"id\":2}\n").unwrap();
    fs::write(new.join(name), "{\"id\":2,\"npi\":9}\n{\"id\":3}\nnot json\n").unwrap();

    diff_records(&old.join(name), &new.join(name)).unwrap();

    let events: Vec<_> = capture
        .events_for_op("diff_records")
        .into_iter()
        .filter(|e| e.fields.get("file").map(String::as_str) == Some(name))
        .collect();
    assert!(events
        .iter()
        .any(|e| e.event.as_deref() == Some(EVENT_START)));

    let end = events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END))
        .expect("end event");
    assert_eq!(end.fields.get("added"), Some(&"1".to_string()));
    assert_eq!(end.fields.get("changed"), Some(&"1".to_string()));
    assert_eq!(end.fields.get("removed"), Some(&"1".to_string()));
    assert_eq!(end.fields.get("skipped"), Some(&"1".to_string()));
}

#[test]
fn test_diff_records_logs_error_for_missing_file() {
    let capture = init_test_capture();
    let dir = TempDir::new().unwrap();
    let name = "logging_missing_82.json";
    fs::write(dir.path().join(name), "{\"id\":1}\n").unwrap();

    let err = diff_records(&dir.path().join("absent.json"), &dir.path().join(name)).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Io);

    let count = capture.count_events(|e| {
        e.op.as_deref() == Some("diff_records")
            && e.event.as_deref() == Some(EVENT_END_ERROR)
            && e.fields.get("file").map(String::as_str) == Some(name)
    });
    assert_eq!(count, 1);
}
