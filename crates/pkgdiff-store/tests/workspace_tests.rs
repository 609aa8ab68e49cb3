#![allow(clippy::unwrap_used, clippy::expect_used)]

use flate2::write::GzEncoder;
use flate2::Compression;
use pkgdiff_core::errors::ExErrorKind;
use pkgdiff_store::listing::{dict_files, list_files, record_files};
use pkgdiff_store::workspace::{NEW_PACKAGE_DIR, OLD_PACKAGE_DIR};
use pkgdiff_store::{CleanupPolicy, SnapshotSource, SnapshotWorkspace};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn tar_bytes(files: &[(&str, &str)]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, content.as_bytes())
            .unwrap();
    }
    builder.into_inner().unwrap()
}

fn write_tar_gz(dir: &Path, name: &str, files: &[(&str, &str)]) -> PathBuf {
    use std::io::Write;
    let path = dir.join(name);
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&tar_bytes(files)).unwrap();
    fs::write(&path, encoder.finish().unwrap()).unwrap();
    path
}

fn write_tar(dir: &Path, name: &str, files: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, tar_bytes(files)).unwrap();
    path
}

#[test]
fn test_extracts_gzip_and_plain_tar() {
    let dir = TempDir::new().unwrap();
    let old = write_tar_gz(
        dir.path(),
        "export_01.tar.gz",
        &[("1.json", "{\"id\":1}\n"), ("dictA.json", "{}")],
    );
    let new = write_tar(dir.path(), "export_02.tar", &[("1.json", "{\"id\":2}\n")]);

    let ws = SnapshotWorkspace::prepare(
        &SnapshotSource::resolve(&old).unwrap(),
        &SnapshotSource::resolve(&new).unwrap(),
        dir.path(),
    )
    .unwrap();

    assert_eq!(ws.old_root(), dir.path().join(OLD_PACKAGE_DIR));
    assert_eq!(ws.new_root(), dir.path().join(NEW_PACKAGE_DIR));
    assert_eq!(
        list_files(ws.old_root(), None).unwrap(),
        vec!["1.json", "dictA.json"]
    );
    assert_eq!(
        fs::read_to_string(ws.new_root().join("1.json")).unwrap(),
        "{\"id\":2}\n"
    );
}

#[test]
fn test_cleanup_always_removes_extracted_dirs() {
    let dir = TempDir::new().unwrap();
    let old = write_tar_gz(dir.path(), "a.tar.gz", &[("1.json", "")]);
    let new = write_tar_gz(dir.path(), "b.tar.gz", &[("1.json", "")]);

    let ws = SnapshotWorkspace::prepare(
        &SnapshotSource::Archive(old),
        &SnapshotSource::Archive(new),
        dir.path(),
    )
    .unwrap();

    assert!(ws.cleanup(CleanupPolicy::Always).unwrap());
    assert!(!dir.path().join(OLD_PACKAGE_DIR).exists());
    assert!(!dir.path().join(NEW_PACKAGE_DIR).exists());
}

#[test]
fn test_cleanup_never_keeps_extracted_dirs() {
    let dir = TempDir::new().unwrap();
    let old = write_tar_gz(dir.path(), "a.tar.gz", &[("1.json", "")]);
    let new = write_tar_gz(dir.path(), "b.tar.gz", &[("1.json", "")]);

    let ws = SnapshotWorkspace::prepare(
        &SnapshotSource::Archive(old),
        &SnapshotSource::Archive(new),
        dir.path(),
    )
    .unwrap();

    assert!(!ws.cleanup(CleanupPolicy::Never).unwrap());
    assert!(dir.path().join(OLD_PACKAGE_DIR).join("1.json").exists());
}

#[test]
fn test_mixed_sources_only_remove_extracted_side() {
    let dir = TempDir::new().unwrap();
    let old_dir = dir.path().join("old_snapshot");
    fs::create_dir_all(&old_dir).unwrap();
    fs::write(old_dir.join("1.json"), "").unwrap();
    let new = write_tar_gz(dir.path(), "b.tar.gz", &[("1.json", "")]);

    let ws = SnapshotWorkspace::prepare(
        &SnapshotSource::resolve(&old_dir).unwrap(),
        &SnapshotSource::resolve(&new).unwrap(),
        dir.path(),
    )
    .unwrap();

    assert!(ws.cleanup(CleanupPolicy::Always).unwrap());
    assert!(old_dir.join("1.json").exists());
    assert!(!dir.path().join(NEW_PACKAGE_DIR).exists());
}

#[test]
fn test_stale_extraction_dir_is_replaced() {
    let dir = TempDir::new().unwrap();
    let stale = dir.path().join(OLD_PACKAGE_DIR);
    fs::create_dir_all(&stale).unwrap();
    fs::write(stale.join("99.json"), "{\"id\":99}\n").unwrap();

    let old = write_tar_gz(dir.path(), "a.tar.gz", &[("1.json", "")]);
    let new = write_tar_gz(dir.path(), "b.tar.gz", &[("1.json", "")]);
    let ws = SnapshotWorkspace::prepare(
        &SnapshotSource::Archive(old),
        &SnapshotSource::Archive(new),
        dir.path(),
    )
    .unwrap();

    assert_eq!(record_files(ws.old_root()).unwrap(), vec!["1.json"]);
}

#[test]
fn test_corrupt_gzip_is_extraction_error() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("bad.tar.gz");
    fs::write(&bad, b"\x1f\x8b\x00\x01\x02\x03").unwrap();
    let good = write_tar_gz(dir.path(), "good.tar.gz", &[("1.json", "")]);

    let err = SnapshotWorkspace::prepare(
        &SnapshotSource::Archive(good),
        &SnapshotSource::Archive(bad),
        dir.path(),
    )
    .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Extraction);
    assert!(err.path().unwrap().ends_with("bad.tar.gz"));
}

#[test]
fn test_both_failing_reports_old_first() {
    let dir = TempDir::new().unwrap();
    let bad_old = dir.path().join("old.tar.gz");
    let bad_new = dir.path().join("new.tar.gz");
    fs::write(&bad_old, b"\x1f\x8b\xff\xff").unwrap();
    fs::write(&bad_new, b"\x1f\x8b\xff\xff").unwrap();

    let err = SnapshotWorkspace::prepare(
        &SnapshotSource::Archive(bad_old),
        &SnapshotSource::Archive(bad_new),
        dir.path(),
    )
    .unwrap_err();

    assert!(err.path().unwrap().ends_with("old.tar.gz"));
}

#[test]
fn test_dict_listing_after_extraction() {
    let dir = TempDir::new().unwrap();
    let old = write_tar_gz(
        dir.path(),
        "a.tar.gz",
        &[("dictB.json", "{}"), ("dictA.json", "{}"), ("readme.txt", "")],
    );

    let ws = SnapshotWorkspace::prepare(
        &SnapshotSource::Archive(old),
        &SnapshotSource::Directory(dir.path().to_path_buf()),
        dir.path(),
    )
    .unwrap();

    assert_eq!(
        dict_files(ws.old_root()).unwrap(),
        vec!["dictA.json", "dictB.json"]
    );
}

#[test]
fn test_directory_source_at_other_extraction_dir_is_rejected() {
    let dir = TempDir::new().unwrap();
    // left over from an earlier run kept with --keep
    let kept = dir.path().join(NEW_PACKAGE_DIR);
    fs::create_dir(&kept).unwrap();
    fs::write(kept.join("1.json"), "{\"id\":1,\"npi\":1}\n").unwrap();
    let next = write_tar_gz(dir.path(), "next.tar.gz", &[("1.json", "{\"id\":1,\"npi\":2}\n")]);

    let err = SnapshotWorkspace::prepare(
        &SnapshotSource::resolve(&kept).unwrap(),
        &SnapshotSource::resolve(&next).unwrap(),
        dir.path(),
    )
    .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Usage);
    assert_eq!(
        fs::read_to_string(kept.join("1.json")).unwrap(),
        "{\"id\":1,\"npi\":1}\n"
    );
    assert!(!dir.path().join(OLD_PACKAGE_DIR).exists());
}

#[test]
fn test_directory_source_nested_in_extraction_dir_is_rejected() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join(OLD_PACKAGE_DIR).join("export_02");
    fs::create_dir_all(&nested).unwrap();
    fs::write(nested.join("1.json"), "{\"id\":3}\n").unwrap();
    let old = write_tar(dir.path(), "export_01.tar", &[("1.json", "{\"id\":3}\n")]);

    let err = SnapshotWorkspace::prepare(
        &SnapshotSource::Archive(old),
        &SnapshotSource::Directory(nested.clone()),
        dir.path(),
    )
    .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Usage);
    assert!(nested.join("1.json").exists());
}

#[test]
fn test_directory_source_beside_extraction_dirs_is_accepted() {
    let dir = TempDir::new().unwrap();
    // a stale extraction dir that is not the source is still replaced
    fs::create_dir(dir.path().join(NEW_PACKAGE_DIR)).unwrap();
    let snapshot = dir.path().join("export_01");
    fs::create_dir(&snapshot).unwrap();
    fs::write(snapshot.join("1.json"), "{\"id\":1}\n").unwrap();
    let new = write_tar_gz(dir.path(), "export_02.tar.gz", &[("1.json", "{\"id\":2}\n")]);

    let ws = SnapshotWorkspace::prepare(
        &SnapshotSource::Directory(snapshot.clone()),
        &SnapshotSource::Archive(new),
        dir.path(),
    )
    .unwrap();

    assert_eq!(ws.old_root(), snapshot);
    assert_eq!(
        fs::read_to_string(ws.new_root().join("1.json")).unwrap(),
        "{\"id\":2}\n"
    );
}
