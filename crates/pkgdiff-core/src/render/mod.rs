//! Plain-text report renderers.
//!
//! Renderers only format; they never reorder or filter the diff data they
//! are given.

pub mod package;
pub mod updates;

pub use package::render_package_report;
pub use updates::{render_update_report, render_update_report_ext};

use std::path::Path;

/// Names of the two packages shown in report headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLabels {
    pub old: String,
    pub new: String,
}

impl ReportLabels {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
        }
    }

    /// Labels derived from the two package paths, see [`package_label`]
    pub fn from_paths(old: &Path, new: &Path) -> Self {
        Self::new(package_label(old), package_label(new))
    }

    fn header(&self, title: &str) -> String {
        format!("{} ({} - {})\n", title, self.old, self.new)
    }
}

const ARCHIVE_SUFFIXES: &[&str] = &[".tar.gz", ".tgz", ".tar"];

/// Package name for a snapshot path: the file name without its archive suffix.
pub fn package_label(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    ARCHIVE_SUFFIXES
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
        .map(str::to_string)
        .unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_label_strips_archive_suffix() {
        assert_eq!(package_label(Path::new("/tmp/export_2024_01.tar.gz")), "export_2024_01");
        assert_eq!(package_label(Path::new("export.tgz")), "export");
        assert_eq!(package_label(Path::new("export.tar")), "export");
    }

    #[test]
    fn test_package_label_keeps_directory_name() {
        assert_eq!(package_label(Path::new("snapshots/2024-02/")), "2024-02");
    }
}
