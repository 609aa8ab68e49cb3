//! Snapshot diff output types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.
//! Collections use `BTreeMap`/`BTreeSet` and sorted `Vec` for deterministic
//! serialization and rendering.

use crate::errors::RecordIssue;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Comparable record fields, in the order they are checked.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecordField {
    Npi,
    Ttid,
    FirstName,
    LastName,
    MiddleName,
    LocationId,
    Affiliation,
    City,
    Zip,
    Latitude,
    Longitude,
    State,
    Address,
    Country,
    Specialties,
}

impl RecordField {
    /// Fixed comparison priority. The first differing field is the reason.
    pub const PRIORITY: [RecordField; 15] = [
        RecordField::Npi,
        RecordField::Ttid,
        RecordField::FirstName,
        RecordField::LastName,
        RecordField::MiddleName,
        RecordField::LocationId,
        RecordField::Affiliation,
        RecordField::City,
        RecordField::Zip,
        RecordField::Latitude,
        RecordField::Longitude,
        RecordField::State,
        RecordField::Address,
        RecordField::Country,
        RecordField::Specialties,
    ];

    /// Short reason code used in the verbose update report
    pub fn tag(&self) -> &'static str {
        match self {
            RecordField::Npi => "NPI",
            RecordField::Ttid => "TTID",
            RecordField::FirstName => "FN",
            RecordField::LastName => "LN",
            RecordField::MiddleName => "MN",
            RecordField::LocationId => "LID",
            RecordField::Affiliation => "LAF",
            RecordField::City => "LCI",
            RecordField::Zip => "LZ",
            RecordField::Latitude => "LLA",
            RecordField::Longitude => "LLO",
            RecordField::State => "LST",
            RecordField::Address => "LAD",
            RecordField::Country => "LCO",
            RecordField::Specialties => "SPL",
        }
    }

    /// Field path as it appears in the export
    pub fn name(&self) -> &'static str {
        match self {
            RecordField::Npi => "npi",
            RecordField::Ttid => "ttid",
            RecordField::FirstName => "first_name",
            RecordField::LastName => "last_name",
            RecordField::MiddleName => "middle_name",
            RecordField::LocationId => "location.id",
            RecordField::Affiliation => "location.affiliation",
            RecordField::City => "location.city",
            RecordField::Zip => "location.zip",
            RecordField::Latitude => "location.latitude",
            RecordField::Longitude => "location.longitude",
            RecordField::State => "location.state",
            RecordField::Address => "location.address",
            RecordField::Country => "location.country",
            RecordField::Specialties => "specialties",
        }
    }
}

/// The first field found to differ between two versions of a record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldChange {
    /// A single-valued field changed; values are rendered as text
    Scalar {
        field: RecordField,
        old: String,
        new: String,
    },
    /// The specialty multiset changed
    Specialties { old: Vec<String>, new: Vec<String> },
}

impl FieldChange {
    pub fn field(&self) -> RecordField {
        match self {
            FieldChange::Scalar { field, .. } => *field,
            FieldChange::Specialties { .. } => RecordField::Specialties,
        }
    }

    pub fn tag(&self) -> &'static str {
        self.field().tag()
    }
}

impl std::fmt::Display for FieldChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldChange::Scalar { field, old, new } => {
                write!(f, "{}: {} != {}", field.name(), old, new)
            }
            FieldChange::Specialties { .. } => write!(f, "{}", RecordField::Specialties.name()),
        }
    }
}

/// Outcome of comparing one identity key. Unchanged records are not reported.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Classification {
    Added,
    Removed,
    Changed { reason: FieldChange },
}

/// One reported record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordEntry {
    pub id: i64,
    pub classification: Classification,
}

/// Record-level diff of one paired record file.
///
/// `entries` holds added/changed records in new-file order followed by
/// removed records in ascending id order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecordDiff {
    /// Record file name shared by both snapshots (e.g. `3.json`)
    pub file: String,
    pub entries: Vec<RecordEntry>,
    /// Lines skipped while reading either side
    pub issues: Vec<RecordIssue>,
}

impl RecordDiff {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn added_count(&self) -> usize {
        self.count(|c| matches!(c, Classification::Added))
    }

    pub fn removed_count(&self) -> usize {
        self.count(|c| matches!(c, Classification::Removed))
    }

    pub fn changed_count(&self) -> usize {
        self.count(|c| matches!(c, Classification::Changed { .. }))
    }

    /// Classification for one id, if it was reported
    pub fn classification_of(&self, id: i64) -> Option<&Classification> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| &e.classification)
    }

    fn count(&self, predicate: impl Fn(&Classification) -> bool) -> usize {
        self.entries
            .iter()
            .filter(|e| predicate(&e.classification))
            .count()
    }
}

/// Declared type change of one field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypeChange {
    pub from: String,
    pub to: String,
}

/// Field-level diff of one paired dictionary document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SchemaDiff {
    /// Fields in new but not old
    pub added: BTreeSet<String>,
    /// Fields in old but not new
    pub removed: BTreeSet<String>,
    /// Fields in both whose declared type differs
    pub type_changed: BTreeMap<String, TypeChange>,
}

impl SchemaDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.type_changed.is_empty()
    }
}

/// File names present in only one snapshot directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FileSetDiff {
    /// Only in new, sorted
    pub added: Vec<String>,
    /// Only in old, sorted
    pub removed: Vec<String>,
}

/// Everything the final package report shows.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PackageReport {
    /// Dictionary diffs keyed by document name (file name without `.json`)
    pub documents: BTreeMap<String, SchemaDiff>,
    pub files: FileSetDiff,
}
