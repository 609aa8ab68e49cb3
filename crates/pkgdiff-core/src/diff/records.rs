//! Record diff computation engine.
//!
//! Two phases per record file pair:
//!
//! 1. **Build**: index every well-formed old record by `id` (last wins).
//! 2. **Diff**: stream the new file in order, taking matched records out of
//!    the index and comparing fields in [`RecordField::PRIORITY`] order.
//!    Whatever is left in the index afterwards was removed.
//!
//! Malformed lines are skipped and reported as [`RecordIssue`]s; they never
//! abort the file.

use crate::diff::model::{Classification, FieldChange, RecordDiff, RecordEntry, RecordField};
use crate::errors::{ExError, ExErrorKind, RecordIssue, Result, Side};
use crate::model::{LocationDetail, Record};
use crate::{log_op_end, log_op_error, log_op_start};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

/// Old-side records keyed by identity.
#[derive(Debug, Default)]
pub struct RecordIndex {
    records: HashMap<i64, Record>,
}

impl RecordIndex {
    /// Index every well-formed line of `reader`.
    ///
    /// Malformed lines are appended to `issues`. A later line with the same
    /// id replaces the earlier one.
    ///
    /// # Errors
    ///
    /// - `Io`: the underlying reader failed
    pub fn build<R: BufRead>(reader: R, issues: &mut Vec<RecordIssue>) -> Result<Self> {
        let mut records = HashMap::new();
        for_each_line(reader, |line_no, bytes| {
            match parse_line(Side::Old, line_no, bytes) {
                Ok(record) => {
                    if records.insert(record.id, record).is_some() {
                        tracing::debug!(line = line_no, "duplicate old id, keeping later line");
                    }
                }
                Err(issue) => skip(issue, issues),
            }
        })?;
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Record> {
        self.records.get(&id)
    }

    fn take(&mut self, id: i64) -> Option<Record> {
        self.records.remove(&id)
    }

    /// Ids never consumed by the new side, ascending
    fn into_remaining_ids(self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.records.into_keys().collect();
        ids.sort_unstable();
        ids
    }
}

/// Diff two record files on disk.
///
/// The returned [`RecordDiff::file`] is the new file's name.
///
/// # Errors
///
/// - `Io`: either file cannot be opened or read
pub fn diff_records(old_path: &Path, new_path: &Path) -> Result<RecordDiff> {
    let file = new_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    log_op_start!("diff_records", file = %file);
    let start = Instant::now();

    let result = open_reader(old_path)
        .and_then(|old| {
            let mut issues = Vec::new();
            let index = RecordIndex::build(old, &mut issues)
                .map_err(|e| e.with_path(old_path.display().to_string()))?;
            Ok((index, issues))
        })
        .and_then(|(index, issues)| {
            let new = open_reader(new_path)?;
            classify_stream(index, new, issues)
                .map_err(|e| e.with_path(new_path.display().to_string()))
        });

    let duration_ms = start.elapsed().as_millis() as u64;
    match result {
        Ok(mut diff) => {
            diff.file = file;
            log_op_end!(
                "diff_records",
                duration_ms = duration_ms,
                file = %diff.file,
                added = diff.added_count(),
                changed = diff.changed_count(),
                removed = diff.removed_count(),
                skipped = diff.issues.len()
            );
            Ok(diff)
        }
        Err(err) => {
            log_op_error!("diff_records", err, duration_ms = duration_ms, file = %file);
            Err(err)
        }
    }
}

/// Diff two record streams.
///
/// Same semantics as [`diff_records`] without file handling; `file` is left
/// empty.
///
/// # Errors
///
/// - `Io`: either reader failed
pub fn diff_record_streams<O: BufRead, N: BufRead>(old: O, new: N) -> Result<RecordDiff> {
    let mut issues = Vec::new();
    let index = RecordIndex::build(old, &mut issues)?;
    classify_stream(index, new, issues)
}

/// First differing field between two versions of the same record.
///
/// Fields are checked in [`RecordField::PRIORITY`] order and checking stops
/// at the first difference.
pub fn first_difference(old: &Record, new: &Record) -> Option<FieldChange> {
    let old_location = old.location.detail();
    let new_location = new.location.detail();

    RecordField::PRIORITY.iter().find_map(|field| match field {
        RecordField::Specialties => {
            if same_multiset(&old.specialties, &new.specialties) {
                None
            } else {
                Some(FieldChange::Specialties {
                    old: old.specialties.clone(),
                    new: new.specialties.clone(),
                })
            }
        }
        scalar => {
            let a = scalar_value(*scalar, old, &old_location);
            let b = scalar_value(*scalar, new, &new_location);
            (a != b).then(|| FieldChange::Scalar {
                field: *scalar,
                old: a.into_owned(),
                new: b.into_owned(),
            })
        }
    })
}

fn classify_stream<R: BufRead>(
    mut index: RecordIndex,
    new: R,
    mut issues: Vec<RecordIssue>,
) -> Result<RecordDiff> {
    let mut entries = Vec::new();
    let mut seen: HashSet<i64> = HashSet::new();

    for_each_line(new, |line_no, bytes| {
        let record = match parse_line(Side::New, line_no, bytes) {
            Ok(record) => record,
            Err(issue) => return skip(issue, &mut issues),
        };
        if !seen.insert(record.id) {
            return skip(
                RecordIssue::DuplicateId {
                    side: Side::New,
                    line: line_no,
                    id: record.id,
                },
                &mut issues,
            );
        }

        match index.take(record.id) {
            None => entries.push(RecordEntry {
                id: record.id,
                classification: Classification::Added,
            }),
            Some(previous) => {
                if let Some(reason) = first_difference(&previous, &record) {
                    entries.push(RecordEntry {
                        id: record.id,
                        classification: Classification::Changed { reason },
                    });
                }
            }
        }
    })?;

    entries.extend(
        index
            .into_remaining_ids()
            .into_iter()
            .map(|id| RecordEntry {
                id,
                classification: Classification::Removed,
            }),
    );

    Ok(RecordDiff {
        file: String::new(),
        entries,
        issues,
    })
}

fn scalar_value<'a>(
    field: RecordField,
    record: &'a Record,
    location: &'a LocationDetail,
) -> Cow<'a, str> {
    match field {
        RecordField::Npi => Cow::Owned(record.npi.to_string()),
        RecordField::Ttid => Cow::Owned(record.ttid.to_string()),
        RecordField::FirstName => Cow::Borrowed(&record.first_name),
        RecordField::LastName => Cow::Borrowed(&record.last_name),
        RecordField::MiddleName => Cow::Borrowed(&record.middle_name),
        RecordField::LocationId => Cow::Owned(location.id.to_string()),
        RecordField::Affiliation => Cow::Borrowed(&location.affiliation),
        RecordField::City => Cow::Borrowed(&location.city),
        RecordField::Zip => Cow::Borrowed(&location.zip),
        RecordField::Latitude => Cow::Borrowed(&location.latitude),
        RecordField::Longitude => Cow::Borrowed(&location.longitude),
        RecordField::State => Cow::Borrowed(&location.state),
        RecordField::Address => Cow::Borrowed(&location.address),
        RecordField::Country => Cow::Borrowed(&location.country),
        RecordField::Specialties => Cow::Borrowed(""),
    }
}

// Producer does not guarantee element order.
fn same_multiset(a: &[String], b: &[String]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut a: Vec<&str> = a.iter().map(String::as_str).collect();
    let mut b: Vec<&str> = b.iter().map(String::as_str).collect();
    a.sort_unstable();
    b.sort_unstable();
    a == b
}

fn open_reader(path: &Path) -> Result<BufReader<File>> {
    File::open(path).map(BufReader::new).map_err(|e| {
        ExError::new(ExErrorKind::Io)
            .with_op("open_record_file")
            .with_path(path.display().to_string())
            .with_message(e.to_string())
    })
}

/// Feed every non-blank line to `f` with its 1-based line number.
///
/// Lines are handed over as bytes so that invalid UTF-8 surfaces as a
/// malformed record rather than a read failure.
fn for_each_line<R: BufRead>(mut reader: R, mut f: impl FnMut(usize, &[u8])) -> Result<()> {
    let mut buf = Vec::new();
    let mut line_no = 0usize;
    loop {
        buf.clear();
        let read = reader.read_until(b'\n', &mut buf).map_err(|e| {
            ExError::new(ExErrorKind::Io)
                .with_op("read_record_file")
                .with_line(line_no + 1)
                .with_message(e.to_string())
        })?;
        if read == 0 {
            return Ok(());
        }
        line_no += 1;
        if buf.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        f(line_no, &buf);
    }
}

fn parse_line(side: Side, line: usize, bytes: &[u8]) -> std::result::Result<Record, RecordIssue> {
    serde_json::from_slice(bytes).map_err(|e| RecordIssue::Malformed {
        side,
        line,
        reason: e.to_string(),
    })
}

fn skip(issue: RecordIssue, issues: &mut Vec<RecordIssue>) {
    tracing::warn!(side = %issue.side(), line = issue.line(), "skipping record line: {}", issue);
    issues.push(issue);
}
