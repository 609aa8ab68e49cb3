//! File-set diff between two snapshot directory listings.

use crate::diff::model::FileSetDiff;
use std::collections::BTreeSet;

/// Names only in `new` are added, names only in `old` are removed.
///
/// Content is not inspected. Both lists come back sorted and deduplicated.
pub fn diff_file_sets<S: AsRef<str>>(old: &[S], new: &[S]) -> FileSetDiff {
    let old: BTreeSet<&str> = old.iter().map(AsRef::as_ref).collect();
    let new: BTreeSet<&str> = new.iter().map(AsRef::as_ref).collect();
    FileSetDiff {
        added: new.difference(&old).map(|s| s.to_string()).collect(),
        removed: old.difference(&new).map(|s| s.to_string()).collect(),
    }
}
