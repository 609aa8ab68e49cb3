//! Dictionary (schema) diff engine.
//!
//! Compares two [`SchemaDocument`]s field by field. Only the declared
//! `type` of a field matters; position in the document does not.

use crate::diff::model::{SchemaDiff, TypeChange};
use crate::errors::{ExError, ExErrorKind, Result};
use crate::model::SchemaDocument;
use std::collections::BTreeSet;
use std::path::Path;

/// Parse a dictionary document from raw bytes.
///
/// # Errors
///
/// - `InvalidSchema`: not a JSON object mapping names to descriptors with a
///   string `type`
pub fn parse_schema(bytes: &[u8]) -> Result<SchemaDocument> {
    serde_json::from_slice(bytes).map_err(|e| {
        ExError::new(ExErrorKind::InvalidSchema)
            .with_op("parse_schema")
            .with_message(e.to_string())
    })
}

/// Read and parse a dictionary file.
///
/// # Errors
///
/// - `Io`: the file cannot be read
/// - `InvalidSchema`: see [`parse_schema`]
pub fn load_schema(path: &Path) -> Result<SchemaDocument> {
    let bytes = std::fs::read(path).map_err(|e| {
        ExError::new(ExErrorKind::Io)
            .with_op("read_schema_file")
            .with_path(path.display().to_string())
            .with_message(e.to_string())
    })?;
    parse_schema(&bytes).map_err(|e| e.with_path(path.display().to_string()))
}

/// Classify every field of `old` and `new`.
///
/// Each old field is looked up in new. A match is consumed from the working
/// set whether or not its type changed; a miss is a removal. Whatever remains
/// unconsumed in the working set was added.
pub fn diff_schema(old: &SchemaDocument, new: &SchemaDocument) -> SchemaDiff {
    let mut unconsumed: BTreeSet<&str> = new.field_names().collect();
    let mut diff = SchemaDiff::default();

    for (name, old_field) in old.fields() {
        match new.get(name) {
            Some(new_field) => {
                if old_field.field_type != new_field.field_type {
                    diff.type_changed.insert(
                        name.to_string(),
                        TypeChange {
                            from: old_field.field_type.clone(),
                            to: new_field.field_type.clone(),
                        },
                    );
                }
                unconsumed.remove(name);
            }
            None => {
                diff.removed.insert(name.to_string());
            }
        }
    }

    diff.added = unconsumed.into_iter().map(str::to_string).collect();
    diff
}
