//! Snapshot comparison engines.
//!
//! - [`records`]: keyed record matching across paired line-delimited files
//! - [`schema`]: field/type comparison of paired dictionary documents
//! - [`files`]: plain file-set difference of two directory listings
//!
//! ## Entry points
//!
//! ```ignore
//! use pkgdiff_core::diff::{diff_records, diff_schema, load_schema};
//!
//! let records = diff_records(old_path, new_path)?;
//! let fields = diff_schema(&load_schema(old_dict)?, &load_schema(new_dict)?);
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce identical output, order included.
//!   Removed ids are emitted ascending; schema buckets and file lists are sorted.
//! - **Single classification**: every id (or field name) lands in at most one
//!   bucket per file (or document).
//! - **Non-fatal parsing**: a malformed record line is skipped and reported,
//!   never aborting the file.

pub mod files;
pub mod model;
pub mod records;
pub mod schema;

pub use files::diff_file_sets;
pub use model::{
    Classification, FieldChange, FileSetDiff, PackageReport, RecordDiff, RecordEntry,
    RecordField, SchemaDiff, TypeChange,
};
pub use records::{diff_record_streams, diff_records, first_difference, RecordIndex};
pub use schema::{diff_schema, load_schema, parse_schema};
