use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every fatal failure in a comparison run is classified by one of these
/// kinds. Each kind maps to a stable error code that can be used for
/// programmatic error handling and testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Invocation
    /// Wrong arguments or conflicting options
    Usage,
    /// An input archive or directory does not exist
    NotFound,

    // Snapshot preparation
    /// An archive could not be decoded or unpacked
    Extraction,

    // Comparison
    /// A dictionary file is not an object of `{ "type": ... }` descriptors
    InvalidSchema,

    // Output
    /// A report file could not be written
    ReportWrite,

    // Integration/IO
    Io,
    /// An extraction thread panicked
    Concurrency,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Usage => "ERR_USAGE",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Extraction => "ERR_EXTRACTION",
            ExErrorKind::InvalidSchema => "ERR_INVALID_SCHEMA",
            ExErrorKind::ReportWrite => "ERR_REPORT_WRITE",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus enough context (operation, path, line)
/// for the user to see which step failed and on which file.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    line: Option<usize>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            line: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add file or directory context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add 1-based line context
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the line context, if any
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(line) = self.line {
            write!(f, " (line: {})", line)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Which snapshot a record line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Old,
    New,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Old => write!(f, "old"),
            Side::New => write!(f, "new"),
        }
    }
}

/// Non-fatal, line-level problems found while reading a record file
///
/// The offending line is skipped and the run continues; issues are counted
/// per file and surfaced in the run summary.
#[derive(Error, Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind")]
pub enum RecordIssue {
    /// Line is not a JSON object of the expected shape
    #[error("{side} line {line}: malformed record: {reason}")]
    Malformed {
        side: Side,
        line: usize,
        reason: String,
    },

    /// Identity key already seen earlier in the new file
    #[error("{side} line {line}: duplicate id {id}, later occurrence skipped")]
    DuplicateId { side: Side, line: usize, id: i64 },
}

impl RecordIssue {
    /// Side of the comparison the issue was found on
    pub fn side(&self) -> Side {
        match self {
            RecordIssue::Malformed { side, .. } | RecordIssue::DuplicateId { side, .. } => *side,
        }
    }

    /// 1-based line number of the skipped line
    pub fn line(&self) -> usize {
        match self {
            RecordIssue::Malformed { line, .. } | RecordIssue::DuplicateId { line, .. } => *line,
        }
    }
}
