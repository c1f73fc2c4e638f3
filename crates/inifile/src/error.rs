//! Error taxonomy for all public operations.
//!
//! [`IniError`] carries the payloads a caller needs to act on a failure
//! (paths, 1-based line numbers, `io::Error` sources). For callers that want
//! the flat integer surface instead, [`IniError::status`] collapses every
//! variant onto one [`Status`] code.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::status::Status;

/// Classification of the first grammar violation found in a file.
///
/// Reported by both the validator and the loader, always together with the
/// 1-based line number of the offending line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// A `[` opened a header but no `]` closed it on the same line.
    UnterminatedHeader,
    /// The text between `[` and `]` is empty after trimming.
    EmptySectionName,
    /// The text before `=` is empty after trimming.
    EmptyKey,
    /// The value opened with `"` but did not close with `"` on the same line.
    UnbalancedQuote,
    /// The value contains a literal comma (no array syntax).
    ArrayValue,
    /// The line exceeds the 8192-byte limit.
    LineTooLong,
    /// The line is neither blank, comment, header, nor key=value pair.
    StrayLine,
    /// The line is not valid UTF-8.
    InvalidUtf8,
}

impl SyntaxErrorKind {
    /// Returns a short stable description of the violation.
    pub fn as_str(self) -> &'static str {
        match self {
            SyntaxErrorKind::UnterminatedHeader => "unterminated section header",
            SyntaxErrorKind::EmptySectionName => "empty section name",
            SyntaxErrorKind::EmptyKey => "empty key",
            SyntaxErrorKind::UnbalancedQuote => "unbalanced quote in value",
            SyntaxErrorKind::ArrayValue => "comma in value (arrays are not supported)",
            SyntaxErrorKind::LineTooLong => "line exceeds the 8192-byte limit",
            SyntaxErrorKind::StrayLine => "line is neither a section header nor a key=value pair",
            SyntaxErrorKind::InvalidUtf8 => "line is not valid UTF-8",
        }
    }
}

impl std::fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by every fallible public operation.
#[derive(Debug, Error)]
pub enum IniError {
    /// The file does not exist.
    #[error("file not found: {path}")]
    NotFound { path: PathBuf },

    /// The file is a regular file of size 0.
    #[error("file is empty: {path}")]
    Empty { path: PathBuf },

    /// The path points to a directory.
    #[error("path is a directory: {path}")]
    IsDirectory { path: PathBuf },

    /// The path is not a regular file (FIFO, device, socket, ...).
    #[error("not a regular file: {path}")]
    NotRegular { path: PathBuf },

    /// The file (or, for a missing save target, its parent directory) is not
    /// accessible with the required permission.
    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Opening the file failed.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading from or writing to the file failed mid-operation.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Flushing or closing the file failed.
    #[error("failed to close {path}: {source}")]
    Close {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file violates the grammar. `line` is 1-based.
    #[error("syntax error at line {line}: {kind}")]
    Syntax { line: u64, kind: SyntaxErrorKind },

    /// The requested section is not present in the document.
    #[error("section not found: [{section}]")]
    SectionNotFound { section: String },

    /// The requested key is not present in the section.
    #[error("key not found: key {key:?} in section [{section}]")]
    KeyNotFound { section: String, key: String },

    /// A required argument was empty or otherwise unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A stored string value could not be converted to the requested type.
    #[error("cannot convert {value:?} (key {key:?} in section [{section}]) to {target}")]
    Convert {
        section: String,
        key: String,
        value: String,
        target: &'static str,
    },

    /// The document lock was poisoned by a thread that panicked while
    /// holding it.
    #[error("document lock poisoned by a panicked thread")]
    LockPoisoned,

    /// Writing a listing to a caller-supplied stream failed.
    #[error("write to output stream failed: {source}")]
    Print {
        #[source]
        source: io::Error,
    },

    /// The host reported a condition the library cannot classify.
    #[error("unclassified filesystem error on {path}")]
    Unknown { path: PathBuf },
}

impl IniError {
    /// Collapses this error onto its stable [`Status`] code.
    pub fn status(&self) -> Status {
        match self {
            IniError::NotFound { .. } => Status::FileNotFound,
            IniError::Empty { .. } => Status::FileEmpty,
            IniError::IsDirectory { .. } => Status::FileIsDirectory,
            IniError::NotRegular { .. } => Status::FileBadFormat,
            IniError::PermissionDenied { .. } => Status::FilePermissionDenied,
            IniError::Open { .. } | IniError::Io { .. } => Status::FileOpenFailed,
            IniError::Close { .. } => Status::CloseFailed,
            IniError::Syntax { .. } => Status::FileBadFormat,
            IniError::SectionNotFound { .. } => Status::SectionNotFound,
            IniError::KeyNotFound { .. } => Status::KeyNotFound,
            IniError::InvalidArgument(_) | IniError::Convert { .. } => Status::InvalidArgument,
            IniError::LockPoisoned => Status::PlatformError,
            IniError::Print { .. } => Status::PrintError,
            IniError::Unknown { .. } => Status::UnknownError,
        }
    }

    /// Returns the 1-based line number for syntax errors, `None` otherwise.
    pub fn line(&self) -> Option<u64> {
        match self {
            IniError::Syntax { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Returns the grammar violation kind for syntax errors, `None` otherwise.
    pub fn syntax_kind(&self) -> Option<SyntaxErrorKind> {
        match self {
            IniError::Syntax { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
