//! Flat status codes for API callers that need a stable integer surface.
//!
//! Every [`crate::IniError`] maps onto exactly one [`Status`] via
//! [`crate::IniError::status`]. The discriminants and the strings returned by
//! [`Status::as_str`] are stable across releases: language bindings and log
//! scrapers may rely on them.

/// Stable integer status codes covering every outcome of the library.
///
/// A few codes exist for wire-level completeness even where the Rust API
/// surfaces the condition differently: `MemoryError` (allocation failure
/// aborts in Rust), `IteratorEnd` (iteration is expressed with `Iterator`),
/// and the `HasUtf8Bom` / `NoUtf8Bom` pair (the probe returns a `bool`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Status {
    /// Operation succeeded.
    Success = 0,
    /// Specified file does not exist.
    FileNotFound = 1,
    /// File is a regular file of size 0.
    FileEmpty = 2,
    /// Failed to open or read/write the file.
    FileOpenFailed = 3,
    /// File is not a regular file, or has invalid INI syntax.
    FileBadFormat = 4,
    /// Failed to allocate memory.
    MemoryError = 5,
    /// Requested section does not exist.
    SectionNotFound = 6,
    /// Requested key does not exist.
    KeyNotFound = 7,
    /// Invalid argument passed to an operation, or a value conversion failed.
    InvalidArgument = 8,
    /// Platform-level failure (lock poisoned, host primitive failed).
    PlatformError = 9,
    /// Failed to flush or close the file.
    CloseFailed = 10,
    /// Writing a listing to an output stream failed.
    PrintError = 11,
    /// Permission denied on the file or its parent directory.
    FilePermissionDenied = 12,
    /// Path points to a directory.
    FileIsDirectory = 13,
    /// Iterator has reached the end of the table.
    IteratorEnd = 14,
    /// File starts with the UTF-8 byte-order mark.
    HasUtf8Bom = 15,
    /// File does not start with the UTF-8 byte-order mark.
    NoUtf8Bom = 16,
    /// Unclassified error.
    UnknownError = 17,
}

impl Status {
    /// Returns the stable integer code.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Returns the stable human-readable description.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Success => "Success",
            Status::FileNotFound => "File not found",
            Status::FileEmpty => "File is empty",
            Status::FileOpenFailed => "File open failed",
            Status::FileBadFormat => "File bad format",
            Status::MemoryError => "Memory error",
            Status::SectionNotFound => "Section not found",
            Status::KeyNotFound => "Key not found",
            Status::InvalidArgument => "Invalid argument",
            Status::PlatformError => "Platform error",
            Status::CloseFailed => "Close failed",
            Status::PrintError => "Print error",
            Status::FilePermissionDenied => "File permission denied",
            Status::FileIsDirectory => "File is a directory",
            Status::IteratorEnd => "Iterator has reached the end of the table",
            Status::HasUtf8Bom => "File has a UTF-8 BOM",
            Status::NoUtf8Bom => "File has no UTF-8 BOM",
            Status::UnknownError => "Unknown error",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<i32> for Status {
    type Error = i32;

    /// Converts a raw integer code back into a [`Status`].
    ///
    /// Returns the unrecognized code itself as the error.
    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Ok(match code {
            0 => Status::Success,
            1 => Status::FileNotFound,
            2 => Status::FileEmpty,
            3 => Status::FileOpenFailed,
            4 => Status::FileBadFormat,
            5 => Status::MemoryError,
            6 => Status::SectionNotFound,
            7 => Status::KeyNotFound,
            8 => Status::InvalidArgument,
            9 => Status::PlatformError,
            10 => Status::CloseFailed,
            11 => Status::PrintError,
            12 => Status::FilePermissionDenied,
            13 => Status::FileIsDirectory,
            14 => Status::IteratorEnd,
            15 => Status::HasUtf8Bom,
            16 => Status::NoUtf8Bom,
            17 => Status::UnknownError,
            other => return Err(other),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
