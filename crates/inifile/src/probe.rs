//! File status probe gating every load and save.
//!
//! The probe classifies a path before the parser ever touches it, so that
//! `validate`, `load`, and `save` report precise filesystem diagnostics
//! (missing, directory, non-regular, empty, unreadable) instead of a generic
//! open failure. All platform adaptation lives in this module.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use tracing::trace;

use crate::error::IniError;

/// The UTF-8 byte-order mark the loader tolerates at byte offset 0.
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Classification of a path, as seen by the probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Regular, non-empty file.
    Ok,
    /// Nothing exists at the path.
    NotFound,
    /// The path is a directory.
    IsDirectory,
    /// The path exists but is not a regular file (FIFO, device, socket, ...).
    NotRegular,
    /// Regular file of size 0.
    Empty,
    /// The path could not be inspected due to missing permissions.
    PermissionDenied,
    /// The host reported a condition the probe cannot classify.
    Unknown,
}

impl FileStatus {
    /// Converts a non-`Ok` status into the error a load-side operation
    /// reports for `path`. Returns `None` for [`FileStatus::Ok`].
    pub(crate) fn to_error(self, path: &Path) -> Option<IniError> {
        let path = path.to_path_buf();
        match self {
            FileStatus::Ok => None,
            FileStatus::NotFound => Some(IniError::NotFound { path }),
            FileStatus::IsDirectory => Some(IniError::IsDirectory { path }),
            FileStatus::NotRegular => Some(IniError::NotRegular { path }),
            FileStatus::Empty => Some(IniError::Empty { path }),
            FileStatus::PermissionDenied => Some(IniError::PermissionDenied { path }),
            FileStatus::Unknown => Some(IniError::Unknown { path }),
        }
    }
}

/// Effective permission bits for a path.
///
/// For paths that do not exist, `write` reflects the *parent directory's*
/// write bit, so callers can decide whether creating the file would succeed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilePermissions {
    pub read: bool,
    pub write: bool,
    pub execute: bool,
}

/// Classifies `path` without opening it.
pub fn check(path: &Path) -> FileStatus {
    let status = match fs::metadata(path) {
        Ok(md) => {
            if md.is_dir() {
                FileStatus::IsDirectory
            } else if !md.is_file() {
                FileStatus::NotRegular
            } else if md.len() == 0 {
                FileStatus::Empty
            } else {
                FileStatus::Ok
            }
        }
        Err(e) => match e.kind() {
            io::ErrorKind::NotFound => FileStatus::NotFound,
            io::ErrorKind::PermissionDenied => FileStatus::PermissionDenied,
            _ => FileStatus::Unknown,
        },
    };
    trace!(path = %path.display(), ?status, "probed file status");
    status
}

/// Runs [`check`] and converts any non-`Ok` outcome into an error.
pub(crate) fn gate(path: &Path) -> Result<(), IniError> {
    match check(path).to_error(path) {
        None => Ok(()),
        Some(err) => Err(err),
    }
}

/// Returns the size of the regular file at `path` in bytes.
///
/// # Errors
///
/// [`IniError::IsDirectory`] for directories, [`IniError::NotFound`] for
/// missing paths, [`IniError::Unknown`] otherwise.
pub fn size(path: &Path) -> Result<u64, IniError> {
    match fs::metadata(path) {
        Ok(md) if md.is_dir() => Err(IniError::IsDirectory {
            path: path.to_path_buf(),
        }),
        Ok(md) => Ok(md.len()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(IniError::NotFound {
            path: path.to_path_buf(),
        }),
        Err(_) => Err(IniError::Unknown {
            path: path.to_path_buf(),
        }),
    }
}

/// Reports read/write/execute permission bits for `path`.
///
/// A missing path reports only the parent directory's write bit; read and
/// execute stay `false`.
pub fn permissions(path: &Path) -> FilePermissions {
    match fs::metadata(path) {
        Ok(md) => file_permissions(&md, path),
        Err(_) => {
            // Path absent: a save would create it, so what matters is the
            // parent directory's write bit.
            let parent = match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p,
                _ => Path::new("."),
            };
            FilePermissions {
                read: false,
                write: dir_writable(parent),
                execute: false,
            }
        }
    }
}

/// Reports whether the file at `path` starts with the UTF-8 BOM.
///
/// # Errors
///
/// The same filesystem-shape errors as [`check`], plus open failures.
pub fn utf8_bom(path: &Path) -> Result<bool, IniError> {
    gate(path)?;
    let mut file = fs::File::open(path).map_err(|source| IniError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut head = [0u8; 3];
    let mut filled = 0;
    // A regular file shorter than 3 bytes cannot carry a BOM.
    while filled < head.len() {
        match file.read(&mut head[filled..]) {
            Ok(0) => return Ok(false),
            Ok(n) => filled += n,
            Err(source) => {
                return Err(IniError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }
    Ok(head == UTF8_BOM)
}

// ── Platform adaptation ───────────────────────────────────────────────────────

#[cfg(unix)]
fn file_permissions(md: &fs::Metadata, _path: &Path) -> FilePermissions {
    use std::os::unix::fs::PermissionsExt;

    let mode = md.permissions().mode();
    FilePermissions {
        read: mode & 0o444 != 0,
        write: mode & 0o222 != 0,
        execute: mode & 0o111 != 0,
    }
}

#[cfg(not(unix))]
fn file_permissions(md: &fs::Metadata, path: &Path) -> FilePermissions {
    // Windows has no execute bit; treat the conventional executable
    // extensions as executable, mirroring what Explorer does.
    let execute = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            e.eq_ignore_ascii_case("exe")
                || e.eq_ignore_ascii_case("bat")
                || e.eq_ignore_ascii_case("cmd")
                || e.eq_ignore_ascii_case("msi")
        })
        .unwrap_or(false);
    FilePermissions {
        read: true,
        write: !md.permissions().readonly(),
        execute,
    }
}

#[cfg(unix)]
fn dir_writable(dir: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(dir)
        .map(|md| md.permissions().mode() & 0o222 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn dir_writable(dir: &Path) -> bool {
    fs::metadata(dir)
        .map(|md| !md.permissions().readonly())
        .unwrap_or(false)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
