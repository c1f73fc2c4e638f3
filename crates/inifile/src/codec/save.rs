//! Document → file: canonical serialization.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::codec;
use crate::document::Document;
use crate::error::IniError;
use crate::probe::{self, FileStatus};

/// Rejects save targets that can never be written: directories, and paths
/// where neither the file nor (for a missing file) its parent directory is
/// writable.
pub(crate) fn gate_save_target(path: &Path) -> Result<(), IniError> {
    match probe::check(path) {
        FileStatus::IsDirectory => Err(IniError::IsDirectory {
            path: path.to_path_buf(),
        }),
        FileStatus::NotRegular => Err(IniError::NotRegular {
            path: path.to_path_buf(),
        }),
        _ => {
            if probe::permissions(path).write {
                Ok(())
            } else {
                Err(IniError::PermissionDenied {
                    path: path.to_path_buf(),
                })
            }
        }
    }
}

impl Document {
    /// Writes the whole document to `path` in canonical form, replacing any
    /// existing contents.
    ///
    /// Global-section pairs come first without a header; every other section
    /// follows as a `[name]` header and its pairs, one blank line between
    /// sections. Values containing whitespace, `;`, or `#` are wrapped in
    /// double quotes so the file reloads to an equal document.
    ///
    /// A document holding only global pairs produces a headerless file.
    ///
    /// # Errors
    ///
    /// [`IniError::IsDirectory`] / [`IniError::PermissionDenied`] from the
    /// target gate, [`IniError::Open`] / [`IniError::Io`] on write failure,
    /// and [`IniError::Close`] if the final flush fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), IniError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(IniError::InvalidArgument("path must not be empty"));
        }
        gate_save_target(path)?;

        let file = File::create(path).map_err(|source| IniError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mut out = BufWriter::new(file);
        let io_err = |source| IniError::Io {
            path: path.to_path_buf(),
            source,
        };

        let guard = self.lock()?;
        let mut wrote_any = false;

        // Global pairs first, headerless.
        if let Some(global) = guard.get("") {
            for (key, value) in global.iter() {
                codec::write_pair(&mut out, key, value).map_err(io_err)?;
                wrote_any = true;
            }
        }

        for (name, section) in guard.iter() {
            if name.is_empty() {
                continue;
            }
            if wrote_any {
                writeln!(out).map_err(io_err)?;
            }
            writeln!(out, "[{name}]").map_err(io_err)?;
            for (key, value) in section.iter() {
                codec::write_pair(&mut out, key, value).map_err(io_err)?;
            }
            wrote_any = true;
        }
        drop(guard);

        out.flush().map_err(|source| IniError::Close {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "document saved");
        Ok(())
    }
}
