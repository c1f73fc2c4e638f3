//! Preserving single-section rewrite.
//!
//! Unlike [`crate::Document::save`], which re-serializes the whole document,
//! `save_section` rewrites one section (or one key) inside an existing file
//! while copying every other byte verbatim: comments, blank lines, spacing,
//! and foreign sections all survive.
//!
//! The rewrite streams into a sibling temporary file and renames it over the
//! target, so a failure mid-write leaves the original untouched.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::codec::{self, save::gate_save_target};
use crate::document::{Document, Section};
use crate::error::IniError;
use crate::probe::{self, FileStatus};

/// Removes the temporary file on drop unless the rewrite completed.
struct TempFileGuard {
    path: PathBuf,
    keep: bool,
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if !self.keep {
            fs::remove_file(&self.path).ok();
        }
    }
}

fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Lenient per-line view used while streaming an existing file. Lines that
/// fit no shape are treated as opaque and copied verbatim.
enum RawLine<'a> {
    Header { name: &'a str },
    Pair { key: &'a str },
    Other,
}

fn peek_line(content: &[u8]) -> RawLine<'_> {
    let Ok(text) = std::str::from_utf8(content) else {
        return RawLine::Other;
    };
    let trimmed = text.trim_matches([' ', '\t']);
    if let Some(rest) = trimmed.strip_prefix('[') {
        if let Some((inner, _)) = rest.split_once(']') {
            return RawLine::Header {
                name: inner.trim_matches([' ', '\t']),
            };
        }
    }
    if let Some((raw_key, _)) = trimmed.split_once('=') {
        return RawLine::Pair {
            key: raw_key.trim_matches([' ', '\t']),
        };
    }
    RawLine::Other
}

fn write_section_pairs<W: Write>(
    out: &mut W,
    section: &Section,
    key: Option<&str>,
) -> std::io::Result<()> {
    match key {
        Some(k) => {
            // Presence was checked up front.
            if let Some(value) = section.get(k) {
                codec::write_pair(out, k, value)?;
            }
        }
        None => {
            for (k, v) in section.iter() {
                codec::write_pair(out, k, v)?;
            }
        }
    }
    Ok(())
}

impl Document {
    /// Rewrites one section of the file at `path`, preserving everything
    /// else byte-for-byte.
    ///
    /// With `key = None` the on-disk section is replaced wholesale: its
    /// header is kept, the in-memory pairs are written in store order, and
    /// every original line of the section is dropped. With `key = Some(k)`
    /// only lines whose trimmed key equals `k` are replaced with the current
    /// in-memory pair; all other lines of the section are copied verbatim.
    ///
    /// A section absent from the file is appended at the end, separated by
    /// one blank line. A missing file is created with just the requested
    /// content.
    ///
    /// The global section cannot be addressed here (it has no header to
    /// anchor the rewrite); use [`Document::save`] instead.
    ///
    /// # Errors
    ///
    /// [`IniError::InvalidArgument`] for an empty path, section, or key;
    /// [`IniError::SectionNotFound`] / [`IniError::KeyNotFound`] when the
    /// target is missing from the document; the save-target gate and I/O
    /// errors of [`Document::save`].
    pub fn save_section<P: AsRef<Path>>(
        &self,
        path: P,
        section: &str,
        key: Option<&str>,
    ) -> Result<(), IniError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(IniError::InvalidArgument("path must not be empty"));
        }
        if section.is_empty() {
            return Err(IniError::InvalidArgument(
                "global section cannot be rewritten in place",
            ));
        }
        if key == Some("") {
            return Err(IniError::InvalidArgument("key must not be empty"));
        }
        gate_save_target(path)?;

        let guard = self.lock()?;
        let stored = guard.get(section).ok_or_else(|| IniError::SectionNotFound {
            section: section.to_owned(),
        })?;
        if let Some(k) = key {
            if stored.get(k).is_none() {
                return Err(IniError::KeyNotFound {
                    section: section.to_owned(),
                    key: k.to_owned(),
                });
            }
        }

        let temp_path = temp_path_for(path);
        let mut temp = TempFileGuard {
            path: temp_path,
            keep: false,
        };
        let file = File::create(&temp.path).map_err(|source| IniError::Open {
            path: temp.path.clone(),
            source,
        })?;
        let mut out = BufWriter::new(file);
        let io_err = |source| IniError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file_exists = probe::check(path) != FileStatus::NotFound;
        if file_exists {
            rewrite_existing(path, &mut out, section, key, stored)?;
        } else {
            writeln!(out, "[{section}]").map_err(io_err)?;
            write_section_pairs(&mut out, stored, key).map_err(io_err)?;
        }

        out.flush().map_err(|source| IniError::Close {
            path: path.to_path_buf(),
            source,
        })?;
        drop(out);

        replace_file(&temp.path, path)?;
        temp.keep = true;
        drop(guard);

        debug!(path = %path.display(), section, key = ?key, "section rewritten in place");
        Ok(())
    }
}

/// Streams `path` into `out`, rewriting the target section per the mode.
fn rewrite_existing<W: Write>(
    path: &Path,
    out: &mut W,
    section: &str,
    key: Option<&str>,
    stored: &Section,
) -> Result<(), IniError> {
    let open_err = |source| IniError::Open {
        path: path.to_path_buf(),
        source,
    };
    let io = |source| IniError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = BufReader::new(File::open(path).map_err(open_err)?);
    let mut raw: Vec<u8> = Vec::new();

    let mut first_line = true;
    let mut in_target = false; // watch mode: inside the target section
    let mut skipping = false; // skip mode: dropping the old section body
    let mut section_seen = false;
    let mut wrote_any = false;
    let mut ends_with_newline = true;
    let mut last_line_blank = false;

    loop {
        raw.clear();
        let read = reader.read_until(b'\n', &mut raw).map_err(io)?;
        if read == 0 {
            break;
        }

        // Classify on the content bytes; copy the raw bytes (terminator and,
        // on the first line, BOM included) untouched.
        let mut content = raw.as_slice();
        if content.last() == Some(&b'\n') {
            content = &content[..content.len() - 1];
            if content.last() == Some(&b'\r') {
                content = &content[..content.len() - 1];
            }
        }
        if first_line {
            first_line = false;
            if content.starts_with(&probe::UTF8_BOM) {
                content = &content[probe::UTF8_BOM.len()..];
            }
        }

        match peek_line(content) {
            RawLine::Header { name } => {
                skipping = false;
                in_target = false;
                out.write_all(&raw).map_err(io)?;
                if name == section {
                    section_seen = true;
                    match key {
                        None => {
                            // A header on an unterminated final line must be
                            // closed before pairs follow it.
                            if raw.last() != Some(&b'\n') {
                                writeln!(out).map_err(io)?;
                            }
                            write_section_pairs(out, stored, None).map_err(io)?;
                            skipping = true;
                        }
                        Some(_) => in_target = true,
                    }
                }
                last_line_blank = false;
            }
            RawLine::Pair { key: line_key } if in_target && Some(line_key) == key => {
                // Presence was checked up front.
                if let Some(value) = stored.get(line_key) {
                    codec::write_pair(out, line_key, value).map_err(io)?;
                }
                last_line_blank = false;
            }
            _ if skipping => continue,
            shape => {
                out.write_all(&raw).map_err(io)?;
                last_line_blank = matches!(shape, RawLine::Other)
                    && content.iter().all(|&b| b == b' ' || b == b'\t');
            }
        }
        wrote_any = true;
        ends_with_newline = raw.last() == Some(&b'\n');
    }

    if !section_seen {
        if wrote_any {
            if !ends_with_newline {
                writeln!(out).map_err(io)?;
            }
            if !last_line_blank {
                writeln!(out).map_err(io)?;
            }
        }
        writeln!(out, "[{section}]").map_err(io)?;
        write_section_pairs(out, stored, key).map_err(io)?;
    }
    Ok(())
}

#[cfg(not(windows))]
fn replace_file(temp: &Path, target: &Path) -> Result<(), IniError> {
    fs::rename(temp, target).map_err(|source| IniError::Io {
        path: target.to_path_buf(),
        source,
    })
}

#[cfg(windows)]
fn replace_file(temp: &Path, target: &Path) -> Result<(), IniError> {
    // Windows rename does not overwrite.
    if target.exists() {
        fs::remove_file(target).map_err(|source| IniError::Io {
            path: target.to_path_buf(),
            source,
        })?;
    }
    fs::rename(temp, target).map_err(|source| IniError::Io {
        path: target.to_path_buf(),
        source,
    })
}
