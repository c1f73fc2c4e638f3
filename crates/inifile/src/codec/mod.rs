//! Line-oriented INI codec: grammar, reader, and serializer primitives.
//!
//! One classifier defines the grammar; the validator, the loader, and the
//! preserving updater all call into it, so a file accepted by one is
//! accepted by all.
//!
//! ## Grammar
//!
//! A file is a sequence of lines terminated by `\n` or `\r\n`, each at most
//! 8191 content bytes after the terminator is stripped. Whitespace is space
//! and tab. Each line is one of:
//!
//! * blank (only whitespace),
//! * comment (first non-whitespace byte is `;` or `#`),
//! * section header `[name]`: text after `]` is ignored, the name is
//!   trimmed and must be non-empty,
//! * pair `key=value`: split at the first `=`, both sides trimmed, the key
//!   must be non-empty, and a value wrapped in double quotes has the outer
//!   pair stripped.
//!
//! Values must not contain a literal comma (there is no array syntax) and
//! quotes must balance. Pairs before the first header belong to the global
//! section (the empty name). A UTF-8 byte-order mark is consumed at byte
//! offset 0 and nowhere else.

mod load;
mod save;
mod update;
mod validate;

pub use validate::validate;

use std::io::{BufRead, Write};
use std::path::Path;

use crate::error::{IniError, SyntaxErrorKind};

/// Hard upper bound on one line, terminator included.
///
/// A line whose content (terminator stripped) reaches this many bytes is
/// rejected as [`SyntaxErrorKind::LineTooLong`].
pub const MAX_LINE_BYTES: usize = 8192;

/// One classified line of an INI file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// Blank line or comment. Carries no content.
    Blank,
    /// Section header; `name` is trimmed and non-empty.
    Header { name: &'a str },
    /// Key/value pair; `key` is trimmed and non-empty, `value` is trimmed
    /// and dequoted.
    Pair { key: &'a str, value: &'a str },
}

fn trim(s: &str) -> &str {
    s.trim_matches([' ', '\t'])
}

/// Classifies one content line (no terminator) against the grammar.
///
/// `line_no` is 1-based and only used to position syntax errors.
pub fn classify(line: &str, line_no: u64) -> Result<Line<'_>, IniError> {
    let syntax = |kind| IniError::Syntax { line: line_no, kind };

    let trimmed = trim(line);
    if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
        return Ok(Line::Blank);
    }

    if let Some(rest) = trimmed.strip_prefix('[') {
        // Text after the closing bracket is ignored.
        let inner = rest
            .split_once(']')
            .ok_or_else(|| syntax(SyntaxErrorKind::UnterminatedHeader))?
            .0;
        let name = trim(inner);
        if name.is_empty() {
            return Err(syntax(SyntaxErrorKind::EmptySectionName));
        }
        return Ok(Line::Header { name });
    }

    let (raw_key, raw_value) = trimmed
        .split_once('=')
        .ok_or_else(|| syntax(SyntaxErrorKind::StrayLine))?;
    let key = trim(raw_key);
    if key.is_empty() {
        return Err(syntax(SyntaxErrorKind::EmptyKey));
    }

    let mut value = trim(raw_value);
    if value.contains(',') {
        return Err(syntax(SyntaxErrorKind::ArrayValue));
    }
    if let Some(rest) = value.strip_prefix('"') {
        // An opening quote must be matched at the end of the line.
        value = rest
            .strip_suffix('"')
            .ok_or_else(|| syntax(SyntaxErrorKind::UnbalancedQuote))?;
    }

    Ok(Line::Pair { key, value })
}

/// Returns `true` when `value` must be quoted on output to survive a
/// round trip through [`classify`].
pub fn needs_quotes(value: &str) -> bool {
    value.contains([' ', '\t', ';', '#']) || value.starts_with('"')
}

/// Writes one canonical `key=value` line, quoting the value when needed.
pub(crate) fn write_pair<W: Write>(out: &mut W, key: &str, value: &str) -> std::io::Result<()> {
    if needs_quotes(value) {
        writeln!(out, "{key}=\"{value}\"")
    } else {
        writeln!(out, "{key}={value}")
    }
}

// ── Line reader ───────────────────────────────────────────────────────────────

/// Strips the UTF-8 BOM from the first line's raw bytes, in place.
pub(crate) fn strip_bom(raw: &mut Vec<u8>) {
    if raw.starts_with(&crate::probe::UTF8_BOM) {
        raw.drain(..crate::probe::UTF8_BOM.len());
    }
}

/// Strips a trailing `\n` or `\r\n` from one raw line, in place.
pub(crate) fn strip_terminator(raw: &mut Vec<u8>) {
    if raw.last() == Some(&b'\n') {
        raw.pop();
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }
    }
}

/// Buffered reader yielding `(line_no, content)` with the terminator
/// stripped, the BOM consumed at offset 0, and the length and UTF-8 rules
/// enforced.
pub(crate) struct LineReader<'p, R> {
    inner: R,
    path: &'p Path,
    line_no: u64,
    raw: Vec<u8>,
}

impl<'p, R: BufRead> LineReader<'p, R> {
    pub(crate) fn new(inner: R, path: &'p Path) -> Self {
        Self {
            inner,
            path,
            line_no: 0,
            raw: Vec::new(),
        }
    }

    /// Reads the next line. Returns `Ok(None)` at end of file.
    ///
    /// The returned slice borrows the reader's internal buffer and is valid
    /// until the next call.
    pub(crate) fn next_line(&mut self) -> Result<Option<(u64, &str)>, IniError> {
        self.raw.clear();
        let read = self
            .inner
            .read_until(b'\n', &mut self.raw)
            .map_err(|source| IniError::Io {
                path: self.path.to_path_buf(),
                source,
            })?;
        if read == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        strip_terminator(&mut self.raw);
        if self.line_no == 1 {
            strip_bom(&mut self.raw);
        }
        if self.raw.len() >= MAX_LINE_BYTES {
            return Err(IniError::Syntax {
                line: self.line_no,
                kind: SyntaxErrorKind::LineTooLong,
            });
        }
        let content = std::str::from_utf8(&self.raw).map_err(|_| IniError::Syntax {
            line: self.line_no,
            kind: SyntaxErrorKind::InvalidUtf8,
        })?;
        Ok(Some((self.line_no, content)))
    }
}

/// Drives [`LineReader`] and [`classify`] over a whole stream, feeding each
/// classified line to `on_line`. The validator and the loader share this.
pub(crate) fn scan<R, F>(reader: R, path: &Path, mut on_line: F) -> Result<(), IniError>
where
    R: BufRead,
    F: FnMut(u64, Line<'_>) -> Result<(), IniError>,
{
    let mut lines = LineReader::new(reader, path);
    while let Some((line_no, content)) = lines.next_line()? {
        let line = classify(content, line_no)?;
        on_line(line_no, line)?;
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
