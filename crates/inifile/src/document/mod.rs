//! In-memory document model: sections × key/value pairs.
//!
//! A [`Document`] owns a two-level map: an outer [`Table`] from section
//! names to [`Section`]s, each of which owns a `Table` from keys to string
//! values. The empty section name is reserved for the implicit *global*
//! section holding pairs that appear before any header.
//!
//! One mutex serializes all public operations on a document, so a single
//! `Document` can be shared across threads (`&self` everywhere, no `&mut`).
//! Readers never observe a partially-applied write; `load` in particular
//! builds into a scratch table and publishes it in one swap.

pub mod typed;

use std::io::Write;
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use crate::error::IniError;
use crate::store::Table;

/// One named collection of key/value pairs.
#[derive(Debug, Clone, Default)]
pub struct Section {
    pairs: Table<String>,
}

impl Section {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Borrows the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.get(key).map(String::as_str)
    }

    /// Inserts or replaces a pair, returning the displaced value.
    pub(crate) fn set(&mut self, key: &str, value: &str) -> Option<String> {
        self.pairs.set(key, value.to_owned())
    }

    /// Number of pairs in the section.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if the section holds no pair.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterates `(key, value)` pairs in store order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k, v.as_str()))
    }
}

/// Rejects (section, key, value) triples the file format cannot express.
///
/// Anything accepted here serializes to lines the parser reads back to the
/// identical triple. Loaded data always passes: the parser can only produce
/// trimmed, `=`-free keys and comma-free, newline-free values.
fn check_triple(section: &str, key: &str, value: &str) -> Result<(), IniError> {
    const WS: [char; 2] = [' ', '\t'];

    if section.contains([']', '\n', '\r']) {
        return Err(IniError::InvalidArgument(
            "section name must not contain ']' or newlines",
        ));
    }
    if section != section.trim_matches(WS) {
        return Err(IniError::InvalidArgument(
            "section name must not have leading or trailing whitespace",
        ));
    }
    if key.is_empty() {
        return Err(IniError::InvalidArgument("key must not be empty"));
    }
    if key.contains(['=', '\n', '\r']) {
        return Err(IniError::InvalidArgument(
            "key must not contain '=' or newlines",
        ));
    }
    if key != key.trim_matches(WS) {
        return Err(IniError::InvalidArgument(
            "key must not have leading or trailing whitespace",
        ));
    }
    // A key starting like a header or comment would change meaning on disk.
    if key.starts_with(['[', ';', '#']) {
        return Err(IniError::InvalidArgument(
            "key must not start with '[', ';', or '#'",
        ));
    }
    if value.contains(['\n', '\r']) {
        return Err(IniError::InvalidArgument("value must not contain newlines"));
    }
    if value.contains(',') {
        return Err(IniError::InvalidArgument(
            "value must not contain a comma (arrays are not supported)",
        ));
    }
    Ok(())
}

/// Thread-safe INI document.
///
/// # Examples
///
/// ```rust
/// use inifile::Document;
///
/// let doc = Document::new();
/// doc.set("database", "host", "localhost").unwrap();
/// assert_eq!(doc.get("database", "host").unwrap(), "localhost");
/// ```
#[derive(Debug, Default)]
pub struct Document {
    inner: Mutex<Table<Section>>,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the document lock, surfacing poisoning as
    /// [`IniError::LockPoisoned`].
    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Table<Section>>, IniError> {
        self.inner.lock().map_err(|_| IniError::LockPoisoned)
    }

    /// Atomically replaces the document contents. Used by `load`.
    pub(crate) fn replace_contents(&self, sections: Table<Section>) -> Result<(), IniError> {
        *self.lock()? = sections;
        Ok(())
    }

    /// Returns an owned copy of the value stored under `(section, key)`.
    ///
    /// The empty section name addresses the global section.
    ///
    /// # Errors
    ///
    /// [`IniError::SectionNotFound`] / [`IniError::KeyNotFound`] on miss.
    pub fn get(&self, section: &str, key: &str) -> Result<String, IniError> {
        let guard = self.lock()?;
        let found = guard.get(section).ok_or_else(|| IniError::SectionNotFound {
            section: section.to_owned(),
        })?;
        found
            .get(key)
            .map(str::to_owned)
            .ok_or_else(|| IniError::KeyNotFound {
                section: section.to_owned(),
                key: key.to_owned(),
            })
    }

    /// Inserts or replaces the pair `(key, value)` in `section`, creating the
    /// section if absent.
    ///
    /// Inputs that could not survive a save/load cycle are rejected up
    /// front: section names with `]` or newlines, keys with `=`, comment or
    /// header lead bytes, values with newlines or commas, and names that
    /// the parser would trim into something else.
    ///
    /// # Errors
    ///
    /// [`IniError::InvalidArgument`] for a malformed section, key, or value;
    /// [`IniError::LockPoisoned`] if the lock is poisoned.
    pub fn set(&self, section: &str, key: &str, value: &str) -> Result<(), IniError> {
        check_triple(section, key, value)?;
        let mut guard = self.lock()?;
        guard
            .get_or_insert_with(section, Section::new)
            .set(key, value);
        Ok(())
    }

    /// Returns `true` if a section named `name` exists.
    ///
    /// # Errors
    ///
    /// [`IniError::LockPoisoned`] if the lock is poisoned, like every other
    /// document operation.
    pub fn has_section(&self, name: &str) -> Result<bool, IniError> {
        Ok(self.lock()?.contains_key(name))
    }

    /// Returns `true` if `key` exists in `section`. A missing section is a
    /// plain `false`, not an error.
    pub fn has_key(&self, section: &str, key: &str) -> Result<bool, IniError> {
        let guard = self.lock()?;
        Ok(guard
            .get(section)
            .map(|s| s.get(key).is_some())
            .unwrap_or(false))
    }

    /// Returns owned names of all sections, in store order.
    pub fn sections(&self) -> Result<Vec<String>, IniError> {
        Ok(self.lock()?.keys().map(str::to_owned).collect())
    }

    /// Returns owned names of all keys in `section`, in store order.
    pub fn keys(&self, section: &str) -> Result<Vec<String>, IniError> {
        let guard = self.lock()?;
        let found = guard.get(section).ok_or_else(|| IniError::SectionNotFound {
            section: section.to_owned(),
        })?;
        Ok(found.iter().map(|(k, _)| k.to_owned()).collect())
    }

    /// Number of sections (the global section counts once it exists).
    pub fn section_count(&self) -> Result<usize, IniError> {
        Ok(self.lock()?.len())
    }

    /// Number of pairs in `section`.
    pub fn pair_count(&self, section: &str) -> Result<usize, IniError> {
        let guard = self.lock()?;
        guard
            .get(section)
            .map(Section::len)
            .ok_or_else(|| IniError::SectionNotFound {
                section: section.to_owned(),
            })
    }

    /// Returns `true` if the document holds no section.
    pub fn is_empty(&self) -> Result<bool, IniError> {
        Ok(self.lock()?.is_empty())
    }

    /// Drops every section and pair.
    pub fn clear(&self) -> Result<(), IniError> {
        *self.lock()? = Table::new();
        debug!("document cleared");
        Ok(())
    }

    /// Writes a human-readable listing to `out`.
    ///
    /// The global section is labelled `[Global]`; pairs are indented as
    /// `  key = value`. This is a debugging aid, not the canonical file
    /// format; use `save` for that.
    ///
    /// # Errors
    ///
    /// [`IniError::Print`] when the stream rejects a write.
    pub fn dump<W: Write>(&self, out: &mut W) -> Result<(), IniError> {
        let guard = self.lock()?;
        for (name, section) in guard.iter() {
            let label = if name.is_empty() { "Global" } else { name };
            writeln!(out, "[{label}]").map_err(|source| IniError::Print { source })?;
            for (key, value) in section.iter() {
                writeln!(out, "  {key} = {value}").map_err(|source| IniError::Print { source })?;
            }
            writeln!(out).map_err(|source| IniError::Print { source })?;
        }
        Ok(())
    }
}

impl Clone for Document {
    /// Deep copy: rebuilds every (section, key, value) triple into a fresh
    /// document with its own lock. Inner stores are never aliased between
    /// documents.
    fn clone(&self) -> Self {
        let guard = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut sections: Table<Section> = Table::new();
        for (name, section) in guard.iter() {
            let fresh = sections.get_or_insert_with(name, Section::new);
            for (key, value) in section.iter() {
                fresh.set(key, value);
            }
        }
        Self {
            inner: Mutex::new(sections),
        }
    }
}

impl PartialEq for Document {
    /// Order-insensitive equality: same section names, same key/value sets
    /// per section.
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        let (a, b) = match (self.lock(), other.lock()) {
            (Ok(a), Ok(b)) => (a, b),
            _ => return false,
        };
        if a.len() != b.len() {
            return false;
        }
        // Bound to a local so the iterator borrowing `a` is dropped before
        // the guards are.
        let equal = a.iter().all(|(name, section)| match b.get(name) {
            None => false,
            Some(other_section) => {
                section.len() == other_section.len()
                    && section
                        .iter()
                        .all(|(k, v)| other_section.get(k) == Some(v))
            }
        });
        equal
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
