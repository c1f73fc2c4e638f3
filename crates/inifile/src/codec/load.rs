//! File → document: parse and atomically publish.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::debug;

use crate::codec::{self, Line};
use crate::document::{Document, Section};
use crate::error::IniError;
use crate::probe;
use crate::store::Table;

impl Document {
    /// Parses the file at `path` and replaces this document's contents with
    /// the result.
    ///
    /// The parse builds into a scratch table and is published in a single
    /// swap: on any error the document keeps its previous contents, and
    /// concurrent readers never observe a half-loaded state.
    ///
    /// Duplicate keys within a section keep the last occurrence. A repeated
    /// section header reopens the existing section. Pairs before the first
    /// header land in the global section (the empty name), which is only
    /// created once such a pair exists.
    ///
    /// # Errors
    ///
    /// The same errors as [`crate::codec::validate`].
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<(), IniError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(IniError::InvalidArgument("path must not be empty"));
        }
        probe::gate(path)?;
        let file = File::open(path).map_err(|source| IniError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut sections: Table<Section> = Table::new();
        let mut current = String::new();
        codec::scan(BufReader::new(file), path, |_, line| {
            match line {
                Line::Blank => {}
                Line::Header { name } => {
                    current = name.to_owned();
                    // A header alone creates its section.
                    sections.get_or_insert_with(&current, Section::new);
                }
                Line::Pair { key, value } => {
                    sections
                        .get_or_insert_with(&current, Section::new)
                        .set(key, value);
                }
            }
            Ok(())
        })?;

        let section_count = sections.len();
        self.replace_contents(sections)?;
        debug!(path = %path.display(), sections = section_count, "document loaded");
        Ok(())
    }
}
