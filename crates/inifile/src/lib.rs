//! # inifile
//!
//! INI configuration files: validate, load, query with typed access, save,
//! and rewrite a single section in place without disturbing the rest of the
//! file.
//!
//! # Architecture overview (for beginners)
//!
//! An INI file is a plain-text list of `key=value` pairs grouped under
//! `[section]` headers, with `;` or `#` comments. This crate models one file
//! as a [`Document`]: a thread-safe, hash-indexed map from section names to
//! key/value pairs. Pairs that appear before the first header belong to the
//! *global* section, addressed by the empty name `""`.
//!
//! The crate is split into:
//!
//! - **`codec`** – How bytes on disk become a document and back.  One line
//!   classifier defines the grammar; [`validate`] checks a file without
//!   building anything, [`Document::load`] parses and atomically publishes,
//!   [`Document::save`] writes the canonical form, and
//!   [`Document::save_section`] rewrites one section while copying every
//!   other byte verbatim.
//!
//! - **`document`** – The in-memory model and the typed access layer
//!   ([`IniValue`]) that parses stored strings as integers, floats, and
//!   booleans.
//!
//! - **`probe`** – Filesystem classification (missing, empty, directory,
//!   permissions, UTF-8 BOM) that runs before the parser touches a file, so
//!   failures are precise.
//!
//! - **`store`** – The FNV-1a open-addressed hash table both map levels are
//!   built on.
//!
//! - **`error` / `status`** – A payload-carrying error enum for Rust
//!   callers, and a flat stable integer code surface ([`Status`]) for
//!   bindings and logs.
//!
//! # Example
//!
//! ```no_run
//! use inifile::Document;
//!
//! fn main() -> Result<(), inifile::IniError> {
//!     let doc = Document::new();
//!     doc.load("settings.ini")?;
//!
//!     let host = doc.get("database", "host")?;
//!     let port = doc.get_or_int("database", "port", 5432)?;
//!     println!("connecting to {host}:{port}");
//!
//!     doc.set_int("database", "port", 5433)?;
//!     // Rewrite only [database], leaving comments elsewhere untouched.
//!     doc.save_section("settings.ini", "database", Some("port"))?;
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod document;
pub mod error;
pub mod probe;
pub mod status;
pub mod store;

// Re-export the most-used types at the crate root so callers can write
// `inifile::Document` instead of `inifile::document::Document`.
pub use codec::{classify, needs_quotes, validate, Line, MAX_LINE_BYTES};
pub use document::typed::IniValue;
pub use document::{Document, Section};
pub use error::{IniError, SyntaxErrorKind};
pub use probe::{check, permissions, size, utf8_bom, FilePermissions, FileStatus, UTF8_BOM};
pub use status::Status;
