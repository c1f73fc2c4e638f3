//! Standalone grammar check, no document mutation.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::debug;

use crate::codec;
use crate::error::IniError;
use crate::probe;

/// Checks that the file at `path` conforms to the INI grammar.
///
/// Runs the same scanner as [`crate::Document::load`], so validation
/// succeeding guarantees a subsequent load of the unchanged file will parse.
/// Pairs before the first section header are accepted (they belong to the
/// global section). Nothing is built or stored.
///
/// # Errors
///
/// Filesystem-shape errors from the probe (missing, empty, directory,
/// permission), [`IniError::Open`] / [`IniError::Io`] on I/O failure, and
/// [`IniError::Syntax`] with the 1-based line number of the first violation.
pub fn validate<P: AsRef<Path>>(path: P) -> Result<(), IniError> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(IniError::InvalidArgument("path must not be empty"));
    }
    probe::gate(path)?;
    let file = File::open(path).map_err(|source| IniError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    codec::scan(BufReader::new(file), path, |_, _| Ok(()))?;
    debug!(path = %path.display(), "file validated");
    Ok(())
}
