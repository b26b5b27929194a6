//! JSON file reading and writing.
//!
//! Thin wrappers around `serde_json` that turn a file into an ordered map
//! and back. Key order is kept exactly as read or as held in the map.

use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Read a file holding a top-level JSON object.
///
/// # Errors
///
/// - [`Error::NotFound`] if the file does not exist
/// - [`Error::Io`] if it cannot be read
/// - [`Error::Parse`] if it is not valid UTF-8 JSON or the top level is
///   not an object
pub fn read_map(path: &Path) -> Result<Map<String, Value>> {
    let contents = fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::NotFound {
            path: path.to_path_buf(),
        },
        _ => Error::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    parse_map(path, &contents)
}

/// Parse file contents as a top-level JSON object.
///
/// `path` is only used for error reporting.
///
/// # Errors
///
/// Returns [`Error::Parse`] if `contents` is not a JSON object. Invalid
/// UTF-8 is a parse error too.
pub fn parse_map(path: &Path, contents: impl AsRef<[u8]>) -> Result<Map<String, Value>> {
    serde_json::from_slice(contents.as_ref()).map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write a map to `path` as pretty-printed JSON.
///
/// Missing parent directories are created. Output uses two-space
/// indentation, keeps non-ASCII text verbatim and ends with a newline.
///
/// # Errors
///
/// Returns [`Error::Io`] if the directory or file cannot be written.
pub fn write_map(path: &Path, map: &Map<String, Value>) -> Result<()> {
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut contents = serde_json::to_string_pretty(map).map_err(|source| Error::Conversion {
        name: "*".into(),
        source,
    })?;
    contents.push('\n');

    let mut file = fs::File::create(path).map_err(io_err)?;
    file.write_all(contents.as_bytes()).map_err(io_err)?;
    file.sync_all().map_err(io_err)?;

    log::debug!("Wrote {} keys to {}", map.len(), path.display());
    Ok(())
}
