//! Error types for the keepconf library.
//!
//! Every fallible operation returns [`Result`], whose error type groups
//! into the three failure classes reported by [`Error::kind`]: I/O,
//! parsing, and validation.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a keepconf error.
///
/// # Examples
///
/// ```
/// use keepconf::{Error, Result};
///
/// fn timeout() -> Result<u64> {
///     Ok(30)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the keepconf library.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration file does not exist.
    #[error("configuration file not found: {}", path.display())]
    NotFound {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// Reading or writing the configuration file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file content is not a JSON object.
    #[error("invalid JSON in {}: {source}", path.display())]
    Parse {
        /// The file being parsed.
        path: PathBuf,
        /// The underlying parser error.
        #[source]
        source: serde_json::Error,
    },

    /// Schema keys are absent from the loaded data.
    #[error("missing keys in {}: {}", path.display(), keys.join(", "))]
    MissingKeys {
        /// The file that was loaded.
        path: PathBuf,
        /// The absent keys, in schema order.
        keys: Vec<String>,
    },

    /// The loaded data holds keys the schema does not know.
    #[error("extra keys in {}: {}", path.display(), keys.join(", "))]
    ExtraKeys {
        /// The file that was loaded.
        path: PathBuf,
        /// The unknown keys, in file order.
        keys: Vec<String>,
    },

    /// The keys are complete but not in schema order.
    #[error("keys in {} are not in the same order as the defaults", path.display())]
    DisorderedKeys {
        /// The file that was loaded.
        path: PathBuf,
    },

    /// A value does not have the kind its default has.
    #[error("type mismatch for '{key}': expected {expected}, found {found}")]
    TypeMismatch {
        /// The key holding the value.
        key: String,
        /// The kind of the default value.
        expected: crate::schema::ValueKind,
        /// The kind of the offending value.
        found: crate::schema::ValueKind,
    },

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A name does not refer to any key, alias, or runtime variable.
    #[error("unknown configuration key: {name}")]
    UnknownKey {
        /// The name that failed to resolve.
        name: String,
    },

    /// A name is already taken.
    #[error("name '{name}' is already in use: {reason}")]
    NameConflict {
        /// The contested name.
        name: String,
        /// What the name is already bound to.
        reason: String,
    },

    /// An unknown situation or action was given to [`crate::Policy::set`].
    #[error("invalid policy: {message}")]
    InvalidPolicy {
        /// A description of the problem.
        message: String,
    },

    /// `save` was called on a configuration that has no backing file.
    #[error("configuration has no file path; use save_as")]
    NoPath,

    /// Converting configuration values to or from Rust types failed.
    #[error("cannot convert '{name}': {source}")]
    Conversion {
        /// The key, or `*` for the whole store.
        name: String,
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The file is missing, unreadable, or unwritable.
    Io,
    /// The file is not valid JSON.
    Parse,
    /// The data does not conform to the schema or the API was misused.
    Validation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io => write!(f, "io"),
            Self::Parse => write!(f, "parse"),
            Self::Validation => write!(f, "validation"),
        }
    }
}

impl Error {
    /// Returns the failure class of this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use keepconf::{Error, ErrorKind};
    ///
    /// assert_eq!(Error::NoPath.kind(), ErrorKind::Io);
    /// ```
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } | Self::Io { .. } | Self::NoPath => ErrorKind::Io,
            Self::Parse { .. } => ErrorKind::Parse,
            _ => ErrorKind::Validation,
        }
    }

    /// Check if error indicates the configuration file does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
