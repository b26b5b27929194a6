#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # keepconf
//!
//! A library for loading, validating, repairing and saving JSON
//! configuration files.
//!
//! A file is read into an ordered map, checked against a
//! [`DefaultSchema`] of expected keys and default values, repaired
//! according to a [`Policy`], and exposed through a [`Config`] with named
//! access, aliases, and runtime variables. Changes are written back with
//! [`Config::save`].
//!
//! ## Core Types
//!
//! - [`DefaultSchema`]: expected keys, defaults and aliases
//! - [`Policy`]: what to do about missing files, bad syntax, missing,
//!   extra or disordered keys, and mistyped values
//! - [`Config`] and [`ConfigLoader`]: the loaded configuration and its loader
//! - [`Error`] and [`Result`]: error handling types
//!
//! ## Examples
//!
//! ```
//! use keepconf::{load, DefaultSchema};
//! use serde_json::json;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("settings.json");
//! std::fs::write(&path, r#"{"host": "example.org", "timeout": "45"}"#).unwrap();
//!
//! let schema = DefaultSchema::builder()
//!     .entry("host", "localhost")
//!     .entry_with_alias("timeout", 30, "t")
//!     .entry("debug", false)
//!     .build()
//!     .unwrap();
//!
//! let mut config = load(&path, schema).unwrap();
//! assert_eq!(config.get("t"), Some(&json!(45)));
//! assert_eq!(config.get("debug"), Some(&json!(false)));
//! assert!(config.is_dirty());
//!
//! config.save().unwrap();
//! ```

pub mod config;
pub mod error;
pub mod json_file;
pub mod policy;
pub mod repair;
pub mod schema;

// Re-export key types at crate root for convenience
pub use config::{default_config_path, load, Config, ConfigLoader};
pub use error::{Error, ErrorKind, Result};
pub use policy::Policy;
pub use repair::{Issue, RepairReport};
pub use schema::DefaultSchema;
