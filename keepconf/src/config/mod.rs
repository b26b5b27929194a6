//! Configuration objects and loading.
//!
//! This module ties the pieces together:
//! - [`ConfigLoader`] reads a file, applies the [`crate::Policy`], and
//!   repairs the data against a [`crate::DefaultSchema`]
//! - [`Config`] exposes the result by name, with aliases and runtime
//!   variables, and writes it back
//!
//! # Examples
//!
//! ```
//! use keepconf::{load, DefaultSchema};
//! use serde_json::json;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("app.json");
//! std::fs::write(&path, r#"{"host": "example.org"}"#).unwrap();
//!
//! let schema = DefaultSchema::builder()
//!     .entry("host", "localhost")
//!     .entry("timeout", 30)
//!     .build()
//!     .unwrap();
//!
//! let mut config = load(&path, schema).unwrap();
//! assert_eq!(config.get("timeout"), Some(&json!(30)));
//! assert!(config.is_dirty());
//!
//! config.save().unwrap();
//! assert!(!config.is_dirty());
//! ```

mod alias;
mod extensions;
mod loader;
mod object;

pub use alias::AliasTable;
pub use extensions::Extensions;
pub use loader::{default_config_path, load, ConfigLoader, DEFAULT_FILE_NAME, PATH_ENV_VAR};
pub use object::Config;
