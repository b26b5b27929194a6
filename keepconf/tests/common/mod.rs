//! Common test utilities for integration tests.
//!
//! This module provides a sample schema and a fixture builder that writes
//! configuration files into a temporary directory.

use std::fs;
use std::path::{Path, PathBuf};

use keepconf::DefaultSchema;
use serde_json::{json, Value};
use tempfile::TempDir;

/// The schema most integration tests load against.
///
/// Keys, in order: `host`, `port`, `timeout` (alias `t`), `debug`, `tags`.
#[allow(dead_code)]
pub fn sample_schema() -> DefaultSchema {
    DefaultSchema::builder()
        .entry("host", "localhost")
        .entry("port", 8080)
        .entry_with_alias("timeout", 30, "t")
        .entry("debug", false)
        .entry("tags", json!([]))
        .build()
        .expect("sample schema should be valid")
}

/// Builder for configuration files on disk.
///
/// # Examples
///
/// ```no_run
/// # use common::ConfigFixture;
/// let fixture = ConfigFixture::new().with_json(serde_json::json!({"port": 1}));
/// let path = fixture.path();
/// ```
pub struct ConfigFixture {
    dir: TempDir,
    file_name: String,
    contents: Option<String>,
}

#[allow(dead_code)]
impl ConfigFixture {
    /// Creates a fixture with no file written yet.
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("should create temp dir"),
            file_name: "config.json".to_string(),
            contents: None,
        }
    }

    /// Sets the file name inside the temporary directory.
    pub fn with_file_name(mut self, name: &str) -> Self {
        self.file_name = name.to_string();
        self
    }

    /// Writes `value` as compact JSON.
    pub fn with_json(self, value: Value) -> Self {
        let contents = value.to_string();
        self.with_raw(&contents)
    }

    /// Writes `contents` verbatim.
    pub fn with_raw(mut self, contents: &str) -> Self {
        self.contents = Some(contents.to_string());
        fs::write(self.path(), contents).expect("should write fixture");
        self
    }

    /// Path of the configuration file (which may not exist).
    pub fn path(&self) -> PathBuf {
        self.dir.path().join(&self.file_name)
    }

    /// The temporary directory holding the file.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// What is on disk now, parsed.
    pub fn read_json(&self) -> Value {
        let contents = fs::read_to_string(self.path()).expect("should read fixture");
        serde_json::from_str(&contents).expect("fixture should hold JSON")
    }

    /// What is on disk now, verbatim.
    pub fn read_raw(&self) -> String {
        fs::read_to_string(self.path()).expect("should read fixture")
    }

    /// The contents the fixture was created with.
    pub fn initial_contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Default for ConfigFixture {
    fn default() -> Self {
        Self::new()
    }
}
