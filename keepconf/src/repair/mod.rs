//! Schema checking and repair of loaded configuration data.
//!
//! The [`Repairer`] compares a loaded map against a [`DefaultSchema`] and
//! fixes what it finds according to a [`Policy`]:
//!
//! 1. missing keys are filled from the defaults,
//! 2. unknown keys are removed or kept,
//! 3. a complete key set is put back into schema order,
//! 4. values whose kind does not match their default are coerced or reset.
//!
//! Each finding is recorded as an [`Issue`] in the returned
//! [`RepairReport`]. Repair is idempotent: feeding the repaired map back in
//! reports no change.
//!
//! # Examples
//!
//! ```
//! use keepconf::{DefaultSchema, Policy};
//! use keepconf::repair::Repairer;
//! use serde_json::json;
//! use std::path::Path;
//!
//! let schema = DefaultSchema::from_value(json!({"host": "localhost", "timeout": 30})).unwrap();
//! let policy = Policy::default();
//! let loaded = json!({"timeout": "45", "legacy": true});
//!
//! let repaired = Repairer::new(&schema, &policy, Path::new("app.json"))
//!     .repair(loaded.as_object().unwrap().clone())
//!     .unwrap();
//!
//! assert!(repaired.dirty);
//! assert_eq!(serde_json::Value::Object(repaired.data), json!({"host": "localhost", "timeout": 45}));
//! ```

mod coerce;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

pub use coerce::coerce;

use crate::error::{Error, Result};
use crate::policy::{
    DisorderedKeysAction, ExtraKeyAction, MissingKeyAction, Policy, TypeMismatchAction,
};
use crate::schema::{DefaultSchema, ValueKind};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;

/// One deviation found while loading a configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    /// The file did not exist.
    NotFound,
    /// The file was not a valid JSON object; holds the parser message.
    Syntax(String),
    /// Schema keys were absent, in schema order.
    MissingKeys(Vec<String>),
    /// Keys unknown to the schema were present, in file order.
    ExtraKeys(Vec<String>),
    /// All keys were present but not in schema order.
    DisorderedKeys,
    /// A value did not have the kind of its default.
    TypeMismatch {
        /// The key holding the value.
        key: String,
        /// The kind of the default.
        expected: ValueKind,
        /// The kind that was found.
        found: ValueKind,
        /// Whether the value was converted rather than reset to its default.
        coerced: bool,
    },
    /// A schema alias was not installed because a kept file entry has the
    /// same name.
    ShadowedAlias {
        /// The alias declared in the schema.
        alias: String,
        /// The schema key it would have pointed at.
        key: String,
    },
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "file not found"),
            Self::Syntax(message) => write!(f, "syntax error: {message}"),
            Self::MissingKeys(keys) => write!(f, "missing keys: {}", keys.join(", ")),
            Self::ExtraKeys(keys) => write!(f, "extra keys: {}", keys.join(", ")),
            Self::DisorderedKeys => write!(f, "keys out of order"),
            Self::TypeMismatch {
                key,
                expected,
                found,
                coerced,
            } => {
                let outcome = if *coerced { "coerced" } else { "reset to default" };
                write!(f, "'{key}' expected {expected}, found {found} ({outcome})")
            }
            Self::ShadowedAlias { alias, key } => {
                write!(f, "alias '{alias}' for '{key}' is shadowed by a file entry")
            }
        }
    }
}

/// Everything found while loading one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    issues: Vec<Issue>,
}

impl RepairReport {
    /// Record an issue.
    pub fn push(&mut self, issue: Issue) {
        log::warn!("{issue}");
        self.issues.push(issue);
    }

    /// Issues in the order they were found.
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Whether nothing was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Whether the file was missing.
    #[must_use]
    pub fn not_found(&self) -> bool {
        self.issues.iter().any(|i| matches!(i, Issue::NotFound))
    }

    /// Whether the file failed to parse.
    #[must_use]
    pub fn syntax_error(&self) -> bool {
        self.issues.iter().any(|i| matches!(i, Issue::Syntax(_)))
    }

    /// Keys that were missing, if any.
    #[must_use]
    pub fn missing_keys(&self) -> &[String] {
        self.issues
            .iter()
            .find_map(|i| match i {
                Issue::MissingKeys(keys) => Some(keys.as_slice()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Keys unknown to the schema, if any.
    #[must_use]
    pub fn extra_keys(&self) -> &[String] {
        self.issues
            .iter()
            .find_map(|i| match i {
                Issue::ExtraKeys(keys) => Some(keys.as_slice()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Keys whose values had the wrong kind.
    pub fn mismatched_keys(&self) -> impl Iterator<Item = &str> {
        self.issues.iter().filter_map(|i| match i {
            Issue::TypeMismatch { key, .. } => Some(key.as_str()),
            _ => None,
        })
    }
}

/// Output of [`Repairer::repair`].
#[derive(Debug, Clone, PartialEq)]
pub struct Repaired {
    /// The repaired data.
    pub data: Map<String, Value>,
    /// Whether `data` differs from what was loaded.
    pub dirty: bool,
    /// What was found.
    pub report: RepairReport,
}

/// Checks loaded data against a schema and repairs it per policy.
pub struct Repairer<'a> {
    schema: &'a DefaultSchema,
    policy: &'a Policy,
    path: &'a Path,
}

impl<'a> Repairer<'a> {
    /// Create a repairer. `path` names the source in errors.
    #[must_use]
    pub fn new(schema: &'a DefaultSchema, policy: &'a Policy, path: &'a Path) -> Self {
        Self {
            schema,
            policy,
            path,
        }
    }

    /// Check and repair `data`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingKeys`], [`Error::ExtraKeys`],
    /// [`Error::DisorderedKeys`] or [`Error::TypeMismatch`] when the policy
    /// for the corresponding situation is `raise`.
    pub fn repair(&self, data: Map<String, Value>) -> Result<Repaired> {
        self.repair_with(data, RepairReport::default())
    }

    /// Like [`repair`](Self::repair), appending findings to an existing
    /// report.
    ///
    /// # Errors
    ///
    /// See [`repair`](Self::repair).
    pub fn repair_with(
        &self,
        mut data: Map<String, Value>,
        mut report: RepairReport,
    ) -> Result<Repaired> {
        let mut dirty = false;
        let mut reset = false;

        let missing: Vec<String> = self
            .schema
            .keys()
            .filter(|key| !data.contains_key(*key))
            .map(String::from)
            .collect();
        let extra: Vec<String> = data
            .keys()
            .filter(|key| !self.schema.contains_key(key))
            .cloned()
            .collect();

        if !missing.is_empty() {
            report.push(Issue::MissingKeys(missing.clone()));
            match self.policy.on_missing_key {
                MissingKeyAction::Raise => {
                    return Err(Error::MissingKeys {
                        path: self.path.to_path_buf(),
                        keys: missing,
                    })
                }
                MissingKeyAction::UseDefault => {
                    for key in &missing {
                        if let Some(default) = self.schema.default_of(key) {
                            data.insert(key.clone(), default.clone());
                        }
                    }
                }
                MissingKeyAction::UseDefaultSorted => {
                    let mut sorted = self.schema.defaults();
                    sorted.extend(data);
                    data = sorted;
                }
                MissingKeyAction::Reset => {
                    data = self.schema.defaults();
                    reset = true;
                }
            }
            dirty = true;
        }

        if !extra.is_empty() {
            report.push(Issue::ExtraKeys(extra.clone()));
            if !reset {
                match self.policy.on_extra_key {
                    ExtraKeyAction::Raise => {
                        return Err(Error::ExtraKeys {
                            path: self.path.to_path_buf(),
                            keys: extra,
                        })
                    }
                    ExtraKeyAction::Delete => {
                        data.retain(|key, _| self.schema.contains_key(key));
                        dirty = true;
                    }
                    ExtraKeyAction::DeleteSorted => {
                        data = self.in_schema_order(data);
                        dirty = true;
                    }
                    ExtraKeyAction::Reset => {
                        data = self.schema.defaults();
                        reset = true;
                        dirty = true;
                    }
                    ExtraKeyAction::Keep => {}
                }
            }
        }

        // Order is only judged once the key set matches the schema exactly.
        let complete = data.len() == self.schema.len();
        if complete && !data.keys().map(String::as_str).eq(self.schema.keys()) {
            report.push(Issue::DisorderedKeys);
            match self.policy.on_disordered_keys {
                DisorderedKeysAction::Raise => {
                    return Err(Error::DisorderedKeys {
                        path: self.path.to_path_buf(),
                    })
                }
                DisorderedKeysAction::Sort => {
                    data = self.in_schema_order(data);
                    dirty = true;
                }
                DisorderedKeysAction::Keep => {}
            }
        }

        if !reset {
            dirty |= self.repair_types(&mut data, &mut report)?;
        }

        Ok(Repaired {
            data,
            dirty,
            report,
        })
    }

    fn repair_types(&self, data: &mut Map<String, Value>, report: &mut RepairReport) -> Result<bool> {
        let mut changed = false;

        for entry in self.schema.entries() {
            let Some(value) = data.get_mut(entry.key()) else {
                continue;
            };
            let expected = entry.kind();
            let found = ValueKind::of(value);
            if expected.accepts(found) {
                continue;
            }

            let coerced = match self.policy.on_type_mismatch {
                TypeMismatchAction::Raise => {
                    return Err(Error::TypeMismatch {
                        key: entry.key().to_string(),
                        expected,
                        found,
                    })
                }
                TypeMismatchAction::Coerce => match coerce(value, expected) {
                    Some(converted) => {
                        *value = converted;
                        true
                    }
                    None => {
                        value.clone_from(entry.default_value());
                        false
                    }
                },
                TypeMismatchAction::Default => {
                    value.clone_from(entry.default_value());
                    false
                }
            };

            report.push(Issue::TypeMismatch {
                key: entry.key().to_string(),
                expected,
                found,
                coerced,
            });
            changed = true;
        }

        Ok(changed)
    }

    /// Schema keys in schema order; anything else is dropped.
    fn in_schema_order(&self, mut data: Map<String, Value>) -> Map<String, Value> {
        self.schema
            .keys()
            .filter_map(|key| data.remove(key).map(|value| (key.to_string(), value)))
            .collect()
    }
}
