//! The loaded configuration object.

use crate::config::alias::AliasTable;
use crate::config::extensions::Extensions;
use crate::error::{Error, Result};
use crate::json_file;
use crate::repair::{Issue, RepairReport};
use crate::schema::{validate_name, DefaultSchema, ValueKind};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// A validated configuration with named access to its entries.
///
/// Entries are read and written by name with [`get`](Self::get) and
/// [`set`](Self::set). Names may be aliases, which resolve to the same
/// entry. Variables that are not part of the file can be attached with
/// [`register`](Self::register); they are kept in memory only.
///
/// # Examples
///
/// ```
/// use keepconf::{Config, DefaultSchema};
/// use serde_json::json;
///
/// let schema = DefaultSchema::builder().entry("timeout", 30).build().unwrap();
/// let mut config = Config::new(schema);
///
/// config.alias("t", "timeout").unwrap();
/// config.set("t", 45).unwrap();
/// assert_eq!(config.get("timeout"), Some(&json!(45)));
///
/// config.register("session_id", "abc").unwrap();
/// assert_eq!(config.get_as::<String>("session_id").unwrap(), "abc");
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    schema: DefaultSchema,
    store: Map<String, Value>,
    aliases: AliasTable,
    extensions: Extensions,
    path: Option<PathBuf>,
    dirty: bool,
    report: RepairReport,
}

impl Config {
    /// An in-memory configuration holding the schema defaults.
    ///
    /// It has no backing file until [`save_as`](Self::save_as) is called.
    #[must_use]
    pub fn new(schema: DefaultSchema) -> Self {
        let store = schema.defaults();
        Self::from_parts(schema, store, None, false, RepairReport::default())
    }

    pub(crate) fn from_parts(
        schema: DefaultSchema,
        store: Map<String, Value>,
        path: Option<PathBuf>,
        dirty: bool,
        mut report: RepairReport,
    ) -> Self {
        let mut aliases = AliasTable::default();
        for entry in schema.entries() {
            let Some(alias) = entry.alias() else {
                continue;
            };
            // A kept file entry owns its name.
            if store.contains_key(alias) {
                report.push(Issue::ShadowedAlias {
                    alias: alias.to_string(),
                    key: entry.key().to_string(),
                });
                continue;
            }
            aliases.insert(alias, entry.key());
        }

        Self {
            schema,
            store,
            aliases,
            extensions: Extensions::default(),
            path,
            dirty,
            report,
        }
    }

    /// The value for `name`, following aliases.
    ///
    /// File entries take precedence over runtime variables.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        let name = self.aliases.resolve(name);
        self.store.get(name).or_else(|| self.extensions.get(name))
    }

    /// Deserialize the value for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownKey`] if `name` does not resolve, or
    /// [`Error::Conversion`] if the value does not fit `T`.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let value = self.get(name).ok_or_else(|| Error::UnknownKey {
            name: name.to_string(),
        })?;
        T::deserialize(value).map_err(|source| Error::Conversion {
            name: name.to_string(),
            source,
        })
    }

    /// Whether `name` resolves to a file entry or runtime variable.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The canonical name `name` refers to.
    #[must_use]
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.resolve(name)
    }

    /// Replace the value for `name`, following aliases.
    ///
    /// Changing a file entry marks the configuration dirty. Runtime
    /// variables are updated without affecting the dirty flag.
    ///
    /// # Errors
    ///
    /// - [`Error::TypeMismatch`] if `value` is not compatible with the
    ///   schema default for the entry
    /// - [`Error::UnknownKey`] if `name` does not resolve; use
    ///   [`register`](Self::register) to add new variables
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let canonical = self.aliases.resolve(name).to_string();

        if let Some(entry) = self.schema.get(&canonical) {
            let found = ValueKind::of(&value);
            if !entry.kind().accepts(found) {
                return Err(Error::TypeMismatch {
                    key: canonical,
                    expected: entry.kind(),
                    found,
                });
            }
        }

        if let Some(slot) = self.store.get_mut(&canonical) {
            if *slot != value {
                *slot = value;
                self.dirty = true;
            }
            return Ok(());
        }

        if let Some(slot) = self.extensions.get_mut(&canonical) {
            *slot = value;
            return Ok(());
        }

        Err(Error::UnknownKey {
            name: name.to_string(),
        })
    }

    /// Attach a runtime variable that is not part of the file.
    ///
    /// Registering an existing variable replaces its value.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if `name` is empty
    /// - [`Error::NameConflict`] if `name` is a file entry or an alias
    pub fn register(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let name = name.into();
        self.check_registrable(&name)?;

        log::debug!("Registered runtime variable '{name}'");
        self.extensions.insert(name, value);
        Ok(())
    }

    /// Serialize `value` and attach it as a runtime variable.
    ///
    /// # Errors
    ///
    /// Fails like [`register`](Self::register), and with
    /// [`Error::Conversion`] if `value` cannot be represented as JSON.
    ///
    /// # Examples
    ///
    /// ```
    /// use keepconf::{Config, DefaultSchema};
    /// use serde::{Deserialize, Serialize};
    ///
    /// #[derive(Serialize, Deserialize, PartialEq, Debug)]
    /// struct Session {
    ///     user: String,
    /// }
    ///
    /// let mut config = Config::new(DefaultSchema::default());
    /// config.register_as("session", &Session { user: "ada".into() }).unwrap();
    ///
    /// let session: Session = config.get_as("session").unwrap();
    /// assert_eq!(session.user, "ada");
    /// ```
    pub fn register_as<T: Serialize>(&mut self, name: impl Into<String>, value: &T) -> Result<()> {
        let name = name.into();
        self.check_registrable(&name)?;

        log::debug!("Registered runtime variable '{name}'");
        self.extensions.insert_as(name, value)
    }

    /// Remove a runtime variable, following aliases, and drop every alias
    /// that pointed at it. Returns the removed value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownKey`] if `name` does not resolve to a runtime
    /// variable. File entries cannot be removed.
    pub fn unregister(&mut self, name: &str) -> Result<Value> {
        let canonical = self.aliases.resolve(name).to_string();
        let value = self
            .extensions
            .remove(&canonical)
            .ok_or_else(|| Error::UnknownKey {
                name: name.to_string(),
            })?;

        let dropped = self.aliases.remove_targeting(&canonical);
        log::debug!("Unregistered runtime variable '{canonical}' and {dropped} alias(es)");
        Ok(value)
    }

    fn check_registrable(&self, name: &str) -> Result<()> {
        validate_name("name", name)?;
        match self.binding_of(name).filter(|_| !self.extensions.contains(name)) {
            Some(reason) => Err(Error::NameConflict {
                name: name.to_string(),
                reason,
            }),
            None => Ok(()),
        }
    }

    /// Make `name` refer to the same entry as `target`.
    ///
    /// `target` may be a file entry, a runtime variable, or another alias.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if `name` is empty
    /// - [`Error::NameConflict`] if `name` is already bound
    /// - [`Error::UnknownKey`] if `target` does not resolve
    pub fn alias(&mut self, name: impl Into<String>, target: &str) -> Result<()> {
        let name = name.into();
        validate_name("alias", &name)?;

        if let Some(reason) = self.binding_of(&name) {
            return Err(Error::NameConflict { name, reason });
        }
        if !self.contains(target) {
            return Err(Error::UnknownKey {
                name: target.to_string(),
            });
        }

        let canonical = self.aliases.insert(name.as_str(), target);
        log::debug!("Aliased '{name}' to '{canonical}'");
        Ok(())
    }

    /// What `name` is currently bound to, if anything.
    fn binding_of(&self, name: &str) -> Option<String> {
        if self.aliases.contains(name) {
            Some(format!("alias of '{}'", self.aliases.resolve(name)))
        } else if self.store.contains_key(name) {
            Some("configuration entry".into())
        } else if self.extensions.contains(name) {
            Some("runtime variable".into())
        } else {
            None
        }
    }

    /// Write the file entries back to the file they were loaded from.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoPath`] if the configuration has no backing file,
    /// or [`Error::Io`] if writing fails.
    pub fn save(&mut self) -> Result<()> {
        let path = self.path.clone().ok_or(Error::NoPath)?;
        self.write(&path)
    }

    /// Write the file entries to `path` and make it the backing file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if writing fails.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref().to_path_buf();
        self.write(&path)?;
        self.path = Some(path);
        Ok(())
    }

    /// Save only if the in-memory state diverges from the file.
    ///
    /// Returns whether the file was written.
    ///
    /// # Errors
    ///
    /// See [`save`](Self::save).
    pub fn save_if_dirty(&mut self) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    fn write(&mut self, path: &Path) -> Result<()> {
        json_file::write_map(path, &self.store)?;
        self.dirty = false;
        log::info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Convert the file entries into a struct with named fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conversion`] if the entries do not fit `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use keepconf::{Config, DefaultSchema};
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Settings {
    ///     host: String,
    ///     timeout: u64,
    /// }
    ///
    /// let schema = DefaultSchema::builder()
    ///     .entry("host", "localhost")
    ///     .entry("timeout", 30)
    ///     .build()
    ///     .unwrap();
    /// let settings: Settings = Config::new(schema).deserialize().unwrap();
    /// assert_eq!(settings.host, "localhost");
    /// assert_eq!(settings.timeout, 30);
    /// ```
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.store.clone())).map_err(|source| {
            Error::Conversion {
                name: "*".into(),
                source,
            }
        })
    }

    /// The backing file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether the in-memory entries differ from the backing file.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// What was found and repaired while loading.
    #[must_use]
    pub fn report(&self) -> &RepairReport {
        &self.report
    }

    /// The schema this configuration was checked against.
    #[must_use]
    pub fn schema(&self) -> &DefaultSchema {
        &self.schema
    }

    /// File entry names in file order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.store.keys().map(String::as_str)
    }

    /// The file entries.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.store
    }

    /// Consume the configuration, returning the file entries.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.store
    }

    /// The alias table.
    #[must_use]
    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// The runtime variables.
    #[must_use]
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }
}
