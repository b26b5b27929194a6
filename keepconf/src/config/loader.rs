//! Configuration file loading.
//!
//! This module reads a configuration file, applies the [`Policy`] for
//! missing and malformed files, runs the [`Repairer`], and wraps the result
//! in a [`Config`].

use crate::config::object::Config;
use crate::error::{Error, Result};
use crate::json_file;
use crate::policy::{NotFoundAction, ParseErrorAction, Policy};
use crate::repair::{Issue, RepairReport, Repaired, Repairer};
use crate::schema::{validate_name, DefaultSchema};
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable that overrides [`default_config_path`].
pub const PATH_ENV_VAR: &str = "KEEPCONF_PATH";

/// File name used under the per-application directory.
pub const DEFAULT_FILE_NAME: &str = "config.json";

/// Loads configuration files against a schema.
///
/// # Examples
///
/// ```no_run
/// use keepconf::{ConfigLoader, DefaultSchema, Policy};
/// use keepconf::policy::ParseErrorAction;
///
/// let schema = DefaultSchema::builder().entry("timeout", 30).build().unwrap();
/// let config = ConfigLoader::new(schema)
///     .policy(Policy::default().with_parse_error(ParseErrorAction::Raise))
///     .load("settings.json")
///     .unwrap();
///
/// println!("timeout = {}", config.get("timeout").unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    schema: DefaultSchema,
    policy: Policy,
    check: bool,
}

impl ConfigLoader {
    /// A loader using the default policy, with checking enabled.
    #[must_use]
    pub fn new(schema: DefaultSchema) -> Self {
        Self {
            schema,
            policy: Policy::default(),
            check: true,
        }
    }

    /// Use `policy` instead of the default.
    #[must_use]
    pub fn policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    /// Enable or disable schema checking.
    ///
    /// With checking disabled the file is used as loaded; not-found and
    /// parse-error handling still apply.
    #[must_use]
    pub fn check(mut self, check: bool) -> Self {
        self.check = check;
        self
    }

    /// The schema files are checked against.
    #[must_use]
    pub fn schema(&self) -> &DefaultSchema {
        &self.schema
    }

    /// Load and repair the file at `path`.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] / [`Error::Parse`] when the file is missing or
    ///   malformed and the policy says `raise`
    /// - [`Error::Io`] when the file cannot be read, or cannot be created
    ///   under `create`
    /// - schema errors from [`Repairer::repair`] under `raise` policies
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let mut report = RepairReport::default();
        let mut dirty = false;
        let mut create = false;

        log::debug!("Loading configuration from {}", path.display());

        let data = match json_file::read_map(path) {
            Ok(data) => data,
            Err(err @ Error::NotFound { .. }) => {
                report.push(Issue::NotFound);
                match self.policy.on_not_found {
                    NotFoundAction::Raise => return Err(err),
                    NotFoundAction::Create => {
                        create = true;
                        self.schema.defaults()
                    }
                }
            }
            Err(Error::Parse {
                path: parse_path,
                source,
            }) => {
                report.push(Issue::Syntax(source.to_string()));
                match self.policy.on_parse_error {
                    ParseErrorAction::Raise => {
                        return Err(Error::Parse {
                            path: parse_path,
                            source,
                        })
                    }
                    ParseErrorAction::ReturnEmpty => {
                        dirty = true;
                        self.schema.defaults()
                    }
                }
            }
            Err(err) => return Err(err),
        };

        let repaired = if self.check {
            Repairer::new(&self.schema, &self.policy, path).repair_with(data, report)?
        } else {
            Repaired {
                data,
                dirty: false,
                report,
            }
        };
        dirty |= repaired.dirty;

        if create {
            json_file::write_map(path, &repaired.data)?;
            log::info!("Created configuration file {}", path.display());
            dirty = false;
        }

        Ok(Config::from_parts(
            self.schema.clone(),
            repaired.data,
            Some(path.to_path_buf()),
            dirty,
            repaired.report,
        ))
    }

    /// Load the file at [`default_config_path`] for `app`.
    ///
    /// # Errors
    ///
    /// Fails like [`default_config_path`] and [`load`](Self::load).
    pub fn load_default(&self, app: &str) -> Result<Config> {
        self.load(default_config_path(app)?)
    }
}

/// Load `path` against `schema` with the default policy.
///
/// # Errors
///
/// See [`ConfigLoader::load`].
///
/// # Examples
///
/// ```no_run
/// use keepconf::{load, DefaultSchema};
///
/// let schema = DefaultSchema::builder().entry("timeout", 30).build().unwrap();
/// let mut config = load("settings.json", schema).unwrap();
/// config.set("timeout", 60).unwrap();
/// config.save().unwrap();
/// ```
pub fn load(path: impl AsRef<Path>, schema: DefaultSchema) -> Result<Config> {
    ConfigLoader::new(schema).load(path)
}

/// The configuration file used when no path is given.
///
/// Resolution order:
/// 1. `$KEEPCONF_PATH` if set and non-empty
/// 2. `~/.<app>/config.json`
///
/// # Errors
///
/// Returns [`Error::Validation`] if `app` is empty or the home directory
/// cannot be determined.
pub fn default_config_path(app: &str) -> Result<PathBuf> {
    if let Some(path) = env::var_os(PATH_ENV_VAR).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }

    validate_name("app", app)?;
    let home = home::home_dir().ok_or_else(|| Error::Validation {
        field: "home_directory".into(),
        message: "Cannot determine home directory".into(),
    })?;

    Ok(home.join(format!(".{app}")).join(DEFAULT_FILE_NAME))
}
