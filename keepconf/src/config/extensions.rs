//! Runtime variables attached to a configuration.
//!
//! Extensions hold values that are not part of the schema. They live only
//! in memory and are never written to the configuration file.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Typed key-value table for runtime-registered variables.
///
/// # Examples
///
/// ```
/// use keepconf::config::Extensions;
///
/// let mut ext = Extensions::default();
/// ext.insert_as("retries", &3u32).unwrap();
///
/// let retries: u32 = ext.get_as("retries").unwrap();
/// assert_eq!(retries, 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extensions {
    values: BTreeMap<String, Value>,
}

impl Extensions {
    /// Insert or replace a value, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    /// Serialize `value` and insert it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conversion`] if `value` cannot be represented as JSON.
    pub fn insert_as<T: Serialize>(&mut self, name: impl Into<String>, value: &T) -> Result<()> {
        let name = name.into();
        let value = serde_json::to_value(value).map_err(|source| Error::Conversion {
            name: name.clone(),
            source,
        })?;
        self.values.insert(name, value);
        Ok(())
    }

    /// The value stored under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Mutable access to the value stored under `name`.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.values.get_mut(name)
    }

    /// Deserialize the value stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownKey`] if nothing is stored under `name`, or
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

    /// Remove and return the value stored under `name`.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    /// Whether a value is stored under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no variables are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Session {
        user: String,
        level: u8,
    }

    #[test]
    fn test_insert_replaces() {
        let mut ext = Extensions::default();
        assert_eq!(ext.insert("mode", "fast"), None);
        assert_eq!(ext.insert("mode", "slow"), Some(json!("fast")));
        assert_eq!(ext.get("mode"), Some(&json!("slow")));
        assert_eq!(ext.len(), 1);
    }

    #[test]
    fn test_typed_round_trip() {
        let mut ext = Extensions::default();
        let session = Session {
            user: "ada".into(),
            level: 3,
        };
        ext.insert_as("session", &session).unwrap();
        assert_eq!(ext.get_as::<Session>("session").unwrap(), session);
    }

    #[test]
    fn test_get_as_errors() {
        let mut ext = Extensions::default();
        ext.insert("level", "high");

        assert!(matches!(ext.get_as::<u8>("absent"), Err(Error::UnknownKey { .. })));
        assert!(matches!(ext.get_as::<u8>("level"), Err(Error::Conversion { .. })));
    }

    #[test]
    fn test_remove() {
        let mut ext = Extensions::default();
        ext.insert("a", 1);
        assert_eq!(ext.remove("a"), Some(json!(1)));
        assert!(!ext.contains("a"));
        assert!(ext.is_empty());
    }
}
