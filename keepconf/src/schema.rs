//! Default schema definitions.
//!
//! A [`DefaultSchema`] lists the keys a configuration file is expected to
//! hold, the default value of each, and an optional alias. Key order is
//! significant: it is the order keys are written in when a file is sorted.

use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

/// The kind of a JSON value, as far as schema checking is concerned.
///
/// # Examples
///
/// ```
/// use keepconf::schema::ValueKind;
/// use serde_json::json;
///
/// assert_eq!(ValueKind::of(&json!(30)), ValueKind::Integer);
/// assert_eq!(ValueKind::of(&json!(0.5)), ValueKind::Float);
/// assert!(ValueKind::Float.accepts(ValueKind::Integer));
/// assert!(!ValueKind::Integer.accepts(ValueKind::Float));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `null`
    Null,
    /// `true` or `false`
    Bool,
    /// A number without a fractional part that fits `i64` or `u64`.
    Integer,
    /// Any other number.
    Float,
    /// A string.
    String,
    /// An array.
    Array,
    /// An object.
    Object,
}

impl ValueKind {
    /// Classify a JSON value.
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(n) if n.is_i64() || n.is_u64() => Self::Integer,
            Value::Number(_) => Self::Float,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Whether a value of kind `found` is acceptable where a default of
    /// this kind is declared.
    ///
    /// A `null` default accepts anything, and integers widen to floats.
    #[must_use]
    pub fn accepts(self, found: Self) -> bool {
        match (self, found) {
            (Self::Null, _) | (Self::Float, Self::Integer) => true,
            (expected, found) => expected == found,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        };
        f.write_str(name)
    }
}

/// One expected key of a configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaEntry {
    key: String,
    default: Value,
    alias: Option<String>,
}

impl SchemaEntry {
    /// The canonical key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The value used when the key is missing or unrepairable.
    #[must_use]
    pub fn default_value(&self) -> &Value {
        &self.default
    }

    /// The kind every stored value for this key must be compatible with.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        ValueKind::of(&self.default)
    }

    /// The alternate name installed for this key on load, if any.
    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }
}

/// The expected keys of a configuration file and their defaults.
///
/// Immutable once built. Build one with [`DefaultSchema::builder`] or from
/// a JSON object with [`DefaultSchema::from_value`].
///
/// # Examples
///
/// ```
/// use keepconf::DefaultSchema;
///
/// let schema = DefaultSchema::builder()
///     .entry("host", "localhost")
///     .entry_with_alias("timeout", 30, "t")
///     .build()
///     .unwrap();
///
/// assert_eq!(schema.len(), 2);
/// assert_eq!(schema.get("timeout").unwrap().alias(), Some("t"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefaultSchema {
    entries: Vec<SchemaEntry>,
    index: HashMap<String, usize>,
}

impl DefaultSchema {
    /// Start building a schema.
    #[must_use]
    pub fn builder() -> DefaultSchemaBuilder {
        DefaultSchemaBuilder::default()
    }

    /// Build a schema from a JSON object of defaults, keeping its key order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `value` is not an object or a key
    /// is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use keepconf::DefaultSchema;
    /// use serde_json::json;
    ///
    /// let schema = DefaultSchema::from_value(json!({"timeout": 30, "debug": false})).unwrap();
    /// assert_eq!(schema.keys().collect::<Vec<_>>(), ["timeout", "debug"]);
    /// ```
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Self::from_map(map),
            other => Err(Error::Validation {
                field: "defaults".into(),
                message: format!("Defaults must be a JSON object, got {}", ValueKind::of(&other)),
            }),
        }
    }

    /// Build a schema from an ordered map of defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if a key is empty.
    pub fn from_map(map: Map<String, Value>) -> Result<Self> {
        map.into_iter()
            .fold(Self::builder(), |builder, (key, value)| builder.entry(key, value))
            .build()
    }

    /// Look up the entry for a canonical key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&SchemaEntry> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    /// Whether `key` is a canonical schema key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// The default value declared for `key`.
    #[must_use]
    pub fn default_of(&self, key: &str) -> Option<&Value> {
        self.get(key).map(SchemaEntry::default_value)
    }

    /// Canonical keys in schema order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(SchemaEntry::key)
    }

    /// Entries in schema order.
    pub fn entries(&self) -> impl Iterator<Item = &SchemaEntry> {
        self.entries.iter()
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the schema declares no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A fresh map holding every default, in schema order.
    #[must_use]
    pub fn defaults(&self) -> Map<String, Value> {
        self.entries
            .iter()
            .map(|e| (e.key.clone(), e.default.clone()))
            .collect()
    }
}

/// Builder for [`DefaultSchema`].
#[derive(Debug, Default)]
pub struct DefaultSchemaBuilder {
    entries: Vec<SchemaEntry>,
}

impl DefaultSchemaBuilder {
    /// Declare a key and its default value.
    #[must_use]
    pub fn entry(mut self, key: impl Into<String>, default: impl Into<Value>) -> Self {
        self.entries.push(SchemaEntry {
            key: key.into(),
            default: default.into(),
            alias: None,
        });
        self
    }

    /// Declare a key, its default value, and an alternate name for it.
    #[must_use]
    pub fn entry_with_alias(
        mut self,
        key: impl Into<String>,
        default: impl Into<Value>,
        alias: impl Into<String>,
    ) -> Self {
        self.entries.push(SchemaEntry {
            key: key.into(),
            default: default.into(),
            alias: Some(alias.into()),
        });
        self
    }

    /// Validate the declarations and freeze them into a schema.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for empty keys or aliases, and
    /// [`Error::NameConflict`] when a key is declared twice or an alias
    /// collides with a key or another alias.
    pub fn build(self) -> Result<DefaultSchema> {
        let mut index = HashMap::with_capacity(self.entries.len());

        for (i, entry) in self.entries.iter().enumerate() {
            validate_name("key", &entry.key)?;
            if index.insert(entry.key.clone(), i).is_some() {
                return Err(Error::NameConflict {
                    name: entry.key.clone(),
                    reason: "key is declared more than once".into(),
                });
            }
        }

        let mut aliases: HashMap<&str, &str> = HashMap::new();
        for entry in &self.entries {
            let Some(alias) = entry.alias.as_deref() else {
                continue;
            };
            validate_name("alias", alias)?;
            if index.contains_key(alias) {
                return Err(Error::NameConflict {
                    name: alias.to_string(),
                    reason: "alias shadows a schema key".into(),
                });
            }
            if let Some(previous) = aliases.insert(alias, &entry.key) {
                return Err(Error::NameConflict {
                    name: alias.to_string(),
                    reason: format!("already an alias of '{previous}'"),
                });
            }
        }

        Ok(DefaultSchema {
            entries: self.entries,
            index,
        })
    }
}

pub(crate) fn validate_name(field: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            field: field.into(),
            message: "Cannot be empty or only whitespace".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_kind_of() {
        assert_eq!(ValueKind::of(&json!(null)), ValueKind::Null);
        assert_eq!(ValueKind::of(&json!(true)), ValueKind::Bool);
        assert_eq!(ValueKind::of(&json!(-3)), ValueKind::Integer);
        assert_eq!(ValueKind::of(&json!(u64::MAX)), ValueKind::Integer);
        assert_eq!(ValueKind::of(&json!(1.5)), ValueKind::Float);
        assert_eq!(ValueKind::of(&json!("x")), ValueKind::String);
        assert_eq!(ValueKind::of(&json!([1])), ValueKind::Array);
        assert_eq!(ValueKind::of(&json!({})), ValueKind::Object);
    }

    #[test]
    fn test_value_kind_accepts() {
        assert!(ValueKind::Null.accepts(ValueKind::Object));
        assert!(ValueKind::Float.accepts(ValueKind::Integer));
        assert!(ValueKind::String.accepts(ValueKind::String));
        assert!(!ValueKind::Integer.accepts(ValueKind::Float));
        assert!(!ValueKind::Bool.accepts(ValueKind::Null));
    }

    #[test]
    fn test_builder_preserves_order() {
        let schema = DefaultSchema::builder()
            .entry("zeta", 1)
            .entry("alpha", 2)
            .entry("mid", 3)
            .build()
            .unwrap();
        assert_eq!(schema.keys().collect::<Vec<_>>(), ["zeta", "alpha", "mid"]);
        let defaults = schema.defaults();
        assert_eq!(defaults.keys().collect::<Vec<_>>(), ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let result = DefaultSchema::builder().entry("a", 1).entry("a", 2).build();
        assert!(matches!(result, Err(Error::NameConflict { name, .. }) if name == "a"));
    }

    #[test]
    fn test_alias_shadowing_key_rejected() {
        let result = DefaultSchema::builder()
            .entry("a", 1)
            .entry_with_alias("b", 2, "a")
            .build();
        assert!(matches!(result, Err(Error::NameConflict { .. })));
    }

    #[test]
    fn test_duplicate_alias_rejected() {
        let result = DefaultSchema::builder()
            .entry_with_alias("a", 1, "x")
            .entry_with_alias("b", 2, "x")
            .build();
        assert!(matches!(result, Err(Error::NameConflict { reason, .. }) if reason.contains("'a'")));
    }

    #[test]
    fn test_empty_key_rejected() {
        let result = DefaultSchema::builder().entry("  ", 1).build();
        assert!(matches!(result, Err(Error::Validation { .. })));
    }

    #[test]
    fn test_from_value_requires_object() {
        let result = DefaultSchema::from_value(json!([1, 2]));
        assert!(matches!(result, Err(Error::Validation { message, .. }) if message.contains("array")));
    }

    #[test]
    fn test_entry_accessors() {
        let schema = DefaultSchema::from_value(json!({"timeout": 30})).unwrap();
        let entry = schema.get("timeout").unwrap();
        assert_eq!(entry.key(), "timeout");
        assert_eq!(entry.default_value(), &json!(30));
        assert_eq!(entry.kind(), ValueKind::Integer);
        assert_eq!(entry.alias(), None);
        assert_eq!(schema.default_of("timeout"), Some(&json!(30)));
        assert!(schema.get("missing").is_none());
    }
}
