//! Alternate names for configuration entries.

use std::collections::BTreeMap;

/// Maps alternate names to canonical names.
///
/// Aliases are stored already resolved, so lookups take one hop even when
/// an alias was declared in terms of another alias.
///
/// # Examples
///
/// ```
/// use keepconf::config::AliasTable;
///
/// let mut aliases = AliasTable::default();
/// aliases.insert("t", "timeout");
/// aliases.insert("tm", "t");
///
/// assert_eq!(aliases.resolve("tm"), "timeout");
/// assert_eq!(aliases.resolve("timeout"), "timeout");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    targets: BTreeMap<String, String>,
}

impl AliasTable {
    /// Bind `alias` to `target`, resolving `target` first.
    ///
    /// Returns the canonical name the alias now points at.
    pub fn insert(&mut self, alias: impl Into<String>, target: &str) -> &str {
        let canonical = self.resolve(target).to_string();
        let slot = self.targets.entry(alias.into()).or_default();
        *slot = canonical;
        slot.as_str()
    }

    /// The canonical name for `name`; `name` itself when it is not an alias.
    #[must_use]
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.targets.get(name).map_or(name, String::as_str)
    }

    /// Remove every alias bound to `canonical`, returning how many were
    /// removed.
    pub fn remove_targeting(&mut self, canonical: &str) -> usize {
        let before = self.targets.len();
        self.targets.retain(|_, target| target.as_str() != canonical);
        before - self.targets.len()
    }

    /// Whether `name` is an alias.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.targets.contains_key(name)
    }

    /// Every alias bound to `canonical`, in name order.
    pub fn aliases_of<'a>(&'a self, canonical: &'a str) -> impl Iterator<Item = &'a str> {
        self.targets
            .iter()
            .filter(move |(_, target)| target.as_str() == canonical)
            .map(|(alias, _)| alias.as_str())
    }

    /// `(alias, canonical)` pairs in alias order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.targets.iter().map(|(a, t)| (a.as_str(), t.as_str()))
    }

    /// Number of aliases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether no aliases are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
