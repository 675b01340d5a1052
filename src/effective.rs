//! The read-only result of a resolve.

use indexmap::IndexMap;

use crate::provenance::{Override, Provenance};
use crate::value::{Sourced, Value};

/// A resolved configuration snapshot.
///
/// Produced fresh by every resolve and never mutated afterwards. Entries are
/// in schema declaration order, each carrying the provenance of the source
/// that won for that key. Typed getters return `None` on a kind mismatch
/// rather than coercing.
#[derive(Debug, Clone)]
pub struct Effective {
    entries: IndexMap<String, Sourced>,
    overrides: Vec<Override>,
}

impl Effective {
    pub(crate) fn new(entries: IndexMap<String, Sourced>, overrides: Vec<Override>) -> Self {
        Self { entries, overrides }
    }

    /// The resolved value for a key, if any source set it.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).map(|sourced| &sourced.value)
    }

    /// The resolved string for a key.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// The resolved boolean for a key.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// The resolved integer for a key.
    pub fn get_integer(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_integer)
    }

    /// The resolved list for a key.
    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        self.get(key).and_then(Value::as_list)
    }

    /// Where the resolved value for a key came from.
    pub fn provenance(&self, key: &str) -> Option<&Provenance> {
        self.entries.get(key).map(|sourced| &sourced.provenance)
    }

    /// The override events recorded during resolution, in the order the
    /// overrides happened. Defaults being replaced are not recorded; a
    /// default losing is the normal case, not an override.
    pub fn overrides(&self) -> &[Override] {
        &self.overrides
    }

    /// Iterate over the resolved entries in schema declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Sourced)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The resolved keys in schema declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// The number of resolved entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing resolved to a value.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the snapshot with per-key provenance, colored for terminals.
    pub fn render(&self) -> String {
        crate::dump::render_effective(self)
    }
}
