//! The base configuration: a schema plus explicit base assignments.

use indexmap::IndexMap;

use crate::error::ResolveError;
use crate::provenance::Provenance;
use crate::schema::Schema;
use crate::value::{Sourced, Value};

/// The base configuration a layer stack resolves against.
///
/// Holds the schema and any values assigned directly on the base. Reads fall
/// back to the declared default when no explicit value was assigned.
#[derive(Debug, Clone)]
pub struct ValueStore {
    schema: Schema,
    values: IndexMap<String, Sourced>,
}

impl ValueStore {
    /// Create an empty store over the given schema.
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            values: IndexMap::new(),
        }
    }

    /// The schema this store was created with.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Assign a base value for a declared key.
    ///
    /// Fails if the key was never declared, or if the value cannot be
    /// coerced to the declared kind.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<(), ResolveError> {
        let Some(property) = self.schema.get(key) else {
            return Err(ResolveError::unknown_key(
                key,
                "base",
                self.schema.suggest(key),
            ));
        };
        let value = value.into();
        let coerced = value
            .coerce_to(property.kind())
            .map_err(|value| ResolveError::TypeMismatch {
                key: key.to_string(),
                expected: property.kind(),
                found: value.kind(),
                provenance: Provenance::Base,
            })?;
        self.values
            .insert(key.to_string(), Sourced::new(coerced, Provenance::Base));
        Ok(())
    }

    /// Read a base value for a declared key.
    ///
    /// Returns the explicit assignment if present, else the declared
    /// default, else `None`. Fails if the key was never declared.
    pub fn get(&self, key: &str) -> Result<Option<&Value>, ResolveError> {
        let Some(property) = self.schema.get(key) else {
            return Err(ResolveError::unknown_key(
                key,
                "base",
                self.schema.suggest(key),
            ));
        };
        if let Some(sourced) = self.values.get(key) {
            return Ok(Some(&sourced.value));
        }
        Ok(property.default_value())
    }

    /// Iterate over the explicit base assignments, in assignment order.
    pub(crate) fn entries(&self) -> impl Iterator<Item = (&String, &Sourced)> {
        self.values.iter()
    }
}
