//! Property declarations.
//!
//! A [`Schema`] is the closed set of keys a configuration may hold. Every
//! assignment, whether on the base configuration or through a layer, is
//! checked against it; undeclared keys are rejected with a did-you-mean
//! suggestion when a near-miss exists.

use indexmap::IndexMap;

use crate::error::is_similar;
use crate::value::{Kind, Value};

/// A declared configuration property.
#[derive(Debug, Clone)]
pub struct Property {
    name: String,
    kind: Kind,
    default: Option<Value>,
    required: bool,
    doc: Option<String>,
}

impl Property {
    fn new(name: impl Into<String>, kind: Kind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
            required: false,
            doc: None,
        }
    }

    /// Declare a string property.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, Kind::String)
    }

    /// Declare a boolean property.
    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, Kind::Bool)
    }

    /// Declare an integer property.
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, Kind::Integer)
    }

    /// Declare a list-of-strings property.
    pub fn list(name: impl Into<String>) -> Self {
        Self::new(name, Kind::List)
    }

    /// Attach a default value, used when no base assignment or layer sets
    /// the key. The default's kind must match the declared kind; the
    /// mismatch is reported when the schema is built.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Mark the property as required: resolution fails if no source sets it.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach a one-line description, shown in dumps and missing-key
    /// summaries.
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// The property's key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared kind.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// The declared default, if any.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Whether the property must be set by resolve time.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The attached description, if any.
    pub fn doc_comment(&self) -> Option<&str> {
        self.doc.as_deref()
    }
}

/// An error produced while building a [`Schema`].
#[derive(Debug)]
#[non_exhaustive]
pub enum SchemaError {
    /// The same key was declared twice.
    DuplicateKey {
        /// The key that was declared twice.
        key: String,
    },

    /// A default value's kind does not match the declared kind.
    DefaultKindMismatch {
        /// The key whose default is wrong.
        key: String,
        /// The kind the property declares.
        declared: Kind,
        /// The kind of the provided default.
        found: Kind,
    },
}

impl core::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::DuplicateKey { key } => {
                write!(f, "configuration key `{key}` is declared more than once")
            }
            Self::DefaultKindMismatch {
                key,
                declared,
                found,
            } => {
                write!(
                    f,
                    "default for `{key}` has the wrong kind: declared {declared}, found {found}"
                )
            }
        }
    }
}

impl core::error::Error for SchemaError {}

/// The set of declared properties, in declaration order.
#[derive(Debug, Clone)]
pub struct Schema {
    properties: IndexMap<String, Property>,
}

impl Schema {
    /// Start declaring properties.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Look up a declared property.
    pub fn get(&self, key: &str) -> Option<&Property> {
        self.properties.get(key)
    }

    /// Whether the key was declared.
    pub fn contains(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Iterate over the declared properties in declaration order.
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.values()
    }

    /// The number of declared properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the schema declares no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Find a declared key similar to the given one, for error messages.
    pub fn suggest(&self, key: &str) -> Option<String> {
        self.properties
            .keys()
            .find(|declared| is_similar(key, declared))
            .cloned()
    }
}

/// Builder for a [`Schema`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    properties: Vec<Property>,
}

impl SchemaBuilder {
    /// Create an empty schema builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a property.
    pub fn property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// Finish the schema, checking for duplicate keys and default kind
    /// mismatches.
    pub fn build(self) -> Result<Schema, SchemaError> {
        let mut properties = IndexMap::with_capacity(self.properties.len());
        for property in self.properties {
            if let Some(default) = &property.default {
                if default.kind() != property.kind {
                    return Err(SchemaError::DefaultKindMismatch {
                        key: property.name.clone(),
                        declared: property.kind,
                        found: default.kind(),
                    });
                }
            }
            if properties.contains_key(&property.name) {
                return Err(SchemaError::DuplicateKey { key: property.name });
            }
            properties.insert(property.name.clone(), property);
        }
        Ok(Schema { properties })
    }
}
