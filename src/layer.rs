//! Override layers and the ordered stack they form.
//!
//! A layer is a named set of key overrides, immutable once built. Layers do
//! not see the schema; validation happens at resolve time so a stack can be
//! assembled before the base configuration exists.

use indexmap::IndexMap;

use crate::provenance::Provenance;
use crate::value::{Sourced, Value};

/// A named, immutable set of property overrides.
#[derive(Debug, Clone)]
pub struct Layer {
    name: String,
    values: IndexMap<String, Sourced>,
}

impl Layer {
    /// Start building a layer with the given name.
    pub fn builder(name: impl Into<String>) -> LayerBuilder {
        LayerBuilder {
            name: name.into(),
            values: IndexMap::new(),
        }
    }

    /// Build a layer from already-sourced entries. Used by the environment
    /// and file sources, which carry their own provenance per key.
    pub(crate) fn from_entries(
        name: impl Into<String>,
        values: IndexMap<String, Sourced>,
    ) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// The layer's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The override for a key, if this layer sets it.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key).map(|sourced| &sourced.value)
    }

    /// Iterate over the overrides in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Sourced)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The number of keys this layer overrides.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether this layer overrides nothing.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Builder for a [`Layer`].
#[derive(Debug)]
pub struct LayerBuilder {
    name: String,
    values: IndexMap<String, Sourced>,
}

impl LayerBuilder {
    /// Set an override. Later calls for the same key replace earlier ones.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let provenance = Provenance::layer(&self.name);
        self.values
            .insert(key.into(), Sourced::new(value.into(), provenance));
        self
    }

    /// Finish the layer.
    pub fn build(self) -> Layer {
        Layer {
            name: self.name,
            values: self.values,
        }
    }
}

/// An ordered list of layers, applied first to last.
#[derive(Debug, Clone, Default)]
pub struct LayerStack {
    layers: Vec<Layer>,
}

impl LayerStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer. Later layers win over earlier ones.
    pub fn push(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    /// The layers in push order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// The number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the stack has no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl FromIterator<Layer> for LayerStack {
    fn from_iter<I: IntoIterator<Item = Layer>>(iter: I) -> Self {
        Self {
            layers: iter.into_iter().collect(),
        }
    }
}
