//! Deterministic layered resolution.
//!
//! `resolve` walks the schema in declaration order to seed a fresh snapshot
//! from defaults and base assignments, then applies each layer in stack
//! order. A key set by a later layer always wins. The inputs are never
//! mutated, so resolving the same base and stack twice yields the same
//! snapshot.

use indexmap::IndexMap;

use crate::effective::Effective;
use crate::error::ResolveError;
use crate::layer::LayerStack;
use crate::provenance::{Override, Provenance};
use crate::store::ValueStore;
use crate::value::Sourced;

/// Resolve a base configuration against an ordered layer stack.
///
/// Fails on the first layer key the schema never declared, on the first
/// value that cannot be coerced to its declared kind, and, after all layers
/// are applied, on required keys that are still unset (all of them are
/// reported together).
pub fn resolve(store: &ValueStore, stack: &LayerStack) -> Result<Effective, ResolveError> {
    let schema = store.schema();
    tracing::debug!(
        properties = schema.len(),
        layers = stack.len(),
        "resolving configuration"
    );

    // Seed from defaults in declaration order, so the snapshot iterates the
    // way the schema was declared regardless of assignment order.
    let mut entries: IndexMap<String, Sourced> = IndexMap::with_capacity(schema.len());
    for property in schema.properties() {
        if let Some(default) = property.default_value() {
            entries.insert(
                property.name().to_string(),
                Sourced::new(default.clone(), Provenance::Default),
            );
        }
    }

    // Base assignments beat defaults but are not recorded as overrides;
    // replacing a default is the normal case.
    for (key, sourced) in store.entries() {
        entries.insert(key.clone(), sourced.clone());
    }

    let mut overrides = Vec::new();

    for layer in stack.layers() {
        for (key, sourced) in layer.iter() {
            let Some(property) = schema.get(key) else {
                return Err(ResolveError::unknown_key(
                    key,
                    sourced.provenance.source_description(),
                    schema.suggest(key),
                ));
            };

            let coerced = sourced.value.clone().coerce_to(property.kind()).map_err(
                |value| ResolveError::TypeMismatch {
                    key: key.to_string(),
                    expected: property.kind(),
                    found: value.kind(),
                    provenance: sourced.provenance.clone(),
                },
            )?;

            let incoming = Sourced::new(coerced, sourced.provenance.clone());
            if let Some(previous) = entries.insert(key.to_string(), incoming) {
                if !previous.provenance.is_default() {
                    let winner = entries
                        .get(key)
                        .map(|s| s.provenance.clone())
                        .unwrap_or_default();
                    tracing::debug!(key, winner = %winner.source_description(), "layer override");
                    overrides.push(Override::new(key, winner, previous.provenance));
                }
            }
        }
    }

    // Declaration order again, so multiple missing keys report stably.
    let missing: Vec<String> = schema
        .properties()
        .filter(|p| p.is_required() && !entries.contains_key(p.name()))
        .map(|p| p.name().to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ResolveError::MissingRequired { keys: missing });
    }

    // Entries seeded by declaration order, then updated in place, so the
    // final order still follows the schema for declared keys.
    let mut ordered: IndexMap<String, Sourced> = IndexMap::with_capacity(entries.len());
    for property in schema.properties() {
        if let Some(sourced) = entries.shift_remove(property.name()) {
            ordered.insert(property.name().to_string(), sourced);
        }
    }

    Ok(Effective::new(ordered, overrides))
}
