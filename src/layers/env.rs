//! Schema-driven environment variable layer.
//!
//! # Naming convention
//!
//! Given a prefix like `"APP"` and declared keys `port` and `max_retries`,
//! the corresponding environment variables are:
//! - `APP__PORT` → port
//! - `APP__MAX_RETRIES` → max_retries
//!
//! Rules:
//! - All SCREAMING_SNAKE_CASE
//! - Double underscore (`__`) between the prefix and the key (so single `_`
//!   stays available inside key names)
//! - Names are lowercased to match declared keys
//!
//! Values stay strings in the layer; the resolver coerces them to the
//! declared kind (comma-separated lists included).

use indexmap::IndexMap;

use crate::error::ResolveError;
use crate::layer::Layer;
use crate::layers::{Diagnostic, LayerOutput};
use crate::provenance::Provenance;
use crate::schema::Schema;
use crate::value::{Sourced, Value};

// ============================================================================
// EnvSource trait
// ============================================================================

/// Trait for abstracting over environment variable sources.
///
/// This allows testing without modifying the actual environment.
pub trait EnvSource {
    /// Get the value of an environment variable by name.
    fn get(&self, name: &str) -> Option<String>;

    /// Iterate over all environment variables.
    fn vars(&self) -> Box<dyn Iterator<Item = (String, String)> + '_>;
}

/// Environment source that reads from the actual process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdEnv;

impl EnvSource for StdEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn vars(&self) -> Box<dyn Iterator<Item = (String, String)> + '_> {
        Box::new(std::env::vars())
    }
}

/// Environment source backed by a map (for testing).
#[derive(Debug, Clone, Default)]
pub struct MockEnv {
    vars: IndexMap<String, String>,
}

impl MockEnv {
    /// Create a new empty mock environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock environment from an iterator of key-value pairs.
    pub fn from_pairs<I, K, V>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Set an environment variable.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }
}

impl EnvSource for MockEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn vars(&self) -> Box<dyn Iterator<Item = (String, String)> + '_> {
        Box::new(self.vars.iter().map(|(k, v)| (k.clone(), v.clone())))
    }
}

// ============================================================================
// EnvConfig
// ============================================================================

/// Configuration for the environment variable layer.
pub struct EnvConfig {
    /// The prefix to look for (e.g., `APP`). Declared key `foo_bar` is then
    /// overrideable via `APP__FOO_BAR`.
    pub prefix: String,

    /// Whether prefixed variables that match no declared key should fail
    /// resolution instead of warning (to catch typos).
    pub strict: bool,

    /// Custom environment source (for testing). If None, uses StdEnv.
    pub source: Option<Box<dyn EnvSource>>,
}

impl EnvConfig {
    /// Create a new EnvConfig with the given prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            strict: false,
            source: None,
        }
    }

    /// Enable strict mode.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Get the env source, or StdEnv if none set.
    pub fn source(&self) -> &dyn EnvSource {
        self.source.as_deref().unwrap_or(&StdEnv)
    }
}

/// Builder for the environment variable layer configuration.
#[derive(Default)]
pub struct EnvConfigBuilder {
    prefix: String,
    strict: bool,
    source: Option<Box<dyn EnvSource>>,
}

impl EnvConfigBuilder {
    /// Create a new env config builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the environment variable prefix.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Enable strict mode: fail on prefixed variables that match no
    /// declared key.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Use a custom environment source (for testing).
    pub fn source(mut self, source: impl EnvSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Build the env layer configuration.
    pub fn build(self) -> EnvConfig {
        let mut config = EnvConfig::new(self.prefix);
        if self.strict {
            config = config.strict();
        }
        config.source = self.source;
        config
    }
}

/// Read prefixed environment variables into a layer.
///
/// Variables with other prefixes are ignored. A prefixed name that matches
/// no declared key warns, or fails in strict mode. Malformed names (nothing
/// after the prefix) warn.
pub fn load_env(
    schema: &Schema,
    config: &EnvConfig,
    source: &dyn EnvSource,
) -> Result<LayerOutput, ResolveError> {
    let prefix_with_sep = format!("{}__", config.prefix);
    let layer_name = format!("env:{}", config.prefix);

    let mut entries: IndexMap<String, Sourced> = IndexMap::new();
    let mut diagnostics = Vec::new();

    for (name, value) in source.vars() {
        let Some(rest) = name.strip_prefix(&prefix_with_sep) else {
            continue;
        };
        if rest.is_empty() {
            diagnostics.push(Diagnostic::new(format!(
                "invalid environment variable name: {name} (empty after prefix)"
            )));
            continue;
        }

        let key = rest.to_lowercase();
        if !schema.contains(&key) {
            if config.strict {
                return Err(ResolveError::unknown_key(
                    key.clone(),
                    format!("environment variable {name}"),
                    schema.suggest(&key),
                ));
            }
            tracing::debug!(var = %name, "ignoring unknown environment variable");
            diagnostics.push(Diagnostic::for_key(
                key.clone(),
                format!("environment variable {name} matches no declared key"),
            ));
            continue;
        }

        let provenance = Provenance::env(&name, &value);
        entries.insert(key, Sourced::new(Value::String(value), provenance));
    }

    Ok(LayerOutput {
        layer: Layer::from_entries(layer_name, entries),
        diagnostics,
    })
}
