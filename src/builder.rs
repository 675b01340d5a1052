//! Top-level builder tying the sources together.
//!
//! ```rust,ignore
//! let resolution = builder(schema)
//!     .set("host", "localhost")
//!     .file(|f| f.path("strata.toml"))
//!     .env(|e| e.prefix("APP"))
//!     .layer(ci_overrides)
//!     .resolve()?;
//! ```
//!
//! Sources resolve in fixed positions: the config file first, then the
//! environment, then programmatic layers in push order. Later positions win.

use crate::config_format::FormatRegistry;
use crate::effective::Effective;
use crate::error::ResolveError;
use crate::layer::{Layer, LayerStack};
use crate::layers::env::{load_env, EnvConfig, EnvConfigBuilder, EnvSource};
use crate::layers::file::{load_file, FileConfig, FileConfigBuilder};
use crate::layers::Diagnostic;
use crate::provenance::FileResolution;
use crate::resolver::resolve;
use crate::schema::Schema;
use crate::store::ValueStore;
use crate::value::Value;

/// Start building a configuration over the given schema.
pub fn builder(schema: Schema) -> ConfigBuilder {
    ConfigBuilder {
        store: ValueStore::new(schema),
        set_error: None,
        stack: LayerStack::new(),
        env_config: None,
        env_source: None,
        file_config: None,
        registry: FormatRegistry::new(),
    }
}

/// Builder for a layered configuration.
pub struct ConfigBuilder {
    store: ValueStore,
    // First base assignment error, surfaced when resolve runs so the
    // builder chain stays fluent.
    set_error: Option<ResolveError>,
    stack: LayerStack,
    env_config: Option<EnvConfig>,
    env_source: Option<Box<dyn EnvSource>>,
    file_config: Option<FileConfig>,
    registry: FormatRegistry,
}

impl ConfigBuilder {
    /// Assign a base value. Errors are reported when `resolve` runs.
    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        if self.set_error.is_none() {
            if let Err(e) = self.store.set(key, value) {
                self.set_error = Some(e);
            }
        }
        self
    }

    /// Push a programmatic override layer. Later layers win.
    pub fn layer(mut self, layer: Layer) -> Self {
        self.stack.push(layer);
        self
    }

    /// Configure the environment variable layer.
    pub fn env(mut self, f: impl FnOnce(EnvConfigBuilder) -> EnvConfigBuilder) -> Self {
        self.env_config = Some(f(EnvConfigBuilder::new()).build());
        self
    }

    /// Replace the environment source used by the env layer (for tests).
    pub fn with_env_source(mut self, source: impl EnvSource + 'static) -> Self {
        self.env_source = Some(Box::new(source));
        self
    }

    /// Configure the config file layer.
    pub fn file(mut self, f: impl FnOnce(FileConfigBuilder) -> FileConfigBuilder) -> Self {
        self.file_config = Some(f(FileConfigBuilder::new()).build());
        self
    }

    /// Register an additional config file format.
    pub fn format(mut self, format: impl crate::config_format::ConfigFormat + 'static) -> Self {
        self.registry.register(format);
        self
    }

    /// Load the configured sources and resolve.
    pub fn resolve(mut self) -> Result<Resolution, ResolveError> {
        if let Some(error) = self.set_error {
            return Err(error);
        }

        let mut diagnostics = Vec::new();
        let mut file_resolution = FileResolution::new();
        let mut stack = LayerStack::new();

        if let Some(file_config) = &self.file_config {
            let output = load_file(self.store.schema(), file_config, &self.registry)?;
            diagnostics.extend(output.diagnostics);
            file_resolution = output.resolution;
            if !output.layer.is_empty() {
                stack.push(output.layer);
            }
        }

        if let Some(env_config) = &mut self.env_config {
            if let Some(source) = self.env_source.take() {
                env_config.source = Some(source);
            }
            let output = load_env(self.store.schema(), env_config, env_config.source())?;
            diagnostics.extend(output.diagnostics);
            if !output.layer.is_empty() {
                stack.push(output.layer);
            }
        }

        for layer in self.stack.layers() {
            stack.push(layer.clone());
        }

        let effective = resolve(&self.store, &stack)?;
        Ok(Resolution {
            effective,
            diagnostics,
            file_resolution,
        })
    }
}

/// The outcome of a builder resolve.
#[derive(Debug)]
pub struct Resolution {
    /// The resolved snapshot.
    pub effective: Effective,
    /// Warnings from the env and file sources.
    pub diagnostics: Vec<Diagnostic>,
    /// The config file paths that were considered.
    pub file_resolution: FileResolution,
}
