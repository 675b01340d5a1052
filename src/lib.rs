#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![deny(unsafe_code)]
#![doc = include_str!("../README.md")]

pub(crate) mod builder;
pub(crate) mod config_format;
pub(crate) mod dump;
pub(crate) mod effective;
pub(crate) mod error;
pub(crate) mod layer;
pub(crate) mod layers;
pub(crate) mod provenance;
pub(crate) mod resolver;
pub(crate) mod schema;
pub(crate) mod store;
pub(crate) mod value;

// ==========================================
// PUBLIC INTERFACE
// ==========================================

pub use builder::{builder, ConfigBuilder, Resolution};
pub use config_format::{ConfigFormat, Document, FormatError, FormatRegistry, JsonFormat, TomlFormat};
pub use dump::{format_missing_keys, render_effective};
pub use effective::Effective;
pub use error::ResolveError;
pub use layer::{Layer, LayerBuilder, LayerStack};
pub use layers::env::{EnvConfig, EnvConfigBuilder, EnvSource, MockEnv, StdEnv};
pub use layers::file::{FileConfig, FileConfigBuilder, FileLayerOutput};
pub use layers::{Diagnostic, LayerOutput};
pub use provenance::{
    ConfigFile, FilePathResolution, FilePathStatus, FileResolution, Override, Provenance,
};
pub use resolver::resolve;
pub use schema::{Property, Schema, SchemaBuilder, SchemaError};
pub use store::ValueStore;
pub use value::{Kind, Sourced, Value};
