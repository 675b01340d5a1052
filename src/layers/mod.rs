//! Layer sources: environment variables and config files.
//!
//! Each source produces an ordinary [`Layer`](crate::layer::Layer) plus any
//! non-fatal diagnostics gathered while reading it. Unknown keys from these
//! text sources warn by default (the variable may belong to another tool)
//! and fail only in strict mode; programmatic layers are always validated
//! hard at resolve time.

pub(crate) mod env;
pub(crate) mod file;

use crate::layer::Layer;

/// A non-fatal warning gathered while loading a layer source.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// What was noticed.
    pub message: String,
    /// The configuration key involved, when there is one.
    pub key: Option<String>,
}

impl Diagnostic {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            key: None,
        }
    }

    pub(crate) fn for_key(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}

impl core::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// A loaded layer together with the diagnostics from loading it.
#[derive(Debug)]
pub struct LayerOutput {
    /// The loaded layer.
    pub layer: Layer,
    /// Warnings gathered while loading.
    pub diagnostics: Vec<Diagnostic>,
}
