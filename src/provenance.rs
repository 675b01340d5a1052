//! Provenance tracking for layered configuration.
//!
//! Every resolved value records where it came from: a declared default, a
//! base assignment, a named override layer, an environment variable, or a
//! config file. Override records capture which source beat which, so a
//! configuration dump can explain the final state.

use std::sync::Arc;

use camino::Utf8PathBuf;

/// Information about a loaded config file.
///
/// Reference-counted so it can be shared across all values that originated
/// from the same file without duplicating the path and contents.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    /// Path to the config file (UTF-8).
    pub path: Utf8PathBuf,
    /// Full contents of the file (kept for error reporting).
    pub contents: String,
}

impl ConfigFile {
    /// Create a new ConfigFile from a path and contents.
    pub fn new(path: impl Into<Utf8PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// The origin of a configuration value.
#[derive(Debug, Clone, Default)]
pub enum Provenance {
    /// Value came from the property's declared default.
    #[default]
    Default,

    /// Value was assigned directly on the base configuration.
    Base,

    /// Value came from a named override layer.
    Layer {
        /// The layer's name, e.g. "ci-overrides".
        layer: String,
    },

    /// Value came from an environment variable.
    Env {
        /// The environment variable name, e.g. "APP__PORT".
        var: String,
        /// The raw value from the environment.
        value: String,
    },

    /// Value came from a config file.
    File {
        /// The config file (shared reference).
        file: Arc<ConfigFile>,
        /// The key within the file.
        key: String,
    },
}

impl Provenance {
    /// Create a layer provenance.
    pub fn layer(layer: impl Into<String>) -> Self {
        Self::Layer {
            layer: layer.into(),
        }
    }

    /// Create an environment variable provenance.
    pub fn env(var: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Env {
            var: var.into(),
            value: value.into(),
        }
    }

    /// Create a file provenance.
    pub fn file(file: Arc<ConfigFile>, key: impl Into<String>) -> Self {
        Self::File {
            file,
            key: key.into(),
        }
    }

    /// Check if this provenance is a declared default.
    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }

    /// Check if this provenance is a base assignment.
    pub fn is_base(&self) -> bool {
        matches!(self, Self::Base)
    }

    /// Check if this provenance is from a named layer.
    pub fn is_layer(&self) -> bool {
        matches!(self, Self::Layer { .. })
    }

    /// Check if this provenance is from the environment.
    pub fn is_env(&self) -> bool {
        matches!(self, Self::Env { .. })
    }

    /// Check if this provenance is from a file.
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }

    /// Get a human-readable description of the source.
    pub fn source_description(&self) -> String {
        match self {
            Self::Default => "default".into(),
            Self::Base => "base".into(),
            Self::Layer { layer } => format!("layer: {layer}"),
            Self::Env { var, .. } => format!("env: {var}"),
            Self::File { file, key } => format!("{}: {key}", file.path),
        }
    }
}

impl core::fmt::Display for Provenance {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Default => write!(f, "from default"),
            Self::Base => write!(f, "from base configuration"),
            Self::Layer { layer } => write!(f, "from layer {layer}"),
            Self::Env { var, .. } => write!(f, "from environment variable {var}"),
            Self::File { file, key } => write!(f, "from {}: {key}", file.path),
        }
    }
}

/// A record of a later layer overriding an earlier value for a key.
#[derive(Debug, Clone)]
pub struct Override {
    /// The configuration key that was overridden.
    pub key: String,
    /// The winning provenance (applied later).
    pub winner: Provenance,
    /// The losing provenance (was overridden).
    pub loser: Provenance,
}

impl Override {
    /// Create a new override record.
    pub fn new(key: impl Into<String>, winner: Provenance, loser: Provenance) -> Self {
        Self {
            key: key.into(),
            winner,
            loser,
        }
    }
}

impl core::fmt::Display for Override {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}: {} overrides {}",
            self.key,
            self.winner.source_description(),
            self.loser.source_description()
        )
    }
}

/// Status of a config file path during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilePathStatus {
    /// Path was picked and loaded successfully.
    Picked,
    /// Path exists but was not tried (an explicit path was provided).
    NotTried,
    /// Path does not exist.
    Absent,
}

/// Information about a single config file path that was considered.
#[derive(Debug, Clone)]
pub struct FilePathResolution {
    /// The path that was checked.
    pub path: Utf8PathBuf,

    /// The status of this path.
    pub status: FilePathStatus,

    /// Whether this path was explicitly requested.
    pub explicit: bool,
}

/// Result of config file resolution, tracking all paths that were considered.
#[derive(Debug, Clone, Default)]
pub struct FileResolution {
    /// All paths that were considered, in order.
    pub paths: Vec<FilePathResolution>,

    /// Whether an explicit path was provided.
    pub had_explicit: bool,
}

impl FileResolution {
    /// Create a new empty file resolution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an explicit path that was provided by the caller.
    pub fn add_explicit(&mut self, path: Utf8PathBuf, exists: bool) {
        self.had_explicit = true;
        self.paths.push(FilePathResolution {
            path,
            status: if exists {
                FilePathStatus::Picked
            } else {
                FilePathStatus::Absent
            },
            explicit: true,
        });
    }

    /// Add a default path that was checked.
    pub fn add_default(&mut self, path: Utf8PathBuf, status: FilePathStatus) {
        self.paths.push(FilePathResolution {
            path,
            status,
            explicit: false,
        });
    }

    /// Mark remaining default paths as not tried (because an explicit path
    /// was used).
    pub fn mark_defaults_not_tried(&mut self, default_paths: &[Utf8PathBuf]) {
        for path in default_paths {
            self.paths.push(FilePathResolution {
                path: path.clone(),
                status: FilePathStatus::NotTried,
                explicit: false,
            });
        }
    }

    /// The path that was actually loaded, if any.
    pub fn picked(&self) -> Option<&Utf8PathBuf> {
        self.paths
            .iter()
            .find(|p| p.status == FilePathStatus::Picked)
            .map(|p| &p.path)
    }
}
