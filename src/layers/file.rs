//! Config file layer.
//!
//! Loads one config file into a layer: either an explicitly requested path
//! (missing is an error) or the first existing path from a fallback list
//! (none existing is fine, the layer is just empty). Inline content is
//! supported for tests. Every considered path is recorded in a
//! [`FileResolution`] so a dump can show what was tried.

use std::sync::Arc;

use camino::Utf8PathBuf;
use indexmap::IndexMap;

use crate::config_format::{Document, FormatRegistry};
use crate::error::ResolveError;
use crate::layer::Layer;
use crate::layers::{Diagnostic, LayerOutput};
use crate::provenance::{ConfigFile, FilePathStatus, FileResolution, Provenance};
use crate::schema::Schema;
use crate::value::Sourced;

/// Configuration for the file layer.
pub struct FileConfig {
    /// An explicitly requested path. Missing is an error.
    pub explicit_path: Option<Utf8PathBuf>,

    /// Fallback paths tried in order when no explicit path is given.
    pub default_paths: Vec<Utf8PathBuf>,

    /// Inline contents with a synthetic file name (for tests). Takes
    /// priority over paths.
    pub content: Option<(String, Utf8PathBuf)>,

    /// Whether file keys that match no declared key should fail resolution
    /// instead of warning.
    pub strict: bool,
}

impl FileConfig {
    fn new() -> Self {
        Self {
            explicit_path: None,
            default_paths: Vec::new(),
            content: None,
            strict: false,
        }
    }
}

/// Builder for the file layer configuration.
#[derive(Default)]
pub struct FileConfigBuilder {
    explicit_path: Option<Utf8PathBuf>,
    default_paths: Vec<Utf8PathBuf>,
    content: Option<(String, Utf8PathBuf)>,
    strict: bool,
}

impl FileConfigBuilder {
    /// Create a new file config builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request an explicit config file path. The file must exist.
    pub fn path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.explicit_path = Some(path.into());
        self
    }

    /// Add a fallback path, tried in the order added when no explicit path
    /// is given.
    pub fn default_path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.default_paths.push(path.into());
        self
    }

    /// Provide file contents inline, with a name whose extension picks the
    /// format (for tests).
    pub fn content(mut self, contents: impl Into<String>, name: impl Into<Utf8PathBuf>) -> Self {
        self.content = Some((contents.into(), name.into()));
        self
    }

    /// Enable strict mode: fail on file keys that match no declared key.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Build the file layer configuration.
    pub fn build(self) -> FileConfig {
        let mut config = FileConfig::new();
        config.explicit_path = self.explicit_path;
        config.default_paths = self.default_paths;
        config.content = self.content;
        config.strict = self.strict;
        config
    }
}

/// A loaded file layer with its path resolution trace.
#[derive(Debug)]
pub struct FileLayerOutput {
    /// The loaded layer (empty when no file was found or configured).
    pub layer: Layer,
    /// Warnings gathered while loading.
    pub diagnostics: Vec<Diagnostic>,
    /// All paths that were considered.
    pub resolution: FileResolution,
}

/// Load the configured file into a layer.
pub fn load_file(
    schema: &Schema,
    config: &FileConfig,
    registry: &FormatRegistry,
) -> Result<FileLayerOutput, ResolveError> {
    let mut resolution = FileResolution::new();

    let file = match pick_file(config, &mut resolution)? {
        Some(file) => file,
        None => {
            return Ok(FileLayerOutput {
                layer: Layer::from_entries("file", IndexMap::new()),
                diagnostics: Vec::new(),
                resolution,
            });
        }
    };

    tracing::debug!(path = %file.path, "loading config file");

    let extension = file
        .path
        .extension()
        .ok_or_else(|| ResolveError::UnknownFormat {
            path: file.path.clone(),
        })?;
    let format = registry
        .for_extension(extension)
        .ok_or_else(|| ResolveError::UnknownFormat {
            path: file.path.clone(),
        })?;
    let document = format
        .parse(&file.contents)
        .map_err(|error| ResolveError::FileParse {
            path: file.path.clone(),
            error,
        })?;

    let file = Arc::new(file);
    let output = document_to_layer(schema, config, &file, document)?;
    Ok(FileLayerOutput {
        layer: output.layer,
        diagnostics: output.diagnostics,
        resolution,
    })
}

/// Decide which file to load, recording every path that was considered.
fn pick_file(
    config: &FileConfig,
    resolution: &mut FileResolution,
) -> Result<Option<ConfigFile>, ResolveError> {
    if let Some((contents, name)) = &config.content {
        resolution.add_explicit(name.clone(), true);
        return Ok(Some(ConfigFile::new(name.clone(), contents.clone())));
    }

    if let Some(path) = &config.explicit_path {
        let exists = path.as_std_path().is_file();
        resolution.add_explicit(path.clone(), exists);
        resolution.mark_defaults_not_tried(&config.default_paths);
        if !exists {
            return Err(ResolveError::FileNotFound { path: path.clone() });
        }
        let contents = read_file(path)?;
        return Ok(Some(ConfigFile::new(path.clone(), contents)));
    }

    let mut picked = None;
    for path in &config.default_paths {
        if picked.is_some() {
            resolution.add_default(path.clone(), FilePathStatus::NotTried);
            continue;
        }
        if path.as_std_path().is_file() {
            resolution.add_default(path.clone(), FilePathStatus::Picked);
            let contents = read_file(path)?;
            picked = Some(ConfigFile::new(path.clone(), contents));
        } else {
            resolution.add_default(path.clone(), FilePathStatus::Absent);
        }
    }
    Ok(picked)
}

fn read_file(path: &Utf8PathBuf) -> Result<String, ResolveError> {
    std::fs::read_to_string(path).map_err(|e| ResolveError::FileRead {
        path: path.clone(),
        message: e.to_string(),
    })
}

/// Turn a parsed document into a layer, validating keys against the schema.
fn document_to_layer(
    schema: &Schema,
    config: &FileConfig,
    file: &Arc<ConfigFile>,
    document: Document,
) -> Result<LayerOutput, ResolveError> {
    let mut entries: IndexMap<String, Sourced> = IndexMap::new();
    let mut diagnostics = Vec::new();

    for (key, value) in document {
        if !schema.contains(&key) {
            if config.strict {
                return Err(ResolveError::unknown_key(
                    key.clone(),
                    file.path.to_string(),
                    schema.suggest(&key),
                ));
            }
            diagnostics.push(Diagnostic::for_key(
                key.clone(),
                format!("{}: key `{key}` matches no declared key", file.path),
            ));
            continue;
        }
        let provenance = Provenance::file(Arc::clone(file), &key);
        entries.insert(key, Sourced::new(value, provenance));
    }

    Ok(LayerOutput {
        layer: Layer::from_entries(format!("file:{}", file.path), entries),
        diagnostics,
    })
}
