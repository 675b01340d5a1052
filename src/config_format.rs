//! Pluggable config file formats.
//!
//! A format turns file contents into a flat document of configuration
//! values. JSON and TOML are built in; the registry picks a format by file
//! extension. Documents must be flat tables: nested tables, floats, and
//! nulls have no configuration kind and are rejected with the offending key
//! named.

use indexmap::IndexMap;

use crate::value::Value;

/// A parsed config file: keys to values, in file order where the format
/// preserves it.
pub type Document = IndexMap<String, Value>;

/// An error from parsing a config file's contents.
#[derive(Debug)]
pub struct FormatError {
    /// What went wrong, including position info when the parser provides it.
    pub message: String,
}

impl FormatError {
    /// Create a format error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn unsupported(key: &str, what: &str) -> Self {
        Self::new(format!(
            "key `{key}` has unsupported value type {what}; expected a string, boolean, integer, or list of strings"
        ))
    }
}

impl core::fmt::Display for FormatError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl core::error::Error for FormatError {}

/// A config file format: a set of extensions and a parser.
pub trait ConfigFormat: Send + Sync {
    /// File extensions this format handles, without the dot.
    fn extensions(&self) -> &'static [&'static str];

    /// Parse file contents into a flat document.
    fn parse(&self, contents: &str) -> Result<Document, FormatError>;
}

/// JSON config files, parsed with serde_json.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl ConfigFormat for JsonFormat {
    fn extensions(&self) -> &'static [&'static str] {
        &["json"]
    }

    fn parse(&self, contents: &str) -> Result<Document, FormatError> {
        let root: serde_json::Value =
            serde_json::from_str(contents).map_err(|e| FormatError::new(e.to_string()))?;
        let serde_json::Value::Object(map) = root else {
            return Err(FormatError::new("top level must be an object"));
        };

        let mut document = Document::new();
        for (key, value) in map {
            document.insert(key.clone(), json_value(&key, value)?);
        }
        Ok(document)
    }
}

fn json_value(key: &str, value: serde_json::Value) -> Result<Value, FormatError> {
    match value {
        serde_json::Value::String(s) => Ok(Value::String(s)),
        serde_json::Value::Bool(b) => Ok(Value::Bool(b)),
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(Value::Integer)
            .ok_or_else(|| FormatError::unsupported(key, "number (not an integer)")),
        serde_json::Value::Array(items) => {
            let mut list = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    serde_json::Value::String(s) => list.push(s),
                    other => {
                        return Err(FormatError::unsupported(
                            key,
                            &format!("array element {other}"),
                        ));
                    }
                }
            }
            Ok(Value::List(list))
        }
        serde_json::Value::Null => Err(FormatError::unsupported(key, "null")),
        serde_json::Value::Object(_) => Err(FormatError::unsupported(key, "object")),
    }
}

/// TOML config files, parsed with the toml crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlFormat;

impl ConfigFormat for TomlFormat {
    fn extensions(&self) -> &'static [&'static str] {
        &["toml"]
    }

    fn parse(&self, contents: &str) -> Result<Document, FormatError> {
        let table: toml::Table =
            contents.parse().map_err(|e: toml::de::Error| FormatError::new(e.to_string()))?;

        let mut document = Document::new();
        for (key, value) in table {
            document.insert(key.clone(), toml_value(&key, value)?);
        }
        Ok(document)
    }
}

fn toml_value(key: &str, value: toml::Value) -> Result<Value, FormatError> {
    match value {
        toml::Value::String(s) => Ok(Value::String(s)),
        toml::Value::Boolean(b) => Ok(Value::Bool(b)),
        toml::Value::Integer(i) => Ok(Value::Integer(i)),
        toml::Value::Array(items) => {
            let mut list = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    toml::Value::String(s) => list.push(s),
                    other => {
                        return Err(FormatError::unsupported(
                            key,
                            &format!("array element {other}"),
                        ));
                    }
                }
            }
            Ok(Value::List(list))
        }
        toml::Value::Float(_) => Err(FormatError::unsupported(key, "float")),
        toml::Value::Datetime(_) => Err(FormatError::unsupported(key, "datetime")),
        toml::Value::Table(_) => Err(FormatError::unsupported(key, "table")),
    }
}

/// Registry of known formats, consulted by file extension.
pub struct FormatRegistry {
    formats: Vec<Box<dyn ConfigFormat>>,
}

impl FormatRegistry {
    /// A registry with the built-in formats (JSON and TOML).
    pub fn new() -> Self {
        Self {
            formats: vec![Box::new(JsonFormat), Box::new(TomlFormat)],
        }
    }

    /// Register an additional format. Later registrations win on extension
    /// conflicts.
    pub fn register(&mut self, format: impl ConfigFormat + 'static) {
        self.formats.push(Box::new(format));
    }

    /// The format for a file extension (without the dot), if any.
    pub fn for_extension(&self, extension: &str) -> Option<&dyn ConfigFormat> {
        self.formats
            .iter()
            .rev()
            .find(|f| f.extensions().contains(&extension))
            .map(|f| f.as_ref())
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}
