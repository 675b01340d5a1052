//! Configuration values and their kinds.
//!
//! Values are deliberately small: a configuration property is a string, a
//! boolean, an integer, or a list of strings. Text sources (environment
//! variables, base assignments given as strings) are coerced to the declared
//! kind when they parse cleanly; everything else is a type mismatch.

use crate::provenance::Provenance;

/// The kind of a configuration property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// A UTF-8 string.
    String,
    /// A boolean.
    Bool,
    /// A signed 64-bit integer.
    Integer,
    /// An ordered list of strings.
    List,
}

impl core::fmt::Display for Kind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Kind::String => "string",
            Kind::Bool => "boolean",
            Kind::Integer => "integer",
            Kind::List => "list of strings",
        };
        write!(f, "{name}")
    }
}

/// A configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A UTF-8 string.
    String(String),
    /// A boolean.
    Bool(bool),
    /// A signed 64-bit integer.
    Integer(i64),
    /// An ordered list of strings.
    List(Vec<String>),
}

impl Value {
    /// The kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::String(_) => Kind::String,
            Value::Bool(_) => Kind::Bool,
            Value::Integer(_) => Kind::Integer,
            Value::List(_) => Kind::List,
        }
    }

    /// Returns the string if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer if this is an integer value.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the list if this is a list value.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Coerce this value to the given kind.
    ///
    /// A value already of the right kind passes through. String values are
    /// re-parsed: `"true"`/`"false"` for booleans, a decimal integer for
    /// integers, a comma-separated list (with `\,` escaping) for lists.
    /// Anything else is returned unchanged as the error.
    pub(crate) fn coerce_to(self, kind: Kind) -> Result<Value, Value> {
        if self.kind() == kind {
            return Ok(self);
        }
        let Value::String(text) = self else {
            return Err(self);
        };
        match kind {
            Kind::Bool => match text.as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(Value::String(text)),
            },
            Kind::Integer => match text.parse::<i64>() {
                Ok(i) => Ok(Value::Integer(i)),
                Err(_) => Err(Value::String(text)),
            },
            Kind::List => Ok(Value::List(parse_comma_separated(&text))),
            Kind::String => Ok(Value::String(text)),
        }
    }
}

impl core::fmt::Display for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::List(items) => write!(f, "{}", items.join(", ")),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Value::List(items.into_iter().map(str::to_string).collect())
    }
}

/// A value together with where it came from.
#[derive(Debug, Clone)]
pub struct Sourced {
    /// The value itself.
    pub value: Value,
    /// The origin of the value.
    pub provenance: Provenance,
}

impl Sourced {
    /// Create a sourced value.
    pub fn new(value: Value, provenance: Provenance) -> Self {
        Self { value, provenance }
    }
}

/// Parse a comma-separated string, handling `\,` escaping.
pub(crate) fn parse_comma_separated(input: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(&next) = chars.peek() {
                if next == ',' {
                    chars.next();
                    current.push(',');
                } else {
                    current.push(ch);
                }
            } else {
                current.push(ch);
            }
        } else if ch == ',' {
            let trimmed = current.trim().to_string();
            if !trimmed.is_empty() {
                result.push(trimmed);
            }
            current.clear();
        } else {
            current.push(ch);
        }
    }

    let trimmed = current.trim().to_string();
    if !trimmed.is_empty() {
        result.push(trimmed);
    }

    if result.is_empty() {
        result.push(input.to_string());
    }

    result
}
