//! Resolution errors.
//!
//! Errors are hand-formatted and always name the offending key, so a failed
//! resolve can be reported to the user without any further context.

use camino::Utf8PathBuf;

use crate::config_format::FormatError;
use crate::provenance::Provenance;
use crate::value::Kind;

/// An error produced while assigning or resolving configuration values.
#[derive(Debug)]
#[non_exhaustive]
pub enum ResolveError {
    /// A key was set or read that the schema never declared.
    UnknownKey {
        /// The undeclared key.
        key: String,
        /// Where the key came from, e.g. "base", a layer name, "environment",
        /// or a file path.
        source: String,
        /// A declared key the caller may have meant, if a near-miss exists.
        suggestion: Option<String>,
    },

    /// A value's kind conflicts with the key's declared kind.
    TypeMismatch {
        /// The key being assigned.
        key: String,
        /// The kind the schema declares.
        expected: Kind,
        /// The kind that was provided.
        found: Kind,
        /// Where the conflicting value came from.
        provenance: Provenance,
    },

    /// Required keys were still unset after all layers were applied.
    MissingRequired {
        /// Every required key with no value, in declaration order.
        keys: Vec<String>,
    },

    /// An explicitly requested config file does not exist.
    FileNotFound {
        /// The path that was requested.
        path: Utf8PathBuf,
    },

    /// A config file exists but could not be read.
    FileRead {
        /// The path that failed to read.
        path: Utf8PathBuf,
        /// The underlying IO error message.
        message: String,
    },

    /// A config file could not be parsed.
    FileParse {
        /// The file that failed to parse.
        path: Utf8PathBuf,
        /// The parse failure.
        error: FormatError,
    },

    /// A config file has no recognized extension.
    UnknownFormat {
        /// The file with the unrecognized extension.
        path: Utf8PathBuf,
    },
}

impl ResolveError {
    pub(crate) fn unknown_key(
        key: impl Into<String>,
        source: impl Into<String>,
        suggestion: Option<String>,
    ) -> Self {
        Self::UnknownKey {
            key: key.into(),
            source: source.into(),
            suggestion,
        }
    }
}

impl core::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownKey {
                key,
                source,
                suggestion,
            } => {
                write!(f, "unknown configuration key `{key}` (from {source})")?;
                if let Some(suggestion) = suggestion {
                    write!(f, ", did you mean `{suggestion}`?")?;
                }
                Ok(())
            }
            Self::TypeMismatch {
                key,
                expected,
                found,
                provenance,
            } => {
                write!(
                    f,
                    "invalid value for `{key}` {provenance}: expected {expected}, found {found}"
                )
            }
            Self::MissingRequired { keys } => {
                let names = keys
                    .iter()
                    .map(|k| format!("`{k}`"))
                    .collect::<Vec<_>>()
                    .join(", ");
                if keys.len() == 1 {
                    write!(f, "missing required configuration key {names}")
                } else {
                    write!(f, "missing required configuration keys {names}")
                }
            }
            Self::FileNotFound { path } => {
                write!(f, "config file not found: {path}")
            }
            Self::FileRead { path, message } => {
                write!(f, "failed to read config file {path}: {message}")
            }
            Self::FileParse { path, error } => {
                write!(f, "failed to parse config file {path}: {error}")
            }
            Self::UnknownFormat { path } => {
                write!(f, "config file {path} has no recognized format extension")
            }
        }
    }
}

impl core::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::FileParse { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Check if two strings are similar (differ by at most 2 edits).
pub(crate) fn is_similar(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    let len_diff = (a.len() as isize - b.len() as isize).abs();
    if len_diff > 2 {
        return false;
    }

    // Simple check: count character differences
    let mut diffs = 0;
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    for (ac, bc) in a_chars.iter().zip(b_chars.iter()) {
        if ac != bc {
            diffs += 1;
        }
    }
    diffs += len_diff as usize;
    diffs <= 2
}
