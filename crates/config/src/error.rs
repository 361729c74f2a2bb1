use std::path::PathBuf;

use crate::property::PropertyType;

/// Crate-wide result type for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal configuration errors.
///
/// These abort a load, a write, or a lookup. Per-field problems are
/// [`FieldError`]s instead: they are collected during the validation pass
/// and only invalidate the containing instance.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The on-disk file is not valid for its format.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// In-memory data could not be rendered for writing.
    #[error("failed to render configuration: {source}")]
    Render {
        #[source]
        source: serde_json::Error,
    },

    /// A section in the loaded data has no registered schema.
    #[error("unknown configuration section: {section}")]
    UnknownSection { section: String },

    /// A key is absent from both the local store and its parent.
    #[error("configuration key not found: {key}")]
    KeyNotFound { key: String },

    /// Directory creation or file IO failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    #[must_use]
    pub fn unknown_section(section: impl Into<String>) -> Self {
        Self::UnknownSection {
            section: section.into(),
        }
    }

    #[must_use]
    pub fn key_not_found(key: impl Into<String>) -> Self {
        Self::KeyNotFound { key: key.into() }
    }
}

/// Per-field validation failures.
///
/// Recoverable: the validation pass logs them and removes the offending
/// instance from the corrected data instead of aborting the load.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// A required field has neither a value nor a default.
    #[error("required value must be defined")]
    MissingRequired,

    /// A present value has the wrong primitive type.
    #[error("wrong type {found}, expecting {expected}")]
    TypeMismatch {
        expected: PropertyType,
        found: &'static str,
    },
}
