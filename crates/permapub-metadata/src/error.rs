//! Error types for the metadata crate.

use std::path::PathBuf;

/// Errors that can occur while loading or composing metadata.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// An attribute pair is not of the form `key=value`.
    #[error("attribute {input:?} has incorrect format: {reason}")]
    InvalidAttribute { input: String, reason: &'static str },

    /// The base template could not be read.
    #[error("failed to read template {path}: {source}")]
    TemplateIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The base template is not a valid metadata document.
    #[error("malformed template {path}: {reason}")]
    MalformedTemplate { path: PathBuf, reason: String },

    /// A `file://` description reference could not be read as text.
    #[error("failed to read description file {path}: {source}")]
    Description {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for metadata results.
pub type MetadataResult<T> = Result<T, MetadataError>;
