//! Error types for conversion operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while converting between course folders and OEDX packages.
///
/// Every variant is fatal to the current run. Nothing is retried internally.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input path does not exist or is not a recognized index file/directory
    #[error("Unreadable source '{}': {reason}", path.display())]
    UnreadableSource { path: PathBuf, reason: String },

    /// A `url_name` reference points at a structural file that is not on disk
    #[error("Missing structural file '{}'", .0.display())]
    MissingStructuralFile(PathBuf),

    /// The directory has no usable `course.xml` root marker
    #[error("'{}' is not an OEDX course tree", .0.display())]
    NotAnOedxTree(PathBuf),

    /// Two outputs were assigned the same path; indicates an index-assignment bug
    #[error("Identifier collision on '{0}'")]
    IdentifierCollision(String),

    /// A synthesized output path escapes the working directory
    #[error("Unsafe output path '{0}'")]
    UnsafePath(String),

    /// Malformed XML in a structural file
    #[error("XML error in '{}': {message}", path.display())]
    Xml { path: PathBuf, message: String },

    /// The course-index document could not be (de)serialized
    #[error("Index error: {0}")]
    Index(String),

    /// Propagated from the storage collaborator; aborts the remaining uploads
    #[error("Upload of '{source_url}' to '{key}' failed: {message}")]
    UploadFailure {
        source_url: String,
        key: String,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ConvertError {
    fn from(err: serde_json::Error) -> Self {
        ConvertError::Index(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConvertError {
    fn from(err: serde_yaml::Error) -> Self {
        ConvertError::Index(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
