//! Error types for campusrecords.
//!
//! This module defines all error types used throughout the campusrecords crate.
//! Store failures fall into a few categories that the web layer inspects to
//! decide between an empty-state page, a 404, and a server error.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for campusrecords operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Load Errors ===
    /// A record document could not be read from disk.
    #[error("unable to read {}: {source}", file_name(.path))]
    Read {
        /// Path to the document.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A record document was read but is not valid JSON for its collection.
    #[error("unable to parse {}: {source}", file_name(.path))]
    Parse {
        /// Path to the document.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    // === Store State Errors ===
    /// An operation was invoked before the store was initialized.
    #[error("data store has not been initialized")]
    Uninitialized,

    /// `initialize` was called on a store that already holds its collections.
    #[error("data store is already initialized")]
    AlreadyInitialized,

    // === Query Errors ===
    /// A query matched zero records.
    #[error("no results returned")]
    EmptyResult,

    /// A lookup by key found no matching record.
    #[error("{message}")]
    NotFound {
        /// Description of what was looked up.
        message: String,
    },

    // === Persistence Errors ===
    /// Writing the student document back to disk failed.
    #[error("Error writing to {} file: {source}", file_name(.path))]
    Persist {
        /// Path to the document.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Rendering Errors ===
    /// A page template failed to render.
    #[error("template error: {0}")]
    Template(#[from] askama::Error),

    // === I/O Errors ===
    /// File system or socket operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for campusrecords operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

impl Error {
    /// Create a not-found error with the given message.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error came from reading or parsing a record document.
    #[must_use]
    pub fn is_load_error(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Parse { .. })
    }

    /// Check if this error means "nothing to show" rather than a fault.
    ///
    /// Covers empty queries, failed key lookups and an uninitialized store.
    #[must_use]
    pub fn is_no_results(&self) -> bool {
        matches!(
            self,
            Self::EmptyResult | Self::NotFound { .. } | Self::Uninitialized
        )
    }

    /// Check if this error is a failed write-back of the student document.
    #[must_use]
    pub fn is_persist_error(&self) -> bool {
        matches!(self, Self::Persist { .. })
    }
}
