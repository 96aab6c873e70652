//! Error types for the implementor registry.

use thiserror::Error;

/// Errors that can occur while building or loading implementor tables.
///
/// Delivery to a host never fails; these cover everything before it.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Library or trait fragment not found
    #[error("implementors not found: {name}")]
    NotFound {
        /// The library name or trait path that was not found
        name: String,
    },

    /// Failed to read a fragment file
    #[error("failed to load implementors fragment from {path}: {source}")]
    LoadError {
        /// Path to the fragment file
        path: String,
        /// Underlying error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Malformed implementors fragment
    #[error("malformed implementors fragment {path} at line {line}: {reason}")]
    Fragment {
        /// Path (or label) of the fragment
        path: String,
        /// 1-based line number
        line: usize,
        /// What was wrong with the line
        reason: String,
    },

    /// Failed to encode or decode a registry as JSON
    #[error("registry JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The same library appeared twice in one table
    #[error("duplicate library in implementors table: {library}")]
    DuplicateLibrary {
        /// The repeated library name
        library: String,
    },

    /// Invalid implementor descriptor (validation failed)
    #[error("invalid implementor descriptor for {library}: {reason}")]
    ValidationError {
        /// Library the descriptor belongs to
        library: String,
        /// Reason for validation failure
        reason: String,
    },

    /// Implementors directory not found
    #[error("implementors directory not found at {path}")]
    DirectoryNotFound {
        /// Expected directory path
        path: String,
    },

    /// I/O error while walking the implementors directory
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid library name or path
    #[error("invalid name: {0}")]
    InvalidName(#[from] implementors_core::CoreError),
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
