//! Error types for migration generation.

use std::path::PathBuf;

use dbgen_core::SchemaError;

/// Errors that can occur while loading schemas or writing migrations.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// Invalid schema content (bad tag, duplicate column, ...).
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The connection string names a driver without introspection support.
    #[error("Unsupported driver in connection string: {0}")]
    UnsupportedDriver(String),

    /// The requested output name is not a plain file name.
    #[error("Invalid output target '{0}': must be a file name, not a path")]
    InvalidOutputTarget(String),

    /// A schema file could not be decoded or validated.
    #[error("Failed to load schema file '{path}': {message}")]
    SchemaFile {
        /// Path to the schema file.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Two loaded schema files declare the same table.
    #[error("Table '{0}' is declared more than once")]
    DuplicateTable(String),

    /// The output directory already exists and overwriting was not allowed.
    #[error("Output directory already exists: {0}")]
    OutputExists(PathBuf),

    /// Database error during introspection.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO error (reading schema files, writing migration files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for migration generation.
pub type Result<T> = std::result::Result<T, GenerateError>;
