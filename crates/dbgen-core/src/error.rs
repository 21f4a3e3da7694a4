//! Error types for schema parsing, validation and diffing.

/// Errors raised by the schema model and the diff engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A type or option tag is not part of the supported closed set.
    #[error("invalid \"{value}\" as {kind}")]
    InvalidEnumValue {
        /// What was being parsed ("field type", "field option", "sort order").
        kind: &'static str,
        /// The literal input.
        value: String,
    },

    /// A single-table diff was requested for a table the current schema lacks.
    #[error("current table '{0}' does not exist")]
    MissingCurrentTable(String),

    /// A single-table diff was requested for a table the target schema lacks.
    #[error("missing target table '{0}'")]
    MissingTargetTable(String),

    /// A column declares `nullable` together with `not null` or `primary key`.
    #[error("column '{table}.{column}' is declared both nullable and not null")]
    ContradictoryNullability {
        /// Owning table.
        table: String,
        /// Offending column.
        column: String,
    },

    /// Two columns of one table share a name.
    #[error("duplicate column '{column}' in table '{table}'")]
    DuplicateColumn {
        /// Owning table.
        table: String,
        /// Repeated column name.
        column: String,
    },

    /// Two indexes of one table share a name.
    #[error("duplicate index '{index}' in table '{table}'")]
    DuplicateIndex {
        /// Owning table.
        table: String,
        /// Repeated index name.
        index: String,
    },

    /// No dialect profile is registered under the identifier.
    #[error("unknown dialect '{0}'")]
    UnknownDialect(String),
}

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
