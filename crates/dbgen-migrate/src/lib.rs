//! SQL migration file generation.
//!
//! `dbgen-migrate` connects [`dbgen_core`] to the outside world:
//! - **Loader** - Reads declared schemas from JSON files and directories
//! - **Sources** - Introspect the current schema (PostgreSQL, JSON dumps)
//! - **Output** - Names the up/down migration pair
//! - **Pipeline** - Diffs, renders and writes the migration files
//! - **Dump** - Writes the current schema back as declared schema files
//!
//! # Example
//!
//! ```rust,ignore
//! use dbgen_migrate::prelude::*;
//!
//! let target = load_paths(&["schemas"])?;
//! let output = OutputTarget::new("db/migration", "add_users", false, chrono::Utc::now())?;
//! let pipeline = MigrationPipeline::new(
//!     MigrationGenerator::postgres(),
//!     target,
//!     output,
//!     FULL_SCHEMA_PATH,
//! );
//!
//! let source = connect("postgres://localhost/app").await?;
//! let report = pipeline.run(&source).await?;
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Generate an up/down pair against a live database
//! dbgen gen-migration -c postgres://localhost/app -o add_users schemas/
//!
//! # Dump the live schema as JSON files
//! dbgen dump-db -c postgres://localhost/app -o snapshot/
//!
//! # Render declared schemas as SQL
//! dbgen render schemas/
//! ```

pub mod dump;
pub mod error;
pub mod loader;
pub mod output;
pub mod pipeline;
pub mod source;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::dump::dump_schemas;
    pub use crate::error::{GenerateError, Result};
    pub use crate::loader::{load_file, load_paths};
    pub use crate::output::OutputTarget;
    pub use crate::pipeline::{MigrationPipeline, PipelineReport, FULL_SCHEMA_PATH};
    pub use crate::source::{
        connect, AnySchemaSource, JsonSchemaSource, PostgresSchemaSource, SchemaSource,
    };
    pub use dbgen_core::{DialectProfile, MigrationGenerator, Table};
}
