//! # dbgen-core
//!
//! Schema diffing and SQL migration generation.
//!
//! This crate provides:
//! - A typed schema model (tables, fields, indexes) decodable from JSON
//! - Dialect profiles that hold every SQL fragment a generator emits
//! - Five DDL generators: create/drop table, create/drop index, alter table
//! - A diff engine producing a [`MigrationPlan`] between two schema sets
//! - A [`MigrationGenerator`] that turns a plan into up/down documents
//!
//! Nothing here performs I/O. Loading schema files, introspecting a live
//! database and writing migration files live in `dbgen-migrate`.
//!
//! ## Example
//!
//! ```rust
//! use dbgen_core::prelude::*;
//!
//! let current = vec![Table::new("users")
//!     .field(Field::new("id", FieldType::BigSerial).option(FieldOption::PrimaryKey))];
//! let target = vec![Table::new("users")
//!     .field(Field::new("id", FieldType::BigSerial).option(FieldOption::PrimaryKey))
//!     .field(Field::new("email", FieldType::Varchar).limit(100))];
//!
//! let plan = SchemaDiff::new(&current, &target).plan();
//! let up = MigrationGenerator::postgres().up(&plan, false).unwrap();
//!
//! assert!(up.contains("ADD COLUMN \"email\" VARCHAR(100)"));
//! ```

pub mod builder;
pub mod ddl;
pub mod dialect;
pub mod diff;
pub mod error;
pub mod expression;
pub mod migration;
pub mod plan;
pub mod schema;
pub mod types;

pub use builder::SqlBuilder;
pub use dialect::DialectProfile;
pub use diff::SchemaDiff;
pub use error::{Result, SchemaError};
pub use migration::MigrationGenerator;
pub use plan::MigrationPlan;
pub use schema::{Field, Index, Table};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::builder::SqlBuilder;
    pub use crate::ddl::{
        AlterTableGenerator, AlterTableSql, CreateIndexGenerator, CreateIndexSql,
        CreateTableGenerator, CreateTableSql, DropIndexGenerator, DropIndexSql,
        DropTableGenerator, DropTableSql, Generator,
    };
    pub use crate::dialect::{DialectProfile, POSTGRES};
    pub use crate::diff::{diff_named, SchemaDiff};
    pub use crate::error::{Result, SchemaError};
    pub use crate::expression::ExpressionRenderer;
    pub use crate::migration::MigrationGenerator;
    pub use crate::plan::{AlterColumnStep, AlterTableStep, MigrationPlan, OptionAction};
    pub use crate::schema::{
        DefaultValue, Field, Index, IndexField, Named, SortOrder, Table,
    };
    pub use crate::types::{FieldOption, FieldType, TypeCategory};
}
