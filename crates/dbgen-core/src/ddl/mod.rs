//! DDL generators.
//!
//! One trait per statement role, all sharing the [`Generator`] accessors.
//! Implementations are driven entirely by a [`DialectProfile`], so a new
//! dialect is a new profile rather than a new set of generators.
//!
//! Generators append to a caller-owned [`SqlBuilder`] and never write a
//! trailing newline.

mod alter_table;
mod create_index;
mod create_table;
mod drop_index;
mod drop_table;

pub use alter_table::AlterTableSql;
pub use create_index::CreateIndexSql;
pub use create_table::CreateTableSql;
pub use drop_index::DropIndexSql;
pub use drop_table::DropTableSql;

use crate::builder::SqlBuilder;
use crate::dialect::DialectProfile;
use crate::expression::ExpressionRenderer;
use crate::plan::AlterTableStep;
use crate::schema::{Index, Table};

/// Accessors shared by every generator.
pub trait Generator {
    /// Renderer for column-level fragments.
    fn expression_renderer(&self) -> &ExpressionRenderer;

    /// Dialect identifier.
    fn dialect(&self) -> &str {
        self.expression_renderer().dialect()
    }

    /// Dialect profile.
    fn dialect_options(&self) -> &DialectProfile {
        self.expression_renderer().dialect_options()
    }
}

/// Renders `CREATE TABLE`.
pub trait CreateTableGenerator: Generator {
    /// Appends the statement for `table` (columns only, no indexes).
    fn generate(&self, b: &mut SqlBuilder, table: &Table);
}

/// Renders `DROP TABLE`.
pub trait DropTableGenerator: Generator {
    /// Appends the statement for `table`.
    fn generate(&self, b: &mut SqlBuilder, table: &Table);
}

/// Renders `CREATE INDEX`.
pub trait CreateIndexGenerator: Generator {
    /// Appends the statement creating `index` on `table`.
    fn generate(&self, b: &mut SqlBuilder, table: &str, index: &Index);
}

/// Renders `DROP INDEX`.
pub trait DropIndexGenerator: Generator {
    /// Appends the statement for `index`.
    fn generate(&self, b: &mut SqlBuilder, index: &Index);
}

/// Renders `ALTER TABLE` for the column part of an [`AlterTableStep`].
pub trait AlterTableGenerator: Generator {
    /// Appends the forward statement. Writes nothing without column changes.
    fn generate(&self, b: &mut SqlBuilder, step: &AlterTableStep);

    /// Appends the statement undoing [`AlterTableGenerator::generate`].
    fn rollback(&self, b: &mut SqlBuilder, step: &AlterTableStep);
}
