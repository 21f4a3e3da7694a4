use std::sync::Arc;

use super::{DropTableGenerator, Generator};
use crate::builder::SqlBuilder;
use crate::dialect::DialectProfile;
use crate::expression::ExpressionRenderer;
use crate::schema::Table;

/// `DROP TABLE IF EXISTS "t";`
#[derive(Debug, Clone)]
pub struct DropTableSql {
    renderer: ExpressionRenderer,
}

impl DropTableSql {
    /// Creates the generator for a dialect.
    #[must_use]
    pub fn new(dialect: impl Into<String>, profile: Arc<DialectProfile>) -> Self {
        Self {
            renderer: ExpressionRenderer::new(dialect, profile),
        }
    }
}

impl Generator for DropTableSql {
    fn expression_renderer(&self) -> &ExpressionRenderer {
        &self.renderer
    }
}

impl DropTableGenerator for DropTableSql {
    fn generate(&self, b: &mut SqlBuilder, table: &Table) {
        let p = self.dialect_options();
        b.write(p.drop_clause)
            .write(p.table_fragment)
            .write(p.if_exists_fragment);
        self.renderer.write_identifier(b, &table.name);
        b.write_char(p.semicolon);
    }
}
