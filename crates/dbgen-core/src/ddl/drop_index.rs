use std::sync::Arc;

use super::{DropIndexGenerator, Generator};
use crate::builder::SqlBuilder;
use crate::dialect::DialectProfile;
use crate::expression::ExpressionRenderer;
use crate::schema::Index;

/// `DROP INDEX IF EXISTS "i";`
#[derive(Debug, Clone)]
pub struct DropIndexSql {
    renderer: ExpressionRenderer,
}

impl DropIndexSql {
    /// Creates the generator for a dialect.
    #[must_use]
    pub fn new(dialect: impl Into<String>, profile: Arc<DialectProfile>) -> Self {
        Self {
            renderer: ExpressionRenderer::new(dialect, profile),
        }
    }
}

impl Generator for DropIndexSql {
    fn expression_renderer(&self) -> &ExpressionRenderer {
        &self.renderer
    }
}

impl DropIndexGenerator for DropIndexSql {
    fn generate(&self, b: &mut SqlBuilder, index: &Index) {
        let p = self.dialect_options();
        b.write(p.drop_clause)
            .write(p.index_fragment)
            .write(p.if_exists_fragment);
        self.renderer.write_identifier(b, &index.name);
        b.write_char(p.semicolon);
    }
}
