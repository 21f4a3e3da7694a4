use std::sync::Arc;

use super::{CreateIndexGenerator, Generator};
use crate::builder::SqlBuilder;
use crate::dialect::DialectProfile;
use crate::expression::ExpressionRenderer;
use crate::schema::Index;

/// `CREATE [UNIQUE ]INDEX [CONCURRENTLY ]IF NOT EXISTS "i" ON "t"("c" ASC, ...);`
#[derive(Debug, Clone)]
pub struct CreateIndexSql {
    renderer: ExpressionRenderer,
}

impl CreateIndexSql {
    /// Creates the generator for a dialect.
    #[must_use]
    pub fn new(dialect: impl Into<String>, profile: Arc<DialectProfile>) -> Self {
        Self {
            renderer: ExpressionRenderer::new(dialect, profile),
        }
    }
}

impl Generator for CreateIndexSql {
    fn expression_renderer(&self) -> &ExpressionRenderer {
        &self.renderer
    }
}

impl CreateIndexGenerator for CreateIndexSql {
    fn generate(&self, b: &mut SqlBuilder, table: &str, index: &Index) {
        let p = self.dialect_options();
        let r = &self.renderer;

        b.write(p.create_clause);
        if index.unique {
            b.write(p.unique_fragment).write_char(p.space);
        }
        b.write(p.index_fragment);
        if p.supports_concurrent_index_build {
            b.write(p.concurrently_fragment).write_char(p.space);
        }
        b.write(p.if_not_exists_fragment);
        r.write_identifier(b, &index.name);
        b.write(p.on_fragment);
        r.write_identifier(b, table);

        b.write_char(p.left_paren);
        for (i, field) in index.fields.iter().enumerate() {
            if i > 0 {
                b.write_chars(&[p.comma, p.space]);
            }
            r.write_identifier(b, &field.column);
            if let Some(order) = field.order {
                b.write_char(p.space).write(order.as_sql());
            }
        }
        b.write_chars(&[p.right_paren, p.semicolon]);
    }
}
