use std::sync::Arc;

use super::{CreateTableGenerator, Generator};
use crate::builder::SqlBuilder;
use crate::dialect::DialectProfile;
use crate::expression::ExpressionRenderer;
use crate::schema::Table;

/// `CREATE TABLE IF NOT EXISTS "t" (\n\t"c" TYPE[ options],\n...\n);`
#[derive(Debug, Clone)]
pub struct CreateTableSql {
    renderer: ExpressionRenderer,
}

impl CreateTableSql {
    /// Creates the generator for a dialect.
    #[must_use]
    pub fn new(dialect: impl Into<String>, profile: Arc<DialectProfile>) -> Self {
        Self {
            renderer: ExpressionRenderer::new(dialect, profile),
        }
    }
}

impl Generator for CreateTableSql {
    fn expression_renderer(&self) -> &ExpressionRenderer {
        &self.renderer
    }
}

impl CreateTableGenerator for CreateTableSql {
    fn generate(&self, b: &mut SqlBuilder, table: &Table) {
        let p = self.dialect_options();
        let r = &self.renderer;

        b.write(p.create_clause)
            .write(p.table_fragment)
            .write(p.if_not_exists_fragment);
        r.write_identifier(b, &table.name);
        b.write_chars(&[p.space, p.left_paren, p.newline]);

        for (i, field) in table.fields.iter().enumerate() {
            if i > 0 {
                b.write(p.comma_newline_fragment);
            }
            b.write_char(p.tab);
            r.write_identifier(b, &field.name);
            b.write_char(p.space)
                .write(&r.type_fragment(field))
                .write(&r.options_fragment(field));
        }

        b.write_chars(&[p.newline, p.right_paren, p.semicolon]);
    }
}
