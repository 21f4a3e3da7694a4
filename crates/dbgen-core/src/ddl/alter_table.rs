use std::sync::Arc;

use super::{AlterTableGenerator, Generator};
use crate::builder::SqlBuilder;
use crate::dialect::DialectProfile;
use crate::expression::ExpressionRenderer;
use crate::plan::{AlterColumnStep, AlterTableStep, OptionAction};
use crate::schema::{DefaultValue, Field};

/// `ALTER TABLE IF EXISTS "t"\n\t<action>,\n\t<action>;`
///
/// Actions are emitted as added columns, dropped columns, then per altered
/// column its type, nullability and default changes. Index changes are not
/// part of this statement.
#[derive(Debug, Clone)]
pub struct AlterTableSql {
    renderer: ExpressionRenderer,
}

impl AlterTableSql {
    /// Creates the generator for a dialect.
    #[must_use]
    pub fn new(dialect: impl Into<String>, profile: Arc<DialectProfile>) -> Self {
        Self {
            renderer: ExpressionRenderer::new(dialect, profile),
        }
    }

    fn write_statement<'a>(
        &self,
        b: &mut SqlBuilder,
        table: &str,
        added: &[Field],
        dropped: &[Field],
        altered: impl Iterator<Item = AlteredColumn<'a>>,
    ) {
        let p = self.dialect_options();

        let mut actions = Vec::new();
        actions.extend(added.iter().map(|f| self.add_column(f)));
        actions.extend(dropped.iter().map(|f| self.drop_column(&f.name)));
        for column in altered {
            self.alter_column(&column, &mut actions);
        }

        b.write(p.alter_clause)
            .write(p.table_fragment)
            .write(p.if_exists_fragment);
        self.renderer.write_identifier(b, table);
        b.newline();
        b.write(&actions.join(p.comma_newline_fragment))
            .write_char(p.semicolon);
    }

    /// `\tADD COLUMN "c" TYPE[ options]`
    fn add_column(&self, field: &Field) -> String {
        let p = self.dialect_options();
        let r = &self.renderer;
        let mut b = SqlBuilder::new();
        b.write_char(p.tab).write(p.add_fragment).write(p.column_fragment);
        r.write_identifier(&mut b, &field.name);
        b.write_char(p.space)
            .write(&r.type_fragment(field))
            .write(&r.options_fragment(field));
        b.into_string()
    }

    /// `\tDROP COLUMN "c"`
    fn drop_column(&self, name: &str) -> String {
        let p = self.dialect_options();
        let mut b = SqlBuilder::new();
        b.write_char(p.tab).write(p.drop_clause).write(p.column_fragment);
        self.renderer.write_identifier(&mut b, name);
        b.into_string()
    }

    fn alter_column(&self, column: &AlteredColumn<'_>, actions: &mut Vec<String>) {
        let p = self.dialect_options();
        let r = &self.renderer;

        if column.type_changed {
            let mut b = self.alter_column_prefix(&column.field.name);
            b.write(p.set_fragment)
                .write(p.data_type_fragment)
                .write(&r.type_fragment(column.field));
            actions.push(b.into_string());
        }

        for action in &column.option_actions {
            let mut b = self.alter_column_prefix(&column.field.name);
            match action {
                OptionAction::SetNotNull => b.write(p.set_fragment),
                OptionAction::DropNotNull => b.write(p.drop_clause),
            };
            b.write(p.not_null_fragment);
            actions.push(b.into_string());
        }

        if column.default_changed {
            let mut b = self.alter_column_prefix(&column.field.name);
            match &column.field.default {
                Some(value) => self.set_default(&mut b, value),
                None => {
                    b.write(p.drop_clause).write(p.default_fragment.trim_end());
                }
            }
            actions.push(b.into_string());
        }
    }

    fn set_default(&self, b: &mut SqlBuilder, value: &DefaultValue) {
        let p = self.dialect_options();
        b.write(p.set_fragment)
            .write(p.default_fragment)
            .write(&self.renderer.default_literal(value));
    }

    /// `\tALTER COLUMN "c" `
    fn alter_column_prefix(&self, name: &str) -> SqlBuilder {
        let p = self.dialect_options();
        let mut b = SqlBuilder::new();
        b.write_char(p.tab).write(p.alter_clause).write(p.column_fragment);
        self.renderer.write_identifier(&mut b, name);
        b.write_char(p.space);
        b
    }
}

/// One altered column as seen from a rendering direction.
struct AlteredColumn<'a> {
    field: &'a Field,
    type_changed: bool,
    default_changed: bool,
    option_actions: Vec<OptionAction>,
}

impl<'a> AlteredColumn<'a> {
    fn forward(step: &'a AlterColumnStep) -> Self {
        Self {
            field: &step.field,
            type_changed: step.type_changed,
            default_changed: step.default_changed,
            option_actions: step.option_actions.clone(),
        }
    }

    fn backward(step: &'a AlterColumnStep) -> Self {
        Self {
            field: &step.previous,
            type_changed: step.type_changed,
            default_changed: step.default_changed,
            option_actions: step.option_actions.iter().map(|a| a.inverse()).collect(),
        }
    }
}

impl Generator for AlterTableSql {
    fn expression_renderer(&self) -> &ExpressionRenderer {
        &self.renderer
    }
}

impl AlterTableGenerator for AlterTableSql {
    fn generate(&self, b: &mut SqlBuilder, step: &AlterTableStep) {
        if !step.has_column_changes() {
            return;
        }
        self.write_statement(
            b,
            &step.name,
            &step.added_columns,
            &step.dropped_columns,
            step.altered_columns.iter().map(AlteredColumn::forward),
        );
    }

    fn rollback(&self, b: &mut SqlBuilder, step: &AlterTableStep) {
        if !step.has_column_changes() {
            return;
        }
        self.write_statement(
            b,
            &step.name,
            &step.dropped_columns,
            &step.added_columns,
            step.altered_columns.iter().map(AlteredColumn::backward),
        );
    }
}
