//! Field-level SQL fragments: types, options, identifiers and literals.

use std::sync::Arc;

use crate::builder::SqlBuilder;
use crate::dialect::DialectProfile;
use crate::schema::{DefaultValue, Field};

/// Renders the fragments of a single column for one dialect.
#[derive(Debug, Clone)]
pub struct ExpressionRenderer {
    dialect: String,
    profile: Arc<DialectProfile>,
}

impl ExpressionRenderer {
    /// Creates a renderer for the given dialect.
    #[must_use]
    pub fn new(dialect: impl Into<String>, profile: Arc<DialectProfile>) -> Self {
        Self {
            dialect: dialect.into(),
            profile,
        }
    }

    /// Returns the dialect identifier.
    #[must_use]
    pub fn dialect(&self) -> &str {
        &self.dialect
    }

    /// Returns the dialect profile.
    #[must_use]
    pub fn dialect_options(&self) -> &DialectProfile {
        &self.profile
    }

    /// Type of a column, with `(limit[, scale])` when the type takes them.
    ///
    /// A zero limit and scale, or a type without a limit, renders the bare
    /// type name.
    #[must_use]
    pub fn type_fragment(&self, field: &Field) -> String {
        let p = &*self.profile;
        let mut sql = String::from(p.type_fragment(&field.field_type));
        if (field.limit == 0 && field.scale == 0) || !field.field_type.has_limit() {
            return sql;
        }

        sql.push(p.left_paren);
        sql.push_str(&field.limit.to_string());
        if field.scale != 0 && field.field_type.has_scale() {
            sql.push(p.comma);
            sql.push(p.space);
            sql.push_str(&field.scale.to_string());
        }
        sql.push(p.right_paren);
        sql
    }

    /// Options of a column in declared order, led by a single space.
    #[must_use]
    pub fn options_fragment(&self, field: &Field) -> String {
        let p = &*self.profile;
        let mut sql = String::new();
        for option in &field.options {
            sql.push(p.space);
            sql.push_str(p.option_fragment(*option));
        }
        sql
    }

    /// Identifier wrapped in the dialect's quote. Embedded quotes are not
    /// escaped.
    #[must_use]
    pub fn quoted_identifier(&self, name: &str) -> String {
        let q = self.profile.quote;
        format!("{q}{name}{q}")
    }

    /// Writes a quoted identifier into `b`.
    pub fn write_identifier(&self, b: &mut SqlBuilder, name: &str) {
        let q = self.profile.quote;
        b.write_char(q).write(name).write_char(q);
    }

    /// Default value literal: strings are quoted verbatim, everything else
    /// uses its canonical text.
    #[must_use]
    pub fn default_literal(&self, value: &DefaultValue) -> String {
        match value {
            DefaultValue::String(s) => {
                let q = self.profile.string_quote;
                format!("{q}{s}{q}")
            }
            other => other.to_string(),
        }
    }
}
