//! Dialect profiles.
//!
//! A [`DialectProfile`] is plain data: the keywords, punctuation and
//! per-type/per-option fragments every generator renders with, plus two
//! capability flags. Supporting another database means building another
//! profile, not writing another generator.

use std::collections::HashMap;

use crate::error::{Result, SchemaError};
use crate::types::{FieldOption, FieldType};

/// Identifier of the PostgreSQL profile.
pub const POSTGRES: &str = "postgres";

/// Syntax fragments and capabilities of one SQL dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectProfile {
    /// Profile identifier.
    pub id: &'static str,

    /// `CREATE `
    pub create_clause: &'static str,
    /// `DROP `
    pub drop_clause: &'static str,
    /// `ALTER `
    pub alter_clause: &'static str,
    /// `BEGIN;`
    pub begin_clause: &'static str,
    /// `COMMIT;`
    pub commit_clause: &'static str,

    /// `TABLE `
    pub table_fragment: &'static str,
    /// `INDEX `
    pub index_fragment: &'static str,
    /// `ADD `
    pub add_fragment: &'static str,
    /// `COLUMN `
    pub column_fragment: &'static str,
    /// `SET `
    pub set_fragment: &'static str,
    /// `DEFAULT `
    pub default_fragment: &'static str,
    /// `DATA TYPE `
    pub data_type_fragment: &'static str,
    /// `NOT NULL`
    pub not_null_fragment: &'static str,
    /// `UNIQUE`
    pub unique_fragment: &'static str,
    /// `CONCURRENTLY`
    pub concurrently_fragment: &'static str,
    /// `IF NOT EXISTS `
    pub if_not_exists_fragment: &'static str,
    /// `IF EXISTS `
    pub if_exists_fragment: &'static str,
    /// ` ON `
    pub on_fragment: &'static str,
    /// `,\n`
    pub comma_newline_fragment: &'static str,

    /// Identifier quote.
    pub quote: char,
    /// String literal quote.
    pub string_quote: char,
    /// `,`
    pub comma: char,
    /// `(`
    pub left_paren: char,
    /// `)`
    pub right_paren: char,
    /// ` `
    pub space: char,
    /// `\t`
    pub tab: char,
    /// `\n`
    pub newline: char,
    /// `;`
    pub semicolon: char,

    /// Whether `CREATE INDEX CONCURRENTLY` is emitted.
    pub supports_concurrent_index_build: bool,
    /// Whether migrations are wrapped in `BEGIN;`/`COMMIT;`.
    pub supports_transactional_ddl: bool,

    /// SQL text per column type. Missing entries render as empty.
    pub type_fragments: HashMap<FieldType, &'static str>,
    /// SQL text per column option. Missing entries render as empty.
    pub option_fragments: HashMap<FieldOption, &'static str>,
}

impl DialectProfile {
    /// The PostgreSQL profile.
    #[must_use]
    pub fn postgres() -> Self {
        let type_fragments = HashMap::from([
            (FieldType::Boolean, "BOOLEAN"),
            (FieldType::Varchar, "VARCHAR"),
            (FieldType::Text, "TEXT"),
            (FieldType::SmallInt, "SMALLINT"),
            (FieldType::Int, "INT"),
            (FieldType::BigInt, "BIGINT"),
            (FieldType::Json, "JSON"),
            (FieldType::Jsonb, "JSONB"),
            (FieldType::Float, "FLOAT"),
            (FieldType::Decimal, "DECIMAL"),
            (FieldType::Timestamp, "TIMESTAMP"),
            (FieldType::Timestamptz, "TIMESTAMPTZ"),
            (FieldType::SmallSerial, "SMALLSERIAL"),
            (FieldType::Serial, "SERIAL"),
            (FieldType::BigSerial, "BIGSERIAL"),
        ]);
        let option_fragments = HashMap::from([
            (FieldOption::Nullable, "NULL"),
            (FieldOption::NotNull, "NOT NULL"),
            (FieldOption::AutoIncrement, "AUTO INCREMENT"),
            (FieldOption::Unique, "UNIQUE"),
            (FieldOption::PrimaryKey, "PRIMARY KEY"),
        ]);

        Self {
            id: POSTGRES,
            create_clause: "CREATE ",
            drop_clause: "DROP ",
            alter_clause: "ALTER ",
            begin_clause: "BEGIN;",
            commit_clause: "COMMIT;",
            table_fragment: "TABLE ",
            index_fragment: "INDEX ",
            add_fragment: "ADD ",
            column_fragment: "COLUMN ",
            set_fragment: "SET ",
            default_fragment: "DEFAULT ",
            data_type_fragment: "DATA TYPE ",
            not_null_fragment: "NOT NULL",
            unique_fragment: "UNIQUE",
            concurrently_fragment: "CONCURRENTLY",
            if_not_exists_fragment: "IF NOT EXISTS ",
            if_exists_fragment: "IF EXISTS ",
            on_fragment: " ON ",
            comma_newline_fragment: ",\n",
            quote: '"',
            string_quote: '\'',
            comma: ',',
            left_paren: '(',
            right_paren: ')',
            space: ' ',
            tab: '\t',
            newline: '\n',
            semicolon: ';',
            supports_concurrent_index_build: false,
            supports_transactional_ddl: true,
            type_fragments,
            option_fragments,
        }
    }

    /// Looks a profile up by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownDialect`] for unregistered identifiers.
    pub fn named(id: &str) -> Result<Self> {
        match id.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::postgres()),
            _ => Err(SchemaError::UnknownDialect(id.to_string())),
        }
    }

    /// Returns a copy with concurrent index builds toggled.
    #[must_use]
    pub fn with_concurrent_index_build(mut self, enabled: bool) -> Self {
        self.supports_concurrent_index_build = enabled;
        self
    }

    /// Returns a copy with transaction wrapping toggled.
    #[must_use]
    pub fn with_transactional_ddl(mut self, enabled: bool) -> Self {
        self.supports_transactional_ddl = enabled;
        self
    }

    /// SQL text for a column type, empty when the profile has none.
    #[must_use]
    pub fn type_fragment(&self, field_type: &FieldType) -> &'static str {
        self.type_fragments.get(field_type).copied().unwrap_or("")
    }

    /// SQL text for a column option, empty when the profile has none.
    #[must_use]
    pub fn option_fragment(&self, option: FieldOption) -> &'static str {
        self.option_fragments.get(&option).copied().unwrap_or("")
    }
}

impl Default for DialectProfile {
    fn default() -> Self {
        Self::postgres()
    }
}
