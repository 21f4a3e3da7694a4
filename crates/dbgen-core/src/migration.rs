//! Migration document assembly.
//!
//! Turns a [`MigrationPlan`] into the up and down documents, and renders a
//! whole schema set as a full-schema snapshot. Sections are trimmed, empty
//! ones dropped, and the rest joined with a blank line.

use std::sync::Arc;

use crate::builder::SqlBuilder;
use crate::ddl::{
    AlterTableGenerator, AlterTableSql, CreateIndexGenerator, CreateIndexSql,
    CreateTableGenerator, CreateTableSql, DropIndexGenerator, DropIndexSql, DropTableGenerator,
    DropTableSql,
};
use crate::dialect::{DialectProfile, POSTGRES};
use crate::plan::{AlterTableStep, MigrationPlan};
use crate::schema::{Index, Table};

const SECTION_SEPARATOR: &str = "\n\n";

/// Assembles migration documents from a plan.
#[derive(Debug, Clone)]
pub struct MigrationGenerator {
    profile: Arc<DialectProfile>,
    create_table: CreateTableSql,
    drop_table: DropTableSql,
    create_index: CreateIndexSql,
    drop_index: DropIndexSql,
    alter_table: AlterTableSql,
}

impl MigrationGenerator {
    /// Creates a generator whose five DDL generators share one profile.
    #[must_use]
    pub fn new(dialect: impl Into<String>, profile: Arc<DialectProfile>) -> Self {
        let dialect = dialect.into();
        Self {
            create_table: CreateTableSql::new(dialect.clone(), Arc::clone(&profile)),
            drop_table: DropTableSql::new(dialect.clone(), Arc::clone(&profile)),
            create_index: CreateIndexSql::new(dialect.clone(), Arc::clone(&profile)),
            drop_index: DropIndexSql::new(dialect.clone(), Arc::clone(&profile)),
            alter_table: AlterTableSql::new(dialect, Arc::clone(&profile)),
            profile,
        }
    }

    /// Generator for the PostgreSQL profile.
    #[must_use]
    pub fn postgres() -> Self {
        Self::new(POSTGRES, Arc::new(DialectProfile::postgres()))
    }

    /// The profile every document is rendered with.
    #[must_use]
    pub fn dialect_options(&self) -> &DialectProfile {
        &self.profile
    }

    /// The `CREATE TABLE` generator.
    #[must_use]
    pub const fn create_table_generator(&self) -> &CreateTableSql {
        &self.create_table
    }

    /// The `DROP TABLE` generator.
    #[must_use]
    pub const fn drop_table_generator(&self) -> &DropTableSql {
        &self.drop_table
    }

    /// The `CREATE INDEX` generator.
    #[must_use]
    pub const fn create_index_generator(&self) -> &CreateIndexSql {
        &self.create_index
    }

    /// The `DROP INDEX` generator.
    #[must_use]
    pub const fn drop_index_generator(&self) -> &DropIndexSql {
        &self.drop_index
    }

    /// The `ALTER TABLE` generator.
    #[must_use]
    pub const fn alter_table_generator(&self) -> &AlterTableSql {
        &self.alter_table
    }

    /// Up document: created tables, altered tables, then dropped tables
    /// unless `skip_drop_table` is set.
    ///
    /// Returns `None` when there is nothing to migrate.
    #[must_use]
    pub fn up(&self, plan: &MigrationPlan, skip_drop_table: bool) -> Option<String> {
        let mut sections = vec![self.create_tables(&plan.created_tables)];
        sections.extend(plan.altered_tables.values().map(|s| self.alter_up(s)));
        if !skip_drop_table {
            sections.push(self.drop_tables(&plan.dropped_tables));
        }
        self.finish(&sections)
    }

    /// Down document: the mirror of [`MigrationGenerator::up`].
    ///
    /// Returns `None` when there is nothing to roll back.
    #[must_use]
    pub fn down(&self, plan: &MigrationPlan, skip_drop_table: bool) -> Option<String> {
        let mut sections = vec![self.drop_tables(&plan.created_tables)];
        sections.extend(plan.altered_tables.values().map(|s| self.alter_down(s)));
        if !skip_drop_table {
            sections.push(self.create_tables(&plan.dropped_tables));
        }
        self.finish(&sections)
    }

    /// `CREATE TABLE` and `CREATE INDEX` statements for every table, in
    /// order. Never wrapped in a transaction.
    #[must_use]
    pub fn full_schema(&self, tables: &[Table]) -> String {
        self.create_tables(tables)
    }

    fn finish(&self, sections: &[String]) -> Option<String> {
        let content = join_sections(sections);
        if content.is_empty() {
            return None;
        }
        if !self.profile.supports_transactional_ddl {
            return Some(content);
        }
        Some(join_sections(&[
            self.profile.begin_clause.to_string(),
            content,
            self.profile.commit_clause.to_string(),
        ]))
    }

    fn create_tables(&self, tables: &[Table]) -> String {
        let blocks: Vec<String> = tables
            .iter()
            .map(|table| {
                let mut b = SqlBuilder::new();
                self.create_table.generate(&mut b, table);
                let indexes = self.create_indexes(&table.name, &table.indexes);
                join_sections(&[b.into_string(), indexes])
            })
            .collect();
        join_sections(&blocks)
    }

    fn drop_tables(&self, tables: &[Table]) -> String {
        let statements: Vec<String> = tables
            .iter()
            .map(|table| {
                let mut b = SqlBuilder::new();
                self.drop_table.generate(&mut b, table);
                b.into_string()
            })
            .collect();
        join_sections(&statements)
    }

    fn create_indexes(&self, table: &str, indexes: &[Index]) -> String {
        let mut b = SqlBuilder::new();
        for index in indexes {
            self.create_index.generate(&mut b, table, index);
            b.newline();
        }
        b.into_string()
    }

    fn drop_indexes(&self, indexes: &[Index]) -> String {
        let mut b = SqlBuilder::new();
        for index in indexes {
            self.drop_index.generate(&mut b, index);
            b.newline();
        }
        b.into_string()
    }

    fn alter_up(&self, step: &AlterTableStep) -> String {
        let mut alter = SqlBuilder::new();
        self.alter_table.generate(&mut alter, step);
        join_sections(&[
            self.drop_indexes(&step.dropped_indexes),
            alter.into_string(),
            self.create_indexes(&step.name, &step.added_indexes),
        ])
    }

    fn alter_down(&self, step: &AlterTableStep) -> String {
        let mut alter = SqlBuilder::new();
        self.alter_table.rollback(&mut alter, step);
        join_sections(&[
            self.drop_indexes(&step.added_indexes),
            alter.into_string(),
            self.create_indexes(&step.name, &step.dropped_indexes),
        ])
    }
}

impl Default for MigrationGenerator {
    fn default() -> Self {
        Self::postgres()
    }
}

/// Trims each section, drops the empty ones and joins the rest with a blank
/// line.
fn join_sections(sections: &[String]) -> String {
    sections
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(SECTION_SEPARATOR)
}
