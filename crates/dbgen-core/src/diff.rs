//! Schema diff engine.
//!
//! Compares a "from" (current database) and a "target" (declared) schema
//! set and produces a [`MigrationPlan`]. Tables, columns and indexes are
//! matched by name, never by position: reordering produces no change and a
//! rename is seen as a drop plus an add.

use std::collections::HashMap;

use crate::error::{Result, SchemaError};
use crate::plan::{AlterColumnStep, AlterTableStep, MigrationPlan, OptionAction};
use crate::schema::{Field, Index, Named, Table};

// ================================================================
// Name-keyed set difference
// ================================================================

/// Result of matching two collections by name.
#[derive(Debug)]
pub struct NamedDiff<'a, T> {
    /// Items only in the target, in target order.
    pub added: Vec<&'a T>,
    /// Items only in the source, in source order.
    pub dropped: Vec<&'a T>,
    /// `(from, target)` pairs sharing a name, in target order.
    pub common: Vec<(&'a T, &'a T)>,
}

/// Matches `from` and `target` by [`Named::name`].
#[must_use]
pub fn diff_named<'a, T: Named>(from: &'a [T], target: &'a [T]) -> NamedDiff<'a, T> {
    let from_map: HashMap<&str, &T> = from.iter().map(|t| (t.name(), t)).collect();
    let target_map: HashMap<&str, &T> = target.iter().map(|t| (t.name(), t)).collect();

    let mut added = Vec::new();
    let mut common = Vec::new();
    for item in target {
        match from_map.get(item.name()) {
            Some(existing) => common.push((*existing, item)),
            None => added.push(item),
        }
    }
    let dropped = from
        .iter()
        .filter(|item| !target_map.contains_key(item.name()))
        .collect();

    NamedDiff {
        added,
        dropped,
        common,
    }
}

// ================================================================
// Schema diff
// ================================================================

/// Compares two schema sets.
#[derive(Debug, Clone, Copy)]
pub struct SchemaDiff<'a> {
    from: &'a [Table],
    target: &'a [Table],
}

impl<'a> SchemaDiff<'a> {
    /// Creates a diff of `from` (current) against `target` (desired).
    #[must_use]
    pub const fn new(from: &'a [Table], target: &'a [Table]) -> Self {
        Self { from, target }
    }

    /// Tables present in the target but not in the current schema.
    #[must_use]
    pub fn created_tables(&self) -> Vec<Table> {
        diff_named(self.from, self.target)
            .added
            .into_iter()
            .cloned()
            .collect()
    }

    /// Tables present in the current schema but not in the target.
    #[must_use]
    pub fn dropped_tables(&self) -> Vec<Table> {
        diff_named(self.from, self.target)
            .dropped
            .into_iter()
            .cloned()
            .collect()
    }

    /// Column and index changes of a single table.
    ///
    /// The returned step may be empty.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingCurrentTable`] or
    /// [`SchemaError::MissingTargetTable`] when `name` is absent from one
    /// side.
    pub fn altered_table(&self, name: &str) -> Result<AlterTableStep> {
        let from = self
            .from
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| SchemaError::MissingCurrentTable(name.to_string()))?;
        let target = self
            .target
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| SchemaError::MissingTargetTable(name.to_string()))?;
        Ok(diff_table(from, target))
    }

    /// Builds the full migration plan. Only tables present on both sides are
    /// compared column by column, so this never fails.
    #[must_use]
    pub fn plan(&self) -> MigrationPlan {
        let tables = diff_named(self.from, self.target);

        let altered_tables = tables
            .common
            .iter()
            .map(|(from, target)| diff_table(from, target))
            .filter(AlterTableStep::has_changes)
            .map(|step| (step.name.clone(), step))
            .collect();

        MigrationPlan {
            created_tables: tables.added.into_iter().cloned().collect(),
            dropped_tables: tables.dropped.into_iter().cloned().collect(),
            altered_tables,
        }
    }
}

// ================================================================
// Table-level diff
// ================================================================

fn diff_table(from: &Table, target: &Table) -> AlterTableStep {
    let mut step = AlterTableStep::new(&target.name);

    let columns = diff_named(&from.fields, &target.fields);
    step.added_columns = columns.added.into_iter().cloned().collect();
    step.dropped_columns = columns.dropped.into_iter().cloned().collect();
    step.altered_columns = columns
        .common
        .into_iter()
        .map(|(previous, field)| diff_column(previous, field))
        .filter(AlterColumnStep::has_changes)
        .collect();

    diff_indexes(&from.indexes, &target.indexes, &mut step);
    step
}

/// Same-named indexes that differ in any way are dropped and recreated.
fn diff_indexes(from: &[Index], target: &[Index], step: &mut AlterTableStep) {
    let indexes = diff_named(from, target);

    step.dropped_indexes = indexes.dropped.into_iter().cloned().collect();
    step.added_indexes = indexes.added.into_iter().cloned().collect();
    for (existing, wanted) in indexes.common {
        if existing != wanted {
            step.dropped_indexes.push(existing.clone());
            step.added_indexes.push(wanted.clone());
        }
    }

    step.dropped_indexes.sort_by(|a, b| a.name.cmp(&b.name));
    step.added_indexes.sort_by(|a, b| a.name.cmp(&b.name));
}

fn diff_column(from: &Field, target: &Field) -> AlterColumnStep {
    AlterColumnStep {
        field: target.clone(),
        previous: from.clone(),
        type_changed: !same_type(from, target),
        default_changed: from.default != target.default,
        option_actions: option_actions(from, target),
    }
}

fn same_type(from: &Field, target: &Field) -> bool {
    if from.field_type != target.field_type {
        return false;
    }
    if target.field_type.has_limit() || target.field_type.has_scale() {
        return from.limit == target.limit && from.scale == target.scale;
    }
    true
}

fn option_actions(from: &Field, target: &Field) -> Vec<OptionAction> {
    match (from.is_not_null(), target.is_not_null()) {
        (false, true) => vec![OptionAction::SetNotNull],
        (true, false) => vec![OptionAction::DropNotNull],
        _ => vec![],
    }
}
