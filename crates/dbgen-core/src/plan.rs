//! Migration plan types produced by the diff engine.

use std::collections::BTreeMap;

use crate::schema::{Field, Index, Table};

/// A nullability change on an existing column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionAction {
    /// `ALTER COLUMN .. DROP NOT NULL`
    DropNotNull,
    /// `ALTER COLUMN .. SET NOT NULL`
    SetNotNull,
}

impl OptionAction {
    /// The action that undoes this one.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::DropNotNull => Self::SetNotNull,
            Self::SetNotNull => Self::DropNotNull,
        }
    }
}

/// Changes to one column present on both sides of a diff.
#[derive(Debug, Clone, PartialEq)]
pub struct AlterColumnStep {
    /// Desired column definition.
    pub field: Field,
    /// Current column definition, used for rollback.
    pub previous: Field,
    /// Type tag, limit or scale changed.
    pub type_changed: bool,
    /// Default value changed.
    pub default_changed: bool,
    /// Nullability actions, in order.
    pub option_actions: Vec<OptionAction>,
}

impl AlterColumnStep {
    /// Column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.field.name
    }

    /// Returns `true` if anything about the column changed.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.type_changed || self.default_changed || !self.option_actions.is_empty()
    }
}

/// Column and index changes for one table present on both sides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterTableStep {
    /// Table name.
    pub name: String,
    /// Columns to add.
    pub added_columns: Vec<Field>,
    /// Columns to drop.
    pub dropped_columns: Vec<Field>,
    /// Columns altered in place.
    pub altered_columns: Vec<AlterColumnStep>,
    /// Indexes to create, with their new definition.
    pub added_indexes: Vec<Index>,
    /// Indexes to drop, with their old definition.
    pub dropped_indexes: Vec<Index>,
}

impl AlterTableStep {
    /// Creates an empty step for a table.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns `true` if any column or index changed.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.has_column_changes() || self.has_index_changes()
    }

    /// Returns `true` if any column was added, dropped or altered.
    #[must_use]
    pub fn has_column_changes(&self) -> bool {
        !self.added_columns.is_empty()
            || !self.dropped_columns.is_empty()
            || !self.altered_columns.is_empty()
    }

    /// Returns `true` if any index was added or dropped.
    #[must_use]
    pub fn has_index_changes(&self) -> bool {
        !self.added_indexes.is_empty() || !self.dropped_indexes.is_empty()
    }
}

/// Everything needed to migrate one schema set into another.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MigrationPlan {
    /// Tables only the target has, in target order.
    pub created_tables: Vec<Table>,
    /// Tables only the current schema has, in current order.
    pub dropped_tables: Vec<Table>,
    /// Non-empty alter steps keyed (and iterated) by table name.
    pub altered_tables: BTreeMap<String, AlterTableStep>,
}

impl MigrationPlan {
    /// Returns `true` if the plan changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.created_tables.is_empty()
            && self.dropped_tables.is_empty()
            && self.altered_tables.is_empty()
    }
}
