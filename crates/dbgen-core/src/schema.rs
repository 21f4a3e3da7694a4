//! Schema representation types.
//!
//! These types describe the structure of database tables. The same model is
//! produced by decoding declared schema files and by introspecting a live
//! database, so the diff engine can compare the two directly.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, SchemaError};
use crate::types::{FieldOption, FieldType};

/// Anything identified by name inside a table or a schema set.
pub trait Named {
    /// Returns the identifying name.
    fn name(&self) -> &str;
}

/// Default value of a column.
///
/// Numeric defaults compare by value, so an integer `100` declared in a
/// schema file equals the `100.0` a catalog may report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    /// Boolean literal.
    Bool(bool),
    /// Integer literal.
    Integer(i64),
    /// Floating point literal.
    Float(f64),
    /// Textual literal, rendered quoted.
    String(String),
}

impl DefaultValue {
    #[allow(clippy::cast_precision_loss)]
    fn as_number(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl PartialEq for DefaultValue {
    #[allow(clippy::float_cmp)]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            _ => match (self.as_number(), other.as_number()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<i64> for DefaultValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for DefaultValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for DefaultValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A table column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Column name.
    pub name: String,
    /// Column type.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Scale, only meaningful for types that accept one.
    #[serde(default)]
    pub scale: u32,
    /// Length or precision, only meaningful for types that accept one.
    #[serde(default)]
    pub limit: u32,
    /// Default value.
    #[serde(default)]
    pub default: Option<DefaultValue>,
    /// Options in declared order.
    #[serde(default)]
    pub options: Vec<FieldOption>,
}

impl Field {
    /// Creates a column with no limit, default or options.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            scale: 0,
            limit: 0,
            default: None,
            options: Vec::new(),
        }
    }

    /// Sets the length or precision.
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the scale.
    #[must_use]
    pub const fn scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<DefaultValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Appends an option.
    #[must_use]
    pub fn option(mut self, option: FieldOption) -> Self {
        self.options.push(option);
        self
    }

    /// Effective nullability: `not null` and `primary key` imply NOT NULL,
    /// everything else is nullable.
    #[must_use]
    pub fn is_not_null(&self) -> bool {
        self.options
            .iter()
            .any(|o| matches!(o, FieldOption::NotNull | FieldOption::PrimaryKey))
    }

    /// Rejects option sets that assert both nullable and not null.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::ContradictoryNullability`] naming `table` and
    /// this column.
    pub fn validate(&self, table: &str) -> Result<()> {
        if self.is_not_null() && self.options.contains(&FieldOption::Nullable) {
            return Err(SchemaError::ContradictoryNullability {
                table: table.to_string(),
                column: self.name.clone(),
            });
        }
        Ok(())
    }
}

impl Named for Field {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Sort order of an indexed column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// `ASC`
    Asc,
    /// `DESC`
    Desc,
}

impl SortOrder {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = SchemaError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            _ => Err(SchemaError::InvalidEnumValue {
                kind: "sort order",
                value: s.to_string(),
            }),
        }
    }
}

impl Serialize for SortOrder {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_sql())
    }
}

impl<'de> Deserialize<'de> for SortOrder {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        tag.parse().map_err(serde::de::Error::custom)
    }
}

#[allow(clippy::unnecessary_wraps)]
const fn default_order() -> Option<SortOrder> {
    Some(SortOrder::Asc)
}

/// An explicit empty order means no order.
fn deserialize_order<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<SortOrder>, D::Error> {
    match Option::<String>::deserialize(deserializer)?.as_deref() {
        None | Some("") => Ok(None),
        Some(tag) => tag.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// One column of an index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexField {
    /// Indexed column.
    pub column: String,
    /// Sort order. Decoding defaults to ascending; `None` renders no suffix.
    #[serde(
        default = "default_order",
        deserialize_with = "deserialize_order",
        skip_serializing_if = "Option::is_none"
    )]
    pub order: Option<SortOrder>,
}

impl IndexField {
    /// Ascending index column.
    #[must_use]
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            order: Some(SortOrder::Asc),
        }
    }

    /// Descending index column.
    #[must_use]
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            order: Some(SortOrder::Desc),
        }
    }

    /// Index column without an explicit order.
    #[must_use]
    pub fn unordered(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            order: None,
        }
    }
}

/// A table index. Field order is significant for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Index {
    /// Index name.
    pub name: String,
    /// Indexed columns in order.
    #[serde(default)]
    pub fields: Vec<IndexField>,
    /// Whether this is a unique index.
    #[serde(default)]
    pub unique: bool,
}

impl Index {
    /// Creates a non-unique index with no columns.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            unique: false,
        }
    }

    /// Appends an indexed column.
    #[must_use]
    pub fn field(mut self, field: IndexField) -> Self {
        self.fields.push(field);
        self
    }

    /// Marks the index as unique.
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Names of the indexed columns in order.
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.column.as_str()).collect()
    }
}

impl Named for Index {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A table: name, columns and indexes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Table name.
    pub name: String,
    /// Columns in declared order.
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Indexes in declared order.
    #[serde(default)]
    pub indexes: Vec<Index>,
}

impl Table {
    /// Creates an empty table.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Adds a column.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds an index.
    #[must_use]
    pub fn index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    /// Gets a column by name.
    #[must_use]
    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Gets an index by name.
    #[must_use]
    pub fn get_index(&self, name: &str) -> Option<&Index> {
        self.indexes.iter().find(|i| i.name == name)
    }

    /// Checks name uniqueness of columns and indexes and the nullability of
    /// every column.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] found.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateColumn {
                    table: self.name.clone(),
                    column: field.name.clone(),
                });
            }
            field.validate(&self.name)?;
        }

        let mut seen = HashSet::new();
        for index in &self.indexes {
            if !seen.insert(index.name.as_str()) {
                return Err(SchemaError::DuplicateIndex {
                    table: self.name.clone(),
                    index: index.name.clone(),
                });
            }
        }
        Ok(())
    }
}

impl Named for Table {
    fn name(&self) -> &str {
        &self.name
    }
}
