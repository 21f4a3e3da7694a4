//! Column type and column option registries.
//!
//! Both are closed sets parsed case-insensitively from their textual tags.
//! Declared schemas may only use the supported tags; introspected schemas
//! can carry catalog type names this crate does not know about, which are
//! preserved through [`FieldType::Other`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SchemaError;

/// Broad category of a column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    /// Character data (`varchar`, `text`, `json`).
    String,
    /// Numbers, booleans and timestamps.
    Numeric,
    /// Binary encoded data (`jsonb`).
    Binary,
}

/// Column data type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldType {
    /// `bool`
    Boolean,
    /// `varchar`, accepts a length limit.
    Varchar,
    /// `text`
    Text,
    /// `smallint`
    SmallInt,
    /// `int`
    Int,
    /// `bigint`
    BigInt,
    /// `json`
    Json,
    /// `jsonb`
    Jsonb,
    /// `float`
    Float,
    /// `decimal`, accepts a precision and a scale.
    Decimal,
    /// `timestamp`
    Timestamp,
    /// `timestamptz`
    Timestamptz,
    /// `bigserial`
    BigSerial,
    /// `serial`
    Serial,
    /// `smallserial`
    SmallSerial,
    /// A type name outside the supported set, kept verbatim.
    Other(String),
}

impl FieldType {
    /// Every supported type, in registry order.
    pub const SUPPORTED: [Self; 15] = [
        Self::Boolean,
        Self::Varchar,
        Self::Text,
        Self::SmallInt,
        Self::Int,
        Self::BigInt,
        Self::Json,
        Self::Jsonb,
        Self::Decimal,
        Self::Float,
        Self::Timestamp,
        Self::Timestamptz,
        Self::BigSerial,
        Self::Serial,
        Self::SmallSerial,
    ];

    /// Returns the textual tag of this type.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Boolean => "bool",
            Self::Varchar => "varchar",
            Self::Text => "text",
            Self::SmallInt => "smallint",
            Self::Int => "int",
            Self::BigInt => "bigint",
            Self::Json => "json",
            Self::Jsonb => "jsonb",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::Timestamp => "timestamp",
            Self::Timestamptz => "timestamptz",
            Self::BigSerial => "bigserial",
            Self::Serial => "serial",
            Self::SmallSerial => "smallserial",
            Self::Other(name) => name,
        }
    }

    /// Maps a tag to a supported type, or keeps it as [`FieldType::Other`].
    ///
    /// Used for catalog type names, which must never fail to load.
    #[must_use]
    pub fn parse_lenient(tag: &str) -> Self {
        tag.parse().unwrap_or_else(|_| Self::Other(tag.to_string()))
    }

    /// Returns the category of this type.
    #[must_use]
    pub const fn category(&self) -> TypeCategory {
        match self {
            Self::Varchar | Self::Text | Self::Json => TypeCategory::String,
            Self::Jsonb => TypeCategory::Binary,
            _ => TypeCategory::Numeric,
        }
    }

    /// Whether the type accepts a length/precision limit.
    #[must_use]
    pub const fn has_limit(&self) -> bool {
        matches!(self, Self::Varchar | Self::Decimal)
    }

    /// Whether the type accepts a scale.
    #[must_use]
    pub const fn has_scale(&self) -> bool {
        matches!(self, Self::Decimal)
    }
}

impl FromStr for FieldType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        Self::SUPPORTED
            .into_iter()
            .find(|t| t.tag() == lowered)
            .ok_or_else(|| SchemaError::InvalidEnumValue {
                kind: "field type",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        tag.parse().map_err(serde::de::Error::custom)
    }
}

/// Column option tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldOption {
    /// `nullable`
    Nullable,
    /// `not null`
    NotNull,
    /// `auto increment`
    AutoIncrement,
    /// `unique`
    Unique,
    /// `primary key`
    PrimaryKey,
}

impl FieldOption {
    /// Every supported option, in registry order.
    pub const SUPPORTED: [Self; 5] = [
        Self::Nullable,
        Self::NotNull,
        Self::AutoIncrement,
        Self::Unique,
        Self::PrimaryKey,
    ];

    /// Returns the textual tag of this option.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Nullable => "nullable",
            Self::NotNull => "not null",
            Self::AutoIncrement => "auto increment",
            Self::Unique => "unique",
            Self::PrimaryKey => "primary key",
        }
    }
}

impl FromStr for FieldOption {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        Self::SUPPORTED
            .into_iter()
            .find(|o| o.tag() == lowered)
            .ok_or_else(|| SchemaError::InvalidEnumValue {
                kind: "field option",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for FieldOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Serialize for FieldOption {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for FieldOption {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        tag.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_type_case_insensitive() {
        assert_eq!("VARCHAR".parse::<FieldType>(), Ok(FieldType::Varchar));
        assert_eq!("BigSerial".parse::<FieldType>(), Ok(FieldType::BigSerial));
        assert_eq!("bool".parse::<FieldType>(), Ok(FieldType::Boolean));
    }

    #[test]
    fn test_parse_field_type_rejects_unknown() {
        let err = "uuid".parse::<FieldType>().unwrap_err();
        assert_eq!(
            err,
            SchemaError::InvalidEnumValue {
                kind: "field type",
                value: "uuid".to_string(),
            }
        );
        assert_eq!(err.to_string(), "invalid \"uuid\" as field type");
    }

    #[test]
    fn test_parse_lenient_preserves_unknown() {
        assert_eq!(FieldType::parse_lenient("bigint"), FieldType::BigInt);
        assert_eq!(
            FieldType::parse_lenient("uuid"),
            FieldType::Other("uuid".to_string())
        );
    }

    #[test]
    fn test_field_type_categories() {
        assert_eq!(FieldType::Varchar.category(), TypeCategory::String);
        assert_eq!(FieldType::Json.category(), TypeCategory::String);
        assert_eq!(FieldType::Jsonb.category(), TypeCategory::Binary);
        assert_eq!(FieldType::Decimal.category(), TypeCategory::Numeric);
        assert!(FieldType::Varchar.has_limit());
        assert!(!FieldType::Varchar.has_scale());
        assert!(FieldType::Decimal.has_scale());
        assert!(!FieldType::Int.has_limit());
    }

    #[test]
    fn test_parse_field_option() {
        assert_eq!("NOT NULL".parse::<FieldOption>(), Ok(FieldOption::NotNull));
        assert_eq!(
            "primary key".parse::<FieldOption>(),
            Ok(FieldOption::PrimaryKey)
        );
        assert!("notnull".parse::<FieldOption>().is_err());
    }

    #[test]
    fn test_serde_uses_tags() {
        let json = serde_json::to_string(&FieldOption::AutoIncrement).unwrap();
        assert_eq!(json, "\"auto increment\"");
        let ty: FieldType = serde_json::from_str("\"Timestamptz\"").unwrap();
        assert_eq!(ty, FieldType::Timestamptz);
        assert!(serde_json::from_str::<FieldType>("\"money\"").is_err());
    }
}
