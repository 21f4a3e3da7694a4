//! Schema sources.
//!
//! A [`SchemaSource`] produces the "current" schema set the declared
//! schemas are diffed against. Primary key membership is reported through
//! the owning column's options, never as an index.

use std::future::Future;
use std::path::PathBuf;
use std::sync::OnceLock;

use dbgen_core::prelude::*;
use regex::Regex;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info};

use crate::error::{GenerateError, Result};
use crate::loader;

/// Bookkeeping table of migration runners, never part of a schema.
pub const SCHEMA_MIGRATION_TABLE: &str = "schema_migrations";

/// Schema introspected by default.
pub const DEFAULT_SCHEMA: &str = "public";

const AUTO_INCREMENT_PATTERN: &str = r"nextval\('[^']+'::regclass\)";

/// Produces the current tables of a database.
pub trait SchemaSource {
    /// Returns every table with its columns and non-primary-key indexes.
    fn get_schemas(&self) -> impl Future<Output = Result<Vec<Table>>> + Send;
}

/// Opens the source named by a connection string.
///
/// `postgres://` and `postgresql://` connect to a live database;
/// `file://<dir>` reads a directory of dumped JSON schemas.
///
/// # Errors
///
/// Returns [`GenerateError::UnsupportedDriver`] for any other scheme, or
/// the connection error.
pub async fn connect(conn: &str) -> Result<AnySchemaSource> {
    if conn.starts_with("postgres://") || conn.starts_with("postgresql://") {
        let source = PostgresSchemaSource::connect(conn).await?;
        return Ok(AnySchemaSource::Postgres(source));
    }
    if let Some(dir) = conn.strip_prefix("file://") {
        return Ok(AnySchemaSource::Json(JsonSchemaSource::new(dir)));
    }
    Err(GenerateError::UnsupportedDriver(conn.to_string()))
}

/// Any source [`connect`] can open.
#[derive(Debug)]
pub enum AnySchemaSource {
    /// Live PostgreSQL database.
    Postgres(PostgresSchemaSource),
    /// Directory of JSON table files.
    Json(JsonSchemaSource),
}

impl SchemaSource for AnySchemaSource {
    async fn get_schemas(&self) -> Result<Vec<Table>> {
        match self {
            Self::Postgres(source) => source.get_schemas().await,
            Self::Json(source) => source.get_schemas().await,
        }
    }
}

// ================================================================
// JSON snapshots
// ================================================================

/// Reads tables from a directory of JSON schema files.
#[derive(Debug, Clone)]
pub struct JsonSchemaSource {
    dir: PathBuf,
}

impl JsonSchemaSource {
    /// Creates a source reading from `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SchemaSource for JsonSchemaSource {
    async fn get_schemas(&self) -> Result<Vec<Table>> {
        info!("Reading current schema from {}", self.dir.display());
        loader::load_paths(&[&self.dir])
    }
}

// ================================================================
// PostgreSQL catalog
// ================================================================

const TABLES_SQL: &str = r"
SELECT table_name::text
FROM information_schema.tables
WHERE table_schema = $1 AND table_type = 'BASE TABLE'
ORDER BY table_name
";

const COLUMNS_SQL: &str = r"
SELECT column_name::text,
       column_default::text,
       is_nullable::text,
       data_type::text,
       character_maximum_length::int4,
       numeric_precision::int4,
       numeric_scale::int4
FROM information_schema.columns
WHERE table_schema = $1 AND table_name = $2
ORDER BY ordinal_position
";

const PRIMARY_KEY_SQL: &str = r"
SELECT kcu.column_name::text
FROM information_schema.table_constraints tc
JOIN information_schema.key_column_usage kcu
  ON kcu.constraint_name = tc.constraint_name
 AND kcu.table_schema = tc.table_schema
 AND kcu.table_name = tc.table_name
WHERE tc.constraint_type = 'PRIMARY KEY'
  AND tc.table_schema = $1
  AND tc.table_name = $2
ORDER BY kcu.ordinal_position
LIMIT 1
";

const INDEXES_SQL: &str = r"
SELECT i.relname::text,
       ix.indisunique,
       a.attname::text,
       (ix.indoption[(k.n - 1)::int]::int & 1) = 1
FROM pg_class t
JOIN pg_namespace ns ON ns.oid = t.relnamespace
JOIN pg_index ix ON ix.indrelid = t.oid
JOIN pg_class i ON i.oid = ix.indexrelid
CROSS JOIN LATERAL unnest(ix.indkey::int2[]) WITH ORDINALITY AS k(attnum, n)
JOIN pg_attribute a ON a.attrelid = t.oid AND a.attnum = k.attnum
WHERE ns.nspname = $1
  AND t.relname = $2
  AND NOT ix.indisprimary
ORDER BY i.relname, k.n
";

/// Reads tables from the PostgreSQL system catalogs.
#[derive(Debug, Clone)]
pub struct PostgresSchemaSource {
    pool: PgPool,
    schema: String,
}

impl PostgresSchemaSource {
    /// Wraps an existing pool, reading the `public` schema.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            schema: DEFAULT_SCHEMA.to_string(),
        }
    }

    /// Connects to `url`.
    ///
    /// # Errors
    ///
    /// Returns the connection error.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new().max_connections(5).connect(url).await?;
        Ok(Self::new(pool))
    }

    /// Reads another schema than `public`.
    #[must_use]
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    async fn table_names(&self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(TABLES_SQL)
            .bind(&self.schema)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(name,)| name)
            .filter(|name| name != SCHEMA_MIGRATION_TABLE)
            .collect())
    }

    async fn fields(&self, table: &str) -> Result<Vec<Field>> {
        let primary_key: Option<(String,)> = sqlx::query_as(PRIMARY_KEY_SQL)
            .bind(&self.schema)
            .bind(table)
            .fetch_optional(&self.pool)
            .await?;
        let primary_key = primary_key.map(|(column,)| column);

        let rows: Vec<ColumnRow> = sqlx::query_as(COLUMNS_SQL)
            .bind(&self.schema)
            .bind(table)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| CatalogColumn::from(row).into_field(primary_key.as_deref()))
            .collect())
    }

    async fn indexes(&self, table: &str) -> Result<Vec<Index>> {
        let rows: Vec<(String, bool, String, bool)> = sqlx::query_as(INDEXES_SQL)
            .bind(&self.schema)
            .bind(table)
            .fetch_all(&self.pool)
            .await?;

        let mut indexes: Vec<Index> = Vec::new();
        for (name, unique, column, descending) in rows {
            let field = if descending {
                IndexField::desc(column)
            } else {
                IndexField::asc(column)
            };
            match indexes.last_mut() {
                Some(index) if index.name == name => index.fields.push(field),
                _ => indexes.push(Index {
                    name,
                    fields: vec![field],
                    unique,
                }),
            }
        }
        Ok(indexes)
    }
}

impl SchemaSource for PostgresSchemaSource {
    async fn get_schemas(&self) -> Result<Vec<Table>> {
        info!("Introspecting schema '{}'", self.schema);

        let mut tables = Vec::new();
        for name in self.table_names().await? {
            debug!("Introspecting table {name}");
            tables.push(Table {
                fields: self.fields(&name).await?,
                indexes: self.indexes(&name).await?,
                name,
            });
        }
        Ok(tables)
    }
}

type ColumnRow = (
    String,
    Option<String>,
    String,
    String,
    Option<i32>,
    Option<i32>,
    Option<i32>,
);

/// One row of `information_schema.columns`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogColumn {
    /// `column_name`
    pub name: String,
    /// `column_default`
    pub default: Option<String>,
    /// `is_nullable`, `YES` or `NO`.
    pub is_nullable: String,
    /// `data_type`
    pub data_type: String,
    /// `character_maximum_length`
    pub char_max_length: Option<i32>,
    /// `numeric_precision`
    pub numeric_precision: Option<i32>,
    /// `numeric_scale`
    pub numeric_scale: Option<i32>,
}

impl From<ColumnRow> for CatalogColumn {
    fn from(row: ColumnRow) -> Self {
        let (name, default, is_nullable, data_type, char_max_length, numeric_precision, numeric_scale) =
            row;
        Self {
            name,
            default,
            is_nullable,
            data_type,
            char_max_length,
            numeric_precision,
            numeric_scale,
        }
    }
}

impl CatalogColumn {
    /// Converts the row into a [`Field`]. `primary_key` is the table's first
    /// primary key column, if any.
    #[must_use]
    pub fn into_field(self, primary_key: Option<&str>) -> Field {
        let raw_default = self.default.as_deref().unwrap_or_default();

        let mut field_type = map_catalog_type(&self.data_type);
        if is_auto_increment(raw_default) {
            field_type = match field_type {
                FieldType::BigInt => FieldType::BigSerial,
                FieldType::Int => FieldType::Serial,
                FieldType::SmallInt => FieldType::SmallSerial,
                other => other,
            };
        }

        let mut field = Field::new(self.name.as_str(), field_type);
        field.default = parse_default_value(raw_default);

        match field.field_type.category() {
            TypeCategory::String => {
                field.limit = to_u32(self.char_max_length);
            }
            TypeCategory::Numeric => {
                field.limit = to_u32(self.numeric_precision);
                field.scale = to_u32(self.numeric_scale);
            }
            TypeCategory::Binary => {}
        }

        if primary_key == Some(self.name.as_str()) {
            field.options.push(FieldOption::PrimaryKey);
        }
        if self.is_nullable == "NO" {
            field.options.push(FieldOption::NotNull);
        }
        field
    }
}

fn to_u32(value: Option<i32>) -> u32 {
    value.and_then(|v| u32::try_from(v).ok()).unwrap_or(0)
}

/// Maps a catalog `data_type` to a column type. Unknown names are kept as
/// [`FieldType::Other`].
#[must_use]
pub fn map_catalog_type(data_type: &str) -> FieldType {
    match data_type {
        "timestamp without time zone" => FieldType::Timestamp,
        "timestamp with time zone" => FieldType::Timestamptz,
        "character varying" => FieldType::Varchar,
        "numeric" => FieldType::Decimal,
        "double precision" => FieldType::Float,
        "integer" => FieldType::Int,
        "boolean" => FieldType::Boolean,
        other => FieldType::parse_lenient(other),
    }
}

/// Whether a column default is a sequence call, i.e. a serial column.
#[must_use]
pub fn is_auto_increment(default: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(AUTO_INCREMENT_PATTERN).expect("Invalid sequence default regex")
        })
        .is_match(default)
}

/// Parses a catalog default expression.
///
/// Casts to text and timestamp types yield the unquoted literal, other casts
/// keep the raw value text. Bare numbers and booleans are parsed; anything
/// else, including sequence calls, yields `None`.
#[must_use]
pub fn parse_default_value(raw: &str) -> Option<DefaultValue> {
    if raw.is_empty() || is_auto_increment(raw) {
        return None;
    }

    if let Some((value, cast)) = raw.split_once("::") {
        return Some(match cast {
            "character varying"
            | "text"
            | "timestamp without time zone"
            | "timestamp with time zone" => {
                let value = value.strip_prefix('\'').unwrap_or(value);
                let value = value.strip_suffix('\'').unwrap_or(value);
                DefaultValue::String(value.replace("''", "'"))
            }
            _ => DefaultValue::String(value.to_string()),
        });
    }

    if let Ok(i) = raw.parse::<i64>() {
        return Some(DefaultValue::Integer(i));
    }
    if let Ok(f) = raw.parse::<f64>() {
        return Some(DefaultValue::Float(f));
    }
    match raw {
        "true" => Some(DefaultValue::Bool(true)),
        "false" => Some(DefaultValue::Bool(false)),
        _ => None,
    }
}
