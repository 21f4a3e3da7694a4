//! Integration tests for the migration pipeline.
//!
//! The current schema comes from an in-memory source; declared schemas are
//! loaded from JSON files written into a temporary directory.

use std::fs;
use std::path::Path;

use dbgen_core::prelude::{Field, FieldOption, FieldType, Index, IndexField};
use dbgen_migrate::prelude::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

struct InMemory(Vec<Table>);

impl SchemaSource for InMemory {
    async fn get_schemas(&self) -> Result<Vec<Table>> {
        Ok(self.0.clone())
    }
}

struct Failing;

impl SchemaSource for Failing {
    async fn get_schemas(&self) -> Result<Vec<Table>> {
        Err(GenerateError::UnsupportedDriver("broken://".to_string()))
    }
}

// =============================================================================
// Fixtures
// =============================================================================

const DOCUMENTS: &str = r#"{
  "name": "documents",
  "fields": [
    { "name": "id", "type": "bigserial", "options": ["primary key"] },
    { "name": "name", "type": "varchar", "limit": 50, "options": ["not null"] },
    { "name": "approval", "type": "varchar", "limit": 50 },
    { "name": "created_at", "type": "timestamp", "options": ["not null"] },
    { "name": "updated_at", "type": "timestamp", "options": ["not null"] }
  ],
  "indexes": [
    {
      "name": "index_documents_on_name_approval",
      "fields": [{ "column": "name" }, { "column": "approval" }],
      "unique": true
    }
  ]
}"#;

fn current_documents() -> Table {
    Table::new("documents")
        .field(Field::new("id", FieldType::BigSerial).option(FieldOption::PrimaryKey))
        .field(Field::new("name", FieldType::Varchar).limit(200))
        .field(Field::new("release_date", FieldType::Timestamp))
        .field(Field::new("created_at", FieldType::Timestamp))
        .index(
            Index::new("index_documents_on_name")
                .field(IndexField::asc("name"))
                .unique(),
        )
}

fn legacy() -> Table {
    Table::new("legacy_reports")
        .field(Field::new("id", FieldType::Serial).option(FieldOption::PrimaryKey))
}

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("schemas")).unwrap();
        fs::write(dir.path().join("schemas/documents.json"), DOCUMENTS).unwrap();
        Self { dir }
    }

    fn path(&self, rel: &str) -> std::path::PathBuf {
        self.dir.path().join(rel)
    }

    fn pipeline(&self, skip_drop_table: bool) -> MigrationPipeline {
        let target = load_paths(&[self.path("schemas")]).unwrap();
        let output =
            OutputTarget::exact(self.path("db/migration"), "documents", skip_drop_table).unwrap();
        MigrationPipeline::new(
            MigrationGenerator::postgres(),
            target,
            output,
            self.path("temp/fullschema/migration.sql"),
        )
    }
}

fn statements(path: &Path) -> usize {
    fs::read_to_string(path).unwrap().matches(';').count()
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn writes_up_down_and_full_schema() {
    let ws = Workspace::new();
    let source = InMemory(vec![current_documents(), legacy()]);

    let report = ws.pipeline(false).run(&source).await.unwrap();
    let up = report.up.clone().unwrap();
    let down = report.down.clone().unwrap();
    assert_eq!(up, ws.path("db/migration/documents.up.sql"));
    assert_eq!(down, ws.path("db/migration/documents.down.sql"));
    assert!(!report.is_noop());

    let up_sql = fs::read_to_string(&up).unwrap();
    for expected in [
        "ADD COLUMN \"approval\" VARCHAR(50)",
        "ADD COLUMN \"updated_at\" TIMESTAMP NOT NULL",
        "DROP COLUMN \"release_date\"",
        "ALTER COLUMN \"name\" SET DATA TYPE VARCHAR(50)",
        "ALTER COLUMN \"name\" SET NOT NULL",
        "ALTER COLUMN \"created_at\" SET NOT NULL",
        "DROP INDEX IF EXISTS \"index_documents_on_name\";",
        "CREATE UNIQUE INDEX IF NOT EXISTS \"index_documents_on_name_approval\"",
        "DROP TABLE IF EXISTS \"legacy_reports\";",
    ] {
        assert!(up_sql.contains(expected), "missing {expected:?} in:\n{up_sql}");
    }

    let down_sql = fs::read_to_string(&down).unwrap();
    for expected in [
        "ADD COLUMN \"release_date\" TIMESTAMP",
        "DROP COLUMN \"approval\"",
        "DROP COLUMN \"updated_at\"",
        "ALTER COLUMN \"name\" SET DATA TYPE VARCHAR(200)",
        "ALTER COLUMN \"name\" DROP NOT NULL",
        "ALTER COLUMN \"created_at\" DROP NOT NULL",
        "DROP INDEX IF EXISTS \"index_documents_on_name_approval\";",
        "CREATE UNIQUE INDEX IF NOT EXISTS \"index_documents_on_name\"",
        "CREATE TABLE IF NOT EXISTS \"legacy_reports\"",
    ] {
        assert!(down_sql.contains(expected), "missing {expected:?} in:\n{down_sql}");
    }

    // BEGIN, drop index, alter, create index, drop table, COMMIT
    assert_eq!(statements(&up), 6);
    assert_eq!(statements(&down), 6);

    let full = fs::read_to_string(&report.full_schema).unwrap();
    assert!(full.starts_with("CREATE TABLE IF NOT EXISTS \"documents\""));
    assert!(!full.contains("BEGIN;"));
}

#[tokio::test]
async fn skip_drop_table_keeps_other_changes() {
    let ws = Workspace::new();
    let source = InMemory(vec![current_documents(), legacy()]);

    let report = ws.pipeline(true).run(&source).await.unwrap();
    let up_sql = fs::read_to_string(report.up.unwrap()).unwrap();
    let down_sql = fs::read_to_string(report.down.unwrap()).unwrap();

    assert!(!up_sql.contains("legacy_reports"));
    assert!(!down_sql.contains("legacy_reports"));
    assert!(up_sql.contains("ALTER TABLE IF EXISTS \"documents\""));
    assert_eq!(up_sql.matches(';').count(), 5);
    assert_eq!(down_sql.matches(';').count(), 5);
}

#[tokio::test]
async fn unchanged_schema_writes_no_migration() {
    let ws = Workspace::new();
    let target = load_paths(&[ws.path("schemas")]).unwrap();
    let source = InMemory(target);

    let report = ws.pipeline(false).run(&source).await.unwrap();
    assert!(report.is_noop());
    assert!(!ws.path("db/migration").exists());
    assert!(report.full_schema.exists());
}

#[tokio::test]
async fn source_failure_writes_nothing() {
    let ws = Workspace::new();

    let err = ws.pipeline(false).run(&Failing).await.unwrap_err();
    assert!(matches!(err, GenerateError::UnsupportedDriver(_)));
    assert!(!ws.path("db").exists());
    assert!(!ws.path("temp").exists());
}

#[tokio::test]
async fn failed_up_write_stops_the_run() {
    let ws = Workspace::new();
    // A file where the migrations directory should be makes every write fail.
    fs::write(ws.path("db"), "not a directory").unwrap();
    let source = InMemory(vec![current_documents()]);

    let err = ws.pipeline(false).run(&source).await.unwrap_err();
    assert!(matches!(err, GenerateError::Io(_)));
    assert!(!ws.path("temp/fullschema/migration.sql").exists());
}

#[tokio::test]
async fn failed_down_write_removes_up_file() {
    let ws = Workspace::new();
    // A directory in place of the down file makes only the down write fail.
    fs::create_dir_all(ws.path("db/migration/documents.down.sql")).unwrap();
    let source = InMemory(vec![current_documents()]);

    let err = ws.pipeline(false).run(&source).await.unwrap_err();
    assert!(matches!(err, GenerateError::Io(_)));
    assert!(!ws.path("db/migration/documents.up.sql").exists());
    assert!(!ws.path("temp/fullschema/migration.sql").exists());
}

#[tokio::test]
async fn json_dump_as_current_schema() {
    let ws = Workspace::new();
    let snapshot = ws.path("snapshot");
    dump_schemas(&InMemory(vec![current_documents()]), &snapshot, false)
        .await
        .unwrap();

    let source = JsonSchemaSource::new(&snapshot);
    let report = ws.pipeline(false).run(&source).await.unwrap();
    let up_sql = fs::read_to_string(report.up.unwrap()).unwrap();
    assert!(up_sql.contains("DROP COLUMN \"release_date\""));
}
