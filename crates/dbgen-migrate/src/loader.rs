//! Declared schema loading.
//!
//! Schema files are JSON documents holding either one table or an array of
//! tables. Paths may name files or directories; directories are walked
//! recursively and only `.json` files are read, in path order.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use dbgen_core::Table;
use serde_json::Value;
use tracing::debug;

use crate::error::{GenerateError, Result};

/// Loads and validates every table declared under `paths`.
///
/// # Errors
///
/// Fails on unreadable paths, undecodable or invalid files, and on table
/// names declared more than once.
pub fn load_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Table>> {
    let mut files = Vec::new();
    for path in paths {
        collect_files(path.as_ref(), &mut files)?;
    }

    let mut seen = HashSet::new();
    let mut tables = Vec::new();
    for file in files {
        for table in load_file(&file)? {
            if !seen.insert(table.name.clone()) {
                return Err(GenerateError::DuplicateTable(table.name));
            }
            tables.push(table);
        }
    }
    Ok(tables)
}

/// Loads and validates the tables of a single file.
///
/// # Errors
///
/// Returns [`GenerateError::SchemaFile`] naming `path` if the content cannot
/// be decoded or fails validation.
pub fn load_file(path: &Path) -> Result<Vec<Table>> {
    debug!("Loading schema file {}", path.display());
    let content = fs::read_to_string(path)?;

    let tables = decode(&content).map_err(|e| schema_file_error(path, &e))?;

    for table in &tables {
        table.validate().map_err(|e| schema_file_error(path, &e))?;
    }
    Ok(tables)
}

fn decode(content: &str) -> serde_json::Result<Vec<Table>> {
    match serde_json::from_str::<Value>(content)? {
        value @ Value::Array(_) => serde_json::from_value(value),
        value => serde_json::from_value(value).map(|table| vec![table]),
    }
}

fn schema_file_error(path: &Path, error: &dyn std::fmt::Display) -> GenerateError {
    GenerateError::SchemaFile {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}

fn collect_files(path: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    if !path.is_dir() {
        fs::metadata(path)?;
        files.push(path.to_path_buf());
        return Ok(());
    }

    let mut found = Vec::new();
    walk_json(path, &mut found)?;
    found.sort();
    files.extend(found);
    Ok(())
}

fn walk_json(dir: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk_json(&path, found)?;
        } else if path.extension().is_some_and(|ext| ext == "json") {
            found.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use dbgen_core::schema::SortOrder;
    use dbgen_core::types::{FieldOption, FieldType};

    use super::*;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_single_table_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "users.json",
            r#"{
                "name": "users",
                "fields": [
                    { "name": "id", "type": "BIGSERIAL", "options": ["Primary Key"] },
                    { "name": "email", "type": "varchar", "limit": 100, "default": "none" }
                ],
                "indexes": [
                    { "name": "index_users_on_email", "fields": [{ "column": "email" }], "unique": true }
                ]
            }"#,
        );

        let tables = load_paths(&[path]).unwrap();
        assert_eq!(tables.len(), 1);
        let users = &tables[0];
        assert_eq!(users.fields[0].field_type, FieldType::BigSerial);
        assert_eq!(users.fields[0].options, vec![FieldOption::PrimaryKey]);
        assert_eq!(users.fields[1].limit, 100);
        assert_eq!(users.indexes[0].fields[0].order, Some(SortOrder::Asc));
    }

    #[test]
    fn test_load_directory_recursively_in_path_order() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b/posts.json", r#"{ "name": "posts" }"#);
        write(
            dir.path(),
            "a.json",
            r#"[{ "name": "users" }, { "name": "accounts" }]"#,
        );
        write(dir.path(), "notes.txt", "not a schema");

        let tables = load_paths(&[dir.path()]).unwrap();
        let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["users", "accounts", "posts"]);
    }

    #[test]
    fn test_duplicate_table_across_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "one.json", r#"{ "name": "users" }"#);
        write(dir.path(), "two.json", r#"{ "name": "users" }"#);

        let err = load_paths(&[dir.path()]).unwrap_err();
        assert!(matches!(err, GenerateError::DuplicateTable(name) if name == "users"));
    }

    #[test]
    fn test_invalid_files_name_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let bad_type = write(
            dir.path(),
            "bad_type.json",
            r#"{ "name": "t", "fields": [{ "name": "c", "type": "money" }] }"#,
        );
        let err = load_paths(&[&bad_type]).unwrap_err();
        match err {
            GenerateError::SchemaFile { path, message } => {
                assert_eq!(path, bad_type);
                assert!(message.contains("invalid \"money\" as field type"));
            }
            other => panic!("unexpected error: {other}"),
        }

        let contradictory = write(
            dir.path(),
            "contradictory.json",
            r#"{ "name": "t", "fields": [{ "name": "c", "type": "int", "options": ["nullable", "not null"] }] }"#,
        );
        let err = load_paths(&[contradictory]).unwrap_err();
        assert!(matches!(err, GenerateError::SchemaFile { .. }));
    }

    #[test]
    fn test_missing_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_paths(&[dir.path().join("missing.json")]).unwrap_err();
        assert!(matches!(err, GenerateError::Io(_)));
    }
}
