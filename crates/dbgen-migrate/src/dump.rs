//! Dump the current schema as declared schema files.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{GenerateError, Result};
use crate::source::SchemaSource;

/// Writes every table of `source` to `<dir>/<table>.json`.
///
/// The files use the declared schema format, so they can be loaded back as
/// target schemas or read through a `file://` source. Returns the written
/// paths in table order.
///
/// # Errors
///
/// Returns [`GenerateError::OutputExists`] if `dir` exists and `force` is
/// not set, or the first source, serialization or IO error.
pub async fn dump_schemas<S: SchemaSource>(
    source: &S,
    dir: &Path,
    force: bool,
) -> Result<Vec<PathBuf>> {
    if dir.exists() && !force {
        return Err(GenerateError::OutputExists(dir.to_path_buf()));
    }

    let tables = source.get_schemas().await?;
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(tables.len());
    for table in &tables {
        let path = dir.join(format!("{}.json", table.name));
        let content = serde_json::to_string_pretty(table)?;
        fs::write(&path, content)?;
        info!("Dumped table {} to {}", table.name, path.display());
        written.push(path);
    }
    Ok(written)
}
