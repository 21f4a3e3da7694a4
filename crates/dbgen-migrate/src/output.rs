//! Migration file naming.
//!
//! A migration is a pair of files in one directory sharing a stem:
//! `<dir>/<stem>.up<ext>` and `<dir>/<stem>.down<ext>`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::{GenerateError, Result};

/// Extension used when the output name carries none.
pub const DEFAULT_MIGRATION_EXT: &str = ".sql";

/// Timestamp prefix format of generated migration names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Where the up/down pair of one migration is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    directory: PathBuf,
    stem: String,
    extension: String,
    /// Leave dropped tables out of both documents.
    pub skip_drop_table: bool,
}

impl OutputTarget {
    /// Creates a target named `<timestamp>_<name>`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::InvalidOutputTarget`] if `name` contains a
    /// path separator.
    pub fn new(
        directory: impl Into<PathBuf>,
        name: &str,
        skip_drop_table: bool,
        timestamp: DateTime<Utc>,
    ) -> Result<Self> {
        let prefixed = format!("{}_{name}", timestamp.format(TIMESTAMP_FORMAT));
        Self::build(directory.into(), name, &prefixed, skip_drop_table)
    }

    /// Creates a target using `name` as is.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::InvalidOutputTarget`] if `name` contains a
    /// path separator.
    pub fn exact(directory: impl Into<PathBuf>, name: &str, skip_drop_table: bool) -> Result<Self> {
        Self::build(directory.into(), name, name, skip_drop_table)
    }

    fn build(directory: PathBuf, requested: &str, name: &str, skip_drop_table: bool) -> Result<Self> {
        if requested.is_empty() || requested.contains('/') {
            return Err(GenerateError::InvalidOutputTarget(requested.to_string()));
        }

        let extension = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"));
        let (stem, extension) = match extension {
            Some(ext) => (name.strip_suffix(&ext).unwrap_or(name).to_string(), ext),
            None => (name.to_string(), DEFAULT_MIGRATION_EXT.to_string()),
        };

        Ok(Self {
            directory,
            stem,
            extension,
            skip_drop_table,
        })
    }

    /// Output directory.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// File name without direction or extension.
    #[must_use]
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Path of the up migration.
    #[must_use]
    pub fn up_path(&self) -> PathBuf {
        self.directory
            .join(format!("{}.up{}", self.stem, self.extension))
    }

    /// Path of the down migration.
    #[must_use]
    pub fn down_path(&self) -> PathBuf {
        self.directory
            .join(format!("{}.down{}", self.stem, self.extension))
    }
}
