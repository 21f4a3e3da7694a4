//! The migration generation pipeline.
//!
//! Fetch the current schema, plan against the declared schema, then write
//! the up file, the down file and the full-schema snapshot in that order.
//! The first failure stops the run.

use std::fs;
use std::path::{Path, PathBuf};

use dbgen_core::{MigrationGenerator, SchemaDiff, Table};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::output::OutputTarget;
use crate::source::SchemaSource;

/// Default location of the full-schema snapshot.
pub const FULL_SCHEMA_PATH: &str = "temp/fullschema/migration.sql";

/// Files written by one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Up migration, `None` when nothing changed.
    pub up: Option<PathBuf>,
    /// Down migration, `None` when nothing changed.
    pub down: Option<PathBuf>,
    /// Full-schema snapshot.
    pub full_schema: PathBuf,
}

impl PipelineReport {
    /// Returns `true` if no migration pair was written.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.up.is_none() && self.down.is_none()
    }
}

/// Generates the migration pair and the full-schema snapshot.
#[derive(Debug, Clone)]
pub struct MigrationPipeline {
    generator: MigrationGenerator,
    target: Vec<Table>,
    output: OutputTarget,
    full_schema_path: PathBuf,
}

impl MigrationPipeline {
    /// Creates a pipeline migrating towards `target`.
    #[must_use]
    pub fn new(
        generator: MigrationGenerator,
        target: Vec<Table>,
        output: OutputTarget,
        full_schema_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            generator,
            target,
            output,
            full_schema_path: full_schema_path.into(),
        }
    }

    /// Runs the pipeline against the current schema of `source`.
    ///
    /// # Errors
    ///
    /// Returns the first source or IO error. Later steps are not attempted.
    pub async fn run<S: SchemaSource>(&self, source: &S) -> Result<PipelineReport> {
        let current = source.get_schemas().await?;
        debug!(
            "Loaded {} current and {} target tables",
            current.len(),
            self.target.len()
        );

        let plan = SchemaDiff::new(&current, &self.target).plan();
        debug!(
            "Plan: {} created, {} dropped, {} altered tables",
            plan.created_tables.len(),
            plan.dropped_tables.len(),
            plan.altered_tables.len()
        );
        let skip = self.output.skip_drop_table;

        info!("Generating up database migration file");
        let up = write_document(self.generator.up(&plan, skip), self.output.up_path())?;

        info!("Generating down database migration file");
        let down = match write_document(self.generator.down(&plan, skip), self.output.down_path())
        {
            Ok(down) => down,
            Err(e) => {
                if let Some(up) = &up {
                    remove_partial(up);
                }
                return Err(e);
            }
        };

        info!("Generating full schema migration file");
        write_file(&self.full_schema_path, &self.generator.full_schema(&self.target))?;
        info!("Target file: {}", self.full_schema_path.display());

        Ok(PipelineReport {
            up,
            down,
            full_schema: self.full_schema_path.clone(),
        })
    }
}

fn write_document(content: Option<String>, path: PathBuf) -> Result<Option<PathBuf>> {
    let Some(content) = content else {
        warn!("No changes detected, skipping {}", path.display());
        return Ok(None);
    };
    write_file(&path, &content)?;
    info!("Target file: {}", path.display());
    Ok(Some(path))
}

/// An up file without its down file is never left behind.
fn remove_partial(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!("Removed {}", path.display()),
        Err(e) => warn!("Failed to remove {}: {e}", path.display()),
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}
