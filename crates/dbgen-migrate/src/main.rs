//! dbgen CLI
//!
//! Command-line tool for generating SQL migration files.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use dbgen_migrate::prelude::*;

/// Generate SQL migrations by diffing declared schemas against a database.
#[derive(Parser)]
#[command(name = "dbgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an up/down migration pair.
    GenMigration {
        /// Connection string (postgres://..., file://<dir>).
        #[arg(short, long, env = "DATABASE_URL")]
        connection: String,

        /// Migrations directory.
        #[arg(short, long, default_value = "db/migration")]
        dir: PathBuf,

        /// Migration name, prefixed with a timestamp.
        #[arg(short, long)]
        output: String,

        /// Do not drop tables missing from the declared schemas.
        #[arg(long)]
        skip_drop_table: bool,

        /// Full-schema snapshot path.
        #[arg(long, default_value = FULL_SCHEMA_PATH)]
        full_schema: PathBuf,

        /// SQL dialect.
        #[arg(long, default_value = "postgres")]
        dialect: String,

        /// Schema files or directories.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Dump the current schema as JSON schema files.
    DumpDb {
        /// Connection string (postgres://..., file://<dir>).
        #[arg(short, long, env = "DATABASE_URL")]
        connection: String,

        /// Output directory.
        #[arg(short, long)]
        output: PathBuf,

        /// Write into an existing directory.
        #[arg(long)]
        force: bool,
    },

    /// Print the CREATE statements of declared schemas.
    Render {
        /// SQL dialect.
        #[arg(long, default_value = "postgres")]
        dialect: String,

        /// Schema files or directories.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

fn generator(dialect: &str) -> Result<MigrationGenerator> {
    let profile = DialectProfile::named(dialect)?;
    Ok(MigrationGenerator::new(dialect, Arc::new(profile)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::GenMigration {
            connection,
            dir,
            output,
            skip_drop_table,
            full_schema,
            dialect,
            paths,
        } => {
            let generator = generator(&dialect)?;
            let target = load_paths(&paths)?;
            info!("Loaded {} declared tables", target.len());

            let output = OutputTarget::new(dir, &output, skip_drop_table, chrono::Utc::now())?;
            let source = connect(&connection).await?;
            let pipeline = MigrationPipeline::new(generator, target, output, full_schema);

            let report = pipeline.run(&source).await?;
            if report.is_noop() {
                info!("No changes detected.");
            }
            info!("Database migration generation completed.");
        }

        Commands::DumpDb {
            connection,
            output,
            force,
        } => {
            let source = connect(&connection).await?;
            let written = dump_schemas(&source, &output, force).await?;
            info!("Dumped {} tables to {}", written.len(), output.display());
        }

        Commands::Render { dialect, paths } => {
            let tables = load_paths(&paths)?;
            println!("{}", generator(&dialect)?.full_schema(&tables));
        }
    }

    Ok(())
}
