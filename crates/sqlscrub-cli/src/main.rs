//! sqlscrub CLI
//!
//! Command-line tool that removes all data tied to a set of tables from the
//! SQL files under a directory.

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use sqlscrub_cli::files::read_tables_file;
use sqlscrub_cli::{run, Options, ScrubError};
use sqlscrub_core::TargetTables;

/// Remove all data tied to the given tables from SQL fixture files.
#[derive(Parser)]
#[command(name = "sqlscrub")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory to scan for .sql files.
    directory: PathBuf,

    /// Tables whose data should be removed.
    tables: Vec<String>,

    /// File with one table name per line (merged with positional tables).
    #[arg(short = 'f', long, env = "SQLSCRUB_TABLES_FILE")]
    tables_file: Option<PathBuf>,

    /// Report what would change without writing anything.
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
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

    let mut names = cli.tables;
    if let Some(path) = &cli.tables_file {
        names.extend(read_tables_file(path)?);
    }
    let tables = TargetTables::new(names);
    if tables.is_empty() {
        return Err(ScrubError::NoTables.into());
    }

    let summary = run(&cli.directory, &tables, Options { dry_run: cli.dry_run })?;
    info!(
        "done: {} rewritten, {} unchanged, {} skipped, {} failed",
        summary.rewritten, summary.unchanged, summary.skipped, summary.failed
    );
    if summary.failed > 0 {
        anyhow::bail!("{} files failed", summary.failed);
    }
    Ok(())
}
