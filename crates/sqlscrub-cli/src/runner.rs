//! Drives the scrubbing pipeline over every SQL file in a directory.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use sqlscrub_core::{pipeline, TargetTables};

use crate::error::Result;
use crate::files::find_sql_files;

/// Run-wide options.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Report what would change without writing anything.
    pub dry_run: bool,
}

/// What happened to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// The file never mentions a target table.
    Skipped,
    /// The pipeline ran but produced identical content.
    Unchanged,
    /// The file was rewritten (or would be, under `--dry-run`).
    Rewritten,
}

/// Counters for a whole run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub rewritten: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Scrubs every `.sql` file under `directory`. IO failures on single files
/// are logged and counted, not fatal.
///
/// # Errors
///
/// Returns an error when the directory itself cannot be walked.
pub fn run(directory: &Path, tables: &TargetTables, options: Options) -> Result<RunSummary> {
    let files = find_sql_files(directory)?;
    info!("found {} SQL files under {}", files.len(), directory.display());

    let mut summary = RunSummary::default();
    for path in &files {
        match process_file(path, tables, options) {
            Ok(FileOutcome::Rewritten) => {
                info!("rewrote {}", path.display());
                summary.rewritten += 1;
            }
            Ok(FileOutcome::Unchanged) => {
                debug!("unchanged {}", path.display());
                summary.unchanged += 1;
            }
            Ok(FileOutcome::Skipped) => {
                debug!("skipped {}", path.display());
                summary.skipped += 1;
            }
            Err(e) => {
                warn!("failed {}: {e}", path.display());
                summary.failed += 1;
            }
        }
    }
    Ok(summary)
}

/// Scrubs one file. A file whose content is removed completely is replaced
/// by a placeholder comment naming the tables that emptied it.
///
/// # Errors
///
/// Returns [`crate::ScrubError::Io`] when the file cannot be read or written.
pub fn process_file(path: &Path, tables: &TargetTables, options: Options) -> Result<FileOutcome> {
    let content = fs::read_to_string(path)?;

    let present = tables.present_in(&content);
    if present.is_empty() {
        return Ok(FileOutcome::Skipped);
    }

    let mut output = pipeline::process(&content, tables);
    if output == content {
        return Ok(FileOutcome::Unchanged);
    }
    if output.trim().is_empty() {
        output = pipeline::placeholder_comment(&present);
    }

    if !options.dry_run {
        fs::write(path, &output)?;
    }
    Ok(FileOutcome::Rewritten)
}
