//! SQL file discovery and target-table file parsing.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Result, ScrubError};

/// Recursively collects every `.sql` file under `root`, sorted by path so
/// runs are deterministic. The extension match is case-insensitive.
///
/// # Errors
///
/// Returns [`ScrubError::DirectoryNotFound`] when `root` is not a directory
/// and [`ScrubError::Io`] when the walk fails.
pub fn find_sql_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(ScrubError::DirectoryNotFound(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| ScrubError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_sql = entry
            .path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("sql"));
        if is_sql {
            files.push(entry.path().to_path_buf());
        }
    }
    Ok(files)
}

/// Reads table names from a file, one per line. Blank lines and `#` comment
/// lines are skipped.
///
/// # Errors
///
/// Returns [`ScrubError::TablesFileNotFound`] when `path` is not a file and
/// [`ScrubError::Io`] when it cannot be read.
pub fn read_tables_file(path: &Path) -> Result<Vec<String>> {
    if !path.is_file() {
        return Err(ScrubError::TablesFileNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
