//! Retention of log files in a trace directory

use htmltrace_core::{Error, Result, LOG_FILE_PATTERN};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{info, warn};

/// List the log files of `dir`, oldest first.
///
/// Files are ordered by modification time (creation time is not available
/// everywhere), ties broken by file name. A missing directory lists as empty.
pub fn list_log_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = glob::Pattern::new(LOG_FILE_PATTERN)
        .map_err(|e| Error::config(format!("Invalid log file pattern: {}", e)))?;

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
        Err(e) => return Err(e.into()),
    };

    let mut files: Vec<(SystemTime, PathBuf)> = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        if !pattern.matches(&name.to_string_lossy()) {
            continue;
        }
        let metadata = match entry.metadata() {
            Ok(m) if m.is_file() => m,
            // Vanished or not a regular file
            _ => continue,
        };
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        files.push((modified, entry.path()));
    }

    files.sort();
    Ok(files.into_iter().map(|(_, path)| path).collect())
}

/// Delete the single oldest log file of `dir` when it holds `max_files` or
/// more. Returns the removed path.
///
/// At most one file goes per call. A failed deletion is logged and reported
/// as `Ok(None)` so it never blocks the write that follows.
pub fn enforce_limit(dir: &Path, max_files: usize) -> Result<Option<PathBuf>> {
    prune_oldest(dir, max_files, |path| fs::remove_file(path))
}

fn prune_oldest<F>(dir: &Path, max_files: usize, remove: F) -> Result<Option<PathBuf>>
where
    F: FnOnce(&Path) -> io::Result<()>,
{
    let files = list_log_files(dir)?;
    if files.is_empty() || files.len() < max_files {
        return Ok(None);
    }

    let oldest = &files[0];
    match remove(oldest) {
        Ok(()) => {
            info!(
                "Removed oldest log file {} ({} files, limit {})",
                oldest.display(),
                files.len(),
                max_files
            );
            Ok(Some(oldest.clone()))
        }
        Err(e) => {
            warn!("Failed to remove old log file {}: {}", oldest.display(), e);
            Ok(None)
        }
    }
}
