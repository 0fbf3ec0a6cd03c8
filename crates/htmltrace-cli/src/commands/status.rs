//! status command - show the sentinel state and list trace files

use anyhow::Result;
use htmltrace::global;
use htmltrace_core::ACTIVE_FILE;
use htmltrace_logs::list_log_files;

use crate::output::{print_status, FileEntry};

pub fn execute() -> Result<()> {
    let tracer = global();
    let dir = tracer.trace_dir();

    // Newest first
    let files: Vec<FileEntry> = list_log_files(&dir)?
        .iter()
        .rev()
        .map(|path| FileEntry::from_path(path, ACTIVE_FILE))
        .collect();

    print_status(tracer.is_enabled(), &dir, &files);
    Ok(())
}
