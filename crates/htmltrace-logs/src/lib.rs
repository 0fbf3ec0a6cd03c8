//! htmltrace logs - Rotating HTML trace files
//!
//! - [`sink`]: the append-only active file and its rotation
//! - [`retention`]: pruning of old files in a trace directory
//! - [`format`]: page header and entry rendering

pub mod format;
pub mod retention;
pub mod sink;

pub use format::{escape_angle_brackets, join_args, render_entry, render_header, Color};
pub use retention::{enforce_limit, list_log_files};
pub use sink::RotatingSink;

use htmltrace_core::Result;
use std::path::Path;

/// Ensure a trace directory exists
pub fn ensure_trace_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}
