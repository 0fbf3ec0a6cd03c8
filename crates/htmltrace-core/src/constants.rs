//! Constants and default values for htmltrace

use std::path::{Path, PathBuf};

/// Default namespace label (names the trace directory)
pub const DEFAULT_LABEL: &str = "Integra";

/// Default max size of the active file in bytes (5MB)
pub const DEFAULT_MAX_SIZE: u64 = 5_000_000;

/// Default max number of log files kept per trace directory
pub const DEFAULT_MAX_FILES: usize = 15;

/// Prefix of the trace directory name, followed by the label
pub const TRACE_DIR_PREFIX: &str = "Trace ";

/// Fixed name of the active file inside a trace directory
pub const ACTIVE_FILE: &str = "trace.html";

/// Pattern matching every log file (active and rotated) in a trace directory
pub const LOG_FILE_PATTERN: &str = "*.html";

/// Marker files enabling file output when present in the root directory
pub const SENTINEL_FILES: &[&str] = &["TraceEnable.txt", "TraceIntegraEnable.txt", "Trace.txt"];

/// chrono format of the timestamp at the start of every entry
pub const ENTRY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// chrono format of the prefix given to rotated files
pub const ROTATION_STAMP_FORMAT: &str = "%Y-%m-%d_%H_%M_%S";

/// Config file names searched for (in priority order)
pub const CONFIG_FILES: &[&str] = &[
    "htmltrace.toml",
    "htmltrace.yaml",
    "htmltrace.yml",
    "htmltrace.json",
];

/// Get the trace directory for a label under `root`
pub fn trace_dir(root: &Path, label: &str) -> PathBuf {
    root.join(format!("{}{}", TRACE_DIR_PREFIX, label))
}

/// Get the active file path for a label under `root`
pub fn active_path(root: &Path, label: &str) -> PathBuf {
    trace_dir(root, label).join(ACTIVE_FILE)
}

/// Check whether any sentinel file exists in `root`
pub fn sentinel_present(root: &Path) -> bool {
    SENTINEL_FILES.iter().any(|name| root.join(name).is_file())
}
