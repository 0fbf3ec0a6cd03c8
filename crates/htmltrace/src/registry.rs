//! Process-wide sinks, one per active file

use htmltrace_logs::{render_header, RotatingSink};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

pub(crate) type SharedSink = Arc<Mutex<RotatingSink>>;

static SINKS: Lazy<Mutex<HashMap<PathBuf, SharedSink>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// The sink of `path`, created on first use. Every tracer of the process
/// writing to `path` gets the same sink and so the same lock.
pub(crate) fn sink_for(path: &Path, max_size: u64) -> SharedSink {
    SINKS
        .lock()
        .entry(path.to_path_buf())
        .or_insert_with(|| {
            Arc::new(Mutex::new(
                RotatingSink::new(path.to_path_buf(), max_size).with_preamble(render_header()),
            ))
        })
        .clone()
}

/// Close the sink of `path`, and drop it unless a writer is holding it
pub(crate) fn release(path: &Path) {
    let mut sinks = SINKS.lock();
    let unused = match sinks.get(path) {
        Some(sink) => {
            sink.lock().close();
            Arc::strong_count(sink) == 1
        }
        None => return,
    };
    if unused {
        sinks.remove(path);
        debug!("Released sink for {}", path.display());
    }
}

/// Close every open handle. Sinks reopen on their next write.
pub(crate) fn close_all() {
    for sink in SINKS.lock().values() {
        sink.lock().close();
    }
}

#[cfg(test)]
pub(crate) fn is_cached(path: &Path) -> bool {
    SINKS.lock().contains_key(path)
}
