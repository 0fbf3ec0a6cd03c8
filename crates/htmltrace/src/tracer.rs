//! The tracer: entry point of every log call

use chrono::Local;
use htmltrace_core::{
    constants, ConfigUpdate, Result, SharedConfig, TraceConfig, ACTIVE_FILE,
};
use htmltrace_logs::{enforce_limit, ensure_trace_dir, escape_angle_brackets, render_entry, Color};
use parking_lot::Mutex;
use std::fs;
use std::panic::UnwindSafe;
use std::path::{Path, PathBuf};
use tracing::{error, warn};

use crate::{console, guard, registry};

/// Writes colored entries to the HTML trace file of its configured label.
///
/// Sentinel files and the trace directory are resolved against `root`.
/// Every call echoes to the console; file output only happens while a
/// sentinel file is present. Failures are reported on the console and never
/// reach the caller.
///
/// Tracers writing to the same file share one sink, so their writes and
/// rotations are serialized.
pub struct Tracer {
    root: PathBuf,
    config: SharedConfig,
    /// Active file of the last write
    current: Mutex<Option<PathBuf>>,
    echo: bool,
}

impl Tracer {
    /// Create a tracer rooted at the working directory
    pub fn new(config: TraceConfig) -> Self {
        Self::with_shared(SharedConfig::new(config))
    }

    /// Create a tracer reading a configuration shared with other owners
    pub fn with_shared(config: SharedConfig) -> Self {
        Self {
            root: PathBuf::from("."),
            config,
            current: Mutex::new(None),
            echo: true,
        }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Turn the console echo of messages on or off
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> TraceConfig {
        self.config.snapshot()
    }

    pub fn update_config(&self, update: &ConfigUpdate) {
        self.config.update(update);
    }

    pub fn set_user_tag(&self, user_tag: impl Into<String>) {
        self.config.set_user_tag(user_tag);
    }

    /// Whether file output is on. Checked again on every call.
    pub fn is_enabled(&self) -> bool {
        constants::sentinel_present(&self.root)
    }

    /// Directory of the current label
    pub fn trace_dir(&self) -> PathBuf {
        constants::trace_dir(&self.root, &self.config.snapshot().label)
    }

    /// Active file of the current label
    pub fn active_path(&self) -> PathBuf {
        self.trace_dir().join(ACTIVE_FILE)
    }

    /// Trace a message in white
    pub fn trace(&self, message: &str) {
        self.trace_with_color(&Color::WHITE, message);
    }

    /// Trace a message in `color`
    pub fn trace_with_color(&self, color: &Color, message: &str) {
        if self.echo {
            console::echo(color, message);
        }

        if !self.is_enabled() {
            return;
        }

        if let Err(e) = self.write_entry(color, message) {
            error!("Dropping trace entry: {}", e);
            console::report("Failed to write trace entry", &e);
        }
    }

    /// Trace an error: red, prefixed with `** `
    pub fn error(&self, message: &str) {
        self.trace_with_color(&Color::RED, &format!("** {}", message));
    }

    /// Trace a session error: LightSalmon, prefixed with `** `
    pub fn session_error(&self, message: &str) {
        self.trace_with_color(&Color::LIGHT_SALMON, &format!("** {}", message));
    }

    /// Trace a bypassed panic and its stack in red, `<` and `>` escaped
    pub fn report_exception(&self, message: &str, stack: &str) {
        self.trace_with_color(
            &Color::RED,
            &format!("Bypassing exception ({})", escape_angle_brackets(message)),
        );
        self.trace_with_color(
            &Color::RED,
            &format!(
                "**** Exception: <code>{}</code>",
                escape_angle_brackets(stack)
            ),
        );
    }

    /// Run `f`, reporting a panic instead of unwinding further.
    ///
    /// Returns `None` if `f` panicked. The recorded stack is the one at the
    /// panic site.
    pub fn recover<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce() -> R + UnwindSafe,
    {
        match guard::catch_panic(f) {
            Ok(value) => Some(value),
            Err(caught) => {
                self.report_exception(&caught.message, &caught.stack);
                None
            }
        }
    }

    /// Release every open trace file handle of the process. Files reopen on
    /// the next write.
    pub fn close_all(&self) {
        registry::close_all();
    }

    fn write_entry(&self, color: &Color, message: &str) -> Result<()> {
        let config = self.config.snapshot();
        config.validate()?;

        let dir = constants::trace_dir(&self.root, &config.label);
        ensure_trace_dir(&dir)?;
        let dir = fs::canonicalize(&dir).unwrap_or(dir);
        let path = dir.join(ACTIVE_FILE);
        self.switch_to(&path);

        let sink = registry::sink_for(&path, config.max_size);
        let mut sink = sink.lock();
        sink.set_max_size(config.max_size);
        // Creates the page before retention counts files. The append below
        // opens again and recovers if this failed.
        if let Err(e) = sink.ensure_open() {
            warn!("Cannot open {}: {}", sink.path().display(), e);
        }

        if let Err(e) = enforce_limit(&dir, config.max_files) {
            warn!("Retention skipped for {}: {}", dir.display(), e);
            console::report("Failed to remove old trace files", &e);
        }

        let entry = render_entry(&Local::now(), &config.user_tag, color, message);
        if let Err(e) = sink.append(&entry) {
            warn!(
                "Write to {} failed, rotating and retrying once: {}",
                sink.path().display(),
                e
            );
            sink.close();
            sink.rotate()?;
            sink.append(&entry)?;
        }

        Ok(())
    }

    /// Remember `path` as the active file, releasing the previous one when
    /// the label changed
    fn switch_to(&self, path: &Path) {
        let previous = self.current.lock().replace(path.to_path_buf());
        if let Some(previous) = previous {
            if previous != path {
                registry::release(&previous);
            }
        }
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self::new(TraceConfig::default())
    }
}
