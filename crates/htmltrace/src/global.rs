//! Process-wide default tracer, rooted at the working directory

use htmltrace_core::{ConfigUpdate, TraceConfig};
use htmltrace_logs::Color;
use once_cell::sync::Lazy;
use std::backtrace::Backtrace;
use std::panic::{self, UnwindSafe};

use crate::guard::{inside_guard, panic_message};
use crate::tracer::Tracer;

static GLOBAL: Lazy<Tracer> = Lazy::new(Tracer::default);

/// The default tracer used by the free functions and macros
pub fn global() -> &'static Tracer {
    &GLOBAL
}

/// Merge `config` into the default tracer's configuration. Empty strings and
/// zero limits keep their previous values.
pub fn set_config(config: impl Into<ConfigUpdate>) {
    GLOBAL.update_config(&config.into());
}

/// Snapshot of the default tracer's configuration
pub fn config() -> TraceConfig {
    GLOBAL.config()
}

pub fn set_user_tag(user_tag: impl Into<String>) {
    GLOBAL.set_user_tag(user_tag);
}

pub fn trace(message: &str) {
    GLOBAL.trace(message);
}

pub fn trace_with_color(color: impl Into<Color>, message: &str) {
    GLOBAL.trace_with_color(&color.into(), message);
}

pub fn error(message: &str) {
    GLOBAL.error(message);
}

pub fn session_error(message: &str) {
    GLOBAL.session_error(message);
}

/// Run `f` on the default tracer, reporting a panic instead of unwinding
pub fn recover<F, R>(f: F) -> Option<R>
where
    F: FnOnce() -> R + UnwindSafe,
{
    GLOBAL.recover(f)
}

/// Report every panic through the default tracer, then run the previously
/// installed hook.
///
/// The stack is captured at the panic site. Panics inside [`recover`] are
/// left to the guard, which reports them once.
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if !inside_guard() {
            let stack = Backtrace::force_capture();
            let mut message = panic_message(info.payload());
            if let Some(location) = info.location() {
                message = format!("{} at {}:{}", message, location.file(), location.line());
            }
            GLOBAL.report_exception(&message, &stack.to_string());
        }
        previous(info);
    }));
}
