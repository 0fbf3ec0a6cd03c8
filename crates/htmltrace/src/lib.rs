//! htmltrace - Colorized HTML trace files
//!
//! Every call echoes the message on the console. While one of the sentinel
//! files (`TraceEnable.txt`, `TraceIntegraEnable.txt`, `Trace.txt`) exists in
//! the working directory, the message is also appended to
//! `Trace <label>/trace.html`, which is rotated past a size limit; the oldest
//! files of the directory are pruned beyond a count limit.
//!
//! ```no_run
//! use htmltrace::{trace, tracef, trace_color, trace_error, Color, TraceConfig};
//!
//! htmltrace::set_config(TraceConfig::new("MyApp").with_user_tag("User123"));
//!
//! trace!("Processing", 10, "items from database");
//! tracef!("Memory: {:.2} MB", 125.67);
//! trace_color!(Color::LIGHT_GREEN, "Success!", "Data saved");
//! trace_error!("Connection failed:", "timeout");
//!
//! htmltrace::recover(|| {
//!     // risky work; a panic here is written to the trace in red
//! });
//! ```

mod console;
mod global;
mod guard;
mod registry;
mod tracer;

pub use global::{
    config, error, global, install_panic_hook, recover, session_error, set_config, set_user_tag,
    trace, trace_with_color,
};
pub use htmltrace_core::{ConfigUpdate, Error, Result, SharedConfig, TraceConfig};
pub use htmltrace_logs::{join_args, Color};
pub use guard::panic_message;
pub use tracer::Tracer;

/// Trace values joined with spaces, in white
#[macro_export]
macro_rules! trace {
    ($($arg:expr),+ $(,)?) => {
        $crate::global().trace(&$crate::join_args(&[$(&$arg as &dyn ::std::fmt::Display),+]))
    };
}

/// Trace a `format!` string, in white
#[macro_export]
macro_rules! tracef {
    ($($arg:tt)+) => {
        $crate::global().trace(&::std::format!($($arg)+))
    };
}

/// Trace values joined with spaces, in the given color
#[macro_export]
macro_rules! trace_color {
    ($color:expr, $($arg:expr),+ $(,)?) => {
        $crate::global().trace_with_color(
            &$crate::Color::from($color),
            &$crate::join_args(&[$(&$arg as &dyn ::std::fmt::Display),+]),
        )
    };
}

/// Trace a `format!` string, in the given color
#[macro_export]
macro_rules! trace_colorf {
    ($color:expr, $($arg:tt)+) => {
        $crate::global().trace_with_color(&$crate::Color::from($color), &::std::format!($($arg)+))
    };
}

/// Trace values joined with spaces as an error (red, `** ` prefix)
#[macro_export]
macro_rules! trace_error {
    ($($arg:expr),+ $(,)?) => {
        $crate::global().error(&$crate::join_args(&[$(&$arg as &dyn ::std::fmt::Display),+]))
    };
}

/// Trace values joined with spaces as a session error (LightSalmon, `** ` prefix)
#[macro_export]
macro_rules! trace_session_error {
    ($($arg:expr),+ $(,)?) => {
        $crate::global().session_error(&$crate::join_args(&[$(&$arg as &dyn ::std::fmt::Display),+]))
    };
}
