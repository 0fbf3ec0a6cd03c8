//! Console fallback: message echo and failure reports

use colored::Colorize;
use htmltrace_logs::Color;
use std::io::{self, Write};
use tracing::debug;

/// Echo a message on stdout, tinted when the entry color has a terminal
/// equivalent.
///
/// A closed or broken stdout is ignored.
pub fn echo(color: &Color, message: &str) {
    let mut out = io::stdout().lock();
    let written = match terminal_color(color) {
        Some(c) if c != colored::Color::White => writeln!(out, "{}", message.color(c)),
        _ => writeln!(out, "{}", message),
    };
    if let Err(e) = written.and_then(|_| out.flush()) {
        debug!("Console echo dropped: {}", e);
    }
}

/// Report a failure that the tracer swallowed. A closed stderr is ignored.
pub fn report(context: &str, err: &dyn std::fmt::Display) {
    let mut out = io::stderr().lock();
    if let Err(e) = writeln!(out, "{} {}: {}", "✗".red(), context, err) {
        debug!("Console report dropped: {}", e);
    }
}

/// Map an HTML color name onto the terminal palette. `light*` names map to
/// the bright variants.
pub fn terminal_color(color: &Color) -> Option<colored::Color> {
    let name = color.as_str().to_lowercase();
    if let Ok(c) = name.parse::<colored::Color>() {
        return Some(c);
    }
    name.strip_prefix("light")
        .and_then(|rest| format!("bright {}", rest).parse::<colored::Color>().ok())
}
