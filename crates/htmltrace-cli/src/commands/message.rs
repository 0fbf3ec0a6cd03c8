//! write, error and session-error commands

use anyhow::Result;
use htmltrace::Color;

use crate::cli::{MessageArgs, WriteArgs};

pub fn write(args: WriteArgs) -> Result<()> {
    htmltrace::trace_with_color(Color::named(args.color), &args.words.join(" "));
    Ok(())
}

pub fn error(args: MessageArgs) -> Result<()> {
    htmltrace::error(&args.words.join(" "));
    Ok(())
}

pub fn session_error(args: MessageArgs) -> Result<()> {
    htmltrace::session_error(&args.words.join(" "));
    Ok(())
}
