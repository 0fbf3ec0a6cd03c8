//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "htmltrace")]
#[command(version, about = "Write colorized, rotating HTML trace files")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (.toml, .yaml, .yml or .json); default: htmltrace.* in the working directory
    #[arg(short, long, global = true, env = "HTMLTRACE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Namespace label, names the "Trace <label>" directory
    #[arg(short, long, global = true)]
    pub label: Option<String>,

    /// User tag written after each timestamp
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Rotate the active file past this many bytes
    #[arg(long, global = true)]
    pub max_size: Option<u64>,

    /// Keep at most this many files in the trace directory
    #[arg(long, global = true)]
    pub max_files: Option<usize>,

    /// Output in JSON format instead of tables
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write an entry (words are joined with spaces)
    Write(WriteArgs),

    /// Write an error entry (red, "** " prefix)
    Error(MessageArgs),

    /// Write a session error entry (LightSalmon, "** " prefix)
    SessionError(MessageArgs),

    /// Enable file output by creating a sentinel file
    Enable,

    /// Disable file output by removing every sentinel file
    Disable,

    /// Show whether file output is on and list the trace files
    Status,

    /// Write a sample session, including a recovered panic
    Demo(DemoArgs),
}

#[derive(Args)]
pub struct WriteArgs {
    /// HTML color of the entry
    #[arg(long, default_value = "white")]
    pub color: String,

    /// Message words
    #[arg(required = true)]
    pub words: Vec<String>,
}

#[derive(Args)]
pub struct MessageArgs {
    /// Message words
    #[arg(required = true)]
    pub words: Vec<String>,
}

#[derive(Args)]
pub struct DemoArgs {
    /// Number of worker threads
    #[arg(long, default_value = "3")]
    pub workers: u32,

    /// Make the risky operation actually panic
    #[arg(long)]
    pub panic: bool,
}
