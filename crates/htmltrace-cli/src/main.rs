//! htmltrace CLI - write and inspect HTML trace files

use anyhow::{Context, Result};
use clap::Parser;
use htmltrace::{ConfigUpdate, TraceConfig};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};
use commands::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set JSON output mode if requested
    output::set_json_mode(cli.json);

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "htmltrace={0},htmltrace_logs={0},htmltrace_cli={0}",
                    log_level
                )
                .into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    configure(&cli)?;

    let result = match cli.command {
        Commands::Write(args) => message::write(args),
        Commands::Error(args) => message::error(args),
        Commands::SessionError(args) => message::session_error(args),
        Commands::Enable => sentinel::enable(),
        Commands::Disable => sentinel::disable(),
        Commands::Status => status::execute(),
        Commands::Demo(args) => demo::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Apply the config file, then command-line overrides, to the default tracer
fn configure(cli: &Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to read working directory")?;

    let file_update = match &cli.config {
        Some(path) => Some(ConfigUpdate::load(path)?),
        None => match ConfigUpdate::find_and_load(&cwd) {
            Ok((update, path)) => {
                debug!("Loaded config from {}", path.display());
                Some(update)
            }
            Err(_) => None,
        },
    };
    if let Some(update) = file_update {
        htmltrace::set_config(update);
    }

    htmltrace::set_config(ConfigUpdate {
        label: cli.label.clone(),
        user_tag: cli.user.clone(),
        max_size: cli.max_size,
        max_files: cli.max_files,
    });

    let config: TraceConfig = htmltrace::config();
    config.validate()?;
    debug!(?config, "Tracer configured");
    Ok(())
}
