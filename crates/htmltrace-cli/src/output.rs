//! Terminal output formatting

use chrono::{DateTime, Local};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

/// Global flag for JSON output mode
static JSON_MODE: AtomicBool = AtomicBool::new(false);

/// Enable or disable JSON output mode
pub fn set_json_mode(enabled: bool) {
    JSON_MODE.store(enabled, Ordering::SeqCst);
}

/// Check if JSON output mode is enabled
pub fn is_json_mode() -> bool {
    JSON_MODE.load(Ordering::SeqCst)
}

/// One trace file, as listed by `status`
#[derive(Debug, Clone, Serialize)]
pub struct FileEntry {
    pub name: String,
    pub size_bytes: u64,
    pub modified: Option<DateTime<Local>>,
    pub active: bool,
}

#[derive(Tabled)]
struct FileRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "file")]
    name: String,
    #[tabled(rename = "size")]
    size: String,
    #[tabled(rename = "modified")]
    modified: String,
}

/// JSON representation of `status`
#[derive(Serialize)]
pub struct StatusJson<'a> {
    pub enabled: bool,
    pub directory: String,
    pub files: &'a [FileEntry],
}

impl FileEntry {
    pub fn from_path(path: &Path, active_name: &str) -> Self {
        let metadata = std::fs::metadata(path).ok();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            active: name == active_name,
            name,
            size_bytes: metadata.as_ref().map(|m| m.len()).unwrap_or(0),
            modified: metadata
                .and_then(|m| m.modified().ok())
                .map(|t: SystemTime| DateTime::<Local>::from(t)),
        }
    }
}

pub fn print_status(enabled: bool, directory: &Path, files: &[FileEntry]) {
    if is_json_mode() {
        let status = StatusJson {
            enabled,
            directory: directory.display().to_string(),
            files,
        };
        match serde_json::to_string_pretty(&status) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error serializing to JSON: {}", e),
        }
        return;
    }

    let state = if enabled {
        "enabled".green()
    } else {
        "disabled".red()
    };
    println!("File output: {}", state);
    println!("Directory:   {}", directory.display());

    if files.is_empty() {
        println!("No trace files");
        return;
    }

    let rows: Vec<FileRow> = files
        .iter()
        .enumerate()
        .map(|(i, f)| FileRow {
            index: i + 1,
            name: if f.active {
                f.name.bold().to_string()
            } else {
                f.name.clone()
            },
            size: format_bytes(f.size_bytes),
            modified: f
                .modified
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::single(0)).with(Alignment::right()))
        .to_string();

    println!("{}", table);
}

pub fn format_bytes(bytes: u64) -> String {
    if bytes >= 1_073_741_824 {
        format!("{:.1}G", bytes as f64 / 1_073_741_824.0)
    } else if bytes >= 1_048_576 {
        format!("{:.1}M", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1024 {
        format!("{:.0}K", bytes as f64 / 1024.0)
    } else if bytes > 0 {
        format!("{}B", bytes)
    } else {
        "0B".to_string()
    }
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}
