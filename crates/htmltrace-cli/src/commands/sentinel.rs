//! enable and disable commands - manage the sentinel files

use anyhow::{Context, Result};
use htmltrace::global;
use htmltrace_core::SENTINEL_FILES;

use crate::output::{print_info, print_success};

pub fn enable() -> Result<()> {
    let root = global().root();
    if global().is_enabled() {
        print_info("File output is already enabled");
        return Ok(());
    }

    let path = root.join(SENTINEL_FILES[0]);
    std::fs::write(&path, "")
        .with_context(|| format!("Failed to create {}", path.display()))?;
    print_success(&format!("File output enabled ({})", path.display()));
    Ok(())
}

pub fn disable() -> Result<()> {
    let root = global().root();
    let mut removed = 0;
    for name in SENTINEL_FILES {
        let path = root.join(name);
        if path.is_file() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
            removed += 1;
        }
    }

    if removed == 0 {
        print_info("File output is already disabled");
    } else {
        print_success(&format!("File output disabled ({} sentinel file(s) removed)", removed));
    }
    Ok(())
}
