//! demo command - write a representative session

use anyhow::Result;
use htmltrace::{global, trace, trace_color, trace_colorf, trace_error, tracef, Color};
use std::thread;
use std::time::Duration;

use crate::cli::DemoArgs;

pub fn execute(args: DemoArgs) -> Result<()> {
    trace!("Application started");
    trace_color!(Color::LIGHT_BLUE, "Processing request...");
    tracef!("Processing {} items from {}", 10, "database");
    trace_error!("Failed to connect to database");
    htmltrace::session_error("Session timeout occurred");

    risky_operation(args.panic);

    let fail = args.panic;
    let workers: Vec<_> = (1..=args.workers)
        .map(|id| thread::spawn(move || worker(id, fail)))
        .collect();
    for handle in workers {
        let _ = handle.join();
    }

    trace_color!(Color::LIGHT_GREEN, "Success!", "Data saved");
    trace_colorf!(Color::YELLOW, "Warning: Low disk space ({:.1}% free)", 4.2);
    trace_color!(Color::CYAN, "Info:", "Cache cleared");
    trace!("Application finished");

    global().close_all();
    Ok(())
}

fn risky_operation(fail: bool) {
    htmltrace::recover(|| {
        trace!("Starting risky operation...");
        thread::sleep(Duration::from_millis(100));
        if fail {
            panic!("Something went wrong!");
        }
        trace!("Risky operation completed successfully");
    });
}

fn worker(id: u32, fail: bool) {
    htmltrace::recover(move || {
        trace_color!(Color::LIGHT_GREEN, "Worker", id, "started");
        thread::sleep(Duration::from_millis(100));
        if fail && id == 3 {
            panic!("Worker {} encountered an error", id);
        }
        trace_color!(Color::LIGHT_GREEN, "Worker", id, "finished");
    });
}
