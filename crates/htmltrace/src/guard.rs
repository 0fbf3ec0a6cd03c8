//! Panic guard that records the stack at the panic site

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::panic::{self, UnwindSafe};
use std::sync::Once;

thread_local! {
    /// Number of guards active on this thread
    static DEPTH: Cell<usize> = const { Cell::new(0) };
    /// Stack captured by the hook for the innermost guard
    static CAPTURED: RefCell<Option<String>> = const { RefCell::new(None) };
}

static CAPTURE_HOOK: Once = Once::new();

/// A panic stopped by [`catch_panic`]
#[derive(Debug)]
pub(crate) struct CaughtPanic {
    pub message: String,
    pub stack: String,
}

/// Whether the current thread is running inside [`catch_panic`]
pub(crate) fn inside_guard() -> bool {
    DEPTH.with(|depth| depth.get() > 0)
}

/// Run `f`, stopping a panic and returning its message and the stack as it
/// was at the panic site.
///
/// Panics caught here skip the hooks installed before the first guard ran,
/// so they are not printed to stderr.
pub(crate) fn catch_panic<F, R>(f: F) -> Result<R, CaughtPanic>
where
    F: FnOnce() -> R + UnwindSafe,
{
    install_capture_hook();

    CAPTURED.with(|captured| captured.borrow_mut().take());
    DEPTH.with(|depth| depth.set(depth.get() + 1));
    let result = panic::catch_unwind(f);
    DEPTH.with(|depth| depth.set(depth.get() - 1));

    result.map_err(|payload| {
        let stack = CAPTURED
            .with(|captured| captured.borrow_mut().take())
            // Hook replaced after ours: only the unwound stack is left
            .unwrap_or_else(|| Backtrace::force_capture().to_string());
        CaughtPanic {
            message: panic_message(&*payload),
            stack,
        }
    })
}

fn install_capture_hook() {
    CAPTURE_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if inside_guard() {
                let stack = Backtrace::force_capture().to_string();
                CAPTURED.with(|captured| *captured.borrow_mut() = Some(stack));
            } else {
                previous(info);
            }
        }));
    });
}

/// Text of a panic payload (`&str` or `String`; anything else is opaque)
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
