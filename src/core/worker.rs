//! Background thread plumbing shared by the delivery engines

use super::error::{LoggerError, Result};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

pub(crate) fn spawn_named<F>(name: &str, body: F) -> Result<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .name(name.to_string())
        .spawn(body)
        .map_err(|e| {
            LoggerError::io_operation(
                "spawn worker thread",
                format!("Failed to spawn '{}'", name),
                e,
            )
        })
}

/// Wait for `handle` to finish, giving up after `timeout`.
///
/// Returns `false` on timeout or if the thread panicked.
pub(crate) fn join_with_timeout(handle: JoinHandle<()>, timeout: Duration) -> bool {
    let name = handle
        .thread()
        .name()
        .unwrap_or("logger worker")
        .to_string();
    let start = Instant::now();

    loop {
        if handle.is_finished() {
            // Thread finished, join it to check for panics
            if let Err(e) = handle.join() {
                eprintln!(
                    "[LOGGER ERROR] Thread '{}' panicked during shutdown: {}",
                    name,
                    panic_message(e.as_ref())
                );
                return false;
            }
            return true;
        }

        if start.elapsed() >= timeout {
            eprintln!(
                "[LOGGER WARNING] Thread '{}' did not finish within {:?}. \
                 Some logs may be lost.",
                name, timeout
            );
            return false;
        }

        // Small sleep to avoid busy-waiting
        thread::sleep(Duration::from_millis(5));
    }
}

/// Run `body`, reporting a panic on stderr instead of unwinding further so
/// the calling worker keeps serving.
pub(crate) fn isolate_panic(context: &str, body: impl FnOnce()) {
    if let Err(panic_info) = catch_unwind(AssertUnwindSafe(body)) {
        eprintln!(
            "[LOGGER CRITICAL] {} panicked: {}. The worker continues.",
            context,
            panic_message(panic_info.as_ref())
        );
    }
}

pub(crate) fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
