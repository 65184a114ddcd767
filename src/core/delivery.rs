//! Sink write policy shared by both delivery engines
//!
//! A failed write is retried once. If the retry fails too, the payload is
//! handed to the [`FatalHandler`]. The default handler reports the failure
//! on stderr and aborts the process.
//!
//! A sink that panics during a write counts as a failed attempt.

use super::error::{LoggerError, Result};
use super::metrics::LoggerMetrics;
use super::sink::Sink;
use super::worker::panic_message;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Attempts made for one payload before it is declared undeliverable.
pub const WRITE_ATTEMPTS: u32 = 2;

/// A payload the sink refused twice in a row.
pub struct DeliveryFailure {
    pub error: LoggerError,
    /// The rendered bytes that could not be written
    pub payload: String,
}

impl fmt::Debug for DeliveryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliveryFailure")
            .field("error", &self.error)
            .field("payload_len", &self.payload.len())
            .finish()
    }
}

/// Called from the delivery thread once per undeliverable payload.
///
/// The handler decides how the process terminates. If it returns, the
/// engine keeps running with the next record or batch.
pub type FatalHandler = Arc<dyn Fn(DeliveryFailure) + Send + Sync>;

/// The default [`FatalHandler`]: report on stderr, then abort.
#[must_use]
pub fn abort_on_failure() -> FatalHandler {
    Arc::new(|failure: DeliveryFailure| {
        report_failure(&failure);
        std::process::abort();
    })
}

fn report_failure(failure: &DeliveryFailure) {
    #[cfg(feature = "console")]
    {
        use colored::Colorize;
        eprintln!(
            "{} {} ({} bytes lost)",
            "[LOGGER FATAL]".red().bold(),
            failure.error,
            failure.payload.len()
        );
    }
    #[cfg(not(feature = "console"))]
    eprintln!(
        "[LOGGER FATAL] {} ({} bytes lost)",
        failure.error,
        failure.payload.len()
    );
}

/// Write `payload` to `sink`, retrying once before escalating to `on_fatal`.
pub(crate) fn deliver(
    sink: &mut dyn Sink,
    payload: &str,
    metrics: &LoggerMetrics,
    on_fatal: &FatalHandler,
) {
    let first = match attempt_write(sink, payload) {
        Ok(()) => {
            metrics.record_write();
            return;
        }
        Err(e) => e,
    };

    metrics.record_retry();
    match attempt_write(sink, payload) {
        Ok(()) => {
            metrics.record_write();
        }
        Err(second) => {
            metrics.record_fatal_failure();
            let error = LoggerError::delivery(
                sink.name(),
                WRITE_ATTEMPTS,
                format!("{}; retry: {}", first, second),
            );
            on_fatal(DeliveryFailure {
                error,
                payload: payload.to_string(),
            });
        }
    }
}

/// One write attempt, with a panic in the sink turned into an error.
fn attempt_write(sink: &mut dyn Sink, payload: &str) -> Result<()> {
    match catch_unwind(AssertUnwindSafe(|| sink.write(payload.as_bytes()))) {
        Ok(result) => result,
        Err(panic_info) => Err(LoggerError::writer(format!(
            "Sink '{}' panicked: {}",
            sink.name(),
            panic_message(panic_info.as_ref())
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Fails the first `failures` writes, then records.
    struct FlakySink {
        failures: usize,
        written: Vec<String>,
    }

    impl Sink for FlakySink {
        fn write(&mut self, bytes: &[u8]) -> Result<()> {
            if self.failures > 0 {
                self.failures -= 1;
                return Err(LoggerError::writer("device busy"));
            }
            self.written.push(String::from_utf8_lossy(bytes).into_owned());
            Ok(())
        }

        fn name(&self) -> &str {
            "flaky"
        }
    }

    fn capture() -> (FatalHandler, Arc<Mutex<Vec<DeliveryFailure>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let handler: FatalHandler = Arc::new(move |failure| seen_clone.lock().push(failure));
        (handler, seen)
    }

    #[test]
    fn test_first_write_succeeds() {
        let (handler, seen) = capture();
        let metrics = LoggerMetrics::new();
        let mut sink = FlakySink { failures: 0, written: Vec::new() };

        deliver(&mut sink, "line\n", &metrics, &handler);

        assert_eq!(sink.written, vec!["line\n"]);
        assert_eq!(metrics.writes(), 1);
        assert_eq!(metrics.retries(), 0);
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_single_failure_is_retried() {
        let (handler, seen) = capture();
        let metrics = LoggerMetrics::new();
        let mut sink = FlakySink { failures: 1, written: Vec::new() };

        deliver(&mut sink, "line\n", &metrics, &handler);

        assert_eq!(sink.written, vec!["line\n"]);
        assert_eq!(metrics.retries(), 1);
        assert_eq!(metrics.writes(), 1);
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_second_failure_is_fatal() {
        let (handler, seen) = capture();
        let metrics = LoggerMetrics::new();
        let mut sink = FlakySink { failures: 2, written: Vec::new() };

        deliver(&mut sink, "lost\n", &metrics, &handler);

        assert!(sink.written.is_empty());
        assert_eq!(metrics.fatal_failures(), 1);

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].payload, "lost\n");
        assert!(matches!(
            seen[0].error,
            LoggerError::DeliveryFailed { attempts: 2, .. }
        ));
        assert!(seen[0].error.to_string().contains("flaky"));
    }

    /// Panics on the first `panics` writes, then records.
    struct PanickingSink {
        panics: usize,
        written: Vec<String>,
    }

    impl Sink for PanickingSink {
        fn write(&mut self, bytes: &[u8]) -> Result<()> {
            if self.panics > 0 {
                self.panics -= 1;
                panic!("sink exploded");
            }
            self.written.push(String::from_utf8_lossy(bytes).into_owned());
            Ok(())
        }

        fn name(&self) -> &str {
            "panicky"
        }
    }

    #[test]
    fn test_single_panic_is_retried() {
        let (handler, seen) = capture();
        let metrics = LoggerMetrics::new();
        let mut sink = PanickingSink { panics: 1, written: Vec::new() };

        deliver(&mut sink, "line\n", &metrics, &handler);

        assert_eq!(sink.written, vec!["line\n"]);
        assert_eq!(metrics.retries(), 1);
        assert_eq!(metrics.writes(), 1);
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_second_panic_is_fatal() {
        let (handler, seen) = capture();
        let metrics = LoggerMetrics::new();
        let mut sink = PanickingSink { panics: 2, written: Vec::new() };

        deliver(&mut sink, "lost\n", &metrics, &handler);

        assert!(sink.written.is_empty());
        assert_eq!(metrics.fatal_failures(), 1);

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].payload, "lost\n");
        let message = seen[0].error.to_string();
        assert!(message.contains("panicky"));
        assert!(message.contains("sink exploded"));
    }
}
