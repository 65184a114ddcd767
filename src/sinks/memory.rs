//! In-memory sink
//!
//! Keeps every write as a separate string. Clones share the same storage,
//! so a test can hand one clone to the logger and inspect another.

use crate::core::{LoggerError, Result, Sink};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    writes: Arc<Mutex<Vec<String>>>,
    failures: Arc<AtomicUsize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` writes fail.
    pub fn fail_next(&self, count: usize) {
        self.failures.store(count, Ordering::SeqCst);
    }

    /// Every successful write, in order.
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().clone()
    }

    /// All writes concatenated.
    pub fn contents(&self) -> String {
        self.writes.lock().concat()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().len()
    }

    pub fn clear(&self) {
        self.writes.lock().clear();
    }

    fn take_failure(&self) -> bool {
        self.failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl Sink for MemorySink {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        if self.take_failure() {
            return Err(LoggerError::writer("injected memory sink failure"));
        }
        self.writes
            .lock()
            .push(String::from_utf8_lossy(bytes).into_owned());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_storage() {
        let sink = MemorySink::new();
        let mut writer = sink.clone();
        writer.write(b"a").expect("write");
        writer.write(b"b").expect("write");

        assert_eq!(sink.writes(), vec!["a", "b"]);
        assert_eq!(sink.contents(), "ab");
        assert_eq!(sink.write_count(), 2);

        sink.clear();
        assert_eq!(writer.write_count(), 0);
    }

    #[test]
    fn test_injected_failures() {
        let mut sink = MemorySink::new();
        sink.fail_next(2);
        assert!(sink.write(b"x").is_err());
        assert!(sink.write(b"x").is_err());
        assert!(sink.write(b"y").is_ok());
        assert_eq!(sink.writes(), vec!["y"]);
    }
}
