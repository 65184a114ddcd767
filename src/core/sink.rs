//! Sink trait for log output destinations

use super::error::Result;

/// Destination for rendered log bytes.
///
/// The engine guarantees that at most one thread writes to a sink at a time,
/// so implementations only need to be `Send`.
pub trait Sink: Send {
    /// Write `bytes` in full. Partial writes must be reported as errors.
    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Push any buffered bytes to the underlying device.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write(bytes)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
