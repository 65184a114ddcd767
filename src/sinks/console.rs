//! Console sink implementation

use crate::core::{LoggerError, Result, Sink};
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleStream {
    #[default]
    Stdout,
    Stderr,
}

/// Writes log bytes to the process's stdout or stderr.
///
/// Lines already carry their own color codes, so bytes are passed through
/// untouched.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    stream: ConsoleStream,
}

impl ConsoleSink {
    pub fn stdout() -> Self {
        Self {
            stream: ConsoleStream::Stdout,
        }
    }

    pub fn stderr() -> Self {
        Self {
            stream: ConsoleStream::Stderr,
        }
    }

    pub fn stream(&self) -> ConsoleStream {
        self.stream
    }

    fn write_to(out: &mut dyn Write, bytes: &[u8], stream: &str) -> Result<()> {
        out.write_all(bytes).and_then(|()| out.flush()).map_err(|e| {
            LoggerError::io_operation(format!("writing to {}", stream), "console write failed", e)
        })
    }
}

impl Sink for ConsoleSink {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        match self.stream {
            ConsoleStream::Stdout => Self::write_to(&mut io::stdout().lock(), bytes, "stdout"),
            ConsoleStream::Stderr => Self::write_to(&mut io::stderr().lock(), bytes, "stderr"),
        }
    }

    fn flush(&mut self) -> Result<()> {
        match self.stream {
            ConsoleStream::Stdout => io::stdout().flush()?,
            ConsoleStream::Stderr => io::stderr().flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        match self.stream {
            ConsoleStream::Stdout => "stdout",
            ConsoleStream::Stderr => "stderr",
        }
    }
}
