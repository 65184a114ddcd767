//! Sink implementations

pub mod console;
#[cfg(feature = "file")]
pub mod file;
pub mod memory;
#[cfg(feature = "file")]
pub mod rotating_file;

pub use console::{ConsoleSink, ConsoleStream};
#[cfg(feature = "file")]
pub use file::FileSink;
pub use memory::MemorySink;
#[cfg(feature = "file")]
pub use rotating_file::{RotatingFileSink, RotationPolicy, RotationStrategy};

pub use crate::core::Sink;
