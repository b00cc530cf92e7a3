//! Sink implementations

pub mod console;
pub mod file;
pub mod memory;
pub mod stream;

pub use console::ConsoleSink;
pub use file::FileSink;
pub use memory::MemorySink;
pub use stream::StreamSink;

pub use crate::core::Sink;
