//! Output sinks the renderer writes into

use crate::{Result, StencilError};
use std::io;

/// A text sink that remembers whether its last character was whitespace
///
/// The renderer uses [`TextOutput::last_is_whitespace`] to avoid
/// synthesizing a space right after one that is already there.
pub trait TextOutput {
    fn write(&mut self, text: &str) -> Result<()>;

    fn last_is_whitespace(&self) -> bool;
}

/// In-memory sink
#[derive(Debug, Default, Clone)]
pub struct StringOutput {
    buffer: String,
    last_is_whitespace: bool,
}

impl StringOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: String::with_capacity(capacity),
            last_is_whitespace: false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn into_string(self) -> String {
        self.buffer
    }

    /// Drop everything written so far
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.last_is_whitespace = false;
    }
}

impl TextOutput for StringOutput {
    fn write(&mut self, text: &str) -> Result<()> {
        if let Some(last) = text.chars().next_back() {
            self.last_is_whitespace = last.is_whitespace();
        }
        self.buffer.push_str(text);
        Ok(())
    }

    fn last_is_whitespace(&self) -> bool {
        self.last_is_whitespace
    }
}

/// Streams rendered text into any [`io::Write`]
pub struct WriterOutput<W: io::Write> {
    writer: W,
    last_is_whitespace: bool,
    bytes_written: usize,
}

impl<W: io::Write> WriterOutput<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            last_is_whitespace: false,
            bytes_written: 0,
        }
    }

    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush().map_err(StencilError::output)?;
        Ok(self.writer)
    }
}

impl<W: io::Write> TextOutput for WriterOutput<W> {
    fn write(&mut self, text: &str) -> Result<()> {
        self.writer
            .write_all(text.as_bytes())
            .map_err(StencilError::output)?;
        if let Some(last) = text.chars().next_back() {
            self.last_is_whitespace = last.is_whitespace();
        }
        self.bytes_written += text.len();
        Ok(())
    }

    fn last_is_whitespace(&self) -> bool {
        self.last_is_whitespace
    }
}
