//! Append-only SQL text accumulator.

use std::fmt;

/// Accumulates SQL text for one output document.
///
/// Generators append to a builder passed in by the caller; a builder is
/// never shared between documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlBuilder {
    buf: String,
}

impl SqlBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub const fn new() -> Self {
        Self { buf: String::new() }
    }

    /// Appends a string fragment.
    pub fn write(&mut self, fragment: &str) -> &mut Self {
        self.buf.push_str(fragment);
        self
    }

    /// Appends a single character.
    pub fn write_char(&mut self, c: char) -> &mut Self {
        self.buf.push(c);
        self
    }

    /// Appends several characters in order.
    pub fn write_chars(&mut self, chars: &[char]) -> &mut Self {
        self.buf.extend(chars);
        self
    }

    /// Appends a line feed.
    pub fn newline(&mut self) -> &mut Self {
        self.write_char('\n')
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns the accumulated text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Consumes the builder, returning the accumulated text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.buf
    }
}

impl fmt::Display for SqlBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.buf)
    }
}
