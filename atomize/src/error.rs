//! Error types for the atomic-group rewriter
//!
//! This module provides error handling using the `thiserror` crate.
//! Rewriting itself has a single failure mode; the rest come from
//! compiling caller-supplied needles.

use thiserror::Error;

/// The main error type for pattern rewriting
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AtomizeError {
    /// A numbered backreference was found inside an atomic group.
    ///
    /// Emulating the group inserts new capturing groups, which would shift
    /// the meaning of the backreference.
    #[error(
        "numbered backreference `{backref}` at position {position} inside an atomic group is not supported"
    )]
    UnsupportedBackrefInAtomicGroup {
        /// The backreference as written, e.g. `\1`
        backref: String,
        /// Byte offset of the backreference in the pattern being rewritten
        position: usize,
    },

    /// A needle pattern could not be compiled
    #[error("invalid needle pattern: {0}")]
    InvalidNeedle(String),
}

impl From<regex::Error> for AtomizeError {
    fn from(err: regex::Error) -> Self {
        AtomizeError::InvalidNeedle(err.to_string())
    }
}

/// A span representing a location in the pattern, in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start position (inclusive)
    pub start: usize,
    /// End position (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Get the length of the span
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the span is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Slice the text covered by this span
    pub fn slice<'a>(&self, input: &'a str) -> &'a str {
        &input[self.start..self.end]
    }
}

/// Result type alias for rewriting operations
pub type Result<T> = std::result::Result<T, AtomizeError>;
