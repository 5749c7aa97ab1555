#![forbid(unsafe_code)]

//! Error type shared by the overlay and its collaborators.

use std::fmt;

/// Errors surfaced from a suggestion event.
///
/// The overlay never retries; every variant reaches the caller of the
/// triggering event unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestError {
    /// A text offset no longer fits the current text.
    InvalidLocation {
        /// The offending offset (grapheme index).
        offset: usize,
        /// Grapheme length of the text it was checked against.
        len: usize,
    },
    /// The suggestion source failed.
    Source(String),
    /// The renderer failed on item `index`.
    Render { index: usize, message: String },
    /// The selection listener failed.
    Listener(String),
}

impl SuggestError {
    /// Build a source failure.
    pub fn source(message: impl Into<String>) -> Self {
        Self::Source(message.into())
    }

    /// Build a listener failure.
    pub fn listener(message: impl Into<String>) -> Self {
        Self::Listener(message.into())
    }
}

impl fmt::Display for SuggestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLocation { offset, len } => {
                write!(f, "invalid location {offset} (text length {len})")
            }
            Self::Source(msg) => write!(f, "suggestion source failed: {msg}"),
            Self::Render { index, message } => {
                write!(f, "rendering suggestion {index} failed: {message}")
            }
            Self::Listener(msg) => write!(f, "selection listener failed: {msg}"),
        }
    }
}

impl std::error::Error for SuggestError {}
