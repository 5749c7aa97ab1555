#![forbid(unsafe_code)]

//! Reference selection listeners that write the committed value into the anchor.

use std::fmt::Display;

use crate::anchor::TextAnchor;
use crate::error::SuggestError;
use crate::source::SelectionListener;

/// Inserts the committed value's text at a previously captured caret location.
///
/// The location is not re-read at commit time. If the text has shrunk below
/// it in the meantime the commit fails with
/// [`SuggestError::InvalidLocation`] and the text is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertAtCaret {
    location: usize,
}

impl InsertAtCaret {
    /// Insert at a fixed grapheme offset.
    pub const fn at(location: usize) -> Self {
        Self { location }
    }

    /// Capture the anchor's current caret.
    pub fn capture(anchor: &dyn TextAnchor) -> Self {
        Self::at(anchor.caret())
    }

    /// Re-capture the anchor's current caret.
    pub fn recapture(&mut self, anchor: &dyn TextAnchor) {
        self.location = anchor.caret();
    }

    /// The captured location.
    pub const fn location(&self) -> usize {
        self.location
    }
}

impl<T: Display> SelectionListener<T> for InsertAtCaret {
    fn selected(&mut self, value: &T, anchor: &mut dyn TextAnchor) -> Result<(), SuggestError> {
        anchor.insert_text(self.location, &value.to_string())
    }
}

/// Replaces the whole anchor text with the committed value's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaceText;

impl<T: Display> SelectionListener<T> for ReplaceText {
    fn selected(&mut self, value: &T, anchor: &mut dyn TextAnchor) -> Result<(), SuggestError> {
        anchor.set_text(&value.to_string());
        Ok(())
    }
}
