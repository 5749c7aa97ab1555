#![forbid(unsafe_code)]

//! The anchor contract and a reference text field.
//!
//! The overlay talks to the input it decorates only through [`TextAnchor`].
//! [`TextField`] is a grapheme-aware implementation good enough for hosts
//! that have no input widget of their own.

use suggest_core::event::{KeyCode, KeyEvent};
use suggest_core::geometry::{Point, Rect, Size};
use suggest_core::text::{byte_offset, display_width, grapheme_count, line_column};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::SuggestError;

/// Where an attached anchor lives on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Surface {
    /// Anchor bounds in screen cells.
    pub anchor: Rect,
    /// Bounds of the top-level window containing the anchor.
    pub window: Rect,
    /// Size of the whole display.
    pub screen: Size,
}

impl Surface {
    /// An anchor inside a window that fills the screen.
    pub fn fullscreen(anchor: Rect, screen: Size) -> Self {
        Self {
            anchor,
            window: Rect::from_size(screen),
            screen,
        }
    }
}

/// A text input the overlay can be attached to.
///
/// Offsets are grapheme indices. Implementations must keep
/// `caret() <= grapheme_count(text())` and return selections ordered as
/// `(start, end)` with `start <= end`.
pub trait TextAnchor {
    /// Current text.
    fn text(&self) -> &str;

    /// Caret position.
    fn caret(&self) -> usize;

    /// Ordered selection bounds, `None` when nothing is selected.
    fn selection(&self) -> Option<(usize, usize)>;

    /// Move the caret, clamping to the text and clearing any selection.
    fn set_caret(&mut self, offset: usize);

    /// Insert `text` at `offset`.
    ///
    /// Fails with [`SuggestError::InvalidLocation`] before touching the text
    /// when `offset` is past the end.
    fn insert_text(&mut self, offset: usize, text: &str) -> Result<(), SuggestError>;

    /// Replace all text and move the caret to the end.
    fn set_text(&mut self, text: &str);

    /// Deliver a key event. Returns `true` if text, caret, or selection changed.
    fn handle_key(&mut self, key: &KeyEvent) -> bool;

    /// Deliver pasted text. Returns `true` if the text changed.
    fn handle_paste(&mut self, text: &str) -> bool {
        let caret = self.caret();
        !text.is_empty() && self.insert_text(caret, text).is_ok()
    }

    /// Whether the anchor holds input focus.
    fn is_focused(&self) -> bool;

    /// Give or take input focus.
    fn set_focused(&mut self, focused: bool);

    /// Screen placement, `None` while detached from a live display.
    fn surface(&self) -> Option<Surface>;

    /// Multi-line anchors place the overlay at the caret instead of below the widget.
    fn is_multiline(&self) -> bool {
        false
    }

    /// Screen cell of the caret glyph, `None` while detached.
    fn caret_screen_position(&self) -> Option<Point>;
}

/// A text field usable as an anchor: single-line by default, multi-line on request.
#[derive(Debug, Clone, Default)]
pub struct TextField {
    /// Text value.
    value: String,
    /// Cursor position (grapheme index).
    cursor: usize,
    /// Selection anchor (grapheme index). Selection spans anchor..cursor.
    selection_anchor: Option<usize>,
    /// Enter inserts a newline instead of being ignored.
    multiline: bool,
    focused: bool,
    surface: Option<Surface>,
}

impl TextField {
    /// Create a new empty single-line field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text value with the cursor at the end (builder).
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.set_text(&value.into());
        self
    }

    /// Switch to multi-line mode (builder).
    pub fn with_multiline(mut self, multiline: bool) -> Self {
        self.multiline = multiline;
        self
    }

    /// Set whether the field is focused (builder).
    pub fn with_focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Attach to a display surface.
    pub fn attach(&mut self, surface: Surface) {
        self.surface = Some(surface);
    }

    /// Detach from the display; suggestion requests become no-ops.
    pub fn detach(&mut self) {
        self.surface = None;
    }

    /// Select the range `start..end` with the cursor at `end`.
    pub fn select(&mut self, start: usize, end: usize) {
        let max = self.grapheme_count();
        self.selection_anchor = Some(start.min(max));
        self.cursor = end.min(max);
    }

    /// Select all text.
    pub fn select_all(&mut self) {
        self.selection_anchor = Some(0);
        self.cursor = self.grapheme_count();
    }

    // --- Editing operations ---

    fn insert_str_at_cursor(&mut self, s: &str) {
        self.delete_selection();
        let at = self.byte_at(self.cursor);
        self.value.insert_str(at, s);
        self.cursor += grapheme_count(s);
    }

    fn delete_char_back(&mut self) {
        if self.cursor > 0 {
            let start = self.byte_at(self.cursor - 1);
            let end = self.byte_at(self.cursor);
            self.value.drain(start..end);
            self.cursor -= 1;
        }
    }

    fn delete_char_forward(&mut self) {
        if self.cursor < self.grapheme_count() {
            let start = self.byte_at(self.cursor);
            let end = self.byte_at(self.cursor + 1);
            self.value.drain(start..end);
        }
    }

    /// Delete selected text. Returns `false` if nothing was selected.
    fn delete_selection(&mut self) -> bool {
        let Some(anchor) = self.selection_anchor.take() else {
            return false;
        };
        let (start, end) = ordered(anchor, self.cursor);
        let byte_start = self.byte_at(start);
        let byte_end = self.byte_at(end);
        self.value.drain(byte_start..byte_end);
        self.cursor = start;
        byte_start != byte_end
    }

    fn move_cursor(&mut self, to: usize, select: bool) {
        if select {
            if self.selection_anchor.is_none() {
                self.selection_anchor = Some(self.cursor);
            }
        } else {
            self.selection_anchor = None;
        }
        self.cursor = to.min(self.grapheme_count());
    }

    // --- Internal helpers ---

    fn grapheme_count(&self) -> usize {
        grapheme_count(&self.value)
    }

    fn byte_at(&self, idx: usize) -> usize {
        byte_offset(&self.value, idx).unwrap_or(self.value.len())
    }

    fn cursor_visual_pos(&self) -> usize {
        self.value
            .graphemes(true)
            .take(self.cursor)
            .map(display_width)
            .sum()
    }
}

impl TextAnchor for TextField {
    fn text(&self) -> &str {
        &self.value
    }

    fn caret(&self) -> usize {
        self.cursor
    }

    fn selection(&self) -> Option<(usize, usize)> {
        let anchor = self.selection_anchor?;
        (anchor != self.cursor).then(|| ordered(anchor, self.cursor))
    }

    fn set_caret(&mut self, offset: usize) {
        self.selection_anchor = None;
        self.cursor = offset.min(self.grapheme_count());
    }

    fn insert_text(&mut self, offset: usize, text: &str) -> Result<(), SuggestError> {
        let len = self.grapheme_count();
        let byte = byte_offset(&self.value, offset)
            .ok_or(SuggestError::InvalidLocation { offset, len })?;
        self.value.insert_str(byte, text);
        // Insertions at or before the caret push it right.
        if offset <= self.cursor {
            self.cursor += grapheme_count(text);
        }
        if let Some(anchor) = self.selection_anchor.as_mut()
            && offset < *anchor
        {
            *anchor += grapheme_count(text);
        }
        Ok(())
    }

    fn set_text(&mut self, text: &str) {
        self.value = text.to_string();
        self.cursor = self.grapheme_count();
        self.selection_anchor = None;
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if !key.is_press() {
            return false;
        }
        let ctrl = key.ctrl();
        let shift = key.shift();

        match key.code {
            KeyCode::Char('a') if ctrl => {
                self.select_all();
                true
            }
            KeyCode::Char(c) if !ctrl => {
                let mut buf = [0u8; 4];
                self.insert_str_at_cursor(c.encode_utf8(&mut buf));
                true
            }
            KeyCode::Enter if self.multiline => {
                self.insert_str_at_cursor("\n");
                true
            }
            KeyCode::Backspace => {
                if !self.delete_selection() {
                    let before = self.cursor;
                    self.delete_char_back();
                    return before != self.cursor;
                }
                true
            }
            KeyCode::Delete => {
                if !self.delete_selection() {
                    let before = self.value.len();
                    self.delete_char_forward();
                    return before != self.value.len();
                }
                true
            }
            KeyCode::Left => {
                let before = (self.cursor, self.selection_anchor);
                if !shift && let Some(anchor) = self.selection_anchor {
                    let to = self.cursor.min(anchor);
                    self.move_cursor(to, false);
                } else {
                    let to = self.cursor.saturating_sub(1);
                    self.move_cursor(to, shift);
                }
                before != (self.cursor, self.selection_anchor)
            }
            KeyCode::Right => {
                let before = (self.cursor, self.selection_anchor);
                if !shift && let Some(anchor) = self.selection_anchor {
                    let to = self.cursor.max(anchor);
                    self.move_cursor(to, false);
                } else {
                    let to = self.cursor + 1;
                    self.move_cursor(to, shift);
                }
                before != (self.cursor, self.selection_anchor)
            }
            KeyCode::Home => {
                let before = (self.cursor, self.selection_anchor);
                self.move_cursor(0, shift);
                before != (self.cursor, self.selection_anchor)
            }
            KeyCode::End => {
                let before = (self.cursor, self.selection_anchor);
                let end = self.grapheme_count();
                self.move_cursor(end, shift);
                before != (self.cursor, self.selection_anchor)
            }
            _ => false,
        }
    }

    fn handle_paste(&mut self, text: &str) -> bool {
        let text = if self.multiline {
            text.to_string()
        } else {
            text.replace(['\r', '\n'], "")
        };
        if text.is_empty() {
            return false;
        }
        self.insert_str_at_cursor(&text);
        true
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn surface(&self) -> Option<Surface> {
        self.surface
    }

    fn is_multiline(&self) -> bool {
        self.multiline
    }

    fn caret_screen_position(&self) -> Option<Point> {
        let area = self.surface?.anchor;
        let last_col = area.width.saturating_sub(1) as usize;
        let last_row = area.height.saturating_sub(1) as usize;
        let (row, col) = if self.multiline {
            line_column(&self.value, self.cursor)
        } else {
            // Single-line fields scroll horizontally to keep the caret visible.
            let visual = self.cursor_visual_pos();
            (0, visual.min(last_col))
        };
        let x = area.x.saturating_add(col.min(last_col) as u16);
        let y = area.y.saturating_add(row.min(last_row) as u16);
        Some(Point::new(x, y))
    }
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a <= b { (a, b) } else { (b, a) }
}
