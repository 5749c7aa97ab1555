#![forbid(unsafe_code)]

//! Query Builder and re-query trigger policy.

use suggest_core::text::grapheme_count;

use crate::anchor::TextAnchor;
use crate::error::SuggestError;

/// Immutable snapshot of the anchor used to ask for suggestions.
///
/// # Invariants
///
/// `selection_start <= selection_end <= len` and `caret <= len`, where `len`
/// is the grapheme count of `text`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryDescriptor {
    text: String,
    caret: usize,
    selection_start: usize,
    selection_end: usize,
}

impl QueryDescriptor {
    /// Create a validated descriptor.
    pub fn new(
        text: impl Into<String>,
        caret: usize,
        selection_start: usize,
        selection_end: usize,
    ) -> Result<Self, SuggestError> {
        let text = text.into();
        let len = grapheme_count(&text);
        for offset in [caret, selection_end] {
            if offset > len {
                return Err(SuggestError::InvalidLocation { offset, len });
            }
        }
        if selection_start > selection_end {
            return Err(SuggestError::InvalidLocation {
                offset: selection_start,
                len,
            });
        }
        Ok(Self {
            text,
            caret,
            selection_start,
            selection_end,
        })
    }

    /// Descriptor with the caret at `caret` and an empty selection there.
    pub fn at_caret(text: impl Into<String>, caret: usize) -> Result<Self, SuggestError> {
        Self::new(text, caret, caret, caret)
    }

    /// Full text of the anchor.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Caret offset (grapheme index).
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Selection start (grapheme index).
    pub fn selection_start(&self) -> usize {
        self.selection_start
    }

    /// Selection end (grapheme index).
    pub fn selection_end(&self) -> usize {
        self.selection_end
    }

    /// Whether a non-empty range is selected.
    pub fn has_selection(&self) -> bool {
        self.selection_start < self.selection_end
    }

    /// Text before the caret.
    pub fn text_before_caret(&self) -> &str {
        let end = suggest_core::text::byte_offset(&self.text, self.caret).unwrap_or(self.text.len());
        &self.text[..end]
    }
}

/// Build a descriptor from the anchor's current state.
///
/// Values read from the anchor are clamped, so the result always satisfies
/// the descriptor invariants.
pub fn build_query<A: TextAnchor + ?Sized>(anchor: &A) -> QueryDescriptor {
    let text = anchor.text().to_string();
    let len = grapheme_count(&text);
    let caret = anchor.caret().min(len);
    let (start, end) = match anchor.selection() {
        Some((a, b)) => {
            let (a, b) = (a.min(len), b.min(len));
            (a.min(b), a.max(b))
        }
        None => (caret, caret),
    };
    QueryDescriptor {
        text,
        caret,
        selection_start: start,
        selection_end: end,
    }
}

/// What happened to the anchor between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// Text grew with the old text still present around the caret.
    Insert,
    /// Text shrank.
    Remove,
    /// Text was replaced by something that is neither a pure insert nor removal.
    Replace,
    /// Text unchanged, caret or selection moved.
    CaretMoved,
}

impl ChangeKind {
    /// Classify the difference between two snapshots, `None` if nothing changed.
    pub fn between(before: &QueryDescriptor, after: &QueryDescriptor) -> Option<Self> {
        if before.text == after.text {
            return caret_moved(before, after).then_some(Self::CaretMoved);
        }
        let (old, new) = (before.text.as_str(), after.text.as_str());
        if new.len() > old.len() && is_subsequence_split(old, new) {
            Some(Self::Insert)
        } else if new.len() < old.len() {
            Some(Self::Remove)
        } else {
            Some(Self::Replace)
        }
    }
}

/// Whether the caret or selection differs between two snapshots.
pub fn caret_moved(before: &QueryDescriptor, after: &QueryDescriptor) -> bool {
    before.caret != after.caret
        || before.selection_start != after.selection_start
        || before.selection_end != after.selection_end
}

/// `new` is `old` with one contiguous run inserted somewhere.
fn is_subsequence_split(old: &str, new: &str) -> bool {
    let prefix = old
        .char_indices()
        .zip(new.chars())
        .take_while(|((_, a), b)| a == b)
        .last()
        .map_or(0, |((i, a), _)| i + a.len_utf8());
    let old_tail = &old[prefix..];
    new[prefix..].ends_with(old_tail)
}

/// Which anchor changes re-query the suggestion source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriggerPolicy {
    /// Re-query on pure insertions.
    pub on_insert: bool,
    /// Re-query on removals and replacements.
    pub on_remove: bool,
    /// Re-query on caret or selection movement.
    pub on_caret_move: bool,
}

impl Default for TriggerPolicy {
    fn default() -> Self {
        Self {
            on_insert: true,
            on_remove: true,
            on_caret_move: true,
        }
    }
}

impl TriggerPolicy {
    /// Re-query on caret movement and removals, not on pure insertions.
    ///
    /// Typing still re-queries once per keystroke through the caret move it
    /// causes. An insertion that leaves the caret in place does not.
    pub const fn caret_driven() -> Self {
        Self {
            on_insert: false,
            on_remove: true,
            on_caret_move: true,
        }
    }

    /// Re-query on text edits only.
    pub const fn edits_only() -> Self {
        Self {
            on_insert: true,
            on_remove: true,
            on_caret_move: false,
        }
    }

    /// Whether `kind` should re-query.
    pub const fn triggers(&self, kind: ChangeKind) -> bool {
        match kind {
            ChangeKind::Insert => self.on_insert,
            ChangeKind::Remove | ChangeKind::Replace => self.on_remove,
            ChangeKind::CaretMoved => self.on_caret_move,
        }
    }

    /// Whether an edit of `kind` should re-query. An edit that also moved the
    /// caret fires the caret trigger too; either way it is one query.
    pub const fn triggers_edit(&self, kind: ChangeKind, caret_moved: bool) -> bool {
        self.triggers(kind) || (caret_moved && self.on_caret_move)
    }
}
