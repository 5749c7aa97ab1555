#![forbid(unsafe_code)]

//! Navigation State Machine.
//!
//! Keyboard focus is a single pointer into `{Anchor} ∪ {0..N-1}`. This
//! module is the pure transition table; [`crate::suggest::Suggest`] applies
//! the returned [`NavEffect`] to the anchor and overlay.

use suggest_core::event::{KeyCode, KeyEvent};

/// Where keyboard focus sits while the overlay is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NavFocus {
    /// The anchor input holds focus.
    #[default]
    Anchor,
    /// Suggestion row `index` holds focus.
    Item(usize),
}

impl NavFocus {
    /// Focused row index, if any.
    pub const fn item(self) -> Option<usize> {
        match self {
            Self::Anchor => None,
            Self::Item(i) => Some(i),
        }
    }
}

/// A key event reduced to what navigation cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavInput {
    Up,
    Down,
    /// Enter.
    Commit,
    /// Escape.
    Cancel,
    /// Anything else: characters, editing keys, caret keys.
    Other,
}

impl NavInput {
    /// Classify a key event.
    pub fn from_key(key: &KeyEvent) -> Self {
        if !key.modifiers.is_empty() && !key.shift() {
            return Self::Other;
        }
        match key.code {
            KeyCode::Up if !key.shift() => Self::Up,
            KeyCode::Down if !key.shift() => Self::Down,
            KeyCode::Enter => Self::Commit,
            KeyCode::Escape => Self::Cancel,
            _ => Self::Other,
        }
    }
}

/// What the decorator must do in response to an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavEffect {
    /// Consume the input, change nothing.
    Stay,
    /// Not navigation: deliver the key to the anchor as usual.
    PassToAnchor,
    /// Move focus to row `index`.
    FocusItem(usize),
    /// Fetch first (the overlay is hidden), then focus row 0 if one exists.
    FetchThenFocusFirst,
    /// Return focus to the anchor with the caret at end of text.
    ReturnToAnchor,
    /// Commit row `index`.
    Commit(usize),
    /// Hide the overlay and return focus to the anchor.
    Cancel,
    /// Deliver the key to the anchor, then return focus to it.
    Redeliver,
}

/// Transition for `input` received at `focus`.
///
/// `visible` is the overlay visibility and `count` the number of rendered
/// rows. A stale `Item` index (`>= count`) behaves like the anchor.
pub fn transition(focus: NavFocus, input: NavInput, count: usize, visible: bool) -> NavEffect {
    let item = match focus {
        NavFocus::Item(i) if visible && i < count => Some(i),
        _ => None,
    };

    match (item, input) {
        (None, NavInput::Down) if !visible => NavEffect::FetchThenFocusFirst,
        (None, NavInput::Down) if count > 0 => NavEffect::FocusItem(0),
        (None, NavInput::Down) => NavEffect::Stay,
        (None, NavInput::Cancel) if visible => NavEffect::Cancel,
        (None, _) => NavEffect::PassToAnchor,

        (Some(0), NavInput::Up) => NavEffect::ReturnToAnchor,
        (Some(i), NavInput::Up) => NavEffect::FocusItem(i - 1),
        (Some(i), NavInput::Down) if i + 1 >= count => NavEffect::Stay,
        (Some(i), NavInput::Down) => NavEffect::FocusItem(i + 1),
        (Some(i), NavInput::Commit) => NavEffect::Commit(i),
        (Some(_), NavInput::Cancel) => NavEffect::Cancel,
        (Some(_), NavInput::Other) => NavEffect::Redeliver,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use suggest_core::event::Modifiers;

    use NavFocus::{Anchor, Item};

    #[test]
    fn classify_keys() {
        assert_eq!(NavInput::from_key(&KeyEvent::new(KeyCode::Up)), NavInput::Up);
        assert_eq!(
            NavInput::from_key(&KeyEvent::new(KeyCode::Enter)),
            NavInput::Commit
        );
        assert_eq!(
            NavInput::from_key(&KeyEvent::new(KeyCode::Escape)),
            NavInput::Cancel
        );
        assert_eq!(
            NavInput::from_key(&KeyEvent::new(KeyCode::Char('x'))),
            NavInput::Other
        );
        let ctrl_down = KeyEvent::new(KeyCode::Down).with_modifiers(Modifiers::CTRL);
        assert_eq!(NavInput::from_key(&ctrl_down), NavInput::Other);
        let shift_down = KeyEvent::new(KeyCode::Down).with_modifiers(Modifiers::SHIFT);
        assert_eq!(NavInput::from_key(&shift_down), NavInput::Other);
    }

    #[test]
    fn down_from_anchor() {
        assert_eq!(
            transition(Anchor, NavInput::Down, 0, false),
            NavEffect::FetchThenFocusFirst
        );
        assert_eq!(
            transition(Anchor, NavInput::Down, 3, true),
            NavEffect::FocusItem(0)
        );
    }

    #[test]
    fn anchor_passes_other_keys_through() {
        for input in [NavInput::Up, NavInput::Commit, NavInput::Other] {
            assert_eq!(transition(Anchor, input, 2, true), NavEffect::PassToAnchor);
        }
        assert_eq!(
            transition(Anchor, NavInput::Cancel, 0, false),
            NavEffect::PassToAnchor
        );
        assert_eq!(transition(Anchor, NavInput::Cancel, 2, true), NavEffect::Cancel);
    }

    #[test]
    fn up_walks_back_to_anchor() {
        assert_eq!(transition(Item(2), NavInput::Up, 3, true), NavEffect::FocusItem(1));
        assert_eq!(
            transition(Item(0), NavInput::Up, 3, true),
            NavEffect::ReturnToAnchor
        );
    }

    #[test]
    fn down_stops_at_last_row() {
        assert_eq!(transition(Item(1), NavInput::Down, 3, true), NavEffect::FocusItem(2));
        assert_eq!(transition(Item(2), NavInput::Down, 3, true), NavEffect::Stay);
    }

    #[test]
    fn item_commit_cancel_and_typing() {
        assert_eq!(transition(Item(1), NavInput::Commit, 3, true), NavEffect::Commit(1));
        assert_eq!(transition(Item(1), NavInput::Cancel, 3, true), NavEffect::Cancel);
        assert_eq!(transition(Item(1), NavInput::Other, 3, true), NavEffect::Redeliver);
    }

    #[test]
    fn stale_item_behaves_like_anchor() {
        assert_eq!(
            transition(Item(5), NavInput::Down, 2, true),
            NavEffect::FocusItem(0)
        );
        assert_eq!(
            transition(Item(0), NavInput::Down, 2, false),
            NavEffect::FetchThenFocusFirst
        );
    }
}
