#![forbid(unsafe_code)]

//! Selection Dispatcher.

use std::fmt;

use crate::anchor::TextAnchor;
use crate::error::SuggestError;
use crate::source::SelectionListener;

/// Forwards committed values to the selection listener.
///
/// Hiding the overlay is not its job; the caller does that once the
/// dispatcher returns.
pub struct SelectionDispatcher<T> {
    listener: Box<dyn SelectionListener<T>>,
    commits: u64,
}

impl<T> fmt::Debug for SelectionDispatcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionDispatcher")
            .field("commits", &self.commits)
            .finish_non_exhaustive()
    }
}

impl<T> SelectionDispatcher<T> {
    /// Wrap a listener.
    pub fn new<L: SelectionListener<T> + 'static>(listener: L) -> Self {
        Self {
            listener: Box::new(listener),
            commits: 0,
        }
    }

    /// Invoke the listener exactly once with `value`, then give focus back
    /// to `anchor` whether or not the listener succeeded.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub fn commit(&mut self, value: &T, anchor: &mut dyn TextAnchor) -> Result<(), SuggestError> {
        self.commits += 1;
        let result = self.listener.selected(value, anchor);
        anchor.set_focused(true);
        if let Err(err) = &result {
            suggest_core::warn!(error = %err, "selection listener failed");
        } else {
            suggest_core::debug!(commits = self.commits, "suggestion committed");
        }
        result
    }

    /// Number of commits dispatched so far.
    pub fn commits(&self) -> u64 {
        self.commits
    }
}
