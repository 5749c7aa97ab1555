#![forbid(unsafe_code)]

//! Pluggable collaborators and the Suggestion Fetcher.
//!
//! Sources, renderers, and listeners are generic over the suggestion value
//! `T`. The overlay never looks inside `T`; it only compares values for
//! change detection and hands them back on commit.

use std::fmt::Display;

use crate::anchor::TextAnchor;
use crate::element::SuggestionElement;
use crate::error::SuggestError;
use crate::query::QueryDescriptor;

/// Produces candidate values for a query.
///
/// Called synchronously on the thread handling the triggering event; a slow
/// source stalls the host's event loop. An empty list means "no suggestions".
pub trait SuggestionSource<T> {
    /// Ordered suggestions for `query`.
    fn suggestions(&mut self, query: &QueryDescriptor) -> Result<Vec<T>, SuggestError>;
}

impl<T, F> SuggestionSource<T> for F
where
    F: FnMut(&QueryDescriptor) -> Vec<T>,
{
    fn suggestions(&mut self, query: &QueryDescriptor) -> Result<Vec<T>, SuggestError> {
        Ok(self(query))
    }
}

/// Turns one suggestion into a visual element.
///
/// Must return a fresh element per call; the overlay mutates its highlight.
pub trait SuggestionRenderer<T> {
    /// Render `value`.
    fn render(&mut self, value: &T) -> Result<SuggestionElement, SuggestError>;
}

impl<T, F> SuggestionRenderer<T> for F
where
    F: FnMut(&T) -> SuggestionElement,
{
    fn render(&mut self, value: &T) -> Result<SuggestionElement, SuggestError> {
        Ok(self(value))
    }
}

/// Renders any `Display` value as a single line.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayRenderer;

impl<T: Display> SuggestionRenderer<T> for DisplayRenderer {
    fn render(&mut self, value: &T) -> Result<SuggestionElement, SuggestError> {
        Ok(SuggestionElement::new(value.to_string()))
    }
}

/// Receives committed values.
///
/// Writing the value anywhere (into the anchor or elsewhere) is entirely the
/// listener's business.
pub trait SelectionListener<T> {
    /// Handle a committed value.
    fn selected(&mut self, value: &T, anchor: &mut dyn TextAnchor) -> Result<(), SuggestError>;
}

impl<T, F> SelectionListener<T> for F
where
    F: FnMut(&T, &mut dyn TextAnchor) -> Result<(), SuggestError>,
{
    fn selected(&mut self, value: &T, anchor: &mut dyn TextAnchor) -> Result<(), SuggestError> {
        self(value, anchor)
    }
}

/// Listener that ignores the anchor.
#[derive(Debug, Clone, Copy)]
pub struct OnSelect<F>(F);

/// Wrap an `FnMut(&T)` as a listener.
pub fn on_select<T, F: FnMut(&T)>(f: F) -> OnSelect<F> {
    OnSelect(f)
}

impl<T, F: FnMut(&T)> SelectionListener<T> for OnSelect<F> {
    fn selected(&mut self, value: &T, _anchor: &mut dyn TextAnchor) -> Result<(), SuggestError> {
        (self.0)(value);
        Ok(())
    }
}

/// Ask `source` for suggestions.
///
/// Source errors propagate unchanged.
pub fn fetch<T, S>(source: &mut S, query: &QueryDescriptor) -> Result<Vec<T>, SuggestError>
where
    S: SuggestionSource<T> + ?Sized,
{
    let _span = suggest_core::debug_span!(
        "suggest_fetch",
        caret = query.caret(),
        text_len = query.text().len()
    )
    .entered();
    let list = source.suggestions(query)?;
    suggest_core::debug!(count = list.len(), "fetched suggestions");
    Ok(list)
}
