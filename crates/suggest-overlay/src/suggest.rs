#![forbid(unsafe_code)]

//! The suggestion decorator for one anchor.
//!
//! [`Suggest`] owns the overlay and the three collaborators and turns input
//! events into the suggestion lifecycle:
//!
//! ```text
//! edit / caret move -> build_query -> fetch -> has_changed -> overlay
//! key               -> navigation::transition -> effect
//! commit            -> dispatcher -> anchor focused -> overlay hidden
//! ```
//!
//! # Example
//!
//! ```
//! use suggest_core::event::{Event, KeyCode, KeyEvent};
//! use suggest_core::geometry::{Rect, Size};
//! use suggest_overlay::{DisplayRenderer, QueryDescriptor, ReplaceText, Suggest, Surface, TextAnchor, TextField};
//!
//! let words = ["apple", "apricot", "banana"];
//! let source = move |q: &QueryDescriptor| {
//!     words
//!         .iter()
//!         .filter(|w| !q.text().is_empty() && w.starts_with(q.text()))
//!         .map(|w| w.to_string())
//!         .collect::<Vec<_>>()
//! };
//! let mut suggest = Suggest::new(source, DisplayRenderer, ReplaceText);
//!
//! let mut field = TextField::new().with_focused(true);
//! field.attach(Surface::fullscreen(Rect::new(0, 0, 20, 1), Size::new(80, 24)));
//!
//! for c in "ap".chars() {
//!     suggest.handle_event(&mut field, &Event::Key(KeyEvent::new(KeyCode::Char(c)))).unwrap();
//! }
//! assert_eq!(suggest.overlay().item_count(), 2);
//!
//! suggest.handle_event(&mut field, &Event::Key(KeyEvent::new(KeyCode::Down))).unwrap();
//! suggest.handle_event(&mut field, &Event::Key(KeyEvent::new(KeyCode::Enter))).unwrap();
//! assert_eq!(field.text(), "apple");
//! assert!(!suggest.overlay().is_visible());
//! ```

use std::fmt;

use suggest_core::event::{Event, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use suggest_core::text::grapheme_count;

use crate::anchor::TextAnchor;
use crate::diff::DiffMode;
use crate::dispatch::SelectionDispatcher;
use crate::error::SuggestError;
use crate::navigation::{NavEffect, NavFocus, NavInput, transition};
use crate::overlay::{ApplyOutcome, HitTarget, Overlay, OverlayConfig, OverlayLayout, Placement};
use crate::query::{ChangeKind, QueryDescriptor, TriggerPolicy, build_query, caret_moved};
use crate::request::{PendingRequest, RequestTracker};
use crate::source::{SelectionListener, SuggestionRenderer, SuggestionSource, fetch};

/// Where input focus went, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusTarget {
    /// The anchor itself.
    Anchor,
    /// Row `index` of this overlay.
    OverlayItem(usize),
    /// Anything outside the anchor and the overlay.
    Outside,
}

/// Autocomplete behaviour attached to one anchor.
pub struct Suggest<T> {
    source: Box<dyn SuggestionSource<T>>,
    renderer: Box<dyn SuggestionRenderer<T>>,
    dispatcher: SelectionDispatcher<T>,
    overlay: Overlay<T>,
    policy: TriggerPolicy,
    diff_mode: DiffMode,
    requests: RequestTracker,
    /// Query behind the list currently shown.
    last_query: Option<QueryDescriptor>,
    fetches: u64,
}

impl<T: fmt::Debug> fmt::Debug for Suggest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suggest")
            .field("overlay", &self.overlay)
            .field("policy", &self.policy)
            .field("diff_mode", &self.diff_mode)
            .field("requests", &self.requests)
            .field("last_query", &self.last_query)
            .field("fetches", &self.fetches)
            .finish_non_exhaustive()
    }
}

impl<T: PartialEq> Suggest<T> {
    /// Build a decorator from its three collaborators.
    pub fn new<S, R, L>(source: S, renderer: R, listener: L) -> Self
    where
        S: SuggestionSource<T> + 'static,
        R: SuggestionRenderer<T> + 'static,
        L: SelectionListener<T> + 'static,
    {
        Self {
            source: Box::new(source),
            renderer: Box::new(renderer),
            dispatcher: SelectionDispatcher::new(listener),
            overlay: Overlay::default(),
            policy: TriggerPolicy::default(),
            diff_mode: DiffMode::default(),
            requests: RequestTracker::new(),
            last_query: None,
            fetches: 0,
        }
    }

    /// Choose which anchor changes re-query the source (builder).
    pub fn with_trigger_policy(mut self, policy: TriggerPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Choose how fetched lists are compared (builder).
    pub fn with_diff_mode(mut self, mode: DiffMode) -> Self {
        self.diff_mode = mode;
        self
    }

    /// Set overlay placement rules (builder).
    pub fn with_overlay_config(mut self, config: OverlayConfig) -> Self {
        self.overlay.set_config(config);
        self
    }

    // --- Accessors ---

    pub fn overlay(&self) -> &Overlay<T> {
        &self.overlay
    }

    /// Drawing snapshot, `None` unless the overlay is visible.
    pub fn layout(&self) -> Option<OverlayLayout<'_>> {
        self.overlay.layout()
    }

    /// Keyboard focus between the anchor and the rows.
    pub fn focus(&self) -> NavFocus {
        self.overlay.focus()
    }

    pub fn trigger_policy(&self) -> TriggerPolicy {
        self.policy
    }

    pub fn diff_mode(&self) -> DiffMode {
        self.diff_mode
    }

    /// Query behind the most recent applied fetch.
    pub fn last_query(&self) -> Option<&QueryDescriptor> {
        self.last_query.as_ref()
    }

    /// Number of times the source has been asked for suggestions.
    pub fn fetch_count(&self) -> u64 {
        self.fetches
    }

    /// Number of commits dispatched so far.
    pub fn commit_count(&self) -> u64 {
        self.dispatcher.commits()
    }

    // --- Requests ---

    /// Query the source and show, replace, or hide the overlay.
    ///
    /// Returns `Ok(None)` without touching the source when the anchor has no
    /// live surface. A source or render failure hides the overlay before the
    /// error is returned.
    pub fn request_suggestions(
        &mut self,
        anchor: &mut dyn TextAnchor,
    ) -> Result<Option<ApplyOutcome>, SuggestError> {
        let Some(placement) = placement_of(anchor) else {
            suggest_core::trace!("anchor detached, request ignored");
            return Ok(None);
        };
        self.overlay.ensure_initialized(&placement.surface);

        let query = build_query(&*anchor);
        self.requests.next();
        self.fetches += 1;
        suggest_core::trace!(generation = self.requests.latest().get(), "synchronous request");
        let list = match fetch(self.source.as_mut(), &query) {
            Ok(list) => list,
            Err(err) => {
                self.hide(anchor);
                return Err(err);
            }
        };
        self.last_query = Some(query);
        self.apply(anchor, list, &placement).map(Some)
    }

    /// Start a request whose answer the host will deliver later through
    /// [`Suggest::complete_request`]. The source is not called.
    ///
    /// Returns `None` when the anchor has no live surface.
    pub fn begin_request(&mut self, anchor: &dyn TextAnchor) -> Option<PendingRequest> {
        let surface = anchor.surface()?;
        self.overlay.ensure_initialized(&surface);
        let generation = self.requests.next();
        suggest_core::trace!(generation = generation.get(), "deferred request started");
        Some(PendingRequest::new(generation, build_query(&*anchor)))
    }

    /// Apply the answer to a deferred request.
    ///
    /// Answers superseded by a newer request (or by a hide) are dropped and
    /// yield `Ok(None)`, as does an anchor that was detached meanwhile. An
    /// error answer hides the overlay and is returned.
    pub fn complete_request(
        &mut self,
        anchor: &mut dyn TextAnchor,
        request: PendingRequest,
        result: Result<Vec<T>, SuggestError>,
    ) -> Result<Option<ApplyOutcome>, SuggestError> {
        if !self.requests.is_current(request.generation()) {
            suggest_core::debug!(
                generation = request.generation().get(),
                latest = self.requests.latest().get(),
                "stale suggestions discarded"
            );
            return Ok(None);
        }
        let Some(placement) = placement_of(anchor) else {
            return Ok(None);
        };
        self.fetches += 1;
        let list = match result {
            Ok(list) => list,
            Err(err) => {
                self.hide(anchor);
                return Err(err);
            }
        };
        self.last_query = Some(request.query().clone());
        self.apply(anchor, list, &placement).map(Some)
    }

    /// Report an anchor change made outside [`Suggest::handle_event`].
    ///
    /// Re-queries when the trigger policy covers `kind`.
    pub fn notify_change(
        &mut self,
        anchor: &mut dyn TextAnchor,
        kind: ChangeKind,
    ) -> Result<Option<ApplyOutcome>, SuggestError> {
        if !self.policy.triggers(kind) {
            suggest_core::trace!(?kind, "change ignored by trigger policy");
            return Ok(None);
        }
        self.request_suggestions(anchor)
    }

    fn apply(
        &mut self,
        anchor: &mut dyn TextAnchor,
        list: Vec<T>,
        placement: &Placement,
    ) -> Result<ApplyOutcome, SuggestError> {
        let was_on_item = self.overlay.focus().item().is_some();
        let outcome = self
            .overlay
            .apply(list, self.renderer.as_mut(), placement, self.diff_mode);
        if was_on_item && self.overlay.focus() == NavFocus::Anchor {
            anchor.set_focused(true);
        }
        outcome
    }

    // --- Overlay control ---

    /// Recompute the panel from the anchor's current surface. A panel left
    /// with no room for a row hides and hands focus back to the anchor.
    pub fn reposition(&mut self, anchor: &mut dyn TextAnchor) {
        if !self.overlay.is_visible() {
            return;
        }
        let Some(placement) = placement_of(&*anchor) else {
            return;
        };
        let was_on_item = self.overlay.focus().item().is_some();
        self.overlay.reposition(&placement);
        if !self.overlay.is_visible() {
            self.requests.invalidate();
            if was_on_item {
                anchor.set_focused(true);
            }
        }
        suggest_core::trace!(area = ?self.overlay.area(), "overlay repositioned");
    }

    /// Tear the overlay down; the next request on a live surface rebuilds it.
    pub fn detach(&mut self) {
        self.requests.invalidate();
        self.overlay.teardown();
        self.last_query = None;
    }

    /// Hide the overlay and drop any outstanding deferred request.
    pub fn hide(&mut self, anchor: &mut dyn TextAnchor) {
        let was_on_item = self.overlay.focus().item().is_some();
        self.requests.invalidate();
        self.overlay.hide();
        if was_on_item {
            anchor.set_focused(true);
        }
    }

    /// Commit row `index`: invoke the listener once, give focus back to the
    /// anchor, then hide. A listener error is returned after all three.
    pub fn commit(&mut self, anchor: &mut dyn TextAnchor, index: usize) -> Result<(), SuggestError> {
        let Some(value) = self.overlay.suggestions().get(index) else {
            return Ok(());
        };
        let result = self.dispatcher.commit(value, anchor);
        self.hide(anchor);
        result
    }

    /// Apply a focus change reported by the host.
    ///
    /// Focus moving to one of this overlay's rows keeps it open; focus moving
    /// anywhere outside the anchor and the overlay hides it.
    pub fn handle_focus_change(&mut self, anchor: &mut dyn TextAnchor, target: FocusTarget) {
        match target {
            FocusTarget::Anchor => {
                self.overlay.focus_anchor();
                anchor.set_focused(true);
            }
            FocusTarget::OverlayItem(index) if self.overlay.contains_item(index) => {
                self.overlay.focus_item(index);
                anchor.set_focused(false);
            }
            FocusTarget::OverlayItem(_) | FocusTarget::Outside => {
                suggest_core::debug!(?target, "focus left anchor and overlay");
                self.requests.invalidate();
                self.overlay.hide();
                anchor.set_focused(false);
            }
        }
    }

    /// Focus came back from nowhere in particular: clear the selection and
    /// put the caret at the end.
    fn focus_regained(&mut self, anchor: &mut dyn TextAnchor) {
        anchor.set_focused(true);
        let end = grapheme_count(anchor.text());
        anchor.set_caret(end);
    }

    // --- Events ---

    /// Route one input event. Returns `Ok(true)` when the event was consumed.
    pub fn handle_event(
        &mut self,
        anchor: &mut dyn TextAnchor,
        event: &Event,
    ) -> Result<bool, SuggestError> {
        if let Some(surface) = anchor.surface()
            && self.overlay.is_tracking_stale(&surface)
        {
            self.reposition(anchor);
        }
        match event {
            Event::Key(key) => self.handle_key(anchor, key),
            Event::Mouse(mouse) => self.handle_mouse(anchor, mouse),
            Event::Paste(text) => {
                self.leave_item(anchor);
                self.edit(anchor, |a| a.handle_paste(text))
            }
            Event::Resize { .. } => {
                self.reposition(anchor);
                Ok(false)
            }
            Event::Focus(true) => {
                self.focus_regained(anchor);
                Ok(false)
            }
            Event::Focus(false) => {
                self.handle_focus_change(anchor, FocusTarget::Outside);
                Ok(false)
            }
        }
    }

    fn handle_key(&mut self, anchor: &mut dyn TextAnchor, key: &KeyEvent) -> Result<bool, SuggestError> {
        if !key.is_press() {
            return Ok(false);
        }
        let focus = self.overlay.focus();
        let effect = transition(
            focus,
            NavInput::from_key(key),
            self.overlay.item_count(),
            self.overlay.is_visible(),
        );
        suggest_core::trace!(?focus, ?effect, "navigation");

        match effect {
            NavEffect::Stay => Ok(true),
            NavEffect::PassToAnchor => self.edit(anchor, |a| a.handle_key(key)),
            NavEffect::FocusItem(index) => {
                self.overlay.focus_item(index);
                anchor.set_focused(false);
                Ok(true)
            }
            NavEffect::FetchThenFocusFirst => {
                if self.request_suggestions(anchor)?.is_none() {
                    return self.edit(anchor, |a| a.handle_key(key));
                }
                if self.overlay.focus_item(0) {
                    anchor.set_focused(false);
                }
                Ok(true)
            }
            NavEffect::ReturnToAnchor => {
                self.overlay.focus_anchor();
                anchor.set_focused(true);
                let end = grapheme_count(anchor.text());
                self.edit(anchor, |a| {
                    a.set_caret(end);
                    true
                })
            }
            NavEffect::Commit(index) => self.commit(anchor, index).map(|()| true),
            NavEffect::Cancel => {
                self.hide(anchor);
                anchor.set_focused(true);
                Ok(true)
            }
            NavEffect::Redeliver => {
                let handled = self.edit(anchor, |a| a.handle_key(key))?;
                self.leave_item(anchor);
                Ok(handled)
            }
        }
    }

    fn handle_mouse(&mut self, anchor: &mut dyn TextAnchor, mouse: &MouseEvent) -> Result<bool, SuggestError> {
        if !self.overlay.is_visible() {
            return Ok(false);
        }
        let hit = self.overlay.hit_test(mouse.x, mouse.y);
        match (mouse.kind, hit) {
            (MouseEventKind::Down(MouseButton::Left), Some(HitTarget::Item(index))) => {
                self.commit(anchor, index)?;
                Ok(true)
            }
            (MouseEventKind::Down(_), Some(_)) => Ok(true),
            (MouseEventKind::Down(_), None) => {
                let in_anchor = anchor
                    .surface()
                    .is_some_and(|s| s.anchor.contains(mouse.x, mouse.y));
                if !in_anchor {
                    self.handle_focus_change(anchor, FocusTarget::Outside);
                }
                Ok(false)
            }
            (MouseEventKind::Moved | MouseEventKind::Drag(_), _) => {
                let row = match hit {
                    Some(HitTarget::Item(index)) => Some(index),
                    _ => None,
                };
                self.overlay.set_hover(row);
                Ok(hit.is_some())
            }
            (MouseEventKind::ScrollUp, Some(_)) => {
                self.overlay.scroll_by(-1);
                Ok(true)
            }
            (MouseEventKind::ScrollDown, Some(_)) => {
                self.overlay.scroll_by(1);
                Ok(true)
            }
            (_, hit) => Ok(hit.is_some()),
        }
    }

    /// Hand keyboard focus back to the anchor if a row holds it.
    fn leave_item(&mut self, anchor: &mut dyn TextAnchor) {
        if self.overlay.focus().item().is_some() {
            self.overlay.focus_anchor();
            anchor.set_focused(true);
        }
    }

    /// Run an anchor mutation and re-query if the trigger policy covers what changed.
    fn edit<F>(&mut self, anchor: &mut dyn TextAnchor, mutate: F) -> Result<bool, SuggestError>
    where
        F: FnOnce(&mut dyn TextAnchor) -> bool,
    {
        let before = build_query(&*anchor);
        let handled = mutate(&mut *anchor);
        let after = build_query(&*anchor);
        let Some(kind) = ChangeKind::between(&before, &after) else {
            return Ok(handled);
        };
        if self.policy.triggers_edit(kind, caret_moved(&before, &after)) {
            self.request_suggestions(anchor)?;
        } else {
            suggest_core::trace!(?kind, "edit ignored by trigger policy");
        }
        Ok(handled)
    }
}

fn placement_of(anchor: &dyn TextAnchor) -> Option<Placement> {
    let surface = anchor.surface()?;
    Some(Placement {
        surface,
        caret: anchor.caret_screen_position(),
        multiline: anchor.is_multiline(),
    })
}
