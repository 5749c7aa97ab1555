#![forbid(unsafe_code)]

//! Autocomplete overlay for text inputs.
//!
//! Attach a [`Suggest`] to any [`TextAnchor`]. As the text or caret changes it
//! asks a [`SuggestionSource`] for candidates, shows them in a floating panel
//! below the anchor (or at the caret for multi-line anchors), and hands the
//! picked value to a [`SelectionListener`].
//!
//! The pieces can also be used on their own: [`build_query`], [`fetch`],
//! [`has_changed`], [`Overlay`], [`transition`], and [`SelectionDispatcher`].
//!
//! # Feature flags
//!
//! - `tracing`: spans around fetch and render passes, events on overlay and
//!   focus transitions.

pub mod anchor;
pub mod diff;
pub mod dispatch;
pub mod element;
pub mod error;
pub mod listeners;
pub mod navigation;
pub mod overlay;
pub mod query;
pub mod request;
pub mod source;
pub mod suggest;

pub use anchor::{Surface, TextAnchor, TextField};
pub use diff::{DiffMode, has_changed, has_changed_with};
pub use dispatch::SelectionDispatcher;
pub use element::{PackedRgba, Style, StyleFlags, SuggestionElement};
pub use error::SuggestError;
pub use listeners::{InsertAtCaret, ReplaceText};
pub use navigation::{NavEffect, NavFocus, NavInput, transition};
pub use overlay::{
    ApplyOutcome, HitTarget, LayoutLine, Overlay, OverlayConfig, OverlayLayout, OverlayState,
    Placement,
};
pub use query::{ChangeKind, QueryDescriptor, TriggerPolicy, build_query, caret_moved};
pub use request::{Generation, PendingRequest, RequestTracker};
pub use source::{
    DisplayRenderer, OnSelect, SelectionListener, SuggestionRenderer, SuggestionSource, fetch,
    on_select,
};
pub use suggest::{FocusTarget, Suggest};
