#![forbid(unsafe_code)]

//! Span instrumentation tests.
//!
//! With spans:
//!   cargo test -p suggest-overlay --features tracing --test tracing_tests
//!
//! Without the feature (no spans may appear):
//!   cargo test -p suggest-overlay --test tracing_tests -- zero_overhead

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use suggest_core::geometry::{Rect, Size};
use suggest_overlay::{DisplayRenderer, QueryDescriptor, ReplaceText, Suggest, Surface, TextField};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Test Infrastructure
// ============================================================================

/// A captured span with its fields and parent.
#[derive(Debug, Clone)]
#[allow(dead_code)]
struct CapturedSpan {
    name: String,
    fields: HashMap<String, String>,
    parent_name: Option<String>,
}

/// A tracing Layer that records every new span.
struct SpanCapture {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
}

impl SpanCapture {
    fn new() -> (Self, CaptureHandle) {
        let spans = Arc::new(Mutex::new(Vec::new()));
        let handle = CaptureHandle {
            spans: spans.clone(),
        };
        (Self { spans }, handle)
    }
}

/// Handle to read captured spans afterwards.
struct CaptureHandle {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
}

impl CaptureHandle {
    fn spans(&self) -> Vec<CapturedSpan> {
        self.spans.lock().unwrap().clone()
    }

    fn named(&self, name: &str) -> Vec<CapturedSpan> {
        self.spans().into_iter().filter(|s| s.name == name).collect()
    }
}

/// Visitor that extracts span fields.
struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for SpanCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);

        let parent_name = ctx
            .current_span()
            .id()
            .and_then(|id| ctx.span(id))
            .map(|span_ref| span_ref.name().to_string());

        self.spans.lock().unwrap().push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            fields: visitor.0.into_iter().collect(),
            parent_name,
        });
    }
}

/// Run `f` under a subscriber that captures spans.
fn with_captured_spans<F>(f: F) -> CaptureHandle
where
    F: FnOnce(),
{
    let (layer, handle) = SpanCapture::new();
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    handle
}

fn words_suggest() -> Suggest<String> {
    let source = |q: &QueryDescriptor| {
        ["abc", "abd", "abx"]
            .iter()
            .filter(|w| w.starts_with(q.text()))
            .map(|w| w.to_string())
            .collect::<Vec<_>>()
    };
    Suggest::new(source, DisplayRenderer, ReplaceText)
}

fn field(text: &str) -> TextField {
    let mut field = TextField::new().with_value(text).with_focused(true);
    field.attach(Surface::fullscreen(Rect::new(0, 0, 20, 1), Size::new(80, 24)));
    field
}

// ============================================================================
// Tests
// ============================================================================

/// Fetch and render passes each open a span carrying their sizes.
#[test]
#[cfg(feature = "tracing")]
fn spans_created_for_fetch_and_render() {
    let handle = with_captured_spans(|| {
        let mut suggest = words_suggest();
        let mut field = field("ab");
        suggest.request_suggestions(&mut field).unwrap();
    });

    let fetches = handle.named("suggest_fetch");
    assert_eq!(fetches.len(), 1, "spans: {:?}", handle.spans());
    assert_eq!(fetches[0].fields.get("caret").map(String::as_str), Some("2"));
    assert_eq!(fetches[0].fields.get("text_len").map(String::as_str), Some("2"));

    let renders = handle.named("suggest_render");
    assert_eq!(renders.len(), 1);
    assert_eq!(renders[0].fields.get("count").map(String::as_str), Some("3"));
}

/// An unchanged list is fetched again but never re-rendered.
#[test]
#[cfg(feature = "tracing")]
fn unchanged_list_skips_render_span() {
    let handle = with_captured_spans(|| {
        let mut suggest = words_suggest();
        let mut field = field("ab");
        suggest.request_suggestions(&mut field).unwrap();
        suggest.request_suggestions(&mut field).unwrap();
    });

    assert_eq!(handle.named("suggest_fetch").len(), 2);
    assert_eq!(handle.named("suggest_render").len(), 1);
}

/// Without the feature no suggestion spans are emitted.
#[test]
#[cfg(not(feature = "tracing"))]
fn zero_overhead_when_disabled() {
    let handle = with_captured_spans(|| {
        let mut suggest = words_suggest();
        let mut field = field("ab");
        suggest.request_suggestions(&mut field).unwrap();
    });

    let ours: Vec<_> = handle
        .spans()
        .into_iter()
        .filter(|s| s.name.starts_with("suggest_"))
        .collect();
    assert!(ours.is_empty(), "unexpected spans: {ours:?}");
}
