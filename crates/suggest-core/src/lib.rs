#![forbid(unsafe_code)]

//! Core: input events, geometry, text offsets, and logging shims shared by the
//! suggestion overlay and its hosts.

pub mod event;
pub mod geometry;
pub mod logging;
pub mod text;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, trace, warn};
