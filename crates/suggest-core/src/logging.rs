#![forbid(unsafe_code)]

//! Logging for the suggestion lifecycle.
//!
//! With the `tracing` feature the macros are `tracing`'s own. Without it they
//! expand to `()`, so a call is valid anywhere the real macro is, match arms
//! included.

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, trace, warn};

#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// Discards a debug event.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {
            ()
        };
    }

    /// Discards a trace event.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {
            ()
        };
    }

    /// Discards a warning.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {
            ()
        };
    }

    /// A span that records nothing.
    #[macro_export]
    macro_rules! debug_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }
}

/// Stand-in for a disabled span.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    pub fn enter(&self) -> NoopGuard {
        NoopGuard
    }

    pub fn entered(self) -> NoopGuard {
        NoopGuard
    }
}

/// Guard returned by [`NoopSpan::enter`].
#[cfg(not(feature = "tracing"))]
pub struct NoopGuard;

#[cfg(all(test, not(feature = "tracing")))]
mod tests {
    #[test]
    fn noop_macros_accept_tracing_syntax() {
        crate::debug!(items = 3, "shown");
        crate::trace!(target: "suggest", focus = ?Some(1), "moved");
        let _guard = crate::debug_span!("fetch", len = 2).entered();
        let span = crate::debug_span!("render");
        let _inner = span.enter();
    }

    #[test]
    fn noop_macros_are_expressions() {
        let results: [Result<u8, &str>; 2] = [Ok(1), Err("boom")];
        for result in results {
            match result {
                Ok(n) if n > 0 => crate::debug!(n, "positive"),
                Ok(_) => crate::trace!("zero"),
                Err(_) => crate::warn!("failed"),
            }
        }
        fn tail() {
            crate::debug!("tail")
        }
        tail();
    }
}
