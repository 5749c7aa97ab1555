#![forbid(unsafe_code)]

//! Request generations for sources that answer later than they are asked.
//!
//! Every request, deferred or not, takes the next [`Generation`]. A result is
//! applied only if its generation is still the latest one handed out, so a
//! slow answer to an old query can never overwrite a newer one.

use crate::query::QueryDescriptor;

/// Monotonically increasing request token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    /// Raw counter value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Hands out generations and remembers the latest.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    latest: Generation,
}

impl RequestTracker {
    /// Create a tracker. No generation is current until the first `next`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding every earlier one.
    pub fn next(&mut self) -> Generation {
        self.latest = Generation(self.latest.0.wrapping_add(1));
        self.latest
    }

    /// Supersede every outstanding request without starting a new one.
    pub fn invalidate(&mut self) {
        self.latest = Generation(self.latest.0.wrapping_add(1));
    }

    /// Latest generation handed out or invalidated.
    pub fn latest(&self) -> Generation {
        self.latest
    }

    /// Whether a result stamped `generation` may still be applied.
    pub fn is_current(&self, generation: Generation) -> bool {
        generation == self.latest
    }
}

/// A request whose answer the host will deliver later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    generation: Generation,
    query: QueryDescriptor,
}

impl PendingRequest {
    pub(crate) fn new(generation: Generation, query: QueryDescriptor) -> Self {
        Self { generation, query }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// The query to hand to the source.
    pub fn query(&self) -> &QueryDescriptor {
        &self.query
    }
}
