#![forbid(unsafe_code)]

//! Change Detector.
//!
//! Decides whether a fresh suggestion list is worth re-rendering. Only
//! `PartialEq` is required of suggestion values, so membership checks are
//! linear scans; suggestion lists are short.

/// How two lists are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DiffMode {
    /// Differ in length, or in membership when viewed as sets. A pure
    /// reordering counts as unchanged.
    #[default]
    Unordered,
    /// Differ in length or at any position.
    Ordered,
}

/// Whether `current` differs from `previous` under `mode`.
pub fn has_changed_with<T: PartialEq>(previous: &[T], current: &[T], mode: DiffMode) -> bool {
    if previous.len() != current.len() {
        return true;
    }
    match mode {
        DiffMode::Ordered => previous != current,
        DiffMode::Unordered => {
            // Symmetric difference of the two lists viewed as sets.
            current.iter().any(|item| !previous.contains(item))
                || previous.iter().any(|item| !current.contains(item))
        }
    }
}

/// Whether `current` differs from `previous` ([`DiffMode::Unordered`]).
pub fn has_changed<T: PartialEq>(previous: &[T], current: &[T]) -> bool {
    has_changed_with(previous, current, DiffMode::Unordered)
}
