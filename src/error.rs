use thiserror::Error;

/// Error kinds surfaced by [`IntervalTreeSet`] and
/// [`ConcurrentIntervalTreeSet`] operations.
///
/// [`IntervalTreeSet`]: crate::IntervalTreeSet
/// [`ConcurrentIntervalTreeSet`]: crate::ConcurrentIntervalTreeSet
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An interval with finite `min >= max` was constructed.
    ///
    /// Half-open intervals `[min, max)` cannot be empty.
    #[error("interval min must be less than max")]
    EmptyInterval,

    /// [`first()`] or [`last()`] was invoked on an empty set.
    ///
    /// [`first()`]: crate::IntervalTreeSet::first
    /// [`last()`]: crate::IntervalTreeSet::last
    #[error("set is empty")]
    EmptySet,

    /// The requested navigation view is deliberately unimplemented.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}
