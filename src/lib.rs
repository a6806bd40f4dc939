//! Ordered, in-memory sets of half-open intervals `[min, max)` that
//! automatically merge: no two stored intervals ever intersect or touch, as
//! any added interval that meets existing coverage is combined with it into a
//! single maximal interval.
//!
//! ```
//! use interset::{Interval, IntervalTreeSet};
//!
//! let mut set = IntervalTreeSet::new();
//!
//! // Touching and overlapping intervals merge on insertion.
//! set.add(Interval::bounded(3, 5)?);
//! set.add(Interval::bounded(5, 7)?);
//! assert_eq!(set.to_string(), "[[3,7)]");
//!
//! // Removing a covered region splits the interval it lands in.
//! set.remove(&Interval::bounded(4, 6)?);
//! assert_eq!(set.to_string(), "[[3,4),[6,7)]");
//!
//! assert!(set.contains_point(&3));
//! assert!(!set.contains_point(&4));
//! # Ok::<(), interset::Error>(())
//! ```
//!
//! The set is backed by an augmented AVL tree whose nodes carry parent links,
//! subtree sizes and cached subtree extents, giving O(log n) insertion,
//! removal, containment and intersection tests, coverage complement
//! ([`difference()`]) and ordered navigation, with O(1) access to the first
//! and last intervals.
//!
//! Interval endpoints may be unbounded, extending coverage to negative or
//! positive infinity. Any type implementing [`IntervalBounds`] can be stored;
//! [`Interval`] is the ready-made implementation.
//!
//! For sharing a set across threads, [`ConcurrentIntervalTreeSet`] wraps the
//! base type behind a reader-writer lock.
//!
//! [`difference()`]: IntervalTreeSet::difference

#![deny(rustdoc::broken_intra_doc_links, rust_2018_idioms)]
#![warn(missing_docs)]

mod avl;
mod concurrent;
mod error;
mod interval;
mod iter;
mod node;
#[cfg(test)]
mod test_utils;
mod tree;

pub use concurrent::{ConcurrentIntervalTreeSet, ConcurrentIter};
pub use error::Error;
pub use interval::{Interval, IntervalBounds};
pub use iter::Iter;
pub use tree::IntervalTreeSet;
