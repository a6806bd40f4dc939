use parking_lot::RwLock;

use crate::{node::NodeIdx, Error, IntervalBounds, IntervalTreeSet};

/// An [`IntervalTreeSet`] decorated with a reader-writer lock, sharable
/// across threads.
///
/// Mutating operations acquire the lock exclusively; queries acquire it
/// shared, so any number of readers proceed in parallel. Every method takes
/// `&self`, and each releases the lock before returning, including on panic
/// of a caller-supplied closure.
///
/// Invariants are fully restored before an exclusive guard is dropped, so a
/// reader never observes a partially-applied mutation. Cross-operation
/// ordering is the order of exclusive lock acquisition.
///
/// # Iteration
///
/// [`iter()`] re-acquires the shared lock for every step rather than holding
/// it across the whole traversal, so writers interleave with an in-progress
/// iteration. The iterator is weakly consistent: it always moves strictly
/// forward through ascending lower bounds, reflecting whatever coverage is
/// stored at each step, and never fails.
///
/// [`iter()`]: Self::iter
#[derive(Debug)]
pub struct ConcurrentIntervalTreeSet<I> {
    tree: RwLock<IntervalTreeSet<I>>,
}

impl<I> Default for ConcurrentIntervalTreeSet<I> {
    fn default() -> Self {
        Self {
            tree: RwLock::default(),
        }
    }
}

impl<I> ConcurrentIntervalTreeSet<I>
where
    I: IntervalBounds,
{
    /// Construct an empty set.
    pub fn new() -> Self {
        Self {
            tree: RwLock::new(IntervalTreeSet::new()),
        }
    }

    /// Add `key` to the coverage of this set, merging it with every stored
    /// interval it intersects or touches.
    pub fn add(&self, key: I) -> bool {
        self.tree.write().add(key)
    }

    /// Add every interval yielded by `iter` under a single exclusive
    /// acquisition.
    pub fn add_all<T>(&self, iter: T) -> bool
    where
        T: IntoIterator<Item = I>,
    {
        self.tree.write().add_all(iter)
    }

    /// Remove the coverage region `[key.min, key.max)` from this set.
    pub fn remove(&self, key: &I) -> bool {
        self.tree.write().remove(key)
    }

    /// Remove the coverage of every interval yielded by `iter` under a single
    /// exclusive acquisition.
    pub fn remove_all<'a, T>(&self, iter: T) -> bool
    where
        T: IntoIterator<Item = &'a I>,
        I: 'a,
    {
        self.tree.write().remove_all(iter)
    }

    /// Remove every stored interval for which `filter` returns true.
    ///
    /// The traversal holds the shared lock; for each interval the filter
    /// accepts, the lock is escalated to exclusive for that single removal
    /// and downgraded again, so the filter itself never runs under the write
    /// lock. Enumeration is strictly ascending by lower bound.
    pub fn remove_if<F>(&self, mut filter: F) -> bool
    where
        F: FnMut(&I) -> bool,
    {
        let mut removed = false;
        let mut guard = self.tree.read();
        let mut cursor: Option<I> = None;

        loop {
            let next = match &cursor {
                None => guard.first_idx(),
                Some(prev) => guard.next_above(prev.min()),
            }
            .map(|idx| guard.node_key(idx).clone());

            let Some(key) = next else {
                break;
            };

            if filter(&key) {
                drop(guard);
                {
                    let mut write = self.tree.write();
                    removed |= write.remove_exact(&key);
                }
                guard = self.tree.read();
            }

            cursor = Some(key);
        }

        removed
    }

    /// Keep only the stored intervals exactly equal to a member of `keep`,
    /// removing the rest under a single exclusive acquisition.
    pub fn retain_all(&self, keep: &[I]) -> bool {
        self.tree.write().retain_all(keep)
    }

    /// Remove all intervals from this set.
    pub fn clear(&self) {
        self.tree.write().clear();
    }

    /// Remove and return the first stored interval, or [`None`] on an empty
    /// set.
    pub fn poll_first(&self) -> Option<I> {
        self.tree.write().poll_first()
    }

    /// Remove and return the last stored interval, or [`None`] on an empty
    /// set.
    pub fn poll_last(&self) -> Option<I> {
        self.tree.write().poll_last()
    }

    /// The number of intervals stored in this set.
    pub fn len(&self) -> usize {
        self.tree.read().len()
    }

    /// Returns true if this set stores no intervals.
    pub fn is_empty(&self) -> bool {
        self.tree.read().is_empty()
    }

    /// Returns true if `point` falls within a stored interval.
    pub fn contains_point(&self, point: &I::Point) -> bool {
        self.tree.read().contains_point(point)
    }

    /// Returns true if `[key.min, key.max)` is entirely covered by a stored
    /// interval.
    pub fn contains(&self, key: &I) -> bool {
        self.tree.read().contains(key)
    }

    /// Returns true if every interval yielded by `iter` is covered.
    pub fn contains_all<'a, T>(&self, iter: T) -> bool
    where
        T: IntoIterator<Item = &'a I>,
        I: 'a,
    {
        self.tree.read().contains_all(iter)
    }

    /// Returns true if `key` shares at least one point with a stored
    /// interval.
    pub fn intersects(&self, key: &I) -> bool {
        self.tree.read().intersects(key)
    }

    /// The maximal intervals within `[key.min, key.max)` that are not covered
    /// by this set, in ascending order.
    pub fn difference(&self, key: &I) -> Vec<I> {
        self.tree.read().difference(key)
    }

    /// The stored interval with the smallest lower bound, or
    /// [`Error::EmptySet`].
    pub fn first(&self) -> Result<I, Error> {
        self.tree.read().first().map(Clone::clone)
    }

    /// The stored interval with the greatest lower bound, or
    /// [`Error::EmptySet`].
    pub fn last(&self) -> Result<I, Error> {
        self.tree.read().last().map(Clone::clone)
    }

    /// The stored interval immediately preceding the one covering `e.min`.
    pub fn lower(&self, e: &I) -> Option<I> {
        self.tree.read().lower(e).cloned()
    }

    /// The stored interval immediately following the one covering `e.min`.
    pub fn higher(&self, e: &I) -> Option<I> {
        self.tree.read().higher(e).cloned()
    }

    /// The stored interval with the greatest lower bound at or below `e.min`.
    pub fn floor(&self, e: &I) -> Option<I> {
        self.tree.read().floor(e).cloned()
    }

    /// The stored interval with the smallest lower bound at or above `e.min`.
    pub fn ceiling(&self, e: &I) -> Option<I> {
        self.tree.read().ceiling(e).cloned()
    }

    /// All stored intervals in ascending order.
    pub fn to_vec(&self) -> Vec<I> {
        self.tree.read().to_vec()
    }

    /// A deep copy of the current coverage as an unsynchronized set.
    pub fn snapshot(&self) -> IntervalTreeSet<I> {
        self.tree.read().clone()
    }

    /// Apply `action` to every stored interval in ascending order, under the
    /// shared lock.
    pub fn for_each<F>(&self, mut action: F)
    where
        F: FnMut(&I),
    {
        let guard = self.tree.read();
        for key in guard.iter() {
            action(key);
        }
    }

    /// Iterate over the stored intervals in ascending order, acquiring the
    /// shared lock per step.
    pub fn iter(&self) -> ConcurrentIter<'_, I> {
        ConcurrentIter {
            set: self,
            version: 0,
            next: None,
            last: None,
            started: false,
            done: false,
        }
    }

    /// A view of this set in descending order.
    ///
    /// Unimplemented; always returns [`Error::Unsupported`].
    pub fn descending_set(&self) -> Result<Self, Error> {
        Err(Error::Unsupported("descending_set"))
    }

    /// Iterate over the stored intervals in descending order.
    ///
    /// Unimplemented; always returns [`Error::Unsupported`].
    pub fn descending_iter(&self) -> Result<ConcurrentIter<'_, I>, Error> {
        Err(Error::Unsupported("descending_iter"))
    }

    /// A view of the portion of this set between `_from` and `_to`.
    ///
    /// Unimplemented; always returns [`Error::Unsupported`].
    pub fn sub_set(&self, _from: &I, _to: &I) -> Result<Self, Error> {
        Err(Error::Unsupported("sub_set"))
    }

    /// A view of the portion of this set below `_to`.
    ///
    /// Unimplemented; always returns [`Error::Unsupported`].
    pub fn head_set(&self, _to: &I) -> Result<Self, Error> {
        Err(Error::Unsupported("head_set"))
    }

    /// A view of the portion of this set above `_from`.
    ///
    /// Unimplemented; always returns [`Error::Unsupported`].
    pub fn tail_set(&self, _from: &I) -> Result<Self, Error> {
        Err(Error::Unsupported("tail_set"))
    }
}

impl<I> From<IntervalTreeSet<I>> for ConcurrentIntervalTreeSet<I> {
    fn from(tree: IntervalTreeSet<I>) -> Self {
        Self {
            tree: RwLock::new(tree),
        }
    }
}

impl<I> ConcurrentIntervalTreeSet<I> {
    /// Unwrap this set, returning the inner unsynchronized variant.
    pub fn into_inner(self) -> IntervalTreeSet<I> {
        self.tree.into_inner()
    }
}

impl<I> FromIterator<I> for ConcurrentIntervalTreeSet<I>
where
    I: IntervalBounds,
{
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self::from(IntervalTreeSet::from_iter(iter))
    }
}

/// A weakly-consistent iterator over a [`ConcurrentIntervalTreeSet`].
///
/// Each step acquires the shared lock. While the set is unmodified the
/// cursor resumes from its cached position in O(1); after a modification it
/// re-seeks in O(log n) to the first interval whose lower bound is strictly
/// greater than the last one yielded, so the sequence of lower bounds is
/// always strictly ascending and a step never fails.
#[derive(Debug)]
pub struct ConcurrentIter<'a, I> {
    set: &'a ConcurrentIntervalTreeSet<I>,

    /// The tree modification count observed at the previous step, validating
    /// `next`.
    version: u64,
    next: Option<NodeIdx>,

    /// The interval yielded by the previous step.
    last: Option<I>,

    started: bool,
    done: bool,
}

impl<I> Iterator for ConcurrentIter<'_, I>
where
    I: IntervalBounds,
{
    type Item = I;

    fn next(&mut self) -> Option<I> {
        if self.done {
            return None;
        }

        let guard = self.set.tree.read();
        let cur = if !self.started {
            guard.first_idx()
        } else if self.version == guard.modcount {
            self.next
        } else {
            // The tree changed since the previous step; the cached cursor
            // may be stale. Resume past the last yielded lower bound.
            match &self.last {
                Some(last) => guard.next_above(last.min()),
                None => guard.first_idx(),
            }
        };
        self.started = true;

        let Some(idx) = cur else {
            self.done = true;
            return None;
        };

        let key = guard.node_key(idx).clone();
        self.version = guard.modcount;
        self.next = guard.successor_idx(idx);
        self.last = Some(key.clone());

        Some(key)
    }
}
