use std::{
    cmp::Ordering,
    fmt,
    fmt::Display,
    hash::{Hash, Hasher},
};

use crate::{
    avl,
    interval::{cmp_max_to_min, cmp_min_to_max, cmp_maxes, cmp_mins, IntervalBounds},
    iter::Iter,
    node::{Arena, NodeIdx},
    Error,
};

/// An ordered set of half-open intervals `[min, max)` that never stores two
/// intersecting or touching entries: any added interval is merged with the
/// coverage it meets into a single maximal interval.
///
/// # Merging
///
/// Under half-open semantics two intervals sharing an endpoint are touching
/// and joinable, so adding `[3,5)` and `[5,7)` yields the single entry
/// `[3,7)`. Removing a region splits any stored interval that straddles it:
///
/// ```
/// use interset::{Interval, IntervalTreeSet};
///
/// let mut set = IntervalTreeSet::new();
/// set.add(Interval::bounded(1, 10)?);
/// set.remove(&Interval::bounded(4, 6)?);
///
/// assert_eq!(set.to_string(), "[[1,4),[6,10)]");
/// # Ok::<(), interset::Error>(())
/// ```
///
/// # Complexity
///
/// The set is backed by an augmented AVL tree whose nodes carry their subtree
/// size and cached subtree extents, so [`add()`], [`remove()`],
/// [`contains()`], [`intersects()`], [`difference()`] and the navigation
/// operations all run in O(log n); [`first()`] and [`last()`] are O(1).
///
/// Endpoints may be unbounded: an interval with no lower bound extends to
/// negative infinity, one with no upper bound to positive infinity.
///
/// This type is not internally synchronized; see
/// [`ConcurrentIntervalTreeSet`] for a variant sharable across threads.
///
/// [`add()`]: Self::add
/// [`remove()`]: Self::remove
/// [`contains()`]: Self::contains
/// [`intersects()`]: Self::intersects
/// [`difference()`]: Self::difference
/// [`first()`]: Self::first
/// [`last()`]: Self::last
/// [`ConcurrentIntervalTreeSet`]: crate::ConcurrentIntervalTreeSet
#[derive(Debug, Clone)]
pub struct IntervalTreeSet<I> {
    pub(crate) arena: Arena<I>,
    pub(crate) root: Option<NodeIdx>,

    /// Incremented on every structural modification; versions the lock-step
    /// cursor of the concurrent wrapper.
    pub(crate) modcount: u64,
}

impl<I> Default for IntervalTreeSet<I> {
    fn default() -> Self {
        Self {
            arena: Arena::default(),
            root: None,
            modcount: 0,
        }
    }
}

impl<I> IntervalTreeSet<I>
where
    I: IntervalBounds,
{
    /// Construct an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of intervals stored in this set.
    pub fn len(&self) -> usize {
        avl::size(&self.arena, self.root)
    }

    /// Returns true if this set stores no intervals.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Remove all intervals from this set.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.modcount += 1;
    }

    /// Add `key` to the coverage of this set, merging it with every stored
    /// interval it intersects or touches.
    ///
    /// Returns true if the coverage changed; false if `key` was already
    /// entirely covered.
    pub fn add(&mut self, key: I) -> bool {
        if key.min().is_none() && key.max().is_none() {
            // Saturating the domain collapses the tree to a single node.
            if let Some(root) = self.root {
                let data = &self.arena.node(root).key;
                if data.min().is_none() && data.max().is_none() {
                    return false;
                }
            }
            self.arena.clear();
            self.root = Some(self.arena.alloc(key));
            self.modcount += 1;
            return true;
        }

        let mut changed = false;
        let root = self.root;
        let root = self.add_at(&key, root, &mut changed);
        self.arena.node_mut(root).parent = None;
        self.root = Some(root);

        if changed {
            self.modcount += 1;
        }
        changed
    }

    /// Add every interval yielded by `iter`, returning true if any addition
    /// changed the coverage.
    pub fn add_all<T>(&mut self, iter: T) -> bool
    where
        T: IntoIterator<Item = I>,
    {
        let mut changed = false;
        for key in iter {
            changed |= self.add(key);
        }
        changed
    }

    /// Remove the coverage region `[key.min, key.max)` from this set.
    ///
    /// A stored interval strictly straddling the probe is split in two; one
    /// partially overlapped is clipped; one entirely covered is deleted.
    ///
    /// Returns true if the coverage shrank.
    pub fn remove(&mut self, key: &I) -> bool {
        let mut changed = false;
        let root = self.root;
        let root = self.delete_cov(key, root, &mut changed);
        if let Some(root) = root {
            self.arena.node_mut(root).parent = None;
        }
        self.root = root;

        if changed {
            self.modcount += 1;
        }
        changed
    }

    /// Remove the coverage of every interval yielded by `iter`, returning
    /// true if any removal changed the coverage.
    pub fn remove_all<'a, T>(&mut self, iter: T) -> bool
    where
        T: IntoIterator<Item = &'a I>,
        I: 'a,
    {
        let mut changed = false;
        for key in iter {
            changed |= self.remove(key);
        }
        changed
    }

    /// Keep only the stored intervals for which `f` returns true, removing
    /// the rest.
    ///
    /// Returns true if any interval was removed.
    pub fn retain<F>(&mut self, mut f: F) -> bool
    where
        F: FnMut(&I) -> bool,
    {
        let doomed = self
            .iter()
            .filter(|key| !f(key))
            .cloned()
            .collect::<Vec<_>>();

        let mut removed = false;
        for key in &doomed {
            removed |= self.remove_exact(key);
        }
        removed
    }

    /// Keep only the stored intervals exactly equal to a member of `keep`,
    /// removing the rest.
    ///
    /// Returns true if any interval was removed.
    pub fn retain_all(&mut self, keep: &[I]) -> bool {
        self.retain(|key| keep.contains(key))
    }

    /// Returns true if `point` falls within a stored interval.
    pub fn contains_point(&self, point: &I::Point) -> bool {
        let mut node = self.root;
        while let Some(idx) = node {
            let n = self.arena.node(idx);
            if n.key.contains_point(point) {
                return true;
            }
            node = match n.key.min() {
                Some(min) if point < min => n.left,
                _ => n.right,
            };
        }
        false
    }

    /// Returns true if `[key.min, key.max)` is entirely covered by a stored
    /// interval.
    pub fn contains(&self, key: &I) -> bool {
        match self.search_node(key.min(), self.root) {
            Some(idx) => {
                cmp_maxes(key.max(), self.arena.node(idx).key.max()) != Ordering::Greater
            }
            None => false,
        }
    }

    /// Returns true if every interval yielded by `iter` is covered.
    pub fn contains_all<'a, T>(&self, iter: T) -> bool
    where
        T: IntoIterator<Item = &'a I>,
        I: 'a,
    {
        iter.into_iter().all(|key| self.contains(key))
    }

    /// Returns true if `key` shares at least one point with a stored
    /// interval.
    pub fn intersects(&self, key: &I) -> bool {
        self.intersects_at(key, self.root)
    }

    /// The maximal intervals within `[key.min, key.max)` that are not covered
    /// by this set, in ascending order.
    ///
    /// Returns an empty vector if `key` is fully covered, and `[key]` if no
    /// stored interval intersects it.
    pub fn difference(&self, key: &I) -> Vec<I> {
        let mut out = Vec::new();

        // The leftmost stored interval ending after the probe begins.
        let mut candidate = None;
        let mut node = self.root;
        while let Some(idx) = node {
            let n = self.arena.node(idx);
            if cmp_max_to_min(n.key.max(), key.min()) == Ordering::Greater {
                candidate = Some(idx);
                node = n.left;
            } else {
                node = n.right;
            }
        }

        // Walk successors, emitting the gap before each covered interval.
        let mut prev = key.min().cloned();
        let mut cur = candidate;
        while let Some(idx) = cur {
            let covered = &self.arena.node(idx).key;
            if cmp_min_to_max(covered.min(), key.max()) != Ordering::Less {
                break;
            }

            if cmp_mins(prev.as_ref(), covered.min()) == Ordering::Less {
                out.push(key.with_bounds(prev, covered.min().cloned()));
            }
            prev = match covered.max() {
                Some(max) => Some(max.clone()),
                // Covered through positive infinity.
                None => return out,
            };

            cur = avl::successor(&self.arena, idx);
        }

        if cmp_min_to_max(prev.as_ref(), key.max()) == Ordering::Less {
            out.push(key.with_bounds(prev, key.max().cloned()));
        }
        out
    }

    /// The stored interval with the smallest lower bound.
    ///
    /// Returns [`Error::EmptySet`] if the set is empty.
    pub fn first(&self) -> Result<&I, Error> {
        let root = self.root.ok_or(Error::EmptySet)?;
        let min = self.arena.node(root).min_node;
        Ok(&self.arena.node(min).key)
    }

    /// The stored interval with the greatest lower bound.
    ///
    /// Returns [`Error::EmptySet`] if the set is empty.
    pub fn last(&self) -> Result<&I, Error> {
        let root = self.root.ok_or(Error::EmptySet)?;
        let max = self.arena.node(root).max_node;
        Ok(&self.arena.node(max).key)
    }

    /// The stored interval immediately preceding the one covering `e.min`,
    /// or [`None`] if `e.min` is uncovered or no predecessor exists.
    pub fn lower(&self, e: &I) -> Option<&I> {
        let node = self.search_node(e.min(), self.root)?;
        let prev = avl::predecessor(&self.arena, node)?;
        Some(&self.arena.node(prev).key)
    }

    /// The stored interval immediately following the one covering `e.min`,
    /// or [`None`] if `e.min` is uncovered or no successor exists.
    pub fn higher(&self, e: &I) -> Option<&I> {
        let node = self.search_node(e.min(), self.root)?;
        let next = avl::successor(&self.arena, node)?;
        Some(&self.arena.node(next).key)
    }

    /// The stored interval with the greatest lower bound at or below `e.min`.
    pub fn floor(&self, e: &I) -> Option<&I> {
        let mut floor = None;
        let mut node = self.root;
        while let Some(idx) = node {
            let n = self.arena.node(idx);
            node = match cmp_mins(e.min(), n.key.min()) {
                Ordering::Equal => return Some(&n.key),
                Ordering::Less => n.left,
                Ordering::Greater => {
                    floor = Some(idx);
                    n.right
                }
            };
        }
        floor.map(|idx| &self.arena.node(idx).key)
    }

    /// The stored interval with the smallest lower bound at or above `e.min`.
    pub fn ceiling(&self, e: &I) -> Option<&I> {
        let mut ceiling = None;
        let mut node = self.root;
        while let Some(idx) = node {
            let n = self.arena.node(idx);
            node = match cmp_mins(e.min(), n.key.min()) {
                Ordering::Equal => return Some(&n.key),
                Ordering::Less => {
                    ceiling = Some(idx);
                    n.left
                }
                Ordering::Greater => n.right,
            };
        }
        ceiling.map(|idx| &self.arena.node(idx).key)
    }

    /// Remove and return the first stored interval, or [`None`] on an empty
    /// set.
    pub fn poll_first(&mut self) -> Option<I> {
        let root = self.root?;
        let idx = self.arena.node(root).min_node;
        let key = self.arena.node(idx).key.clone();
        avl::delete_at(&mut self.arena, &mut self.root, idx);
        self.modcount += 1;
        Some(key)
    }

    /// Remove and return the last stored interval, or [`None`] on an empty
    /// set.
    pub fn poll_last(&mut self) -> Option<I> {
        let root = self.root?;
        let idx = self.arena.node(root).max_node;
        let key = self.arena.node(idx).key.clone();
        avl::delete_at(&mut self.arena, &mut self.root, idx);
        self.modcount += 1;
        Some(key)
    }

    /// Iterate over references to the stored intervals in ascending order of
    /// their lower bounds.
    pub fn iter(&self) -> Iter<'_, I> {
        Iter::new(self)
    }

    /// All stored intervals in ascending order.
    pub fn to_vec(&self) -> Vec<I> {
        self.iter().cloned().collect()
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
    pub fn descending_iter(&self) -> Result<Iter<'_, I>, Error> {
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

    /// Remove the stored interval exactly equal to `key`, if present.
    pub(crate) fn remove_exact(&mut self, key: &I) -> bool {
        let mut node = self.root;
        while let Some(idx) = node {
            let n = self.arena.node(idx);
            node = match cmp_mins(key.min(), n.key.min()) {
                Ordering::Less => n.left,
                Ordering::Greater => n.right,
                Ordering::Equal => {
                    if n.key != *key {
                        return false;
                    }
                    avl::delete_at(&mut self.arena, &mut self.root, idx);
                    self.modcount += 1;
                    return true;
                }
            };
        }
        false
    }

    /// The first stored interval whose lower bound is strictly greater than
    /// `min`.
    pub(crate) fn next_above(&self, min: Option<&I::Point>) -> Option<NodeIdx> {
        let mut candidate = None;
        let mut node = self.root;
        while let Some(idx) = node {
            let n = self.arena.node(idx);
            if cmp_mins(n.key.min(), min) == Ordering::Greater {
                candidate = Some(idx);
                node = n.left;
            } else {
                node = n.right;
            }
        }
        candidate
    }

    pub(crate) fn first_idx(&self) -> Option<NodeIdx> {
        self.root.map(|root| self.arena.node(root).min_node)
    }

    pub(crate) fn successor_idx(&self, idx: NodeIdx) -> Option<NodeIdx> {
        avl::successor(&self.arena, idx)
    }

    pub(crate) fn node_key(&self, idx: NodeIdx) -> &I {
        &self.arena.node(idx).key
    }

    /// Locate the node whose stored interval covers `key_min`, pruning
    /// subtrees through the cached extents.
    fn search_node(&self, key_min: Option<&I::Point>, node: Option<NodeIdx>) -> Option<NodeIdx> {
        let idx = node?;
        let n = self.arena.node(idx);

        // Prune if `key_min` falls outside this subtree's span.
        if cmp_mins(key_min, self.arena.node(n.min_node).key.min()) == Ordering::Less {
            return None;
        }
        if cmp_min_to_max(key_min, self.arena.node(n.max_node).key.max()) != Ordering::Less {
            return None;
        }

        if cmp_mins(key_min, n.key.min()) == Ordering::Less {
            self.search_node(key_min, n.left)
        } else if cmp_min_to_max(key_min, n.key.max()) != Ordering::Less {
            self.search_node(key_min, n.right)
        } else {
            Some(idx)
        }
    }

    fn intersects_at(&self, key: &I, node: Option<NodeIdx>) -> bool {
        let Some(idx) = node else {
            return false;
        };
        let n = self.arena.node(idx);

        // Prune if the probe lies entirely outside this subtree's span.
        if cmp_max_to_min(key.max(), self.arena.node(n.min_node).key.min()) != Ordering::Greater {
            return false;
        }
        if cmp_min_to_max(key.min(), self.arena.node(n.max_node).key.max()) != Ordering::Less {
            return false;
        }

        if cmp_max_to_min(key.max(), n.key.min()) != Ordering::Greater {
            self.intersects_at(key, n.left)
        } else if cmp_min_to_max(key.min(), n.key.max()) != Ordering::Less {
            self.intersects_at(key, n.right)
        } else {
            true
        }
    }

    /// Recursive descent of [`add()`](Self::add), returning the root of the
    /// subtree that replaces `node`.
    fn add_at(&mut self, key: &I, node: Option<NodeIdx>, changed: &mut bool) -> NodeIdx {
        let Some(node) = node else {
            *changed = true;
            return self.arena.alloc(key.clone());
        };

        let d_min = self.arena.node(node).key.min().cloned();
        let d_max = self.arena.node(node).key.max().cloned();

        if cmp_min_to_max(key.min(), d_max.as_ref()) == Ordering::Greater {
            // Strictly right of this node, with a gap.
            let right = self.arena.node(node).right;
            let child = self.add_at(key, right, changed);
            return avl::set_right(&mut self.arena, node, Some(child));
        }

        if cmp_max_to_min(key.max(), d_min.as_ref()) == Ordering::Less {
            // Strictly left of this node, with a gap. A touching bound falls
            // through to the merge below.
            let left = self.arena.node(node).left;
            let child = self.add_at(key, left, changed);
            return avl::set_left(&mut self.arena, node, Some(child));
        }

        // The new interval intersects or touches this node's interval. The
        // merge may swallow subtrees on either side, leaving height gaps a
        // plain rotation cannot close, so the node is re-joined with whatever
        // remains of its children.
        if cmp_mins(key.min(), d_min.as_ref()) == Ordering::Less {
            let new_left = self.merge_left(key, node, changed);
            let right = self.arena.node(node).right;
            avl::join(&mut self.arena, new_left, node, right)
        } else {
            let new_right = self.merge_right(key, node, changed);
            let left = self.arena.node(node).left;
            avl::join(&mut self.arena, left, node, new_right)
        }
    }

    /// Absorb everything between `key.min` and `node` into `node`, rewriting
    /// its stored interval. Returns the new left subtree of `node`.
    fn merge_left(&mut self, key: &I, node: NodeIdx, changed: &mut bool) -> Option<NodeIdx> {
        let key_min = key.min().cloned();
        let left = self.arena.node(node).left;
        self.merge_left_at(key, key_min, node, left, changed)
    }

    fn merge_left_at(
        &mut self,
        key: &I,
        key_min: Option<I::Point>,
        node: NodeIdx,
        child: Option<NodeIdx>,
        changed: &mut bool,
    ) -> Option<NodeIdx> {
        let Some(child) = child else {
            // Reached the merge point: `node` extends down to `key_min`, and
            // up to `key.max` if the new interval outgrows it.
            let d_max = self.arena.node(node).key.max().cloned();
            if cmp_maxes(key.max(), d_max.as_ref()) == Ordering::Greater {
                let key_max = key.max().cloned();
                let right = self.arena.node(node).right;
                let new_right = self.merge_right_at(key, key_max, key_min, node, right, changed);
                avl::link_right(&mut self.arena, node, new_right);
            } else {
                self.arena.node_mut(node).key = key.with_bounds(key_min, d_max);
                *changed = true;
            }
            return None;
        };

        let child_min = self.arena.node(child).key.min().cloned();

        if cmp_mins(key_min.as_ref(), child_min.as_ref()) != Ordering::Greater {
            // The new interval starts at or before this child: the child and
            // everything between it and `node` is covered. Continue absorbing
            // to its left.
            *changed = true;
            let child_left = self.arena.node(child).left;
            if let Some(right) = self.arena.node(child).right {
                self.arena.free_subtree(right);
            }
            self.arena.free(child);
            return self.merge_left_at(key, key_min, node, child_left, changed);
        }

        let child_max = self.arena.node(child).key.max().cloned();

        if cmp_min_to_max(key_min.as_ref(), child_max.as_ref()) == Ordering::Greater {
            // A gap separates this child from the new interval: keep it and
            // continue in its right subtree.
            let child_left = self.arena.node(child).left;
            let child_right = self.arena.node(child).right;
            let new_right = self.merge_left_at(key, key_min, node, child_right, changed);
            return Some(avl::join(&mut self.arena, child_left, child, new_right));
        }

        // The child overlaps or touches `key.min`: the merged interval
        // extends down to the child's lower bound, and the child's right
        // subtree (covered in full) goes with it.
        *changed = true;
        let d_max = self.arena.node(node).key.max().cloned();
        if cmp_maxes(key.max(), d_max.as_ref()) == Ordering::Greater {
            let key_max = key.max().cloned();
            let right = self.arena.node(node).right;
            let new_right =
                self.merge_right_at(key, key_max, child_min, node, right, changed);
            avl::link_right(&mut self.arena, node, new_right);
        } else {
            self.arena.node_mut(node).key = key.with_bounds(child_min, d_max);
        }

        let child_left = self.arena.node(child).left;
        if let Some(right) = self.arena.node(child).right {
            self.arena.free_subtree(right);
        }
        self.arena.free(child);
        child_left
    }

    /// Absorb everything between `node` and `key.max` into `node`, rewriting
    /// its stored interval to span from `node`'s own lower bound. Returns the
    /// new right subtree of `node`.
    fn merge_right(&mut self, key: &I, node: NodeIdx, changed: &mut bool) -> Option<NodeIdx> {
        let key_max = key.max().cloned();
        let data_min = self.arena.node(node).key.min().cloned();
        let right = self.arena.node(node).right;
        self.merge_right_at(key, key_max, data_min, node, right, changed)
    }

    fn merge_right_at(
        &mut self,
        key: &I,
        key_max: Option<I::Point>,
        data_min: Option<I::Point>,
        node: NodeIdx,
        child: Option<NodeIdx>,
        changed: &mut bool,
    ) -> Option<NodeIdx> {
        let Some(child) = child else {
            // Reached the merge point: extend `node` up to `key_max` if the
            // new interval outgrows it.
            let d_max = self.arena.node(node).key.max().cloned();
            if cmp_maxes(key_max.as_ref(), d_max.as_ref()) == Ordering::Greater {
                self.arena.node_mut(node).key = key.with_bounds(data_min, key_max);
                *changed = true;
            }
            return None;
        };

        let child_max = self.arena.node(child).key.max().cloned();

        if cmp_maxes(key_max.as_ref(), child_max.as_ref()) == Ordering::Greater {
            // The new interval ends past this child: the child and everything
            // between it and `node` is covered. Continue absorbing to its
            // right.
            *changed = true;
            let child_right = self.arena.node(child).right;
            if let Some(left) = self.arena.node(child).left {
                self.arena.free_subtree(left);
            }
            self.arena.free(child);
            return self.merge_right_at(key, key_max, data_min, node, child_right, changed);
        }

        let child_min = self.arena.node(child).key.min().cloned();

        if cmp_max_to_min(key_max.as_ref(), child_min.as_ref()) == Ordering::Less {
            // A gap separates the new interval from this child: keep it and
            // continue in its left subtree.
            let child_left = self.arena.node(child).left;
            let child_right = self.arena.node(child).right;
            let new_left = self.merge_right_at(key, key_max, data_min, node, child_left, changed);
            return Some(avl::join(&mut self.arena, new_left, child, child_right));
        }

        // The child overlaps or touches `key.max`: absorb it, the merged
        // interval extending to the child's upper bound. The child's left
        // subtree (covered in full) goes with it.
        *changed = true;
        self.arena.node_mut(node).key = key.with_bounds(data_min, child_max);

        let child_right = self.arena.node(child).right;
        if let Some(left) = self.arena.node(child).left {
            self.arena.free_subtree(left);
        }
        self.arena.free(child);
        child_right
    }

    /// Recursive descent of [`remove()`](Self::remove), pruning through the
    /// cached subtree extents. Returns the root of the subtree that replaces
    /// `node`.
    fn delete_cov(
        &mut self,
        key: &I,
        node: Option<NodeIdx>,
        changed: &mut bool,
    ) -> Option<NodeIdx> {
        let idx = node?;
        let n = self.arena.node(idx);
        let sub_min = self.arena.node(n.min_node).key.min().cloned();
        let sub_max = self.arena.node(n.max_node).key.max().cloned();

        if cmp_min_to_max(key.min(), sub_max.as_ref()) != Ordering::Less
            || cmp_max_to_min(key.max(), sub_min.as_ref()) != Ordering::Greater
        {
            // The probe does not overlap this subtree's span.
            return Some(idx);
        }

        if cmp_mins(key.min(), sub_min.as_ref()) == Ordering::Greater {
            // The probe starts inside the span.
            return self.delete_cov_node(key, idx, changed);
        }

        if cmp_maxes(key.max(), sub_max.as_ref()) == Ordering::Less {
            // The probe covers the span's start but not its end.
            return self.delete_cov_node(key, idx, changed);
        }

        // The probe covers the entire span.
        *changed = true;
        self.arena.free_subtree(idx);
        None
    }

    fn delete_cov_node(&mut self, key: &I, node: NodeIdx, changed: &mut bool) -> Option<NodeIdx> {
        let d_min = self.arena.node(node).key.min().cloned();
        let d_max = self.arena.node(node).key.max().cloned();
        let left = self.arena.node(node).left;
        let right = self.arena.node(node).right;

        // Removal can delete whole runs of nodes from a child subtree, so
        // every re-link below joins rather than rotating in place.
        if cmp_max_to_min(key.max(), d_min.as_ref()) != Ordering::Greater {
            // Entirely left of this interval.
            let new_left = self.delete_cov(key, left, changed);
            return Some(avl::join(&mut self.arena, new_left, node, right));
        }

        if cmp_min_to_max(key.min(), d_max.as_ref()) != Ordering::Less {
            // Entirely right of this interval.
            let new_right = self.delete_cov(key, right, changed);
            return Some(avl::join(&mut self.arena, left, node, new_right));
        }

        *changed = true;

        if cmp_mins(key.min(), d_min.as_ref()) == Ordering::Greater {
            // The probe starts strictly inside this interval: the low part
            // survives.
            let low = {
                let data = &self.arena.node(node).key;
                data.with_bounds(d_min, key.min().cloned())
            };

            if cmp_maxes(key.max(), d_max.as_ref()) == Ordering::Less {
                // And ends strictly inside it: split in two, seating the high
                // part below whatever previously lived on the right.
                let high = {
                    let data = &self.arena.node(node).key;
                    data.with_bounds(key.max().cloned(), d_max)
                };
                self.arena.node_mut(node).key = low;

                let cleaned = self.delete_cov(key, right, changed);
                let split = self.arena.alloc(high);
                let new_right = avl::join(&mut self.arena, None, split, cleaned);
                return Some(avl::join(&mut self.arena, left, node, Some(new_right)));
            }

            // The probe runs to or past this interval's end: clip, then
            // continue removing on the right.
            self.arena.node_mut(node).key = low;
            let new_right = self.delete_cov(key, right, changed);
            return Some(avl::join(&mut self.arena, left, node, new_right));
        }

        // The probe covers this interval's start.
        if cmp_maxes(key.max(), d_max.as_ref()) == Ordering::Less {
            // But not its end: the high part survives; continue removing on
            // the left.
            let high = {
                let data = &self.arena.node(node).key;
                data.with_bounds(key.max().cloned(), d_max)
            };
            self.arena.node_mut(node).key = high;

            let new_left = self.delete_cov(key, left, changed);
            return Some(avl::join(&mut self.arena, new_left, node, right));
        }

        // The probe covers this interval entirely: delete the node.
        match (left, right) {
            (_, None) => {
                self.arena.free(node);
                self.delete_cov(key, left, changed)
            }
            (None, Some(right)) => {
                self.arena.free(node);
                self.delete_cov(key, Some(right), changed)
            }
            (Some(left), Some(right)) => {
                // Promote the in-order successor into this node, remove the
                // successor from the right subtree, and re-examine: the
                // promoted interval may itself still be covered by the probe.
                let succ = self.arena.node(right).min_node;
                let succ_key = self.arena.node(succ).key.clone();
                self.arena.node_mut(node).key = succ_key.clone();

                let new_right = self.delete_cov(&succ_key, Some(right), changed);
                let sub = avl::join(&mut self.arena, Some(left), node, new_right);
                self.delete_cov_node(key, sub, changed)
            }
        }
    }
}

impl<I> Display for IntervalTreeSet<I>
where
    I: IntervalBounds + Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, key) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{key}")?;
        }
        write!(f, "]")
    }
}

/// Sets are equal if they store the same intervals, independent of tree
/// shape.
impl<I> PartialEq for IntervalTreeSet<I>
where
    I: IntervalBounds,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<I> Eq for IntervalTreeSet<I> where I: IntervalBounds + Eq {}

impl<I> Hash for IntervalTreeSet<I>
where
    I: IntervalBounds + Hash,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for key in self.iter() {
            key.hash(state);
        }
    }
}

impl<I> Extend<I> for IntervalTreeSet<I>
where
    I: IntervalBounds,
{
    fn extend<T: IntoIterator<Item = I>>(&mut self, iter: T) {
        self.add_all(iter);
    }
}

impl<I> FromIterator<I> for IntervalTreeSet<I>
where
    I: IntervalBounds,
{
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        let mut set = Self::new();
        set.add_all(iter);
        set
    }
}

impl<'a, I> IntoIterator for &'a IntervalTreeSet<I>
where
    I: IntervalBounds,
{
    type Item = &'a I;
    type IntoIter = Iter<'a, I>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Take ownership of this set and iterate over its intervals in ascending
/// order.
impl<I> IntoIterator for IntervalTreeSet<I>
where
    I: IntervalBounds,
{
    type Item = I;
    type IntoIter = std::vec::IntoIter<I>;

    fn into_iter(self) -> Self::IntoIter {
        self.to_vec().into_iter()
    }
}
