use crate::{avl, node::NodeIdx, tree::IntervalTreeSet};

/// A lazy in-order iterator over the intervals stored in an
/// [`IntervalTreeSet`], yielding them in ascending order of their lower
/// bounds.
///
/// Stepping into a right subtree lands on its cached minimum in O(1);
/// otherwise the cursor walks parent links, giving O(1) amortised cost per
/// step and O(n) for a full traversal.
#[derive(Debug)]
pub struct Iter<'a, I> {
    tree: &'a IntervalTreeSet<I>,
    next: Option<NodeIdx>,
}

impl<'a, I> Iter<'a, I> {
    pub(crate) fn new(tree: &'a IntervalTreeSet<I>) -> Self {
        let next = tree.root.map(|root| tree.arena.node(root).min_node);
        Self { tree, next }
    }
}

impl<'a, I> Iterator for Iter<'a, I> {
    type Item = &'a I;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.next?;
        self.next = avl::successor(&self.tree.arena, idx);
        Some(&self.tree.arena.node(idx).key)
    }
}
