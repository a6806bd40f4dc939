//! Height-balancing machinery shared by the interval set operations.
//!
//! All functions operate on [`Arena`] slots through [`NodeIdx`] handles.
//! Rotations and re-links keep the per-node metadata (height, subtree size,
//! subtree min/max extents, parent links) consistent; callers are expected to
//! re-link returned subtree roots into their parent (or the tree root).

use crate::node::{Arena, NodeIdx};

/// The AVL height of an optional subtree: -1 when absent, 0 for a leaf.
pub(crate) fn height<I>(arena: &Arena<I>, node: Option<NodeIdx>) -> i32 {
    node.map(|idx| arena.node(idx).height).unwrap_or(-1)
}

/// The number of nodes in an optional subtree.
pub(crate) fn size<I>(arena: &Arena<I>, node: Option<NodeIdx>) -> usize {
    node.map(|idx| arena.node(idx).size).unwrap_or(0)
}

/// Compute the balance factor of the subtree rooted at `idx`.
///
/// Positive when right-heavy, negative when left-heavy.
pub(crate) fn balance<I>(arena: &Arena<I>, idx: NodeIdx) -> i32 {
    let node = arena.node(idx);
    height(arena, node.right) - height(arena, node.left)
}

/// Set `child` as the left subtree of `parent` without recomputing metadata.
///
/// Clearing a child also resets the corresponding extent cache to the parent
/// itself; the full recompute happens in [`update()`] on the way back up.
pub(crate) fn link_left<I>(arena: &mut Arena<I>, parent: NodeIdx, child: Option<NodeIdx>) {
    arena.node_mut(parent).left = child;
    match child {
        Some(child) => {
            arena.node_mut(child).parent = Some(parent);
            let min_node = arena.node(child).min_node;
            arena.node_mut(parent).min_node = min_node;
        }
        None => arena.node_mut(parent).min_node = parent,
    }
}

/// Set `child` as the right subtree of `parent` without recomputing metadata.
pub(crate) fn link_right<I>(arena: &mut Arena<I>, parent: NodeIdx, child: Option<NodeIdx>) {
    arena.node_mut(parent).right = child;
    match child {
        Some(child) => {
            arena.node_mut(child).parent = Some(parent);
            let max_node = arena.node(child).max_node;
            arena.node_mut(parent).max_node = max_node;
        }
        None => arena.node_mut(parent).max_node = parent,
    }
}

/// Recompute the height, subtree size and extent caches of `idx` from its
/// current children.
pub(crate) fn update<I>(arena: &mut Arena<I>, idx: NodeIdx) {
    let node = arena.node(idx);
    let (left, right) = (node.left, node.right);

    let new_height = height(arena, left).max(height(arena, right)) + 1;
    let new_size = size(arena, left) + size(arena, right) + 1;
    let min_node = left.map(|v| arena.node(v).min_node).unwrap_or(idx);
    let max_node = right.map(|v| arena.node(v).max_node).unwrap_or(idx);

    let node = arena.node_mut(idx);
    node.height = new_height;
    node.size = new_size;
    node.min_node = min_node;
    node.max_node = max_node;
}

/// Left rotate the subtree rooted at `x` around the pivot point `P`,
/// returning the new subtree root.
///
/// ```text
///
///      x
///     / \                               P
///    1   P         Rotate Left        /   \
///       / \      --------------->    x     y
///      2   y                        / \   / \
///         / \                      1   2 3   4
///        3   4
/// ```
///
/// # Panics
///
/// Panics if `x` has no right pointer (cannot be rotated).
pub(crate) fn rotate_left<I>(arena: &mut Arena<I>, x: NodeIdx) -> NodeIdx {
    let p = arena.node(x).right.expect("rotate_left without right child");

    let p_left = arena.node(p).left;
    link_right(arena, x, p_left);

    arena.node_mut(p).parent = None;
    link_left(arena, p, Some(x));

    update(arena, x);
    update(arena, p);

    p
}

/// Right rotate the subtree rooted at `y` around the pivot point `P`,
/// returning the new subtree root.
///
/// ```text
///          y
///         / \                           P
///        P   4     Rotate Right       /   \
///       / \      --------------->    x     y
///      x   3                        / \   / \
///     / \                          1   2 3   4
///    1   2
/// ```
///
/// # Panics
///
/// Panics if `y` has no left pointer (cannot be rotated).
pub(crate) fn rotate_right<I>(arena: &mut Arena<I>, y: NodeIdx) -> NodeIdx {
    let p = arena.node(y).left.expect("rotate_right without left child");

    let p_right = arena.node(p).right;
    link_left(arena, y, p_right);

    arena.node_mut(p).parent = None;
    link_right(arena, p, Some(y));

    update(arena, y);
    update(arena, p);

    p
}

/// Restore the AVL balance invariant of the subtree rooted at `idx`,
/// returning the (possibly new) subtree root.
///
/// The caller must have called [`update()`] on `idx` first; the returned root
/// carries no parent link and must be re-linked by the caller.
pub(crate) fn rebalance<I>(arena: &mut Arena<I>, idx: NodeIdx) -> NodeIdx {
    let bf = balance(arena, idx);

    if bf < -1 {
        // Left-heavy.
        let left = arena.node(idx).left.expect("left-heavy without left child");
        if balance(arena, left) > 0 {
            let rotated = rotate_left(arena, left);
            link_left(arena, idx, Some(rotated));
        }
        return rotate_right(arena, idx);
    }

    if bf > 1 {
        // Right-heavy.
        let right = arena
            .node(idx)
            .right
            .expect("right-heavy without right child");
        if balance(arena, right) < 0 {
            let rotated = rotate_right(arena, right);
            link_right(arena, idx, Some(rotated));
        }
        return rotate_left(arena, idx);
    }

    idx
}

/// Link `child` as the left subtree of `parent`, recompute `parent` and
/// rebalance, returning the root of the subtree that replaces `parent`.
pub(crate) fn set_left<I>(arena: &mut Arena<I>, parent: NodeIdx, child: Option<NodeIdx>) -> NodeIdx {
    link_left(arena, parent, child);
    update(arena, parent);
    rebalance(arena, parent)
}

/// Link `child` as the right subtree of `parent`, recompute `parent` and
/// rebalance, returning the root of the subtree that replaces `parent`.
pub(crate) fn set_right<I>(
    arena: &mut Arena<I>,
    parent: NodeIdx,
    child: Option<NodeIdx>,
) -> NodeIdx {
    link_right(arena, parent, child);
    update(arena, parent);
    rebalance(arena, parent)
}

/// Join `left`, `mid` and `right` into a single balanced subtree, returning
/// its root.
///
/// Every key in `left` must order below `mid`, and every key in `right`
/// above. Unlike [`set_left()`]/[`set_right()`], the heights of `left` and
/// `right` may differ arbitrarily: the shorter side is attached at the
/// matching depth along the taller side's spine, rebalancing on the way back
/// up. Merging and coverage removal use this to re-link subtrees that shrank
/// by more than one level.
pub(crate) fn join<I>(
    arena: &mut Arena<I>,
    left: Option<NodeIdx>,
    mid: NodeIdx,
    right: Option<NodeIdx>,
) -> NodeIdx {
    let hl = height(arena, left);
    let hr = height(arena, right);

    if hl > hr + 1 {
        // Descend the right spine of `left` to the attach point.
        let l = left.expect("positive height without node");
        let l_right = arena.node(l).right;
        let sub = join(arena, l_right, mid, right);
        return set_right(arena, l, Some(sub));
    }

    if hr > hl + 1 {
        // Descend the left spine of `right`.
        let r = right.expect("positive height without node");
        let r_left = arena.node(r).left;
        let sub = join(arena, left, mid, r_left);
        return set_left(arena, r, Some(sub));
    }

    link_left(arena, mid, left);
    link_right(arena, mid, right);
    update(arena, mid);
    mid
}

/// The in-order successor of `idx`, if any.
///
/// Descending into a right subtree is O(1) through the extent cache;
/// otherwise the walk follows parent links until it arrives from a left
/// child.
pub(crate) fn successor<I>(arena: &Arena<I>, idx: NodeIdx) -> Option<NodeIdx> {
    if let Some(right) = arena.node(idx).right {
        return Some(arena.node(right).min_node);
    }

    let mut node = idx;
    loop {
        let parent = arena.node(node).parent?;
        if arena.node(parent).left == Some(node) {
            return Some(parent);
        }
        node = parent;
    }
}

/// The in-order predecessor of `idx`, if any.
pub(crate) fn predecessor<I>(arena: &Arena<I>, idx: NodeIdx) -> Option<NodeIdx> {
    if let Some(left) = arena.node(idx).left {
        return Some(arena.node(left).max_node);
    }

    let mut node = idx;
    loop {
        let parent = arena.node(node).parent?;
        if arena.node(parent).right == Some(node) {
            return Some(parent);
        }
        node = parent;
    }
}

/// Unlink and free the node at `idx`, restoring all tree invariants.
///
/// A node with two children is replaced by its in-order successor: the
/// successor's key moves into `idx` and the successor node (which has no left
/// child) is deleted instead. All ancestors of the structural change are
/// recomputed and rebalanced.
pub(crate) fn delete_at<I>(arena: &mut Arena<I>, root: &mut Option<NodeIdx>, idx: NodeIdx)
where
    I: Clone,
{
    let (left, right) = {
        let node = arena.node(idx);
        (node.left, node.right)
    };

    if let (Some(_), Some(right)) = (left, right) {
        let succ = arena.node(right).min_node;
        debug_assert!(arena.node(succ).left.is_none());

        let key = arena.node(succ).key.clone();
        arena.node_mut(idx).key = key;
        return delete_at(arena, root, succ);
    }

    // Zero or one child: splice the child (if any) into this node's place.
    let child = left.or(right);
    let parent = arena.node(idx).parent;
    match parent {
        None => {
            *root = child;
            if let Some(child) = child {
                arena.node_mut(child).parent = None;
            }
        }
        Some(parent) => {
            if arena.node(parent).left == Some(idx) {
                link_left(arena, parent, child);
            } else {
                link_right(arena, parent, child);
            }
        }
    }

    arena.free(idx);
    fix_upward(arena, root, parent);
}

/// Recompute and rebalance every node from `start` up to the root,
/// re-linking rotated subtree roots into their parents.
pub(crate) fn fix_upward<I>(
    arena: &mut Arena<I>,
    root: &mut Option<NodeIdx>,
    start: Option<NodeIdx>,
) {
    let mut cur = start;
    while let Some(idx) = cur {
        let parent = arena.node(idx).parent;

        update(arena, idx);
        let subtree = rebalance(arena, idx);

        match parent {
            None => {
                *root = Some(subtree);
                arena.node_mut(subtree).parent = None;
            }
            Some(parent) => {
                // The parent still references the pre-rotation subtree root.
                if arena.node(parent).left == Some(idx) {
                    link_left(arena, parent, Some(subtree));
                } else {
                    link_right(arena, parent, Some(subtree));
                }
            }
        }

        cur = parent;
    }
}
