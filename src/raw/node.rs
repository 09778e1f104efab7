use core::cmp::Ordering;
use core::iter::FusedIterator;

use smallvec::SmallVec;

use crate::RankRange;

/// A possibly absent, exclusively owned subtree.
pub(crate) type Link<K, B> = Option<Box<Node<K, B>>>;

/// One tree node: a distinct key, its occurrence count, and the
/// multiplicity-weighted size of the subtree rooted here.
///
/// `B` is the balancing payload: a height for the AVL variant, a heap
/// priority for the treap variant. Everything that only reads keys, counts,
/// and sizes is generic over it.
pub(crate) struct Node<K, B> {
    pub(crate) key: K,
    // Occurrences of `key` collapsed into this node; always >= 1.
    pub(crate) count: usize,
    // count + size(left) + size(right).
    pub(crate) size: usize,
    pub(crate) balance: B,
    pub(crate) left: Link<K, B>,
    pub(crate) right: Link<K, B>,
}

impl<K: Clone, B: Clone> Clone for Node<K, B> {
    fn clone(&self) -> Self {
        Node {
            key: self.key.clone(),
            count: self.count,
            size: self.size,
            balance: self.balance.clone(),
            left: self.left.clone(),
            right: self.right.clone(),
        }
    }
}

/// Balancing payload of the height-balanced variant: subtree height, with
/// leaf = 0 and absent = -1.
#[derive(Clone, Copy)]
pub(crate) struct AvlBalance {
    pub(crate) height: i8,
}

/// Balancing payload of the priority-balanced variant: a heap priority fixed
/// at node creation.
#[derive(Clone, Copy)]
pub(crate) struct TreapBalance {
    pub(crate) priority: u64,
}

/// Multiplicity-weighted size of a possibly absent subtree.
#[inline]
pub(crate) fn size<K, B>(link: &Link<K, B>) -> usize {
    link.as_ref().map_or(0, |node| node.size)
}

/// Recomputes a node's cached fields from its current children.
///
/// Rotations call this with the *post*-rotation children in place, demoted
/// node first, so the promoted node sums already-correct child sizes.
pub(crate) trait Refresh {
    fn refresh(&mut self);
}

impl<K, B> Node<K, B> {
    pub(crate) fn new(key: K, count: usize, balance: B) -> Box<Self> {
        Box::new(Node {
            key,
            count,
            size: count,
            balance,
            left: None,
            right: None,
        })
    }

    /// Recomputes `size` from the current children and occurrence count.
    #[inline]
    pub(crate) fn refresh_size(&mut self) {
        self.size = self.count + size(&self.left) + size(&self.right);
    }
}

impl<K, B> Node<K, B>
where
    Node<K, B>: Refresh,
{
    /// Rotates this node left, returning the promoted right child as the new
    /// subtree root. In-order key sequence is preserved.
    pub(crate) fn rotate_left(mut self: Box<Self>) -> Box<Self> {
        let mut pivot = self.right.take().expect("rotate_left requires a right child");
        self.right = pivot.left.take();
        self.refresh();
        pivot.left = Some(self);
        pivot.refresh();
        pivot
    }

    /// Rotates this node right, returning the promoted left child as the new
    /// subtree root. In-order key sequence is preserved.
    pub(crate) fn rotate_right(mut self: Box<Self>) -> Box<Self> {
        let mut pivot = self.left.take().expect("rotate_right requires a left child");
        self.left = pivot.right.take();
        self.refresh();
        pivot.right = Some(self);
        pivot.refresh();
        pivot
    }
}

// ─── Read-only descents, shared by both variants ─────────────────────────────

/// Standard BST search, ignoring multiplicity.
pub(crate) fn contains<K: Ord, B>(mut link: &Link<K, B>, key: &K) -> bool {
    while let Some(node) = link.as_deref() {
        match key.cmp(&node.key) {
            Ordering::Less => link = &node.left,
            Ordering::Greater => link = &node.right,
            Ordering::Equal => return true,
        }
    }
    false
}

/// Occurrence count of `key`, 0 when absent.
pub(crate) fn multiplicity<K: Ord, B>(mut link: &Link<K, B>, key: &K) -> usize {
    while let Some(node) = link.as_deref() {
        match key.cmp(&node.key) {
            Ordering::Less => link = &node.left,
            Ordering::Greater => link = &node.right,
            Ordering::Equal => return node.count,
        }
    }
    0
}

/// Leftmost key of the subtree.
pub(crate) fn first<K, B>(link: &Link<K, B>) -> Option<&K> {
    let mut node = link.as_deref()?;
    while let Some(left) = node.left.as_deref() {
        node = left;
    }
    Some(&node.key)
}

/// Rightmost key of the subtree.
pub(crate) fn last<K, B>(link: &Link<K, B>) -> Option<&K> {
    let mut node = link.as_deref()?;
    while let Some(right) = node.right.as_deref() {
        node = right;
    }
    Some(&node.key)
}

/// 1-based rank range of `key`: each time the descent moves right past a
/// node, that node's left-subtree size plus its own count is accumulated; an
/// exact match then occupies `[total - count + 1, total]`.
pub(crate) fn rank<K: Ord, B>(mut link: &Link<K, B>, key: &K) -> Option<RankRange> {
    let mut through = 0usize;
    while let Some(node) = link.as_deref() {
        match key.cmp(&node.key) {
            Ordering::Less => link = &node.left,
            Ordering::Equal => {
                through += size(&node.left) + node.count;
                return Some(RankRange {
                    first: through - node.count + 1,
                    last: through,
                });
            }
            Ordering::Greater => {
                through += size(&node.left) + node.count;
                link = &node.right;
            }
        }
    }
    None
}

/// Key at ascending rank `k`, `1 <= k <= size(link)`; `None` out of range.
pub(crate) fn kth<K, B>(link: &Link<K, B>, mut k: usize) -> Option<&K> {
    if k == 0 || k > size(link) {
        return None;
    }
    let mut node = link.as_deref()?;
    loop {
        let left_size = size(&node.left);
        if k <= left_size {
            node = node.left.as_deref().expect("subtree size claims a missing left child");
        } else if k <= left_size + node.count {
            return Some(&node.key);
        } else {
            k -= left_size + node.count;
            node = node.right.as_deref().expect("subtree size claims a missing right child");
        }
    }
}

/// Key at descending rank `k`; the mirror image of [`kth`].
pub(crate) fn kth_from_end<K, B>(link: &Link<K, B>, mut k: usize) -> Option<&K> {
    if k == 0 || k > size(link) {
        return None;
    }
    let mut node = link.as_deref()?;
    loop {
        let right_size = size(&node.right);
        if k <= right_size {
            node = node.right.as_deref().expect("subtree size claims a missing right child");
        } else if k <= right_size + node.count {
            return Some(&node.key);
        } else {
            k -= right_size + node.count;
            node = node.left.as_deref().expect("subtree size claims a missing left child");
        }
    }
}

/// Largest key strictly less than `key`.
pub(crate) fn lower<'a, K: Ord, B>(mut link: &'a Link<K, B>, key: &K) -> Option<&'a K> {
    let mut best = None;
    while let Some(node) = link.as_deref() {
        if node.key < *key {
            best = Some(&node.key);
            link = &node.right;
        } else {
            link = &node.left;
        }
    }
    best
}

/// Largest key less than or equal to `key`; short-circuits on an exact match.
pub(crate) fn floor<'a, K: Ord, B>(mut link: &'a Link<K, B>, key: &K) -> Option<&'a K> {
    let mut best = None;
    while let Some(node) = link.as_deref() {
        match node.key.cmp(key) {
            Ordering::Equal => return Some(&node.key),
            Ordering::Less => {
                best = Some(&node.key);
                link = &node.right;
            }
            Ordering::Greater => link = &node.left,
        }
    }
    best
}

/// Smallest key greater than or equal to `key`; short-circuits on an exact
/// match.
pub(crate) fn ceiling<'a, K: Ord, B>(mut link: &'a Link<K, B>, key: &K) -> Option<&'a K> {
    let mut best = None;
    while let Some(node) = link.as_deref() {
        match node.key.cmp(key) {
            Ordering::Equal => return Some(&node.key),
            Ordering::Greater => {
                best = Some(&node.key);
                link = &node.left;
            }
            Ordering::Less => link = &node.right,
        }
    }
    best
}

/// Smallest key strictly greater than `key`.
pub(crate) fn higher<'a, K: Ord, B>(mut link: &'a Link<K, B>, key: &K) -> Option<&'a K> {
    let mut best = None;
    while let Some(node) = link.as_deref() {
        if node.key > *key {
            best = Some(&node.key);
            link = &node.left;
        } else {
            link = &node.right;
        }
    }
    best
}

// ─── In-order iteration ──────────────────────────────────────────────────────

/// Ascending iterator over `(key, multiplicity)` pairs.
///
/// The tree has no parent pointers, so the descent keeps an explicit stack of
/// the unvisited left spine. Depth is O(log n) for both variants, which fits
/// the stack's inline capacity in all but degenerate cases.
pub(crate) struct Iter<'a, K, B> {
    stack: SmallVec<[&'a Node<K, B>; 16]>,
}

impl<'a, K, B> Iter<'a, K, B> {
    pub(crate) fn new(root: &'a Link<K, B>) -> Self {
        let mut iter = Iter { stack: SmallVec::new() };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut link: &'a Link<K, B>) {
        while let Some(node) = link.as_deref() {
            self.stack.push(node);
            link = &node.left;
        }
    }
}

impl<'a, K, B> Iterator for Iter<'a, K, B> {
    type Item = (&'a K, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(&node.right);
        Some((&node.key, node.count))
    }
}

impl<K, B> FusedIterator for Iter<'_, K, B> {}
