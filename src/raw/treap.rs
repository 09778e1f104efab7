use core::cmp::Ordering;

use rand::RngCore;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::node::{self, Link, Node, Refresh, TreapBalance};

pub(crate) type TreapNode<K> = Node<K, TreapBalance>;
pub(crate) type TreapLink<K> = Link<K, TreapBalance>;

impl<K> Refresh for TreapNode<K> {
    fn refresh(&mut self) {
        self.refresh_size();
    }
}

/// The priority-balanced (treap) tree core backing
/// [`TreapMultiset`](crate::TreapMultiset).
///
/// Every node draws a priority from the tree's own RNG at creation; rotations
/// keep the non-strict max-heap order on priorities, which yields logarithmic
/// depth in expectation without tracking heights. The RNG is injected so
/// behavior is reproducible under test.
#[derive(Clone)]
pub(crate) struct RawTreap<K> {
    root: TreapLink<K>,
    distinct: usize,
    rng: SmallRng,
}

impl<K> RawTreap<K> {
    pub(crate) fn new() -> Self {
        Self::from_rng(SmallRng::from_entropy())
    }

    pub(crate) fn with_seed(seed: u64) -> Self {
        Self::from_rng(SmallRng::seed_from_u64(seed))
    }

    fn from_rng(rng: SmallRng) -> Self {
        RawTreap {
            root: None,
            distinct: 0,
            rng,
        }
    }

    pub(crate) fn len(&self) -> usize {
        node::size(&self.root)
    }

    pub(crate) const fn distinct_len(&self) -> usize {
        self.distinct
    }

    pub(crate) fn clear(&mut self) {
        self.root = None;
        self.distinct = 0;
    }

    pub(crate) const fn root(&self) -> &TreapLink<K> {
        &self.root
    }
}

impl<K: Ord> RawTreap<K> {
    /// Inserts `count` occurrences of `key`. Inserting 0 is a no-op.
    pub(crate) fn insert(&mut self, key: K, count: usize) {
        if count == 0 {
            return;
        }
        // Drawn up front; only consumed if the key is new.
        let priority = self.rng.next_u64();
        let (root, created) = Self::insert_node(self.root.take(), key, count, priority);
        self.root = Some(root);
        if created {
            self.distinct += 1;
        }
    }

    fn insert_node(
        link: TreapLink<K>,
        key: K,
        count: usize,
        priority: u64,
    ) -> (Box<TreapNode<K>>, bool) {
        let Some(mut node) = link else {
            return (TreapNode::new(key, count, TreapBalance { priority }), true);
        };
        // Sizes grow on the way down; rotations recompute them afterwards.
        node.size += count;
        match key.cmp(&node.key) {
            Ordering::Less => {
                let (child, created) = Self::insert_node(node.left.take(), key, count, priority);
                // Equal priorities do not rotate, which keeps the non-strict
                // heap order either way.
                let promote = child.balance.priority > node.balance.priority;
                node.left = Some(child);
                let node = if promote { node.rotate_right() } else { node };
                (node, created)
            }
            Ordering::Greater => {
                let (child, created) = Self::insert_node(node.right.take(), key, count, priority);
                let promote = child.balance.priority > node.balance.priority;
                node.right = Some(child);
                let node = if promote { node.rotate_left() } else { node };
                (node, created)
            }
            Ordering::Equal => {
                node.count += count;
                (node, false)
            }
        }
    }

    /// Removes up to `count` occurrences of `key`, returning how many were
    /// actually removed. Absent keys and `count == 0` are no-ops.
    pub(crate) fn remove(&mut self, key: &K, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        let (root, removed, detached) = Self::remove_node(self.root.take(), key, count);
        self.root = root;
        if detached {
            self.distinct -= 1;
        }
        removed
    }

    fn remove_node(link: TreapLink<K>, key: &K, count: usize) -> (TreapLink<K>, usize, bool) {
        let Some(mut node) = link else {
            return (None, 0, false);
        };
        match key.cmp(&node.key) {
            Ordering::Less => {
                let (child, removed, detached) = Self::remove_node(node.left.take(), key, count);
                node.left = child;
                node.refresh();
                (Some(node), removed, detached)
            }
            Ordering::Greater => {
                let (child, removed, detached) = Self::remove_node(node.right.take(), key, count);
                node.right = child;
                node.refresh();
                (Some(node), removed, detached)
            }
            Ordering::Equal => {
                if node.count > count {
                    node.count -= count;
                    node.refresh();
                    return (Some(node), count, false);
                }
                match (node.left.take(), node.right.take()) {
                    (None, child) | (child, None) => (child, node.count, true),
                    (Some(left), Some(right)) => {
                        // Rotate the doomed node below its higher-priority
                        // child, then recurse into its new position. The heap
                        // order stays valid at every intermediate step.
                        let promote_left = left.balance.priority > right.balance.priority;
                        node.left = Some(left);
                        node.right = Some(right);
                        if promote_left {
                            let mut node = node.rotate_right();
                            let (child, removed, detached) =
                                Self::remove_node(node.right.take(), key, count);
                            node.right = child;
                            node.refresh();
                            (Some(node), removed, detached)
                        } else {
                            let mut node = node.rotate_left();
                            let (child, removed, detached) =
                                Self::remove_node(node.left.take(), key, count);
                            node.left = child;
                            node.refresh();
                            (Some(node), removed, detached)
                        }
                    }
                }
            }
        }
    }
}

impl<K: Ord> RawTreap<K> {
    /// Panics unless every node satisfies the size, heap-priority, and
    /// search-order invariants. Test support.
    pub(crate) fn check_invariants(&self) {
        let (size, distinct) = Self::check_node(&self.root, None, None, None);
        assert_eq!(size, self.len(), "root size disagrees with len()");
        assert_eq!(distinct, self.distinct, "distinct node count out of sync");
    }

    fn check_node<'a>(
        link: &'a TreapLink<K>,
        low: Option<&'a K>,
        high: Option<&'a K>,
        parent_priority: Option<u64>,
    ) -> (usize, usize) {
        let Some(node) = link.as_deref() else {
            return (0, 0);
        };
        if let Some(low) = low {
            assert!(*low < node.key, "in-order key sequence violated");
        }
        if let Some(high) = high {
            assert!(node.key < *high, "in-order key sequence violated");
        }
        if let Some(parent_priority) = parent_priority {
            assert!(
                parent_priority >= node.balance.priority,
                "heap order on priorities violated"
            );
        }
        assert!(node.count >= 1, "node with zero multiplicity");
        let priority = Some(node.balance.priority);
        let (left_size, left_distinct) = Self::check_node(&node.left, low, Some(&node.key), priority);
        let (right_size, right_distinct) =
            Self::check_node(&node.right, Some(&node.key), high, priority);
        assert_eq!(
            node.size,
            node.count + left_size + right_size,
            "subtree size disagrees with children"
        );
        (node.size, 1 + left_distinct + right_distinct)
    }
}
