use core::cmp::Ordering;

use super::node::{self, AvlBalance, Link, Node, Refresh};

/// Maximum tolerated height difference between siblings.
const ALLOWED_IMBALANCE: i32 = 1;

pub(crate) type AvlNode<K> = Node<K, AvlBalance>;
pub(crate) type AvlLink<K> = Link<K, AvlBalance>;

/// Height of a possibly absent subtree: -1 for absent, 0 for a leaf.
#[inline]
fn height<K>(link: &AvlLink<K>) -> i8 {
    link.as_ref().map_or(-1, |node| node.balance.height)
}

impl<K> Refresh for AvlNode<K> {
    fn refresh(&mut self) {
        self.refresh_size();
        self.balance.height = 1 + height(&self.left).max(height(&self.right));
    }
}

/// The height-balanced (AVL) tree core backing
/// [`AvlMultiset`](crate::AvlMultiset).
///
/// All mutation is recursive take-and-return: each frame rebuilds its subtree
/// and hands the rebalanced root back to the caller, so the tree needs no
/// parent pointers.
#[derive(Clone)]
pub(crate) struct RawAvl<K> {
    root: AvlLink<K>,
    distinct: usize,
}

impl<K> RawAvl<K> {
    pub(crate) const fn new() -> Self {
        RawAvl {
            root: None,
            distinct: 0,
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

    pub(crate) const fn root(&self) -> &AvlLink<K> {
        &self.root
    }

    /// Height of the whole tree; -1 when empty. Test support.
    pub(crate) fn height(&self) -> i8 {
        height(&self.root)
    }
}

impl<K: Ord> RawAvl<K> {
    /// Inserts `count` occurrences of `key`. Inserting 0 is a no-op.
    pub(crate) fn insert(&mut self, key: K, count: usize) {
        if count == 0 {
            return;
        }
        let (root, created) = Self::insert_node(self.root.take(), key, count);
        self.root = Some(root);
        if created {
            self.distinct += 1;
        }
    }

    fn insert_node(link: AvlLink<K>, key: K, count: usize) -> (Box<AvlNode<K>>, bool) {
        let Some(mut node) = link else {
            return (AvlNode::new(key, count, AvlBalance { height: 0 }), true);
        };
        // Sizes grow on the way down, before any rebalancing.
        node.size += count;
        let created = match key.cmp(&node.key) {
            Ordering::Less => {
                let (child, created) = Self::insert_node(node.left.take(), key, count);
                node.left = Some(child);
                created
            }
            Ordering::Greater => {
                let (child, created) = Self::insert_node(node.right.take(), key, count);
                node.right = Some(child);
                created
            }
            Ordering::Equal => {
                node.count += count;
                false
            }
        };
        (Self::rebalance(node), created)
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

    fn remove_node(link: AvlLink<K>, key: &K, count: usize) -> (AvlLink<K>, usize, bool) {
        let Some(mut node) = link else {
            return (None, 0, false);
        };
        match key.cmp(&node.key) {
            Ordering::Less => {
                let (child, removed, detached) = Self::remove_node(node.left.take(), key, count);
                node.left = child;
                (Some(Self::rebalance(node)), removed, detached)
            }
            Ordering::Greater => {
                let (child, removed, detached) = Self::remove_node(node.right.take(), key, count);
                node.right = child;
                (Some(Self::rebalance(node)), removed, detached)
            }
            Ordering::Equal => {
                if node.count > count {
                    node.count -= count;
                    node.refresh();
                    return (Some(node), count, false);
                }
                // Full removal of this key's occurrences.
                let removed = node.count;
                match (node.left.take(), node.right.take()) {
                    (None, child) | (child, None) => (child, removed, true),
                    (left, Some(right)) => {
                        // Two children: the in-order successor takes over this
                        // slot, keeping the search-tree order intact.
                        let (right, successor) = Self::detach_min(right);
                        node.key = successor.key;
                        node.count = successor.count;
                        node.left = left;
                        node.right = right;
                        (Some(Self::rebalance(node)), removed, true)
                    }
                }
            }
        }
    }

    /// Detaches the leftmost node of `node`'s subtree, returning the
    /// rebalanced remainder and the detached node.
    fn detach_min(mut node: Box<AvlNode<K>>) -> (AvlLink<K>, Box<AvlNode<K>>) {
        match node.left.take() {
            None => {
                let rest = node.right.take();
                (rest, node)
            }
            Some(left) => {
                let (rest, min) = Self::detach_min(left);
                node.left = rest;
                (Some(Self::rebalance(node)), min)
            }
        }
    }

    /// Restores the height invariant at `node` after a child changed.
    ///
    /// A double-rotation case first rotates the heavier child to convert it
    /// into a single-rotation case, chosen by comparing grandchild heights.
    fn rebalance(mut node: Box<AvlNode<K>>) -> Box<AvlNode<K>> {
        let balance = i32::from(height(&node.left)) - i32::from(height(&node.right));
        if balance > ALLOWED_IMBALANCE {
            let left = node.left.take().expect("left-heavy node has a left child");
            let left = if height(&left.left) < height(&left.right) {
                left.rotate_left()
            } else {
                left
            };
            node.left = Some(left);
            node.rotate_right()
        } else if balance < -ALLOWED_IMBALANCE {
            let right = node.right.take().expect("right-heavy node has a right child");
            let right = if height(&right.right) < height(&right.left) {
                right.rotate_right()
            } else {
                right
            };
            node.right = Some(right);
            node.rotate_left()
        } else {
            node.refresh();
            node
        }
    }
}

impl<K: Ord> RawAvl<K> {
    /// Panics unless every node satisfies the size, height, balance, and
    /// search-order invariants. Test support.
    pub(crate) fn check_invariants(&self) {
        let (size, distinct, _) = Self::check_node(&self.root, None, None);
        assert_eq!(size, self.len(), "root size disagrees with len()");
        assert_eq!(distinct, self.distinct, "distinct node count out of sync");
    }

    fn check_node<'a>(
        link: &'a AvlLink<K>,
        low: Option<&'a K>,
        high: Option<&'a K>,
    ) -> (usize, usize, i8) {
        let Some(node) = link.as_deref() else {
            return (0, 0, -1);
        };
        if let Some(low) = low {
            assert!(*low < node.key, "in-order key sequence violated");
        }
        if let Some(high) = high {
            assert!(node.key < *high, "in-order key sequence violated");
        }
        assert!(node.count >= 1, "node with zero multiplicity");
        let (left_size, left_distinct, left_height) =
            Self::check_node(&node.left, low, Some(&node.key));
        let (right_size, right_distinct, right_height) =
            Self::check_node(&node.right, Some(&node.key), high);
        assert_eq!(
            node.size,
            node.count + left_size + right_size,
            "subtree size disagrees with children"
        );
        assert_eq!(
            node.balance.height,
            1 + left_height.max(right_height),
            "stored height disagrees with children"
        );
        assert!(
            (i32::from(left_height) - i32::from(right_height)).abs() <= ALLOWED_IMBALANCE,
            "height balance violated"
        );
        (node.size, 1 + left_distinct + right_distinct, node.balance.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::node::size;

    fn tree_of(keys: &[i64]) -> RawAvl<i64> {
        let mut tree = RawAvl::new();
        for &key in keys {
            tree.insert(key, 1);
            tree.check_invariants();
        }
        tree
    }

    fn root_of(tree: &RawAvl<i64>) -> &AvlNode<i64> {
        tree.root().as_deref().expect("tree is non-empty")
    }

    #[test]
    fn ascending_inserts_stay_balanced() {
        let tree = tree_of(&[1, 2, 3, 4, 5, 6, 7]);
        // A perfectly balanced tree of 7 keys.
        assert_eq!(tree.len(), 7);
        assert_eq!(tree.height(), 2);
        assert_eq!(root_of(&tree).key, 4);
    }

    #[test]
    fn single_rotation_recomputes_sizes_with_multiplicities() {
        // Force a right-right rotation with uneven multiplicities so a stale
        // pre-rotation size would be caught.
        let mut tree = RawAvl::new();
        tree.insert(1, 2);
        tree.insert(2, 3);
        tree.insert(3, 1);
        tree.check_invariants();

        let root = root_of(&tree);
        assert_eq!(root.key, 2);
        assert_eq!(root.size, 6);
        assert_eq!(size(&root.left), 2);
        assert_eq!(size(&root.right), 1);
    }

    #[test]
    fn double_rotation_left_right() {
        // 3, 1, 2 triggers the left-right case; 2 must surface as root.
        let tree = tree_of(&[3, 1, 2]);
        let root = root_of(&tree);
        assert_eq!(root.key, 2);
        assert_eq!(root.balance.height, 1);
        assert_eq!(size(&root.left), 1);
        assert_eq!(size(&root.right), 1);
    }

    #[test]
    fn double_rotation_right_left() {
        let tree = tree_of(&[1, 3, 2]);
        assert_eq!(root_of(&tree).key, 2);
    }

    #[test]
    fn two_child_removal_splices_successor() {
        let mut tree = tree_of(&[10, 5, 15, 3, 7, 12, 18]);
        assert_eq!(root_of(&tree).key, 10);

        assert_eq!(tree.remove(&10, 1), 1);
        tree.check_invariants();
        assert_eq!(root_of(&tree).key, 12);
        assert_eq!(tree.len(), 6);
    }

    #[test]
    fn removal_clamps_to_multiplicity() {
        let mut tree = RawAvl::new();
        tree.insert(7, 3);
        assert_eq!(tree.remove(&7, 10), 3);
        tree.check_invariants();
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.distinct_len(), 0);
    }

    #[test]
    fn removing_absent_key_is_a_noop() {
        let mut tree = tree_of(&[1, 2, 3]);
        assert_eq!(tree.remove(&9, 1), 0);
        tree.check_invariants();
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn detach_min_rebalances_the_remainder() {
        // Repeatedly removing the minimum must keep the tree balanced.
        let mut tree = tree_of(&[4, 2, 6, 1, 3, 5, 7]);
        for expected in 1..=7 {
            assert_eq!(node::first(tree.root()), Some(&expected));
            assert_eq!(tree.remove(&expected, 1), 1);
            tree.check_invariants();
        }
        assert!(tree.root().is_none());
    }
}
