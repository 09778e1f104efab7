//! An ordered multiset balanced by the AVL height discipline.

use core::fmt;
use core::iter::FusedIterator;
use core::ops::Index;

use crate::multiset::OrderStatisticMultiset;
use crate::rank::{Rank, RankRange};
use crate::raw::avl::RawAvl;
use crate::raw::node;

/// An ordered multiset with O(log n) rank and selection queries, balanced by
/// the AVL height discipline.
///
/// Each distinct key is stored once together with an occurrence count, so
/// repeated insertion of equal keys adjusts a counter instead of growing the
/// tree. Every subtree additionally tracks its multiplicity-weighted size,
/// which is what answers [`rank`](AvlMultiset::rank) and
/// [`kth`](AvlMultiset::kth) without a full traversal.
///
/// After every public operation returns, the heights of each node's subtrees
/// differ by at most one, so all operations are O(log n) in the worst case.
/// For the same contract with randomized balancing, see
/// [`TreapMultiset`](crate::TreapMultiset).
///
/// It is a logic error for a key to be modified in such a way that its
/// ordering relative to any other key, as determined by the [`Ord`] trait,
/// changes while it is in the multiset.
///
/// # Examples
///
/// ```
/// use ranktree::AvlMultiset;
///
/// let mut bids = AvlMultiset::new();
///
/// // Multiset semantics: equal bids accumulate.
/// bids.insert(100);
/// bids.insert(100);
/// bids.insert(250);
/// bids.insert(175);
///
/// assert_eq!(bids.len(), 4);
/// assert_eq!(bids.multiplicity(&100), 2);
///
/// // Rank and selection queries are 1-based.
/// assert_eq!(bids.kth(3), Some(&175));
/// assert_eq!(bids.rank(&100).map(|r| (r.first, r.last)), Some((1, 2)));
///
/// // Sorted-set navigation.
/// assert_eq!(bids.higher(&175), Some(&250));
/// assert_eq!(bids.floor(&200), Some(&175));
/// ```
#[derive(Clone)]
pub struct AvlMultiset<K> {
    raw: RawAvl<K>,
}

impl<K> AvlMultiset<K> {
    /// Creates an empty multiset.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranktree::AvlMultiset;
    ///
    /// let set: AvlMultiset<i64> = AvlMultiset::new();
    /// assert!(set.is_empty());
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        AvlMultiset { raw: RawAvl::new() }
    }

    /// Returns the total number of occurrences, counting multiplicities.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranktree::AvlMultiset;
    ///
    /// let set = AvlMultiset::from([1, 1, 2]);
    /// assert_eq!(set.len(), 3);
    /// ```
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns the number of distinct keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranktree::AvlMultiset;
    ///
    /// let set = AvlMultiset::from([1, 1, 2]);
    /// assert_eq!(set.distinct_len(), 2);
    /// ```
    #[must_use]
    pub const fn distinct_len(&self) -> usize {
        self.raw.distinct_len()
    }

    /// Returns true if the multiset contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes all elements.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns an iterator over `(key, multiplicity)` pairs in ascending key
    /// order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranktree::AvlMultiset;
    ///
    /// let set = AvlMultiset::from([5, 3, 5]);
    /// let pairs: Vec<_> = set.iter().collect();
    /// assert_eq!(pairs, [(&3, 1), (&5, 2)]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            inner: node::Iter::new(self.raw.root()),
        }
    }

    /// Validates every internal invariant, panicking on the first violation.
    /// Exposed for the crate's own test suites.
    #[doc(hidden)]
    pub fn check_invariants(&self)
    where
        K: Ord,
    {
        self.raw.check_invariants();
    }

    /// Height of the tree (-1 when empty). Exposed for the crate's own test
    /// suites.
    #[doc(hidden)]
    #[must_use]
    pub fn height(&self) -> i8 {
        self.raw.height()
    }

    /// Key held by the root node, if any. Exposed for the crate's own test
    /// suites.
    #[doc(hidden)]
    #[must_use]
    pub fn root_key(&self) -> Option<&K> {
        self.raw.root().as_deref().map(|node| &node.key)
    }
}

impl<K: Ord> AvlMultiset<K> {
    /// Inserts one occurrence of `key`.
    ///
    /// Insertion never fails; duplicates are allowed by design and collapse
    /// into one node's occurrence count.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranktree::AvlMultiset;
    ///
    /// let mut set = AvlMultiset::new();
    /// set.insert(3);
    /// set.insert(3);
    /// assert_eq!(set.multiplicity(&3), 2);
    /// ```
    pub fn insert(&mut self, key: K) {
        self.raw.insert(key, 1);
    }

    /// Inserts `count` occurrences of `key`. Inserting 0 is a no-op.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranktree::AvlMultiset;
    ///
    /// let mut set = AvlMultiset::new();
    /// set.insert_multiple(8, 3);
    /// assert_eq!(set.len(), 3);
    /// assert_eq!(set.distinct_len(), 1);
    /// ```
    pub fn insert_multiple(&mut self, key: K, count: usize) {
        self.raw.insert(key, count);
    }

    /// Removes one occurrence of `key`, returning true if one was present.
    ///
    /// Removing an absent key is a no-op, not an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranktree::AvlMultiset;
    ///
    /// let mut set = AvlMultiset::from([5, 5]);
    /// assert!(set.remove(&5));
    /// assert!(set.remove(&5));
    /// assert!(!set.remove(&5));
    /// ```
    pub fn remove(&mut self, key: &K) -> bool {
        self.raw.remove(key, 1) > 0
    }

    /// Removes up to `count` occurrences of `key`, returning the number
    /// actually removed (clamped to the key's multiplicity).
    ///
    /// # Examples
    ///
    /// ```
    /// use ranktree::AvlMultiset;
    ///
    /// let mut set = AvlMultiset::from([5, 5, 5]);
    /// assert_eq!(set.remove_multiple(&5, 10), 3);
    /// assert!(set.is_empty());
    /// ```
    pub fn remove_multiple(&mut self, key: &K, count: usize) -> usize {
        self.raw.remove(key, count)
    }

    /// Returns true if the multiset contains `key`, ignoring multiplicity.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        node::contains(self.raw.root(), key)
    }

    /// Returns the number of occurrences of `key` (0 when absent).
    #[must_use]
    pub fn multiplicity(&self, key: &K) -> usize {
        node::multiplicity(self.raw.root(), key)
    }

    /// Returns the smallest key, or `None` on an empty multiset.
    #[must_use]
    pub fn first(&self) -> Option<&K> {
        node::first(self.raw.root())
    }

    /// Returns the largest key, or `None` on an empty multiset.
    #[must_use]
    pub fn last(&self) -> Option<&K> {
        node::last(self.raw.root())
    }

    /// Returns the largest key strictly less than `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranktree::AvlMultiset;
    ///
    /// let set = AvlMultiset::from([1, 3, 5]);
    /// assert_eq!(set.lower(&3), Some(&1));
    /// assert_eq!(set.lower(&1), None);
    /// ```
    #[must_use]
    pub fn lower(&self, key: &K) -> Option<&K> {
        node::lower(self.raw.root(), key)
    }

    /// Returns the largest key less than or equal to `key`. A present key is
    /// its own floor.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranktree::AvlMultiset;
    ///
    /// let set = AvlMultiset::from([1, 3, 5]);
    /// assert_eq!(set.floor(&3), Some(&3));
    /// assert_eq!(set.floor(&4), Some(&3));
    /// assert_eq!(set.floor(&0), None);
    /// ```
    #[must_use]
    pub fn floor(&self, key: &K) -> Option<&K> {
        node::floor(self.raw.root(), key)
    }

    /// Returns the smallest key greater than or equal to `key`. A present key
    /// is its own ceiling.
    #[must_use]
    pub fn ceiling(&self, key: &K) -> Option<&K> {
        node::ceiling(self.raw.root(), key)
    }

    /// Returns the smallest key strictly greater than `key`.
    #[must_use]
    pub fn higher(&self, key: &K) -> Option<&K> {
        node::higher(self.raw.root(), key)
    }

    /// Returns the 1-based rank range occupied by all occurrences of `key`
    /// in sorted order, or `None` if the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranktree::AvlMultiset;
    ///
    /// let set = AvlMultiset::from([5, 3, 8, 3, 1, 8, 8]);
    /// let ranks = set.rank(&8).unwrap();
    /// assert_eq!((ranks.first, ranks.last), (5, 7));
    /// assert_eq!(set.rank(&9), None);
    /// ```
    #[must_use]
    pub fn rank(&self, key: &K) -> Option<RankRange> {
        node::rank(self.raw.root(), key)
    }

    /// Returns the key at ascending rank `k`, `1 <= k <= len()`.
    ///
    /// Out-of-range `k` (including 0) returns `None` and is never clamped;
    /// for a panicking variant, index by [`Rank`].
    ///
    /// # Examples
    ///
    /// ```
    /// use ranktree::AvlMultiset;
    ///
    /// let set = AvlMultiset::from([5, 3, 8, 3, 1, 8, 8]);
    /// assert_eq!(set.kth(1), Some(&1));
    /// assert_eq!(set.kth(7), Some(&8));
    /// assert_eq!(set.kth(8), None);
    /// ```
    #[must_use]
    pub fn kth(&self, k: usize) -> Option<&K> {
        node::kth(self.raw.root(), k)
    }

    /// Returns the key at descending rank `k`, `1 <= k <= len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranktree::AvlMultiset;
    ///
    /// let set = AvlMultiset::from([5, 3, 8]);
    /// assert_eq!(set.kth_from_end(1), Some(&8));
    /// assert_eq!(set.kth_from_end(3), Some(&3));
    /// ```
    #[must_use]
    pub fn kth_from_end(&self, k: usize) -> Option<&K> {
        node::kth_from_end(self.raw.root(), k)
    }
}

impl<K> Default for AvlMultiset<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug> fmt::Debug for AvlMultiset<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord> FromIterator<K> for AvlMultiset<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = AvlMultiset::new();
        set.extend(iter);
        set
    }
}

impl<K: Ord> Extend<K> for AvlMultiset<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord, const N: usize> From<[K; N]> for AvlMultiset<K> {
    /// Builds a multiset from an array, keeping duplicates.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranktree::AvlMultiset;
    ///
    /// let set = AvlMultiset::from([2, 1, 2]);
    /// assert_eq!(set.multiplicity(&2), 2);
    /// ```
    fn from(keys: [K; N]) -> Self {
        keys.into_iter().collect()
    }
}

/// Indexes into the multiset by 1-based rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use ranktree::{AvlMultiset, Rank};
///
/// let set = AvlMultiset::from([10, 20, 30]);
/// assert_eq!(set[Rank(2)], 20);
/// ```
impl<K: Ord> Index<Rank> for AvlMultiset<K> {
    type Output = K;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.kth(rank.0).expect("rank out of bounds")
    }
}

impl<K: Ord> OrderStatisticMultiset<K> for AvlMultiset<K> {
    fn len(&self) -> usize {
        self.len()
    }

    fn distinct_len(&self) -> usize {
        self.distinct_len()
    }

    fn clear(&mut self) {
        self.clear();
    }

    fn multiplicity(&self, key: &K) -> usize {
        self.multiplicity(key)
    }

    fn insert_multiple(&mut self, key: K, count: usize) {
        self.insert_multiple(key, count);
    }

    fn remove_multiple(&mut self, key: &K, count: usize) -> usize {
        self.remove_multiple(key, count)
    }

    fn first(&self) -> Option<&K> {
        self.first()
    }

    fn last(&self) -> Option<&K> {
        self.last()
    }

    fn lower(&self, key: &K) -> Option<&K> {
        self.lower(key)
    }

    fn floor(&self, key: &K) -> Option<&K> {
        self.floor(key)
    }

    fn ceiling(&self, key: &K) -> Option<&K> {
        self.ceiling(key)
    }

    fn higher(&self, key: &K) -> Option<&K> {
        self.higher(key)
    }

    fn rank(&self, key: &K) -> Option<RankRange> {
        self.rank(key)
    }

    fn kth(&self, k: usize) -> Option<&K> {
        self.kth(k)
    }

    fn kth_from_end(&self, k: usize) -> Option<&K> {
        self.kth_from_end(k)
    }
}

/// An iterator over the `(key, multiplicity)` pairs of an [`AvlMultiset`] in
/// ascending key order.
///
/// This `struct` is created by the [`iter`](AvlMultiset::iter) method.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K> {
    inner: node::Iter<'a, K, node::AvlBalance>,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = (&'a K, usize);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl<K> FusedIterator for Iter<'_, K> {}

impl<'a, K> IntoIterator for &'a AvlMultiset<K> {
    type Item = (&'a K, usize);
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
