//! An ordered multiset balanced by randomized heap priorities.

use core::fmt;
use core::iter::FusedIterator;
use core::ops::Index;

use crate::multiset::OrderStatisticMultiset;
use crate::rank::{Rank, RankRange};
use crate::raw::node;
use crate::raw::treap::RawTreap;

/// An ordered multiset with O(log n) rank and selection queries, balanced by
/// randomized heap priorities (a treap).
///
/// The external contract is identical to [`AvlMultiset`](crate::AvlMultiset):
/// one node per distinct key with an occurrence count, subtree sizes for rank
/// and selection, and the same navigation operations. The difference is the
/// balancing discipline: instead of tracking heights, every node draws a
/// random priority at creation and rotations maintain max-heap order on
/// priorities, which keeps operations O(log n) in expectation.
///
/// The priority source belongs to the tree and can be seeded through
/// [`with_seed`](TreapMultiset::with_seed) for reproducible behavior.
///
/// # Examples
///
/// ```
/// use ranktree::TreapMultiset;
///
/// let mut latencies = TreapMultiset::with_seed(0xfeed);
/// for ms in [12, 7, 12, 31, 7, 7] {
///     latencies.insert(ms);
/// }
///
/// assert_eq!(latencies.len(), 6);
/// // The 99th-percentile-style query: largest, second largest, ...
/// assert_eq!(latencies.kth_from_end(1), Some(&31));
/// assert_eq!(latencies.rank(&7).map(|r| (r.first, r.last)), Some((1, 3)));
/// ```
#[derive(Clone)]
pub struct TreapMultiset<K> {
    raw: RawTreap<K>,
}

impl<K> TreapMultiset<K> {
    /// Creates an empty multiset with priorities seeded from entropy.
    #[must_use]
    pub fn new() -> Self {
        TreapMultiset { raw: RawTreap::new() }
    }

    /// Creates an empty multiset whose priority source is seeded with `seed`,
    /// making tree shape reproducible across runs.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranktree::TreapMultiset;
    ///
    /// let mut set = TreapMultiset::with_seed(42);
    /// set.insert("a");
    /// assert!(set.contains(&"a"));
    /// ```
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        TreapMultiset {
            raw: RawTreap::with_seed(seed),
        }
    }

    /// Returns the total number of occurrences, counting multiplicities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns the number of distinct keys.
    #[must_use]
    pub const fn distinct_len(&self) -> usize {
        self.raw.distinct_len()
    }

    /// Returns true if the multiset contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes all elements. The priority source is kept.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns an iterator over `(key, multiplicity)` pairs in ascending key
    /// order.
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
}

impl<K: Ord> TreapMultiset<K> {
    /// Inserts one occurrence of `key`. See [`AvlMultiset::insert`].
    ///
    /// [`AvlMultiset::insert`]: crate::AvlMultiset::insert
    pub fn insert(&mut self, key: K) {
        self.raw.insert(key, 1);
    }

    /// Inserts `count` occurrences of `key`. Inserting 0 is a no-op.
    pub fn insert_multiple(&mut self, key: K, count: usize) {
        self.raw.insert(key, count);
    }

    /// Removes one occurrence of `key`, returning true if one was present.
    /// Removing an absent key is a no-op.
    pub fn remove(&mut self, key: &K) -> bool {
        self.raw.remove(key, 1) > 0
    }

    /// Removes up to `count` occurrences of `key`, returning the number
    /// actually removed (clamped to the key's multiplicity).
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
    #[must_use]
    pub fn lower(&self, key: &K) -> Option<&K> {
        node::lower(self.raw.root(), key)
    }

    /// Returns the largest key less than or equal to `key`. A present key is
    /// its own floor.
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
    /// use ranktree::TreapMultiset;
    ///
    /// let mut set = TreapMultiset::with_seed(1);
    /// for x in [5, 3, 8, 3, 1, 8, 8] {
    ///     set.insert(x);
    /// }
    /// assert_eq!(set.rank(&8).map(|r| (r.first, r.last)), Some((5, 7)));
    /// assert_eq!(set.rank(&9), None);
    /// ```
    #[must_use]
    pub fn rank(&self, key: &K) -> Option<RankRange> {
        node::rank(self.raw.root(), key)
    }

    /// Returns the key at ascending rank `k`, `1 <= k <= len()`. Out-of-range
    /// `k` (including 0) returns `None`, never a clamped result.
    #[must_use]
    pub fn kth(&self, k: usize) -> Option<&K> {
        node::kth(self.raw.root(), k)
    }

    /// Returns the key at descending rank `k`, `1 <= k <= len()`.
    #[must_use]
    pub fn kth_from_end(&self, k: usize) -> Option<&K> {
        node::kth_from_end(self.raw.root(), k)
    }
}

impl<K> Default for TreapMultiset<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug> fmt::Debug for TreapMultiset<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord> FromIterator<K> for TreapMultiset<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = TreapMultiset::new();
        set.extend(iter);
        set
    }
}

impl<K: Ord> Extend<K> for TreapMultiset<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord, const N: usize> From<[K; N]> for TreapMultiset<K> {
    fn from(keys: [K; N]) -> Self {
        keys.into_iter().collect()
    }
}

/// Indexes into the multiset by 1-based rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
impl<K: Ord> Index<Rank> for TreapMultiset<K> {
    type Output = K;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.kth(rank.0).expect("rank out of bounds")
    }
}

impl<K: Ord> OrderStatisticMultiset<K> for TreapMultiset<K> {
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

/// An iterator over the `(key, multiplicity)` pairs of a [`TreapMultiset`] in
/// ascending key order.
///
/// This `struct` is created by the [`iter`](TreapMultiset::iter) method.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K> {
    inner: node::Iter<'a, K, node::TreapBalance>,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = (&'a K, usize);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl<K> FusedIterator for Iter<'_, K> {}

impl<'a, K> IntoIterator for &'a TreapMultiset<K> {
    type Item = (&'a K, usize);
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
