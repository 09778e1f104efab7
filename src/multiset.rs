use crate::RankRange;

/// The contract shared by every order-statistic multiset in this crate.
///
/// [`AvlMultiset`](crate::AvlMultiset) and [`TreapMultiset`](crate::TreapMultiset)
/// both implement this trait with identical observable behavior; only the
/// balancing discipline differs. Callers that depend on the trait instead of a
/// concrete tree can swap strategies at construction time.
///
/// All ranks are 1-based and count multiplicities; see [`RankRange`].
///
/// # Examples
///
/// ```
/// use ranktree::{AvlMultiset, OrderStatisticMultiset, TreapMultiset};
///
/// fn median<M: OrderStatisticMultiset<i64>>(set: &M) -> Option<&i64> {
///     set.kth(set.len().div_ceil(2))
/// }
///
/// let avl: AvlMultiset<i64> = [1, 2, 3, 4, 5].into_iter().collect();
/// let treap: TreapMultiset<i64> = [1, 2, 3, 4, 5].into_iter().collect();
/// assert_eq!(median(&avl), Some(&3));
/// assert_eq!(median(&treap), Some(&3));
/// ```
pub trait OrderStatisticMultiset<K: Ord> {
    /// Returns the total number of occurrences, counting multiplicities.
    fn len(&self) -> usize;

    /// Returns the number of distinct keys.
    fn distinct_len(&self) -> usize;

    /// Returns true if the multiset contains no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes all elements.
    fn clear(&mut self);

    /// Returns true if the multiset contains `key`, ignoring multiplicity.
    fn contains(&self, key: &K) -> bool {
        self.multiplicity(key) > 0
    }

    /// Returns the number of occurrences of `key` (0 when absent).
    fn multiplicity(&self, key: &K) -> usize;

    /// Inserts one occurrence of `key`.
    fn insert(&mut self, key: K) {
        self.insert_multiple(key, 1);
    }

    /// Inserts `count` occurrences of `key`. Inserting 0 is a no-op.
    fn insert_multiple(&mut self, key: K, count: usize);

    /// Removes one occurrence of `key`, returning true if one was present.
    fn remove(&mut self, key: &K) -> bool {
        self.remove_multiple(key, 1) > 0
    }

    /// Removes up to `count` occurrences of `key`, returning the number
    /// actually removed. Removing an absent key is a no-op.
    fn remove_multiple(&mut self, key: &K, count: usize) -> usize;

    /// Returns the smallest key, or `None` on an empty multiset.
    fn first(&self) -> Option<&K>;

    /// Returns the largest key, or `None` on an empty multiset.
    fn last(&self) -> Option<&K>;

    /// Returns the largest key strictly less than `key`.
    fn lower(&self, key: &K) -> Option<&K>;

    /// Returns the largest key less than or equal to `key`.
    fn floor(&self, key: &K) -> Option<&K>;

    /// Returns the smallest key greater than or equal to `key`.
    fn ceiling(&self, key: &K) -> Option<&K>;

    /// Returns the smallest key strictly greater than `key`.
    fn higher(&self, key: &K) -> Option<&K>;

    /// Returns the 1-based rank range occupied by all occurrences of `key`,
    /// or `None` if the key is absent.
    fn rank(&self, key: &K) -> Option<RankRange>;

    /// Returns the key at ascending rank `k`, `1 <= k <= len()`. Out-of-range
    /// `k` (including 0) returns `None`, never a clamped result.
    fn kth(&self, k: usize) -> Option<&K>;

    /// Returns the key at descending rank `k`, `1 <= k <= len()`.
    fn kth_from_end(&self, k: usize) -> Option<&K>;
}
