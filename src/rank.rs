/// A one-based rank into the sorted order of a multiset.
///
/// Ranks count multiplicities: a key stored three times occupies three
/// consecutive ranks. `Rank(1)` is the smallest element and `Rank(len)` the
/// largest.
///
/// # Examples
///
/// ```
/// use ranktree::{AvlMultiset, Rank};
///
/// let set = AvlMultiset::from([10, 20, 20]);
/// assert_eq!(set[Rank(1)], 10);
/// assert_eq!(set[Rank(3)], 20);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);

/// The closed, one-based range of ranks occupied by all occurrences of one
/// key in sorted order.
///
/// Returned by [`rank`](crate::AvlMultiset::rank). The range always satisfies
/// `first <= last`, and `last - first + 1` equals the key's multiplicity.
/// Absent keys are reported as `None` by `rank`, never as a sentinel range.
///
/// # Examples
///
/// ```
/// use ranktree::{AvlMultiset, RankRange};
///
/// let set = AvlMultiset::from([5, 3, 8, 3]);
/// assert_eq!(set.rank(&3), Some(RankRange { first: 1, last: 2 }));
/// assert_eq!(set.rank(&4), None);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct RankRange {
    /// Rank of the first occurrence of the key.
    pub first: usize,
    /// Rank of the last occurrence of the key.
    pub last: usize,
}

impl RankRange {
    /// Returns the number of occurrences covered by this range.
    #[must_use]
    pub const fn multiplicity(&self) -> usize {
        self.last - self.first + 1
    }

    /// Returns true if `rank` falls within this range.
    #[must_use]
    pub const fn contains(&self, rank: usize) -> bool {
        self.first <= rank && rank <= self.last
    }
}
