//! Order-statistic balanced binary search trees for Rust.
//!
//! This crate provides [`AvlMultiset`] and [`TreapMultiset`]: ordered multisets
//! over any [`Ord`] key with O(log n) rank and selection queries on top of the
//! usual sorted-set navigation:
//!
//! - [`rank`](AvlMultiset::rank) - The 1-based rank range occupied by all
//!   occurrences of a key
//! - [`kth`](AvlMultiset::kth) / [`kth_from_end`](AvlMultiset::kth_from_end) -
//!   The key at a given sorted position, counting from either end
//! - [`lower`](AvlMultiset::lower) / [`floor`](AvlMultiset::floor) /
//!   [`ceiling`](AvlMultiset::ceiling) / [`higher`](AvlMultiset::higher) -
//!   Neighbor lookup by a single root-to-leaf descent
//! - Indexing by [`Rank`] - e.g., `set[Rank(1)]` for the smallest element
//!
//! # Example
//!
//! ```
//! use ranktree::{AvlMultiset, Rank};
//!
//! let mut scores = AvlMultiset::new();
//! for score in [85, 92, 100, 92, 92] {
//!     scores.insert(score);
//! }
//!
//! // Multiset semantics: duplicates are counted, not discarded.
//! assert_eq!(scores.len(), 5);
//! assert_eq!(scores.multiplicity(&92), 3);
//!
//! // Order-statistic operations (O(log n), ranks are 1-based).
//! assert_eq!(scores.kth(1), Some(&85));
//! assert_eq!(scores[Rank(5)], 100);
//!
//! // The three 92s occupy ranks 2 through 4.
//! let ranks = scores.rank(&92).unwrap();
//! assert_eq!((ranks.first, ranks.last), (2, 4));
//!
//! // Sorted-set navigation.
//! assert_eq!(scores.higher(&92), Some(&100));
//! ```
//!
//! # Features
//!
//! - **Multiset semantics** - Each distinct key is stored once with an
//!   occurrence count, so repeated insertion costs no extra nodes
//! - **O(log n) rank operations** - Subtree size augmentation answers rank and
//!   selection queries without full traversal
//! - **Two interchangeable balancing strategies** - Deterministic height
//!   balance ([`AvlMultiset`]) and randomized priority balance
//!   ([`TreapMultiset`]) behind one contract ([`OrderStatisticMultiset`])
//! - **Reproducible randomness** - The treap's priority source is seedable via
//!   [`TreapMultiset::with_seed`]
//!
//! # Implementation
//!
//! Both trees store one node per distinct key, augmented with a
//! multiplicity-weighted subtree size. Rebalancing is recursive: every mutation
//! rebuilds its path bottom-up by returning the new subtree root, so no parent
//! pointers exist. Rotations recompute subtree sizes (and heights, for the AVL
//! variant) from the post-rotation children.

// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]

mod multiset;
mod rank;
mod raw;

pub mod avl_multiset;
pub mod treap_multiset;

pub use avl_multiset::AvlMultiset;
pub use multiset::OrderStatisticMultiset;
pub use rank::{Rank, RankRange};
pub use treap_multiset::TreapMultiset;
