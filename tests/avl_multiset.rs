use std::collections::BTreeMap;
use std::ops::Bound;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use ranktree::{AvlMultiset, OrderStatisticMultiset, Rank, RankRange};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 1_000;

// ─── Model helpers (BTreeMap<key, multiplicity> as the reference) ────────────

fn model_len(model: &BTreeMap<i64, usize>) -> usize {
    model.values().sum()
}

fn model_rank(model: &BTreeMap<i64, usize>, key: i64) -> Option<(usize, usize)> {
    let mut before = 0usize;
    for (&k, &count) in model {
        match k.cmp(&key) {
            std::cmp::Ordering::Less => before += count,
            std::cmp::Ordering::Equal => return Some((before + 1, before + count)),
            std::cmp::Ordering::Greater => break,
        }
    }
    None
}

fn model_kth(model: &BTreeMap<i64, usize>, k: usize) -> Option<i64> {
    if k == 0 {
        return None;
    }
    let mut seen = 0usize;
    for (&key, &count) in model {
        if k <= seen + count {
            return Some(key);
        }
        seen += count;
    }
    None
}

fn model_lower(model: &BTreeMap<i64, usize>, key: i64) -> Option<i64> {
    model.range(..key).next_back().map(|(&k, _)| k)
}

fn model_floor(model: &BTreeMap<i64, usize>, key: i64) -> Option<i64> {
    model.range(..=key).next_back().map(|(&k, _)| k)
}

fn model_ceiling(model: &BTreeMap<i64, usize>, key: i64) -> Option<i64> {
    model.range(key..).next().map(|(&k, _)| k)
}

fn model_higher(model: &BTreeMap<i64, usize>, key: i64) -> Option<i64> {
    model
        .range((Bound::Excluded(key), Bound::Unbounded))
        .next()
        .map(|(&k, _)| k)
}

// ─── Scenario tests ──────────────────────────────────────────────────────────

#[test]
fn round_trip_with_multiplicities() {
    let set = AvlMultiset::from([5, 3, 8, 3, 1, 8, 8]);
    set.check_invariants();

    assert_eq!(set.len(), 7);
    assert_eq!(set.distinct_len(), 4);

    let in_rank_order: Vec<i64> = (1..=7).map(|k| *set.kth(k).unwrap()).collect();
    assert_eq!(in_rank_order, [1, 3, 3, 5, 8, 8, 8]);

    assert_eq!(set.rank(&8), Some(RankRange { first: 5, last: 7 }));
    assert_eq!(set.rank(&9), None);

    // Out-of-range selection is an explicit absence, never clamped.
    assert_eq!(set.kth(8), None);
    assert_eq!(set.kth(0), None);
    assert_eq!(set.kth_from_end(8), None);
}

#[test]
fn ascending_insertion_rebalances_at_each_step() {
    let mut set = AvlMultiset::new();
    for key in 1..=7 {
        set.insert(key);
        // Each step must leave the balance invariant intact, not just the
        // final tree.
        set.check_invariants();
    }
    assert_eq!(set.len(), 7);
    assert!(set.height() <= 3, "height {} exceeds log bound", set.height());
}

#[test]
fn deletion_splice_promotes_successor() {
    let mut set = AvlMultiset::from([10, 5, 15, 3, 7, 12, 18]);
    assert_eq!(set.root_key(), Some(&10));

    assert!(set.remove(&10));
    set.check_invariants();

    assert_eq!(set.root_key(), Some(&12));
    assert!(!set.contains(&10));
    assert_eq!(set.len(), 6);
}

#[test]
fn navigation_on_present_and_absent_keys() {
    let set = AvlMultiset::from([1, 3, 5, 7]);

    assert_eq!(set.lower(&1), None);
    assert_eq!(set.lower(&4), Some(&3));
    assert_eq!(set.higher(&7), None);
    assert_eq!(set.higher(&4), Some(&5));

    // floor/ceiling are idempotent on present keys.
    assert_eq!(set.floor(&5), Some(&5));
    assert_eq!(set.ceiling(&5), Some(&5));
    assert_eq!(set.floor(&6), Some(&5));
    assert_eq!(set.ceiling(&6), Some(&7));
    assert_eq!(set.floor(&0), None);
    assert_eq!(set.ceiling(&8), None);
}

#[test]
fn empty_tree_queries_are_absent() {
    let mut set: AvlMultiset<i64> = AvlMultiset::new();
    assert_eq!(set.first(), None);
    assert_eq!(set.last(), None);
    assert_eq!(set.kth(1), None);
    assert_eq!(set.kth_from_end(1), None);
    assert_eq!(set.rank(&0), None);
    assert_eq!(set.floor(&0), None);
    assert!(!set.contains(&0));

    // Removal from an empty tree is a no-op, not an error.
    assert!(!set.remove(&0));
    assert_eq!(set.remove_multiple(&0, 5), 0);
    set.check_invariants();
}

#[test]
fn size_conservation_under_bulk_ops() {
    let mut set = AvlMultiset::new();
    set.insert_multiple(4, 5);
    assert_eq!(set.len(), 5);

    set.insert_multiple(4, 2);
    assert_eq!(set.len(), 7);
    assert_eq!(set.distinct_len(), 1);

    // Removal clamps at the key's multiplicity.
    assert_eq!(set.remove_multiple(&4, 100), 7);
    assert_eq!(set.len(), 0);
    set.check_invariants();

    // Zero-count operations are no-ops.
    set.insert_multiple(9, 0);
    assert!(set.is_empty());
}

#[test]
fn index_by_rank() {
    let set = AvlMultiset::from([10, 20, 20, 30]);
    assert_eq!(set[Rank(1)], 10);
    assert_eq!(set[Rank(3)], 20);
    assert_eq!(set[Rank(4)], 30);
}

#[test]
#[should_panic(expected = "rank out of bounds")]
fn index_by_rank_panics_out_of_bounds() {
    let set = AvlMultiset::from([10, 20]);
    let _ = set[Rank(3)];
}

#[test]
fn iter_yields_sorted_pairs() {
    let set = AvlMultiset::from([5, 3, 8, 3, 1, 8, 8]);
    let pairs: Vec<(i64, usize)> = set.iter().map(|(&k, c)| (k, c)).collect();
    assert_eq!(pairs, [(1, 1), (3, 2), (5, 1), (8, 3)]);
}

#[test]
fn usable_through_the_contract_trait() {
    fn drain_in_order<M: OrderStatisticMultiset<i64>>(set: &mut M) -> Vec<i64> {
        let mut out = Vec::new();
        while let Some(&key) = set.kth(1) {
            out.push(key);
            set.remove(&key);
        }
        out
    }

    let mut set = AvlMultiset::from([2, 9, 2, 4]);
    assert_eq!(drain_in_order(&mut set), [2, 2, 4, 9]);
    assert!(set.is_empty());
}

// ─── Operations enum for driving randomized tests ────────────────────────────

fn value_strategy() -> impl Strategy<Value = i64> {
    // A narrow range so multiplicities build up.
    -50i64..50i64
}

#[derive(Debug, Clone)]
enum Op {
    Insert(i64),
    InsertMultiple(i64, usize),
    Remove(i64),
    RemoveMultiple(i64, usize),
    Rank(i64),
    Kth(usize),
    KthFromEnd(usize),
    Lower(i64),
    Floor(i64),
    Ceiling(i64),
    Higher(i64),
    First,
    Last,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        5 => value_strategy().prop_map(Op::Insert),
        2 => (value_strategy(), 1usize..4).prop_map(|(v, c)| Op::InsertMultiple(v, c)),
        3 => value_strategy().prop_map(Op::Remove),
        2 => (value_strategy(), 1usize..4).prop_map(|(v, c)| Op::RemoveMultiple(v, c)),
        2 => value_strategy().prop_map(Op::Rank),
        2 => (0usize..TEST_SIZE).prop_map(Op::Kth),
        1 => (0usize..TEST_SIZE).prop_map(Op::KthFromEnd),
        1 => value_strategy().prop_map(Op::Lower),
        1 => value_strategy().prop_map(Op::Floor),
        1 => value_strategy().prop_map(Op::Ceiling),
        1 => value_strategy().prop_map(Op::Higher),
        1 => Just(Op::First),
        1 => Just(Op::Last),
    ]
}

// ─── Randomized differential tests ───────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Replays a random operation sequence against a BTreeMap-of-counts model
    /// and validates every invariant after every mutation.
    #[test]
    fn ops_match_model(ops in proptest::collection::vec(op_strategy(), TEST_SIZE)) {
        let mut set: AvlMultiset<i64> = AvlMultiset::new();
        let mut model: BTreeMap<i64, usize> = BTreeMap::new();

        for op in &ops {
            match *op {
                Op::Insert(v) => {
                    set.insert(v);
                    *model.entry(v).or_insert(0) += 1;
                }
                Op::InsertMultiple(v, c) => {
                    set.insert_multiple(v, c);
                    *model.entry(v).or_insert(0) += c;
                }
                Op::Remove(v) => {
                    let removed = set.remove(&v);
                    let model_removed = match model.get_mut(&v) {
                        Some(count) => {
                            *count -= 1;
                            if *count == 0 {
                                model.remove(&v);
                            }
                            true
                        }
                        None => false,
                    };
                    prop_assert_eq!(removed, model_removed, "remove({})", v);
                }
                Op::RemoveMultiple(v, c) => {
                    let removed = set.remove_multiple(&v, c);
                    let model_removed = match model.get_mut(&v) {
                        Some(count) => {
                            let taken = c.min(*count);
                            *count -= taken;
                            if *count == 0 {
                                model.remove(&v);
                            }
                            taken
                        }
                        None => 0,
                    };
                    prop_assert_eq!(removed, model_removed, "remove_multiple({}, {})", v, c);
                }
                Op::Rank(v) => {
                    let got = set.rank(&v).map(|r| (r.first, r.last));
                    prop_assert_eq!(got, model_rank(&model, v), "rank({})", v);
                }
                Op::Kth(k) => {
                    prop_assert_eq!(set.kth(k).copied(), model_kth(&model, k), "kth({})", k);
                }
                Op::KthFromEnd(k) => {
                    let expected = if k == 0 {
                        None
                    } else {
                        model_kth(&model, (model_len(&model) + 1).checked_sub(k).unwrap_or(0))
                    };
                    prop_assert_eq!(set.kth_from_end(k).copied(), expected, "kth_from_end({})", k);
                }
                Op::Lower(v) => {
                    prop_assert_eq!(set.lower(&v).copied(), model_lower(&model, v), "lower({})", v);
                }
                Op::Floor(v) => {
                    prop_assert_eq!(set.floor(&v).copied(), model_floor(&model, v), "floor({})", v);
                }
                Op::Ceiling(v) => {
                    prop_assert_eq!(set.ceiling(&v).copied(), model_ceiling(&model, v), "ceiling({})", v);
                }
                Op::Higher(v) => {
                    prop_assert_eq!(set.higher(&v).copied(), model_higher(&model, v), "higher({})", v);
                }
                Op::First => {
                    prop_assert_eq!(set.first().copied(), model.keys().next().copied(), "first()");
                }
                Op::Last => {
                    prop_assert_eq!(set.last().copied(), model.keys().next_back().copied(), "last()");
                }
            }

            set.check_invariants();
            prop_assert_eq!(set.len(), model_len(&model), "len mismatch after {:?}", op);
            prop_assert_eq!(set.distinct_len(), model.len(), "distinct_len mismatch after {:?}", op);
        }

        // Final sweep: sorted iteration matches the model exactly.
        let pairs: Vec<(i64, usize)> = set.iter().map(|(&k, c)| (k, c)).collect();
        let expected: Vec<(i64, usize)> = model.iter().map(|(&k, &c)| (k, c)).collect();
        prop_assert_eq!(pairs, expected);
    }

    /// For every valid k, the rank range of kth(k) must cover k.
    #[test]
    fn rank_select_duality(values in proptest::collection::vec(value_strategy(), 1..200)) {
        let set: AvlMultiset<i64> = values.iter().copied().collect();
        set.check_invariants();

        for k in 1..=set.len() {
            let key = *set.kth(k).expect("k is in range");
            let ranks = set.rank(&key).expect("selected key is present");
            prop_assert!(
                ranks.contains(k),
                "rank({}) = [{}, {}] does not cover k = {}",
                key, ranks.first, ranks.last, k
            );
            prop_assert_eq!(ranks.multiplicity(), set.multiplicity(&key));
        }
    }

    /// floor and ceiling return present keys unchanged.
    #[test]
    fn floor_ceiling_idempotent(values in proptest::collection::vec(value_strategy(), 1..100)) {
        let set: AvlMultiset<i64> = values.iter().copied().collect();
        for v in &values {
            prop_assert_eq!(set.floor(v), Some(v));
            prop_assert_eq!(set.ceiling(v), Some(v));
        }
    }
}
