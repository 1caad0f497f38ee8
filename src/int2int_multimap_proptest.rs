#![cfg(test)]

// Property tests for Int2IntMultimap kept inside the crate so they can check
// internal counters (filled slots) alongside the public behavior.

use crate::int2int_multimap::Int2IntMultimap;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashSet};

#[derive(Clone, Debug)]
enum Op {
    Put(i32, i32),
    Remove(i32, i32),
    Has(i32, i32),
    Replace(i32, i32, i32),
    Lookup(i32),
    Iterate,
    Clear,
}

fn arb_ops(key: BoxedStrategy<i32>) -> impl Strategy<Value = Vec<Op>> {
    let value = 1i32..=6;
    let op = prop_oneof![
        6 => (key.clone(), value.clone()).prop_map(|(k, v)| Op::Put(k, v)),
        3 => (key.clone(), value.clone()).prop_map(|(k, v)| Op::Remove(k, v)),
        2 => (key.clone(), value.clone()).prop_map(|(k, v)| Op::Has(k, v)),
        2 => (key.clone(), value.clone(), value.clone())
            .prop_map(|(k, a, b)| Op::Replace(k, a, b)),
        2 => key.prop_map(Op::Lookup),
        1 => Just(Op::Iterate),
        1 => Just(Op::Clear),
    ];
    proptest::collection::vec(op, 1..200)
}

fn spread_keys() -> BoxedStrategy<i32> {
    prop_oneof![-30i32..=-1, 1i32..=30].boxed()
}

// Every key shares home slot 0 until the table exceeds 1024 slots.
fn colliding_keys() -> BoxedStrategy<i32> {
    (-4i32..=4)
        .prop_filter("non-zero", |k| *k != 0)
        .prop_map(|k| k * 1024)
        .boxed()
}

fn run(mut sut: Int2IntMultimap, ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut model: HashSet<(i32, i32)> = HashSet::new();

    for op in ops {
        match op {
            Op::Put(k, v) => {
                let added = sut.put(k, v).unwrap();
                prop_assert_eq!(added, model.insert((k, v)));
            }
            Op::Remove(k, v) => {
                let removed = sut.remove(k, v).unwrap();
                prop_assert_eq!(removed, model.remove(&(k, v)));
            }
            Op::Has(k, v) => {
                prop_assert_eq!(sut.has(k, v).unwrap(), model.contains(&(k, v)));
            }
            Op::Replace(k, a, b) => {
                let replaced = sut.replace(k, a, b).unwrap();
                let present = model.remove(&(k, a));
                prop_assert_eq!(replaced, present);
                if present {
                    model.insert((k, b));
                }
            }
            Op::Lookup(k) => {
                let mut seen = Vec::new();
                let exhausted = sut
                    .lookup(k, |v| {
                        seen.push(v);
                        true
                    })
                    .unwrap();
                prop_assert!(exhausted);
                let distinct: BTreeSet<i32> = seen.iter().copied().collect();
                prop_assert_eq!(distinct.len(), seen.len(), "a value was visited twice");
                let expected: BTreeSet<i32> =
                    model.iter().filter(|(mk, _)| *mk == k).map(|(_, v)| *v).collect();
                prop_assert_eq!(distinct, expected);
            }
            Op::Iterate => {
                let pairs: Vec<(i32, i32)> = sut.iter().collect();
                let as_set: HashSet<(i32, i32)> = pairs.iter().copied().collect();
                prop_assert_eq!(pairs.len(), as_set.len(), "a pair is alive twice");
                prop_assert_eq!(&as_set, &model);
            }
            Op::Clear => {
                sut.clear();
                model.clear();
            }
        }

        prop_assert_eq!(sut.size(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut.size() <= sut.filled_slots());
        prop_assert!(sut.filled_slots() <= sut.capacity());
        let threshold = (sut.capacity() as f64) * f64::from(sut.load_factor());
        prop_assert!((sut.size() as f64) <= threshold);
        prop_assert!((sut.filled_slots() as f64) <= threshold, "tombstones were not dropped");
    }
    Ok(())
}

// Property: state-machine equivalence against a set of pairs.
// - put/remove report exactly whether the model changed.
// - replace keeps per-key values a set.
// - lookup visits every value of the key once; iteration yields the model.
// - alive <= filled <= capacity, and filled never exceeds the load factor.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine(ops in arb_ops(spread_keys())) {
        run(Int2IntMultimap::new(), ops)?;
    }

    #[test]
    fn prop_state_machine_with_collisions(ops in arb_ops(colliding_keys())) {
        run(Int2IntMultimap::new(), ops)?;
    }

    // Tiny, dense tables hit tombstone reuse and same-capacity compaction.
    #[test]
    fn prop_state_machine_dense_table(ops in arb_ops(spread_keys())) {
        let sut = Int2IntMultimap::with_capacity_and_load_factor(2, 0.9).unwrap();
        run(sut, ops)?;
    }
}
