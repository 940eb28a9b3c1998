#![cfg(test)]

// Property tests for Dictionary kept inside the crate so they can check
// the internal bucket invariants after every operation.

use crate::builder::KeyMatch;
use crate::dictionary::Dictionary;
use proptest::prelude::*;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::hash::{BuildHasher, Hasher};
use std::rc::Rc;

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i32),
    TryPut(usize, i32),
    Get(usize),
    Probe(String),
    Remove(usize),
    RemoveAndDestroy(usize),
    Mutate(usize, i32),
    Clean,
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Put(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::TryPut(i, v)),
            2 => idx.clone().prop_map(OpI::Get),
            1 => "[a-z]{0,5}".prop_map(OpI::Probe),
            2 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::RemoveAndDestroy),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Clean),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Model: entries in insertion order. The first entry with a given key is the
// one `get`/`remove` see.
#[derive(Default)]
struct Model {
    entries: Vec<(String, i32)>,
}

impl Model {
    fn position(&self, k: &str) -> Option<usize> {
        self.entries.iter().position(|(mk, _)| mk == k)
    }
    fn get(&self, k: &str) -> Option<i32> {
        self.position(k).map(|i| self.entries[i].1)
    }
    fn remove(&mut self, k: &str) -> Option<i32> {
        self.position(k).map(|i| self.entries.remove(i).1)
    }
    fn multiset(&self) -> BTreeMap<(String, i32), usize> {
        let mut out = BTreeMap::new();
        for e in &self.entries {
            *out.entry(e.clone()).or_insert(0) += 1;
        }
        out
    }
}

fn run_scenario<S: BuildHasher>(
    pool: Vec<String>,
    ops: Vec<OpI>,
    make: impl FnOnce(Box<dyn FnMut(i32)>) -> Dictionary<i32, S>,
) -> Result<(), TestCaseError> {
    let destroyed = Rc::new(RefCell::new(Vec::new()));
    let sink = destroyed.clone();
    let mut sut = make(Box::new(move |v| sink.borrow_mut().push(v)));
    let mut model = Model::default();
    let mut expected_destroyed: Vec<i32> = Vec::new();
    let mut capacity = sut.capacity();

    for op in ops {
        match op {
            OpI::Put(i, v) => {
                sut.put(&pool[i], v);
                model.entries.push((pool[i].clone(), v));
            }
            OpI::TryPut(i, v) => {
                prop_assert!(sut.try_put(&pool[i], v).is_ok());
                model.entries.push((pool[i].clone(), v));
            }
            OpI::Get(i) => {
                prop_assert_eq!(sut.get(&pool[i]).copied(), model.get(&pool[i]));
                prop_assert_eq!(sut.contains_key(&pool[i]), model.position(&pool[i]).is_some());
            }
            OpI::Probe(s) => {
                prop_assert_eq!(sut.get(&s).copied(), model.get(&s));
            }
            OpI::Remove(i) => {
                prop_assert_eq!(sut.remove(&pool[i]), model.remove(&pool[i]));
            }
            OpI::RemoveAndDestroy(i) => {
                let removed = model.remove(&pool[i]);
                prop_assert_eq!(sut.remove_and_destroy(&pool[i]), removed.is_some());
                expected_destroyed.extend(removed);
            }
            OpI::Mutate(i, d) => {
                if let Some(pos) = model.position(&pool[i]) {
                    let v = sut.get_mut(&pool[i]);
                    prop_assert!(v.is_some(), "present key must resolve mutably");
                    if let Some(v) = v {
                        *v = v.wrapping_add(d);
                    }
                    let mv = &mut model.entries[pos].1;
                    *mv = mv.wrapping_add(d);
                } else {
                    prop_assert!(sut.get_mut(&pool[i]).is_none());
                }
            }
            OpI::Clean => {
                expected_destroyed.extend(model.entries.drain(..).map(|(_, v)| v));
                sut.clean();
            }
            OpI::Iterate => {
                let mut seen = BTreeMap::new();
                for (k, v) in sut.iter() {
                    let k = String::from_utf8(k.to_vec()).expect("pool keys are ascii");
                    *seen.entry((k, *v)).or_insert(0) += 1;
                }
                prop_assert_eq!(seen, model.multiset());
            }
        }

        // Post-conditions after each op
        // 1) Structural invariants: placement, counters, load threshold
        sut.check_invariants();
        // 2) Size parity
        prop_assert_eq!(sut.len(), model.entries.len());
        prop_assert_eq!(sut.is_empty(), model.entries.is_empty());
        // 3) Capacity never shrinks and only ever doubles
        let now = sut.capacity();
        prop_assert!(now == capacity || now == capacity * 2);
        capacity = now;
        // 4) Destructor saw exactly the destroyed values
        let mut got = destroyed.borrow().clone();
        let mut want = expected_destroyed.clone();
        got.sort_unstable();
        want.sort_unstable();
        prop_assert_eq!(got, want);
    }

    // Teardown destroys everything still stored, exactly once.
    expected_destroyed.extend(model.entries.iter().map(|(_, v)| *v));
    sut.destroy();
    prop_assert_eq!(destroyed.borrow().len(), expected_destroyed.len());
    Ok(())
}

// Property: State-machine equivalence against an insertion-ordered model.
// Invariants exercised across random operation sequences:
// - `put`/`try_put` always append; `len` counts duplicates.
// - `get`/`remove` resolve to the earliest inserted matching entry.
// - `remove` skips the destructor; `remove_and_destroy`, `clean` and
//   `destroy` run it exactly once per entry.
// - Every entry sits in the bucket its cached hash selects; occupied bucket
//   count matches the table and stays below capacity.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario(), cap in 1usize..6) {
        run_scenario(pool, ops, |destructor| {
            Dictionary::builder()
                .initial_capacity(cap)
                .destructor(destructor)
                .build()
                .expect("non-zero capacity")
        })?;
    }
}

// Collision variant using a constant hasher to stress chain unlinking.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: Same state-machine invariants as above, under worst-case
// collision behavior (constant hasher). Every key shares one chain, so
// exact key comparison is the only thing separating them.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_scenario(pool, ops, |destructor| {
            Dictionary::builder()
                .hasher(ConstBuildHasher)
                .key_match(KeyMatch::Exact)
                .destructor(destructor)
                .build()
                .expect("default capacity")
        })?;
    }
}

// Property: under hash-only matching, a lookup returns the first entry in
// the chain whose hash equals the query's, whatever its key bytes.
proptest! {
    #[test]
    fn prop_hash_only_returns_first_hash_hit(keys in proptest::collection::vec("[a-z]{0,3}", 1..20), probe in "[a-z]{0,3}") {
        let mut sut: Dictionary<usize, ConstBuildHasher> = Dictionary::builder()
            .hasher(ConstBuildHasher)
            .key_match(KeyMatch::HashOnly)
            .build()
            .expect("default capacity");
        for (i, k) in keys.iter().enumerate() {
            sut.put(k, i);
        }
        // All keys hash to 0: the chain head always answers.
        prop_assert_eq!(sut.get(&probe), Some(&0));
    }
}
