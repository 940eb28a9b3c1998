mod common;

use chain_dict::{hash_key, Dictionary, OneAtATime};
use common::initialize_logger;
use proptest::prelude::*;
use std::cell::Cell;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hasher};
use std::rc::Rc;

// Property: with distinct keys the dictionary agrees with std's HashMap,
// whatever the starting capacity, and stays sized by its puts.
proptest! {
    #[test]
    fn prop_distinct_keys_match_hashmap(
        keys in proptest::collection::hash_set("[a-zA-Z0-9]{1,12}", 0..300),
        cap in 1usize..64
    ) {
        initialize_logger();
        let mut d = Dictionary::builder().initial_capacity(cap).build().unwrap();
        let mut model = HashMap::new();
        for (i, k) in keys.iter().enumerate() {
            d.put(k, i);
            model.insert(k.clone(), i);
            prop_assert_eq!(d.size(), model.len());
        }
        for (k, v) in &model {
            prop_assert_eq!(d.get(k), Some(v));
        }
        prop_assert!(d.capacity() >= cap);
        prop_assert!(d.occupied_buckets() < d.capacity());
        prop_assert_eq!(d.iter().count(), model.len());
    }
}

// Property: every stored entry is destroyed exactly once, whether by
// clean() part-way through or by the final destroy().
proptest! {
    #[test]
    fn prop_destructor_runs_once_per_entry(
        ops in proptest::collection::vec((any::<bool>(), "[a-c]{1,2}"), 1..200)
    ) {
        let count = Rc::new(Cell::new(0usize));
        let c = count.clone();
        let mut d = Dictionary::with_destructor(move |_v: usize| c.set(c.get() + 1));
        let mut stored = 0usize;
        for (i, (clean, key)) in ops.into_iter().enumerate() {
            if clean && i % 7 == 0 {
                d.clean();
                prop_assert!(d.is_empty());
            } else {
                d.put(&key, i);
                stored += 1;
            }
        }
        d.destroy();
        prop_assert_eq!(count.get(), stored);
    }
}

// Property: feeding key bytes in pieces hashes the same as all at once.
proptest! {
    #[test]
    fn prop_split_writes_hash_alike(
        bytes in proptest::collection::vec(any::<u8>(), 0..64),
        split in any::<prop::sample::Index>()
    ) {
        let at = split.index(bytes.len() + 1);
        let mut h = OneAtATime.build_hasher();
        h.write(&bytes[..at]);
        h.write(&bytes[at..]);
        prop_assert_eq!(h.finish() as u32, hash_key(&bytes));
    }
}
