//! Dictionary: byte-string keys, chained buckets, doubling growth.
//!
//! Entries live in a `SlotMap` arena; bucket heads and chain links are
//! arena keys. A bucket is either empty or holds the head of a
//! singly-linked chain whose entries all map to that bucket under the
//! current capacity.

use crate::builder::{DictionaryBuilder, KeyMatch, DEFAULT_INITIAL_CAPACITY};
use crate::error::DictionaryError;
use crate::hash::{hash_with, OneAtATime};
use crate::iter::{Iter, IterMut, Keys, Values};
use core::fmt;
use core::hash::BuildHasher;
use log::{debug, trace};
use slotmap::{DefaultKey, SlotMap};

/// Function run on a value when the dictionary destroys its entry.
pub type Destructor<V> = Box<dyn FnMut(V)>;

pub(crate) type Bucket = Option<DefaultKey>;

#[derive(Debug)]
pub(crate) struct Entry<V> {
    pub(crate) key: Box<[u8]>,
    pub(crate) value: V,
    pub(crate) hash: u32,
    pub(crate) next: Option<DefaultKey>,
}

/// A hash dictionary from byte-string keys to values.
///
/// - `put` always appends; equal keys produce separate entries and the
///   earliest one shadows the rest on lookup.
/// - The table doubles once the number of non-empty buckets reaches the
///   bucket count. It never shrinks.
/// - An optional destructor runs exactly once on every value the
///   dictionary destroys (`clean`, `destroy`, `remove_and_destroy`, drop).
///   Values handed back by `remove` skip it.
pub struct Dictionary<V, S = OneAtATime> {
    buckets: Vec<Bucket>,
    slots: SlotMap<DefaultKey, Entry<V>>,
    occupied: usize,
    destructor: Option<Destructor<V>>,
    key_match: KeyMatch,
    hasher: S,
}

impl<V> Dictionary<V> {
    pub fn new() -> Self {
        Self::from_parts(
            vec![None; DEFAULT_INITIAL_CAPACITY],
            None,
            KeyMatch::default(),
            OneAtATime,
        )
    }

    /// Dictionary whose destroyed values are passed to `destructor`.
    pub fn with_destructor<F>(destructor: F) -> Self
    where
        F: FnMut(V) + 'static,
    {
        let mut d = Self::new();
        d.destructor = Some(Box::new(destructor));
        d
    }

    pub fn builder() -> DictionaryBuilder<V> {
        DictionaryBuilder::new()
    }
}

impl<V> Default for Dictionary<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, S> Dictionary<V, S> {
    pub(crate) fn from_parts(
        buckets: Vec<Bucket>,
        destructor: Option<Destructor<V>>,
        key_match: KeyMatch,
        hasher: S,
    ) -> Self {
        debug_assert!(!buckets.is_empty());
        Self {
            buckets,
            slots: SlotMap::with_key(),
            occupied: 0,
            destructor,
            key_match,
            hasher,
        }
    }

    pub(crate) fn reserve_buckets(n: usize) -> Result<Vec<Bucket>, DictionaryError> {
        let mut buckets = Vec::new();
        buckets
            .try_reserve_exact(n)
            .map_err(|source| DictionaryError::AllocationFailed {
                requested: n,
                source,
            })?;
        buckets.resize(n, None);
        Ok(buckets)
    }

    /// Number of stored entries, duplicates included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Alias of `len`.
    pub fn size(&self) -> usize {
        self.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Current bucket count.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Number of buckets holding a non-empty chain.
    pub fn occupied_buckets(&self) -> usize {
        self.occupied
    }

    pub fn key_match(&self) -> KeyMatch {
        self.key_match
    }

    pub fn has_destructor(&self) -> bool {
        self.destructor.is_some()
    }

    /// Destroy every entry, keeping the current capacity.
    ///
    /// The table is emptied before the first destructor runs, so a
    /// panicking destructor leaves an empty, usable dictionary (values not
    /// yet visited are dropped without the destructor).
    pub fn clean(&mut self) {
        let entries = self.slots.len();
        self.buckets.fill(None);
        self.occupied = 0;

        let destructor = &mut self.destructor;
        for (_, entry) in self.slots.drain() {
            dispose(destructor, entry.value);
        }
        if entries > 0 {
            debug!(
                "dictionary cleaned: {} entries destroyed, {} buckets kept",
                entries,
                self.buckets.len()
            );
        }
    }

    /// Destroy every entry and release the table.
    pub fn destroy(mut self) {
        self.clean();
    }

    /// Visit every entry in bucket order, then chain order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(&self.buckets, &self.slots)
    }

    /// Mutable visit of every entry, in the same order as `iter`.
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut::new(&self.buckets, &mut self.slots)
    }

    pub fn keys(&self) -> Keys<'_, V> {
        Keys::new(self.iter())
    }

    pub fn values(&self) -> Values<'_, V> {
        Values::new(self.iter())
    }

    /// Call `f` on every key and value.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&[u8], &V),
    {
        for (k, v) in self.iter() {
            f(k, v);
        }
    }

    fn chain_tail(&self, mut at: DefaultKey) -> DefaultKey {
        while let Some(next) = self.slots[at].next {
            at = next;
        }
        at
    }

    /// Append `k` to bucket `index`, counting the bucket if it was empty.
    fn attach(&mut self, index: usize, k: DefaultKey) {
        match self.buckets[index] {
            None => {
                self.buckets[index] = Some(k);
                self.occupied += 1;
            }
            Some(head) => {
                let tail = self.chain_tail(head);
                self.slots[tail].next = Some(k);
            }
        }
    }

    /// Re-home every entry into `grown`, recounting occupied buckets.
    fn rehash(&mut self, grown: Vec<Bucket>) {
        let old_capacity = self.buckets.len();
        let new_capacity = grown.len();
        let old = core::mem::replace(&mut self.buckets, grown);
        self.occupied = 0;

        for head in old {
            let mut cursor = head;
            while let Some(k) = cursor {
                let entry = &mut self.slots[k];
                cursor = entry.next.take();
                let index = entry.hash as usize % new_capacity;
                self.attach(index, k);
            }
        }
        debug!(
            "dictionary resized: {} -> {} buckets, {} entries in {} buckets",
            old_capacity,
            new_capacity,
            self.slots.len(),
            self.occupied
        );
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self)
    where
        S: BuildHasher,
    {
        let mut reachable = 0;
        let mut occupied = 0;
        for (i, bucket) in self.buckets.iter().enumerate() {
            if bucket.is_some() {
                occupied += 1;
            }
            let mut cursor = *bucket;
            while let Some(k) = cursor {
                let entry = &self.slots[k];
                assert_eq!(entry.hash, hash_with(&self.hasher, &entry.key));
                assert_eq!(entry.hash as usize % self.buckets.len(), i);
                reachable += 1;
                cursor = entry.next;
            }
        }
        assert_eq!(reachable, self.slots.len(), "every entry is reachable");
        assert_eq!(occupied, self.occupied, "occupied bucket count");
        assert!(self.occupied < self.buckets.len(), "load below threshold");
    }
}

impl<V, S> Dictionary<V, S>
where
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_parts(
            vec![None; DEFAULT_INITIAL_CAPACITY],
            None,
            KeyMatch::default(),
            hasher,
        )
    }

    fn make_hash(&self, key: &[u8]) -> u32 {
        hash_with(&self.hasher, key)
    }

    fn bucket_index(&self, hash: u32) -> usize {
        hash as usize % self.buckets.len()
    }

    fn matches(&self, entry: &Entry<V>, hash: u32, key: &[u8]) -> bool {
        entry.hash == hash
            && match self.key_match {
                KeyMatch::Exact => *entry.key == *key,
                KeyMatch::HashOnly => true,
            }
    }

    /// Link a new entry at the tail of its chain. Does not resize.
    fn link(&mut self, key: &[u8], hash: u32, value: V) {
        let index = self.bucket_index(hash);
        let k = self.slots.insert(Entry {
            key: key.into(),
            value,
            hash,
            next: None,
        });
        self.attach(index, k);
    }

    /// Store `value` under a copy of `key`.
    ///
    /// Never replaces: an equal key already present stays, and the new
    /// entry goes behind it in the chain. May double the table.
    pub fn put<Q>(&mut self, key: &Q, value: V)
    where
        Q: ?Sized + AsRef<[u8]>,
    {
        let key: &[u8] = key.as_ref();
        let hash = self.make_hash(key);
        self.link(key, hash, value);
        if self.occupied >= self.buckets.len() {
            let grown = vec![None; self.buckets.len() * 2];
            self.rehash(grown);
        }
    }

    /// Like `put`, but the grown bucket array is allocated fallibly before
    /// anything is linked. On failure the dictionary is unchanged and
    /// `value` is handed back.
    pub fn try_put<Q>(&mut self, key: &Q, value: V) -> Result<(), (V, DictionaryError)>
    where
        Q: ?Sized + AsRef<[u8]>,
    {
        self.try_put_with(key.as_ref(), value, Self::reserve_buckets)
    }

    /// `try_put` with the grown bucket array obtained from `reserve`.
    pub(crate) fn try_put_with<R>(
        &mut self,
        key: &[u8],
        value: V,
        reserve: R,
    ) -> Result<(), (V, DictionaryError)>
    where
        R: FnOnce(usize) -> Result<Vec<Bucket>, DictionaryError>,
    {
        let hash = self.make_hash(key);
        let index = self.bucket_index(hash);
        let grows = self.buckets[index].is_none() && self.occupied + 1 >= self.buckets.len();
        let grown = if grows {
            match reserve(self.buckets.len() * 2) {
                Ok(b) => Some(b),
                Err(e) => return Err((value, e)),
            }
        } else {
            None
        };

        self.link(key, hash, value);
        if let Some(grown) = grown {
            self.rehash(grown);
        }
        Ok(())
    }

    fn find(&self, key: &[u8]) -> Option<DefaultKey> {
        let hash = self.make_hash(key);
        let mut cursor = self.buckets[self.bucket_index(hash)];
        while let Some(k) = cursor {
            let entry = &self.slots[k];
            if self.matches(entry, hash, key) {
                return Some(k);
            }
            cursor = entry.next;
        }
        None
    }

    /// Value of the first chain entry matching `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: ?Sized + AsRef<[u8]>,
    {
        let k = self.find(key.as_ref())?;
        self.slots.get(k).map(|e| &e.value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: ?Sized + AsRef<[u8]>,
    {
        let k = self.find(key.as_ref())?;
        self.slots.get_mut(k).map(|e| &mut e.value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + AsRef<[u8]>,
    {
        self.find(key.as_ref()).is_some()
    }

    /// Detach the first entry matching `key` from its chain.
    fn unlink(&mut self, key: &[u8]) -> Option<Entry<V>> {
        let hash = self.make_hash(key);
        let index = self.bucket_index(hash);
        let mut prev: Option<DefaultKey> = None;
        let mut cursor = self.buckets[index];

        while let Some(k) = cursor {
            let entry = &self.slots[k];
            let next = entry.next;
            if self.matches(entry, hash, key) {
                match prev {
                    Some(p) => self.slots[p].next = next,
                    None => {
                        self.buckets[index] = next;
                        if next.is_none() {
                            self.occupied -= 1;
                        }
                    }
                }
                return self.slots.remove(k);
            }
            prev = Some(k);
            cursor = next;
        }
        None
    }

    /// Remove the first entry matching `key` and return its value. The
    /// destructor is not run; the caller owns the value again.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        Q: ?Sized + AsRef<[u8]>,
    {
        self.unlink(key.as_ref()).map(|e| e.value)
    }

    /// Remove the first entry matching `key` and destroy its value.
    /// Returns whether an entry was found.
    pub fn remove_and_destroy<Q>(&mut self, key: &Q) -> bool
    where
        Q: ?Sized + AsRef<[u8]>,
    {
        match self.unlink(key.as_ref()) {
            Some(entry) => {
                trace!(
                    "destroying entry {:?}",
                    String::from_utf8_lossy(&entry.key)
                );
                dispose(&mut self.destructor, entry.value);
                true
            }
            None => false,
        }
    }
}

fn dispose<V>(destructor: &mut Option<Destructor<V>>, value: V) {
    match destructor {
        Some(f) => f(value),
        None => drop(value),
    }
}

impl<V, S> Drop for Dictionary<V, S> {
    fn drop(&mut self) {
        self.clean();
    }
}

impl<V: fmt::Debug, S> fmt::Debug for Dictionary<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(k, v)| (String::from_utf8_lossy(k), v)))
            .finish()
    }
}
