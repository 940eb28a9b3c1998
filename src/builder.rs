//! DictionaryBuilder: construction-time configuration.

use crate::dictionary::{Destructor, Dictionary};
use crate::error::DictionaryError;
use crate::hash::OneAtATime;
use core::fmt;
use core::hash::BuildHasher;

/// Bucket count of a dictionary built without an explicit capacity.
pub const DEFAULT_INITIAL_CAPACITY: usize = 20;

/// How a lookup decides that a chain entry matches the queried key.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum KeyMatch {
    /// Cached hash as a pre-filter, then byte-for-byte key comparison.
    #[default]
    Exact,
    /// Cached hash equality alone. Two distinct keys with the same 32-bit
    /// hash are indistinguishable; the first one in the chain wins.
    HashOnly,
}

/// Builder for `Dictionary`.
///
/// ```
/// use chain_dict::{Dictionary, KeyMatch};
///
/// let mut d = Dictionary::builder()
///     .initial_capacity(8)
///     .key_match(KeyMatch::Exact)
///     .destructor(|v: Vec<u8>| drop(v))
///     .build()
///     .unwrap();
/// d.put("k", vec![1, 2, 3]);
/// assert_eq!(d.capacity(), 8);
/// ```
pub struct DictionaryBuilder<V, S = OneAtATime> {
    initial_capacity: usize,
    destructor: Option<Destructor<V>>,
    key_match: KeyMatch,
    hasher: S,
}

impl<V> DictionaryBuilder<V> {
    pub fn new() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            destructor: None,
            key_match: KeyMatch::default(),
            hasher: OneAtATime,
        }
    }
}

impl<V> Default for DictionaryBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, S> DictionaryBuilder<V, S>
where
    S: BuildHasher,
{
    /// Number of buckets allocated up front. Must be non-zero.
    pub fn initial_capacity(mut self, buckets: usize) -> Self {
        self.initial_capacity = buckets;
        self
    }

    /// Function run on a value whenever the dictionary destroys its entry.
    pub fn destructor<F>(mut self, destructor: F) -> Self
    where
        F: FnMut(V) + 'static,
    {
        self.destructor = Some(Box::new(destructor));
        self
    }

    pub fn key_match(mut self, key_match: KeyMatch) -> Self {
        self.key_match = key_match;
        self
    }

    /// Replace the key hasher. Output is truncated to 32 bits.
    pub fn hasher<T>(self, hasher: T) -> DictionaryBuilder<V, T>
    where
        T: BuildHasher,
    {
        DictionaryBuilder {
            initial_capacity: self.initial_capacity,
            destructor: self.destructor,
            key_match: self.key_match,
            hasher,
        }
    }

    pub fn build(self) -> Result<Dictionary<V, S>, DictionaryError> {
        if self.initial_capacity == 0 {
            return Err(DictionaryError::ZeroCapacity);
        }
        let buckets = Dictionary::<V, S>::reserve_buckets(self.initial_capacity)?;
        Ok(Dictionary::from_parts(
            buckets,
            self.destructor,
            self.key_match,
            self.hasher,
        ))
    }
}

impl<V, S: fmt::Debug> fmt::Debug for DictionaryBuilder<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DictionaryBuilder")
            .field("initial_capacity", &self.initial_capacity)
            .field("destructor", &self.destructor.is_some())
            .field("key_match", &self.key_match)
            .field("hasher", &self.hasher)
            .finish()
    }
}
