//! chain-dict: a single-threaded dictionary from byte-string keys to
//! values, built on chained buckets.
//!
//! Internal Design:
//!
//! Summary
//! - `Dictionary<V, S>` owns a bucket array and an arena of entries. Each
//!   bucket is empty or holds the head of a singly-linked chain; links are
//!   arena keys, so tearing down a long chain never recurses.
//! - Each entry owns a copy of its key bytes and caches their 32-bit hash.
//!   Placement, lookup pre-filtering and rehashing use the cached hash; the
//!   hasher is never run again for a stored key.
//!
//! Growth
//! - `put` appends to the tail of its chain. When the number of non-empty
//!   buckets reaches the bucket count, the table doubles and every entry
//!   is re-homed in one pass (chain order is kept, occupied buckets are
//!   recounted). Capacity never shrinks, not even on `remove` or `clean`.
//!
//! Keys
//! - Keys are arbitrary byte strings (`&str`, `String`, `&[u8]`, ...).
//!   `put` never replaces: equal keys coexist and the earliest inserted
//!   one answers `get`/`remove` until it is removed.
//! - `KeyMatch::Exact` (default) compares key bytes after the hash
//!   pre-filter. `KeyMatch::HashOnly` trusts the hash alone, so two keys
//!   with colliding hashes shadow each other.
//!
//! Value ownership
//! - Values are owned by the dictionary while stored. An optional
//!   destructor runs exactly once on each value the dictionary destroys
//!   (`clean`, `destroy`, `remove_and_destroy`, `Drop`); without one,
//!   values are simply dropped. Store `&T` or `Rc<T>` to keep the
//!   underlying data caller-owned.
//! - `remove` hands the value back without running the destructor.
//! - Entries are unlinked before any destructor runs; a panicking
//!   destructor leaves a consistent (possibly emptied) table.
//!
//! Errors and allocation
//! - Lookups signal absence with `None`. `put` aborts on allocator
//!   failure like any `Vec`; `try_put` reserves the grown bucket array
//!   first and returns `DictionaryError::AllocationFailed` with the value
//!   if that fails, leaving the table untouched.
//!
//! Notes and non-goals
//! - Single-threaded: the destructor slot is a non-`Send` boxed closure,
//!   which keeps the dictionary `!Send`/`!Sync`.
//! - Every iterator (`iter`, `iter_mut`, `keys`, `values`, `for_each`)
//!   walks bucket order then chain order. Iterators borrow the
//!   dictionary, so it cannot be mutated mid-iteration.
//! - Logging goes through the `log` facade (`debug!` on resize and clean,
//!   `trace!` on destroying removals); no logger is installed here.

mod builder;
mod dictionary;
mod dictionary_proptest;
mod error;
pub mod hash;
pub mod iter;

// Public surface
pub use builder::{DictionaryBuilder, KeyMatch, DEFAULT_INITIAL_CAPACITY};
pub use dictionary::{Destructor, Dictionary};
pub use error::DictionaryError;
pub use hash::{hash_key, OneAtATime};
