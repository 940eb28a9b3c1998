//! One-at-a-time key hashing.
//!
//! The dictionary hashes raw key bytes with a 32-bit one-at-a-time mixer.
//! All arithmetic wraps; equal byte strings always hash identically.

use core::hash::{BuildHasher, Hasher};

/// Incremental one-at-a-time hasher.
///
/// `write` performs the per-byte mixing; `finish` applies the final
/// avalanche to a copy of the state, so more bytes may still be written
/// afterwards. The result always fits in 32 bits.
#[derive(Copy, Clone, Debug, Default)]
pub struct OneAtATimeHasher {
    state: u32,
}

impl OneAtATimeHasher {
    pub const fn new() -> Self {
        Self { state: 0 }
    }

    #[inline]
    fn finish32(&self) -> u32 {
        let mut h = self.state;
        h = h.wrapping_add(h << 3);
        h ^= h >> 11;
        h = h.wrapping_add(h << 15);
        h
    }
}

impl Hasher for OneAtATimeHasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        let mut h = self.state;
        for &b in bytes {
            h = h.wrapping_add(b as u32);
            h = h.wrapping_add(h << 10);
            h ^= h >> 6;
        }
        self.state = h;
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.finish32() as u64
    }
}

/// Default `BuildHasher` for `Dictionary`.
#[derive(Copy, Clone, Debug, Default)]
pub struct OneAtATime;

impl BuildHasher for OneAtATime {
    type Hasher = OneAtATimeHasher;
    fn build_hasher(&self) -> Self::Hasher {
        OneAtATimeHasher::new()
    }
}

/// Hash `bytes` with the one-at-a-time algorithm.
pub fn hash_key(bytes: &[u8]) -> u32 {
    let mut h = OneAtATimeHasher::new();
    h.write(bytes);
    h.finish32()
}

/// Hash key bytes with any `BuildHasher`, truncating to 32 bits.
///
/// Bytes go through `Hasher::write` directly; `Hash for str` would append
/// a terminator byte and disagree with `hash_key`.
#[inline]
pub(crate) fn hash_with<S: BuildHasher>(builder: &S, bytes: &[u8]) -> u32 {
    let mut h = builder.build_hasher();
    h.write(bytes);
    h.finish() as u32
}
