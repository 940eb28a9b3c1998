//! Borrowing iterators over `Dictionary` entries.
//!
//! Every iterator borrows the dictionary, so the table cannot change while
//! one is alive.

use crate::dictionary::{Bucket, Entry};
use core::iter::FusedIterator;
use slotmap::{DefaultKey, SecondaryMap, SlotMap};

/// Walks the bucket array in order and each chain from its head.
pub struct Iter<'a, V> {
    buckets: core::slice::Iter<'a, Bucket>,
    cursor: Option<DefaultKey>,
    slots: &'a SlotMap<DefaultKey, Entry<V>>,
    remaining: usize,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(buckets: &'a [Bucket], slots: &'a SlotMap<DefaultKey, Entry<V>>) -> Self {
        Self {
            buckets: buckets.iter(),
            cursor: None,
            slots,
            remaining: slots.len(),
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a [u8], &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(k) = self.cursor {
                let slots = self.slots;
                let entry = &slots[k];
                self.cursor = entry.next;
                self.remaining -= 1;
                return Some((&*entry.key, &entry.value));
            }
            self.cursor = *self.buckets.next()?;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}
impl<V> FusedIterator for Iter<'_, V> {}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            cursor: self.cursor,
            slots: self.slots,
            remaining: self.remaining,
        }
    }
}

/// Mutable access to every value, in bucket order then chain order.
///
/// The walk order is fixed up front from the chain links; the arena's
/// mutable references are then handed out one key at a time.
pub struct IterMut<'a, V> {
    order: std::vec::IntoIter<DefaultKey>,
    entries: SecondaryMap<DefaultKey, &'a mut Entry<V>>,
}

impl<'a, V> IterMut<'a, V> {
    pub(crate) fn new(buckets: &[Bucket], slots: &'a mut SlotMap<DefaultKey, Entry<V>>) -> Self {
        let mut order = Vec::with_capacity(slots.len());
        for bucket in buckets {
            let mut cursor = *bucket;
            while let Some(k) = cursor {
                order.push(k);
                cursor = slots[k].next;
            }
        }
        let mut entries = SecondaryMap::with_capacity(slots.len());
        for (k, e) in slots.iter_mut() {
            entries.insert(k, e);
        }
        Self {
            order: order.into_iter(),
            entries,
        }
    }
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = (&'a [u8], &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.order.next()?;
        self.entries
            .remove(k)
            .map(|e| (&*e.key, &mut e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}
impl<V> FusedIterator for IterMut<'_, V> {}

pub struct Keys<'a, V> {
    inner: Iter<'a, V>,
}

impl<'a, V> Keys<'a, V> {
    pub(crate) fn new(inner: Iter<'a, V>) -> Self {
        Self { inner }
    }
}

impl<'a, V> Iterator for Keys<'a, V> {
    type Item = &'a [u8];

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Keys<'_, V> {}
impl<V> FusedIterator for Keys<'_, V> {}

impl<V> Clone for Keys<'_, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

pub struct Values<'a, V> {
    inner: Iter<'a, V>,
}

impl<'a, V> Values<'a, V> {
    pub(crate) fn new(inner: Iter<'a, V>) -> Self {
        Self { inner }
    }
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Values<'_, V> {}
impl<V> FusedIterator for Values<'_, V> {}

impl<V> Clone for Values<'_, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, V, S> IntoIterator for &'a crate::Dictionary<V, S> {
    type Item = (&'a [u8], &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, V, S> IntoIterator for &'a mut crate::Dictionary<V, S> {
    type Item = (&'a [u8], &'a mut V);
    type IntoIter = IterMut<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
