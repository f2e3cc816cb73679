//! Fixed-capacity hash-indexed cache shared by the transposition table and
//! cached perft.
//!
//! Slots are addressed by `hash % capacity` and every store overwrites the
//! slot unconditionally. Entries carry their own key so a probe can tell a
//! hit from an index collision.

use std::mem::size_of;

use crate::error::CacheError;

/// A value that can live in a [`SizedCache`] slot.
pub trait CacheEntry: Copy + Default {
    /// Full key this entry was stored under. Empty slots may report anything;
    /// callers compare against their own key.
    fn key(&self) -> u64;
}

/// A `Vec` of entries sized from a megabyte budget.
pub struct SizedCache<E: CacheEntry> {
    slots: Vec<E>,
}

impl<E: CacheEntry> SizedCache<E> {
    /// Allocate as many entries as fit in `megabytes` MiB.
    pub fn new(megabytes: usize) -> Result<SizedCache<E>, CacheError> {
        let capacity = Self::capacity_for(megabytes)?;
        Ok(SizedCache { slots: vec![E::default(); capacity] })
    }

    fn capacity_for(megabytes: usize) -> Result<usize, CacheError> {
        let bytes = megabytes.saturating_mul(1024 * 1024);
        let capacity = bytes / size_of::<E>().max(1);
        if capacity == 0 {
            return Err(CacheError::ZeroCapacity { megabytes });
        }
        Ok(capacity)
    }

    /// Reallocate for a new budget. All entries are discarded.
    pub fn resize(&mut self, megabytes: usize) -> Result<(), CacheError> {
        let capacity = Self::capacity_for(megabytes)?;
        self.slots = vec![E::default(); capacity];
        Ok(())
    }

    pub fn clear(&mut self) {
        self.slots.fill(E::default());
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    fn index(&self, hash: u64) -> usize {
        (hash % self.slots.len() as u64) as usize
    }

    /// The entry stored under `key`, if its slot still holds it.
    #[inline]
    pub fn get(&self, hash: u64, key: u64) -> Option<&E> {
        let entry = &self.slots[self.index(hash)];
        (entry.key() == key).then_some(entry)
    }

    /// Overwrite the slot for `hash`.
    #[inline]
    pub fn store(&mut self, hash: u64, entry: E) {
        let index = self.index(hash);
        self.slots[index] = entry;
    }

    /// Permille of sampled slots that differ from an empty entry.
    pub fn hashfull(&self) -> u32
    where
        E: PartialEq,
    {
        let sample = self.slots.len().min(1000);
        let empty = E::default();
        let used = self.slots[..sample].iter().filter(|e| **e != empty).count();
        (used * 1000 / sample) as u32
    }
}
