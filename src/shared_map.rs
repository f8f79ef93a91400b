use parking_lot::RwLock;
use std::{hash::BuildHasher, sync::Arc};

use crate::{
    byte_hasher::BuildByteSumHasher,
    linked_map::{Entry, LinkedHashMap},
};

/// Wrapper for a LinkedHashMap which is shareable across thread boundaries.
/// The map itself has no idea about threads; this puts the whole thing behind
/// one lock, since even a read can't overlap a set or pop that might be busy
/// reallocating the slots underneath it.
pub struct SharedLinkedHashMap<'a, S = BuildByteSumHasher>(
    Arc<RwLock<LinkedHashMap<'a, S>>>,
)
where
    S: BuildHasher;

impl<'a, S> SharedLinkedHashMap<'a, S>
where
    S: BuildHasher,
{
    /// Wraps a map into a shared accessor, making it safe to move across
    /// thread boundaries.
    pub fn with_map(map: LinkedHashMap<'a, S>) -> Self {
        Self(Arc::new(RwLock::new(map)))
    }

    /// Sets a value, returning the entry that was there before.
    pub fn set(&self, key: &'a [u8], value: &'a [u8]) -> Option<Entry<'a>> {
        self.0.write().set(key, value)
    }

    /// Gets an entry. Entries only borrow the caller's bytes, so this holds
    /// the lock just long enough to look.
    pub fn get(&self, key: &[u8]) -> Option<Entry<'a>> {
        self.0.read().get(key)
    }

    /// Removes a key, returning the entry it had.
    pub fn pop(&self, key: &[u8]) -> Option<Entry<'a>> {
        self.0.write().pop(key)
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        self.0.read().contains(key)
    }

    /// A snapshot of every entry in insertion order.
    pub fn entries(&self) -> Vec<Entry<'a>> {
        self.0.read().entries()
    }

    /// Clears the map.
    pub fn clear(&self) {
        self.0.write().clear()
    }

    /// The number of entries in the map at present.
    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Runs `f` against the map under the read lock, for anything that needs
    /// a consistent view across more than one call.
    pub fn read<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&LinkedHashMap<'a, S>) -> R,
    {
        f(&self.0.read())
    }

    /// Runs `f` against the map under the write lock.
    pub fn write<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut LinkedHashMap<'a, S>) -> R,
    {
        f(&mut self.0.write())
    }
}

impl<'a, S> Clone for SharedLinkedHashMap<'a, S>
where
    S: BuildHasher,
{
    fn clone(&self) -> Self {
        SharedLinkedHashMap(self.0.clone())
    }
}
