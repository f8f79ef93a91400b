use super::{Entry, Iter, Slot, SlotHandle, MIN_CAPACITY};
use crate::{
    byte_hasher::BuildByteSumHasher, error::TableError, order_list::OrderList,
};
use log::{debug, trace, warn};
use std::{
    fmt,
    hash::{BuildHasher, Hasher},
};

/// Where a linear probe for a key came to rest.
enum Probe {
    /// The key lives in this slot.
    Occupied(SlotHandle),

    /// The key isn't in the map. This is the free slot it would go in.
    Vacant(SlotHandle),

    /// Every slot was looked at and none was free or matching.
    Exhausted,
}

/// An open-addressing hash table whose occupied slots are also linked
/// together in the order their keys were first inserted.
///
/// Keys and values are borrowed byte slices. The map never copies or frees
/// the bytes behind them, it only keeps its own slot array, so whatever owns
/// the bytes has to outlive the map. Keys are compared by content, so a
/// lookup doesn't need the exact slice that was inserted, just one with the
/// same bytes.
///
/// Lookup, insertion and removal by key are O(1) on average. Anything that
/// works by position (`get_by_index`, `get_index`) walks the insertion list
/// and is O(n).
pub struct LinkedHashMap<'a, S = BuildByteSumHasher>
where
    S: BuildHasher,
{
    hash_builder: S,
    slots: Vec<Slot<'a>>,
    order: OrderList,
    length: usize,
}

impl<'a> LinkedHashMap<'a, BuildByteSumHasher> {
    /// Makes an empty map with the minimum number of slots.
    pub fn new() -> Self {
        LinkedHashMap::with_capacity(MIN_CAPACITY)
    }

    /// Makes an empty map with room for at least `capacity` slots. The slot
    /// count is rounded up to a power of two no smaller than [`MIN_CAPACITY`].
    pub fn with_capacity(capacity: usize) -> Self {
        LinkedHashMap::with_capacity_and_hasher(capacity, BuildByteSumHasher)
    }

    /// Like [`with_capacity`](Self::with_capacity), but hands back an error
    /// instead of panicking when the slots can't be had.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TableError> {
        LinkedHashMap::try_with_capacity_and_hasher(
            capacity,
            BuildByteSumHasher,
        )
    }
}

impl<'a, S> LinkedHashMap<'a, S>
where
    S: BuildHasher,
{
    pub fn with_hasher(hash_builder: S) -> Self {
        LinkedHashMap::with_capacity_and_hasher(MIN_CAPACITY, hash_builder)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        match LinkedHashMap::try_with_capacity_and_hasher(capacity, hash_builder)
        {
            Ok(map) => map,
            Err(e) => panic!("couldn't allocate linked hash map: {}", e),
        }
    }

    pub fn try_with_capacity_and_hasher(
        capacity: usize,
        hash_builder: S,
    ) -> Result<Self, TableError> {
        let capacity = slot_count(capacity)?;

        Ok(Self {
            hash_builder,
            slots: allocate_slots(capacity)?,
            order: OrderList::new(),
            length: 0,
        })
    }

    /// The number of entries in the map.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The number of slots in the map. Always a power of two.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Iterates over the entries from oldest to youngest.
    pub fn iter(&self) -> Iter<'_, 'a> {
        Iter {
            slots: &self.slots,
            front: self.order.head,
            back: self.order.tail,
            remaining: self.length,
        }
    }

    /// Every key, in insertion order.
    pub fn keys(&self) -> Vec<&'a [u8]> {
        self.iter().map(|entry| entry.key).collect()
    }

    /// Every value, in the insertion order of their keys.
    pub fn values(&self) -> Vec<&'a [u8]> {
        self.iter().map(|entry| entry.value).collect()
    }

    /// Every entry, in insertion order.
    pub fn entries(&self) -> Vec<Entry<'a>> {
        self.iter().collect()
    }

    pub fn get(&self, key: &[u8]) -> Option<Entry<'a>> {
        self.find(key).map(|node| self.slots[node.0].entry())
    }

    /// Gets the entry at a position in insertion order. This walks the list
    /// from the front, so it's O(index) rather than the O(1) of [`get`].
    ///
    /// [`get`]: Self::get
    pub fn get_by_index(&self, index: usize) -> Option<Entry<'a>> {
        self.iter().nth(index)
    }

    /// Gets the insertion-order position of a key. O(n), as it has to walk
    /// the list to count.
    pub fn get_index(&self, key: &[u8]) -> Option<usize> {
        self.find(key)?;
        self.iter().position(|entry| entry.key == key)
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        self.find(key).is_some()
    }

    /// Sets the value for a key, returning the entry that was there before.
    /// A key that's already present keeps its place in the insertion order;
    /// only its value changes. New keys go on the end.
    ///
    /// # Panics
    ///
    /// If the map needs to grow and can't. See [`try_set`](Self::try_set).
    pub fn set(
        &mut self,
        key: &'a [u8],
        value: &'a [u8],
    ) -> Option<Entry<'a>> {
        match self.try_set(key, value) {
            Ok(previous) => previous,
            Err(e) => panic!("couldn't grow linked hash map: {}", e),
        }
    }

    /// Sets the value for a key, returning the entry that was there before.
    /// Fails only if the slot array has to grow and no memory can be had for
    /// it, in which case the map is left as it was.
    pub fn try_set(
        &mut self,
        key: &'a [u8],
        value: &'a [u8],
    ) -> Result<Option<Entry<'a>>, TableError> {
        loop {
            match self.probe(key) {
                Probe::Occupied(node) => {
                    let slot = &mut self.slots[node.0];
                    let previous = slot.entry();
                    slot.value = value;

                    return Ok(Some(previous));
                }
                Probe::Vacant(node) => {
                    let slot = &mut self.slots[node.0];
                    slot.key = key;
                    slot.value = value;
                    slot.occupied = true;

                    self.order.push_back(&mut self.slots, node);
                    self.length += 1;

                    #[cfg(test)]
                    self.continuity_test();

                    return Ok(None);
                }
                // no room anywhere, so make some and try again
                Probe::Exhausted => self.grow()?,
            }
        }
    }

    /// Removes a key from the map, handing back the entry it had.
    pub fn pop(&mut self, key: &[u8]) -> Option<Entry<'a>> {
        #[cfg(test)]
        let original_len = self.len();

        let node = self.find(key)?;
        let removed = self.slots[node.0].entry();

        self.order.unlink(&mut self.slots, node);
        self.slots[node.0].occupied = false;
        self.length -= 1;
        self.close_gap(node);

        if self.length <= self.capacity() / 2 && self.capacity() > MIN_CAPACITY
        {
            // the old slots are still intact if this fails
            if let Err(e) = self.shrink() {
                warn!("keeping {} slots after failed shrink: {}", self.capacity(), e);
            }
        }

        #[cfg(test)]
        {
            assert_eq!(original_len - 1, self.len());
            self.continuity_test();
        }

        Some(removed)
    }

    /// Removes a key from the map, not caring what it held.
    pub fn delete(&mut self, key: &[u8]) {
        self.pop(key);
    }

    /// Empties the map and goes back to the minimum number of slots.
    pub fn clear(&mut self) {
        trace!("clearing {} entries from {} slots", self.length, self.capacity());

        self.slots = vec![Slot::default(); MIN_CAPACITY];
        self.order.clear();
        self.length = 0;

        #[cfg(test)]
        {
            assert_eq!(0, self.len());
            self.continuity_test();
        }
    }

    /// Calls `f` with every key and value, oldest first.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&'a [u8], &'a [u8]),
    {
        for entry in self.iter() {
            f(entry.key, entry.value);
        }
    }

    /// True if both maps hold the same keys with the same value bytes, no
    /// matter what order they went in.
    pub fn equal<T>(&self, other: &LinkedHashMap<'_, T>) -> bool
    where
        T: BuildHasher,
    {
        self.len() == other.len()
            && self.iter().all(|mine| {
                other
                    .get(mine.key)
                    .map_or(false, |theirs| theirs.value == mine.value)
            })
    }

    /// True if both maps hold the same keys and values in the same order.
    pub fn equal_ordered<T>(&self, other: &LinkedHashMap<'_, T>) -> bool
    where
        T: BuildHasher,
    {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(mine, theirs)| {
                    mine.key == theirs.key && mine.value == theirs.value
                })
    }

    /// Makes a new map holding the same entries in the same order. The new
    /// map borrows the same bytes, nothing behind the slices is duplicated.
    pub fn copy(&self) -> Self
    where
        S: Clone,
    {
        let mut copy = LinkedHashMap::with_hasher(self.hash_builder.clone());
        copy.extend(self);
        copy
    }

    fn bucket(&self, key: &[u8]) -> usize {
        let mut h = self.hash_builder.build_hasher();
        h.write(key);
        (h.finish() % self.capacity() as u64) as usize
    }

    /// Linear probe starting at the key's bucket. Stops on the key itself or
    /// on the first free slot, whichever turns up first.
    fn probe(&self, key: &[u8]) -> Probe {
        let capacity = self.capacity();
        let start = self.bucket(key);

        for i in 0..capacity {
            let idx = (start + i) % capacity;
            let slot = &self.slots[idx];

            if !slot.occupied {
                return Probe::Vacant(SlotHandle(idx));
            }

            if slot.key == key {
                return Probe::Occupied(SlotHandle(idx));
            }
        }

        Probe::Exhausted
    }

    fn find(&self, key: &[u8]) -> Option<SlotHandle> {
        match self.probe(key) {
            Probe::Occupied(node) => Some(node),
            Probe::Vacant(_) | Probe::Exhausted => None,
        }
    }

    /// Lookups stop at the first free slot, so a hole in the middle of a
    /// cluster would hide everything probed past it. Walk the rest of the
    /// cluster and pull back each slot whose home bucket is at or before the
    /// hole, keeping its place in the insertion order.
    fn close_gap(&mut self, mut hole: SlotHandle) {
        let capacity = self.capacity();
        let mut cursor = hole.0;

        loop {
            cursor = (cursor + 1) % capacity;

            if !self.slots[cursor].occupied {
                break;
            }

            let home = self.bucket(self.slots[cursor].key);
            let displacement = (cursor + capacity - home) % capacity;
            let distance_to_hole = (cursor + capacity - hole.0) % capacity;

            if displacement >= distance_to_hole {
                self.slots[hole.0] = self.slots[cursor];
                self.slots[cursor].occupied = false;
                self.order
                    .relocate(&mut self.slots, SlotHandle(cursor), hole);
                hole = SlotHandle(cursor);
            }
        }
    }

    fn grow(&mut self) -> Result<(), TableError> {
        let new_capacity = self
            .capacity()
            .checked_mul(2)
            .ok_or(TableError::CapacityOverflow)?;

        debug!(
            "growing linked hash map from {} to {} slots with {} entries",
            self.capacity(),
            new_capacity,
            self.length
        );

        self.resize(new_capacity)
    }

    fn shrink(&mut self) -> Result<(), TableError> {
        let new_capacity = (self.capacity() / 2).max(MIN_CAPACITY);

        debug!(
            "shrinking linked hash map from {} to {} slots with {} entries",
            self.capacity(),
            new_capacity,
            self.length
        );

        self.resize(new_capacity)
    }

    /// Moves every entry into a fresh slot array. Entries are replayed
    /// through `try_set` in insertion order, which rehashes them for the new
    /// size and rebuilds the order list from nothing. The new array is
    /// allocated before anything is touched.
    fn resize(&mut self, new_capacity: usize) -> Result<(), TableError> {
        let live = self.entries();
        let slots = allocate_slots(new_capacity)?;

        self.slots = slots;
        self.order.clear();
        self.length = 0;

        for entry in &live {
            self.try_set(entry.key, entry.value)?;
        }

        #[cfg(test)]
        {
            assert_eq!(live, self.entries());
            self.continuity_test();
        }

        Ok(())
    }

    #[cfg(test)]
    fn continuity_test(&self) {
        let mut count = 0;
        let mut prev = None;
        let mut cursor = self.order.head;

        // walk the links by hand and make sure they agree with the slots
        while let Some(node) = cursor {
            let slot = &self.slots[node.0];
            assert!(slot.occupied, "linked slot isn't occupied");
            assert_eq!(prev, slot.prev, "back link doesn't match");
            assert_eq!(
                Some(node),
                self.find(slot.key),
                "linked key can't be found by probing"
            );

            count = count + 1;
            assert!(count <= self.len());

            prev = cursor;
            cursor = slot.next;
        }

        assert_eq!(prev, self.order.tail);
        assert_eq!(self.len(), count);
        assert_eq!(
            self.len(),
            self.slots.iter().filter(|slot| slot.occupied).count()
        );
        assert!(self.capacity().is_power_of_two());
        assert!(self.capacity() >= MIN_CAPACITY);
        assert!(self.len() <= self.capacity());
    }
}

/// Rounds a requested slot count up to one the map can use.
fn slot_count(requested: usize) -> Result<usize, TableError> {
    requested
        .max(MIN_CAPACITY)
        .checked_next_power_of_two()
        .ok_or(TableError::CapacityOverflow)
}

fn allocate_slots<'a>(capacity: usize) -> Result<Vec<Slot<'a>>, TableError> {
    let mut slots = Vec::new();
    slots.try_reserve_exact(capacity)?;
    slots.resize(capacity, Slot::default());
    Ok(slots)
}

impl<'a> Default for LinkedHashMap<'a, BuildByteSumHasher> {
    fn default() -> Self {
        LinkedHashMap::new()
    }
}

impl<'a, S> Clone for LinkedHashMap<'a, S>
where
    S: BuildHasher + Clone,
{
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl<'a, 'b, S, T> PartialEq<LinkedHashMap<'b, T>> for LinkedHashMap<'a, S>
where
    S: BuildHasher,
    T: BuildHasher,
{
    fn eq(&self, other: &LinkedHashMap<'b, T>) -> bool {
        self.equal(other)
    }
}

impl<'a, S> Eq for LinkedHashMap<'a, S> where S: BuildHasher {}

impl<'a, S> fmt::Debug for LinkedHashMap<'a, S>
where
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|entry| (entry.key, entry.value)))
            .finish()
    }
}

impl<'m, 'a, S> IntoIterator for &'m LinkedHashMap<'a, S>
where
    S: BuildHasher,
{
    type Item = Entry<'a>;
    type IntoIter = Iter<'m, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Sets every entry in turn. Keys already in the map keep their place and
/// take the new value; the rest are appended in the order they come.
impl<'a, S> Extend<Entry<'a>> for LinkedHashMap<'a, S>
where
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = Entry<'a>>>(&mut self, iter: I) {
        for entry in iter {
            self.set(entry.key, entry.value);
        }
    }
}

impl<'a, S> Extend<(&'a [u8], &'a [u8])> for LinkedHashMap<'a, S>
where
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (&'a [u8], &'a [u8])>>(&mut self, iter: I) {
        self.extend(iter.into_iter().map(Entry::from));
    }
}

impl<'a, S> FromIterator<Entry<'a>> for LinkedHashMap<'a, S>
where
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = Entry<'a>>>(iter: I) -> Self {
        let mut map = LinkedHashMap::with_hasher(S::default());
        map.extend(iter);
        map
    }
}

impl<'a, S> FromIterator<(&'a [u8], &'a [u8])> for LinkedHashMap<'a, S>
where
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (&'a [u8], &'a [u8])>>(iter: I) -> Self {
        iter.into_iter().map(Entry::from).collect()
    }
}
