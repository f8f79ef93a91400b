pub mod iter;
pub mod linked_hash_map;

pub use iter::Iter;
pub use linked_hash_map::LinkedHashMap;

/// The fewest slots a map will ever have. Capacities are always a power of
/// two at least this large.
pub const MIN_CAPACITY: usize = 16;

/// Index of a slot in the map's slot array.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct SlotHandle(pub(crate) usize);

/// One cell of the slot array. When `occupied` is false the rest of the
/// fields are leftovers and mean nothing.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Slot<'a> {
    pub(crate) key: &'a [u8],
    pub(crate) value: &'a [u8],
    pub(crate) occupied: bool,

    /// The slot inserted just before this one.
    pub(crate) prev: Option<SlotHandle>,

    /// The slot inserted just after this one.
    pub(crate) next: Option<SlotHandle>,
}

impl<'a> Slot<'a> {
    pub(crate) fn entry(&self) -> Entry<'a> {
        Entry {
            key: self.key,
            value: self.value,
        }
    }
}

/// A key-value pair handed back by the map. This only borrows the caller's
/// bytes, so it's cheap to copy and stays valid after the map changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entry<'a> {
    pub key: &'a [u8],
    pub value: &'a [u8],
}

impl<'a> From<(&'a [u8], &'a [u8])> for Entry<'a> {
    fn from((key, value): (&'a [u8], &'a [u8])) -> Self {
        Entry { key, value }
    }
}
