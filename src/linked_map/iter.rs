use std::iter::FusedIterator;

use super::{Entry, Slot, SlotHandle};

/// Walks a map's entries in insertion order by following the slot links.
/// Runs backwards too, from the youngest entry to the oldest.
#[derive(Debug, Clone)]
pub struct Iter<'m, 'a> {
    pub(crate) slots: &'m [Slot<'a>],
    pub(crate) front: Option<SlotHandle>,
    pub(crate) back: Option<SlotHandle>,
    pub(crate) remaining: usize,
}

impl<'m, 'a> Iterator for Iter<'m, 'a> {
    type Item = Entry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let node = self.front?;
        let slot = &self.slots[node.0];
        self.front = slot.next;
        self.remaining -= 1;

        Some(slot.entry())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'m, 'a> DoubleEndedIterator for Iter<'m, 'a> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let node = self.back?;
        let slot = &self.slots[node.0];
        self.back = slot.prev;
        self.remaining -= 1;

        Some(slot.entry())
    }
}

impl ExactSizeIterator for Iter<'_, '_> {}

impl FusedIterator for Iter<'_, '_> {}
