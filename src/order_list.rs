//! A doubly linked list threaded through the map's slot array. The list owns
//! nothing, it only remembers which slots came first and last, and each slot
//! carries the handles of its neighbours. Walking it from the head visits the
//! occupied slots in the order their keys were first inserted.

use crate::linked_map::{Slot, SlotHandle};

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct OrderList {
    /// The oldest slot in the list.
    pub(crate) head: Option<SlotHandle>,

    /// The youngest slot in the list.
    pub(crate) tail: Option<SlotHandle>,
}

impl OrderList {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Links the slot at `node` onto the back of the list.
    pub(crate) fn push_back(&mut self, slots: &mut [Slot<'_>], node: SlotHandle) {
        slots[node.0].prev = self.tail;
        slots[node.0].next = None;

        match self.tail {
            Some(tail) => slots[tail.0].next = Some(node),
            None => self.head = Some(node),
        }

        self.tail = Some(node);
    }

    /// Splices the slot at `node` out of the chain. The slot's own links are
    /// left alone; it's up to the caller to mark it free.
    pub(crate) fn unlink(&mut self, slots: &mut [Slot<'_>], node: SlotHandle) {
        let prev = slots[node.0].prev;
        let next = slots[node.0].next;

        match prev {
            Some(prev) => slots[prev.0].next = next,
            None => self.head = next,
        }

        match next {
            Some(next) => slots[next.0].prev = prev,
            None => self.tail = prev,
        }
    }

    /// Points everything that referred to `from` at `to` instead. Call this
    /// after a slot has been physically moved so it keeps its place in line.
    pub(crate) fn relocate(
        &mut self,
        slots: &mut [Slot<'_>],
        from: SlotHandle,
        to: SlotHandle,
    ) {
        let prev = slots[to.0].prev;
        let next = slots[to.0].next;

        match prev {
            Some(prev) => slots[prev.0].next = Some(to),
            None => self.head = Some(to),
        }

        match next {
            Some(next) => slots[next.0].prev = Some(to),
            None => self.tail = Some(to),
        }

        debug_assert_ne!(Some(from), self.head);
        debug_assert_ne!(Some(from), self.tail);
    }

    /// Forgets every node. The slots themselves aren't touched.
    pub(crate) fn clear(&mut self) {
        self.head = None;
        self.tail = None;
    }
}
