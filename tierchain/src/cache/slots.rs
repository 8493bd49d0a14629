//! Slot arena with index-linked lists
//!
//! Entries live in a `Vec` of slots and never move once allocated; a
//! [`SlotList`] threads a doubly-linked order through them using slot ids
//! instead of pointers. Several lists may share one arena (the LFU policy keeps
//! one list per frequency), so a list only stores its head, tail and length.

/// Stable handle to an occupied slot
pub(crate) type SlotId = usize;

const NIL: SlotId = usize::MAX;

#[derive(Debug)]
struct Node<T> {
    item: T,
    prev: SlotId,
    next: SlotId,
}

#[derive(Debug)]
enum Slot<T> {
    Occupied(Node<T>),
    Vacant { next_free: SlotId },
}

/// Arena of list nodes with a free list for slot reuse
#[derive(Debug)]
pub(crate) struct Slots<T> {
    slots: Vec<Slot<T>>,
    free_head: SlotId,
    len: usize,
}

impl<T> Slots<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: NIL,
            len: 0,
        }
    }

    /// Store `item` in a detached slot and return its id
    pub fn alloc(&mut self, item: T) -> SlotId {
        let node = Node {
            item,
            prev: NIL,
            next: NIL,
        };
        self.len += 1;

        if self.free_head == NIL {
            self.slots.push(Slot::Occupied(node));
            return self.slots.len() - 1;
        }

        let id = self.free_head;
        if let Slot::Vacant { next_free } = self.slots[id] {
            self.free_head = next_free;
        }
        self.slots[id] = Slot::Occupied(node);
        id
    }

    /// Release a slot; the caller must have unlinked it from its list
    pub fn free(&mut self, id: SlotId) -> Option<T> {
        let slot = self.slots.get_mut(id)?;
        if matches!(slot, Slot::Vacant { .. }) {
            return None;
        }
        let old = std::mem::replace(
            slot,
            Slot::Vacant {
                next_free: self.free_head,
            },
        );
        self.free_head = id;
        self.len -= 1;
        match old {
            Slot::Occupied(node) => Some(node.item),
            Slot::Vacant { .. } => None,
        }
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.node(id).map(|n| &n.item)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.node_mut(id).map(|n| &mut n.item)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    fn node(&self, id: SlotId) -> Option<&Node<T>> {
        match self.slots.get(id)? {
            Slot::Occupied(node) => Some(node),
            Slot::Vacant { .. } => None,
        }
    }

    fn node_mut(&mut self, id: SlotId) -> Option<&mut Node<T>> {
        match self.slots.get_mut(id)? {
            Slot::Occupied(node) => Some(node),
            Slot::Vacant { .. } => None,
        }
    }

    fn set_prev(&mut self, id: SlotId, prev: SlotId) {
        if let Some(node) = self.node_mut(id) {
            node.prev = prev;
        }
    }

    fn set_next(&mut self, id: SlotId, next: SlotId) {
        if let Some(node) = self.node_mut(id) {
            node.next = next;
        }
    }
}

/// Ordered list over slots of a shared arena, front = most recent
#[derive(Debug, Clone, Copy)]
pub(crate) struct SlotList {
    head: SlotId,
    tail: SlotId,
    len: usize,
}

impl Default for SlotList {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotList {
    pub fn new() -> Self {
        Self {
            head: NIL,
            tail: NIL,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn back(&self) -> Option<SlotId> {
        (self.tail != NIL).then_some(self.tail)
    }

    /// Link a detached slot at the front
    pub fn push_front<T>(&mut self, slots: &mut Slots<T>, id: SlotId) {
        slots.set_prev(id, NIL);
        slots.set_next(id, self.head);
        if self.head != NIL {
            slots.set_prev(self.head, id);
        } else {
            self.tail = id;
        }
        self.head = id;
        self.len += 1;
    }

    /// Detach a slot that is currently linked into this list
    pub fn unlink<T>(&mut self, slots: &mut Slots<T>, id: SlotId) {
        let Some((prev, next)) = slots.node(id).map(|n| (n.prev, n.next)) else {
            return;
        };

        if prev != NIL {
            slots.set_next(prev, next);
        } else {
            self.head = next;
        }
        if next != NIL {
            slots.set_prev(next, prev);
        } else {
            self.tail = prev;
        }

        slots.set_prev(id, NIL);
        slots.set_next(id, NIL);
        self.len -= 1;
    }

    pub fn move_to_front<T>(&mut self, slots: &mut Slots<T>, id: SlotId) {
        if self.head == id {
            return;
        }
        self.unlink(slots, id);
        self.push_front(slots, id);
    }

    /// Iterate items front to back without touching the order
    pub fn iter<'a, T>(&self, slots: &'a Slots<T>) -> SlotIter<'a, T> {
        SlotIter {
            slots,
            cursor: self.head,
            remaining: self.len,
        }
    }
}

pub(crate) struct SlotIter<'a, T> {
    slots: &'a Slots<T>,
    cursor: SlotId,
    remaining: usize,
}

impl<'a, T> Iterator for SlotIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.slots.node(self.cursor)?;
        self.cursor = node.next;
        self.remaining -= 1;
        Some(&node.item)
    }
}
