//! Recency List Module
//!
//! Implements the ordered sequence behind the LRU cache: a doubly linked list
//! whose nodes live in a slab and link to each other by slot index.

use super::CacheEntry;

/// A list node stored in a slab slot.
#[derive(Debug)]
struct Node {
    entry: CacheEntry,
    prev: Option<usize>,
    next: Option<usize>,
}

// == Recency List ==
/// Orders cache entries by access recency.
///
/// - Front = Most recently used
/// - Back = Least recently used
///
/// Every entry is addressed by a stable slot index returned from
/// [`RecencyList::push_front`], so moving, removing and evicting are all O(1).
/// Freed slots are recycled before the slab grows.
#[derive(Debug, Default)]
pub struct RecencyList {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl RecencyList {
    // == Constructor ==
    /// Creates an empty list with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Push Front ==
    /// Inserts an entry as the most recently used and returns its slot.
    pub fn push_front(&mut self, entry: CacheEntry) -> usize {
        let node = Node {
            entry,
            prev: None,
            next: self.head,
        };

        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };

        match self.head {
            Some(old_head) => self.node_mut(old_head).prev = Some(slot),
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
        self.len += 1;
        slot
    }

    // == Move To Front ==
    /// Marks the entry in `slot` as most recently used.
    ///
    /// Does nothing if the slot is empty.
    pub fn move_to_front(&mut self, slot: usize) {
        if self.head == Some(slot) || !self.is_occupied(slot) {
            return;
        }

        self.unlink(slot);

        let old_head = self.head;
        {
            let node = self.node_mut(slot);
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(old_head) => self.node_mut(old_head).prev = Some(slot),
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
    }

    // == Remove ==
    /// Removes the entry in `slot` and frees the slot for reuse.
    pub fn remove(&mut self, slot: usize) -> Option<CacheEntry> {
        if !self.is_occupied(slot) {
            return None;
        }

        self.unlink(slot);
        let node = self.slots[slot].take()?;
        self.free.push(slot);
        self.len -= 1;
        Some(node.entry)
    }

    // == Pop Back ==
    /// Removes and returns the least recently used entry.
    pub fn pop_back(&mut self) -> Option<CacheEntry> {
        let tail = self.tail?;
        self.remove(tail)
    }

    // == Peek Back ==
    /// Returns the least recently used entry without removing it.
    pub fn peek_back(&self) -> Option<&CacheEntry> {
        self.tail.and_then(|slot| self.get(slot))
    }

    // == Accessors ==
    /// Returns the entry stored in `slot`.
    pub fn get(&self, slot: usize) -> Option<&CacheEntry> {
        self.slots
            .get(slot)
            .and_then(Option::as_ref)
            .map(|node| &node.entry)
    }

    /// Returns a mutable reference to the entry stored in `slot`.
    pub fn get_mut(&mut self, slot: usize) -> Option<&mut CacheEntry> {
        self.slots
            .get_mut(slot)
            .and_then(Option::as_mut)
            .map(|node| &mut node.entry)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates `(slot, entry)` pairs from most to least recently used.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    // == Linking ==
    fn is_occupied(&self, slot: usize) -> bool {
        matches!(self.slots.get(slot), Some(Some(_)))
    }

    fn node(&self, slot: usize) -> &Node {
        self.slots[slot]
            .as_ref()
            .expect("linked slot must be occupied")
    }

    fn node_mut(&mut self, slot: usize) -> &mut Node {
        self.slots[slot]
            .as_mut()
            .expect("linked slot must be occupied")
    }

    /// Detaches `slot` from its neighbours, patching head and tail.
    fn unlink(&mut self, slot: usize) {
        let (prev, next) = {
            let node = self.node(slot);
            (node.prev, node.next)
        };

        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => self.tail = prev,
        }
    }
}

/// Front-to-back iterator over a [`RecencyList`].
pub struct Iter<'a> {
    list: &'a RecencyList,
    cursor: Option<usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (usize, &'a CacheEntry);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor?;
        let node = self.list.node(slot);
        self.cursor = node.next;
        Some((slot, &node.entry))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn keys(list: &RecencyList) -> Vec<String> {
        list.iter().map(|(_, entry)| entry.key.clone()).collect()
    }

    fn push(list: &mut RecencyList, key: &str) -> usize {
        list.push_front(CacheEntry::new(key, format!("value_{}", key)))
    }

    #[test]
    fn test_list_new() {
        let list = RecencyList::with_capacity(4);
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert!(list.peek_back().is_none());
    }

    #[test]
    fn test_push_front_orders_newest_first() {
        let mut list = RecencyList::with_capacity(4);

        push(&mut list, "a");
        push(&mut list, "b");
        push(&mut list, "c");

        assert_eq!(list.len(), 3);
        assert_eq!(keys(&list), vec!["c", "b", "a"]);
        assert_eq!(list.peek_back().map(|e| e.key.as_str()), Some("a"));
    }

    #[test]
    fn test_move_to_front() {
        let mut list = RecencyList::with_capacity(4);

        let a = push(&mut list, "a");
        push(&mut list, "b");
        push(&mut list, "c");

        list.move_to_front(a);

        assert_eq!(keys(&list), vec!["a", "c", "b"]);
        assert_eq!(list.peek_back().map(|e| e.key.as_str()), Some("b"));
    }

    #[test]
    fn test_move_middle_to_front() {
        let mut list = RecencyList::with_capacity(4);

        push(&mut list, "a");
        let b = push(&mut list, "b");
        push(&mut list, "c");

        list.move_to_front(b);

        assert_eq!(keys(&list), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_move_head_is_noop() {
        let mut list = RecencyList::with_capacity(4);

        push(&mut list, "a");
        let b = push(&mut list, "b");

        list.move_to_front(b);

        assert_eq!(keys(&list), vec!["b", "a"]);
    }

    #[test]
    fn test_pop_back_evicts_oldest() {
        let mut list = RecencyList::with_capacity(4);

        push(&mut list, "a");
        push(&mut list, "b");
        push(&mut list, "c");

        assert_eq!(list.pop_back().map(|e| e.key), Some("a".to_string()));
        assert_eq!(list.pop_back().map(|e| e.key), Some("b".to_string()));
        assert_eq!(list.len(), 1);
        assert_eq!(list.pop_back().map(|e| e.key), Some("c".to_string()));
        assert!(list.pop_back().is_none());
        assert!(list.is_empty());
    }

    #[test]
    fn test_remove_middle_relinks_neighbours() {
        let mut list = RecencyList::with_capacity(4);

        push(&mut list, "a");
        let b = push(&mut list, "b");
        push(&mut list, "c");

        let removed = list.remove(b);

        assert_eq!(removed, Some(CacheEntry::new("b", "value_b")));
        assert_eq!(keys(&list), vec!["c", "a"]);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_remove_empty_slot_is_noop() {
        let mut list = RecencyList::with_capacity(4);

        let a = push(&mut list, "a");
        assert!(list.remove(a).is_some());

        assert!(list.remove(a).is_none());
        assert!(list.remove(99).is_none());
        assert!(list.is_empty());
    }

    #[test]
    fn test_freed_slots_are_reused() {
        let mut list = RecencyList::with_capacity(2);

        let a = push(&mut list, "a");
        push(&mut list, "b");
        list.remove(a);

        let c = push(&mut list, "c");

        assert_eq!(c, a);
        assert_eq!(keys(&list), vec!["c", "b"]);
    }

    #[test]
    fn test_get_mut_updates_value_in_place() {
        let mut list = RecencyList::with_capacity(2);

        let a = push(&mut list, "a");
        if let Some(entry) = list.get_mut(a) {
            entry.value = "updated".to_string();
        }

        assert_eq!(list.get(a).map(|e| e.value.as_str()), Some("updated"));
    }
}
