//! Indexed binary min-heap over externally owned keys.
//!
//! Items are node indices; their priorities live in a caller-owned slice (the search's cost
//! arena) so a priority can be lowered in place and the heap re-sifted via
//! [`IndexedMinHeap::change_priority`].

#[derive(Debug, Clone, Default)]
pub struct IndexedMinHeap {
    heap: Vec<usize>,
    /// `position[item]` is the item's slot in `heap`, if queued.
    position: Vec<Option<usize>>,
}

impl IndexedMinHeap {
    /// Heap able to hold items `0..capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            position: vec![None; capacity],
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, item: usize) -> bool {
        self.position.get(item).copied().flatten().is_some()
    }

    /// Item with the lowest key, without removing it.
    pub fn peek(&self) -> Option<usize> {
        self.heap.first().copied()
    }

    /// Queue `item`. Re-inserting a queued item only re-sifts it.
    pub fn insert(&mut self, item: usize, keys: &[f32]) {
        if item >= self.position.len() {
            self.position.resize(item + 1, None);
        }
        if self.contains(item) {
            self.change_priority(item, keys);
            return;
        }
        let slot = self.heap.len();
        self.heap.push(item);
        self.position[item] = Some(slot);
        self.sift_up(slot, keys);
    }

    /// Remove and return the item with the lowest key.
    pub fn pop(&mut self, keys: &[f32]) -> Option<usize> {
        let last = self.heap.len().checked_sub(1)?;
        self.swap(0, last);
        let item = self.heap.pop()?;
        self.position[item] = None;
        if !self.heap.is_empty() {
            self.sift_down(0, keys);
        }
        Some(item)
    }

    /// Restore heap order after `keys[item]` changed. Unqueued items are ignored.
    pub fn change_priority(&mut self, item: usize, keys: &[f32]) {
        let Some(slot) = self.position.get(item).copied().flatten() else {
            return;
        };
        let slot = self.sift_up(slot, keys);
        self.sift_down(slot, keys);
    }

    pub fn clear(&mut self) {
        for item in self.heap.drain(..) {
            self.position[item] = None;
        }
    }

    // Strict less-than: equal keys never move, which keeps pop order a pure function of the
    // insertion sequence.
    fn less(&self, a: usize, b: usize, keys: &[f32]) -> bool {
        keys[self.heap[a]] < keys[self.heap[b]]
    }

    fn sift_up(&mut self, mut slot: usize, keys: &[f32]) -> usize {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if !self.less(slot, parent, keys) {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
        slot
    }

    fn sift_down(&mut self, mut slot: usize, keys: &[f32]) {
        let len = self.heap.len();
        loop {
            let left = slot * 2 + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut child = left;
            if right < len && self.less(right, left, keys) {
                child = right;
            }
            if !self.less(child, slot, keys) {
                break;
            }
            self.swap(slot, child);
            slot = child;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.position[self.heap[a]] = Some(a);
        self.position[self.heap[b]] = Some(b);
    }
}
