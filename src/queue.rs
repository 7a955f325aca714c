//! Min-priority queue used to build the Huffman trie.

use crate::error::CompressError;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

pub trait MinQueue<T> {
    fn push(&mut self, priority: u64, item: T);

    /// Remove the entry with the lowest priority. Equal priorities come out
    /// in insertion order.
    fn pop(&mut self) -> Result<(u64, T), CompressError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct Entry<T> {
    priority: u64,
    seq: u64,
    item: T,
}

impl<T> Eq for Entry<T> {}
impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}
impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // reversed: BinaryHeap is a max-heap
        (other.priority, other.seq).cmp(&(self.priority, self.seq))
    }
}

/// Binary-heap backed [`MinQueue`].
pub struct HeapQueue<T> {
    heap: BinaryHeap<Entry<T>>,
    next_seq: u64,
}

impl<T> HeapQueue<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            next_seq: 0,
        }
    }
}

impl<T> Default for HeapQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MinQueue<T> for HeapQueue<T> {
    fn push(&mut self, priority: u64, item: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry {
            priority,
            seq,
            item,
        });
    }

    fn pop(&mut self) -> Result<(u64, T), CompressError> {
        self.heap
            .pop()
            .map(|e| (e.priority, e.item))
            .ok_or(CompressError::QueueUnderflow)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}
