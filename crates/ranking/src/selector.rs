//! Bounded top-K selection over an array-backed binary heap.
//!
//! `BoundedMinSelector` keeps the K best entries seen so far. The heap root
//! is always the *weakest* retained entry, so a new entry either loses to the
//! root and is dropped, or replaces it in O(log K).
//!
//! Which end counts as "best" is fixed at construction with [`Retain`]:
//! - `Retain::Largest`: root holds the smallest key, the K largest keys survive
//! - `Retain::Smallest`: keys are negated internally, the K smallest survive
//!
//! ## Ordering
//! Entries compare by `(ranking key, tiebreak)` lexicographically. Plain
//! [`BoundedMinSelector::insert`] uses the insertion sequence as the tiebreak,
//! so among equal keys the first-inserted entry is evicted and popped first.
//! Callers that need a different rule pass their own tiebreak through
//! [`BoundedMinSelector::insert_with_tiebreak`]; a lower tiebreak always
//! loses.
//!
//! ## Example
//! ```
//! use ranking::selector::{BoundedMinSelector, Retain};
//!
//! let mut top = BoundedMinSelector::new(2, Retain::Largest);
//! for (name, score) in [("a", 3.0), ("b", 9.0), ("c", 1.0), ("d", 7.0)] {
//!     top.insert(name, score);
//! }
//! assert_eq!(top.into_ranked_vec(), vec!["b", "d"]);
//! ```

use crate::error::{RankingError, Result};
use std::cmp::Ordering;

/// Which end of the key range a selector keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retain {
    /// Keep the largest keys (root = smallest retained key)
    Largest,
    /// Keep the smallest keys (root = largest retained key)
    Smallest,
}

/// A payload together with the key and tiebreak it is ranked by
#[derive(Debug, Clone)]
pub struct SelectorEntry<T> {
    pub item: T,
    pub key: f64,
    pub tiebreak: i64,
}

/// Fixed-capacity heap that retains the best K entries of a stream.
///
/// Invariants after every mutation:
/// - heap order holds: `entry(parent) <= entry(child)` for children `2i+1`, `2i+2`
/// - `len() <= capacity` when a capacity is set
#[derive(Debug, Clone)]
pub struct BoundedMinSelector<T> {
    heap: Vec<SelectorEntry<T>>,
    capacity: Option<usize>,
    retain: Retain,
    next_seq: i64,
}

impl<T> BoundedMinSelector<T> {
    /// Create a selector that never holds more than `capacity` entries
    pub fn new(capacity: usize, retain: Retain) -> Self {
        Self {
            heap: Vec::with_capacity(capacity.saturating_add(1).min(4096)),
            capacity: Some(capacity),
            retain,
            next_seq: 0,
        }
    }

    /// Create a selector with no capacity bound. Draining it is a heap sort.
    pub fn unbounded(retain: Retain) -> Self {
        Self {
            heap: Vec::new(),
            capacity: None,
            retain,
            next_seq: 0,
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn retain(&self) -> Retain {
        self.retain
    }

    /// Number of retained entries, O(1)
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Alias of [`len`](Self::len)
    pub fn size(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Insert with the insertion sequence as tiebreak
    pub fn insert(&mut self, item: T, key: f64) {
        let tiebreak = self.next_seq;
        self.next_seq += 1;
        self.push_entry(SelectorEntry { item, key, tiebreak });
    }

    /// Insert with a caller-chosen tiebreak (lower loses among equal keys)
    pub fn insert_with_tiebreak(&mut self, item: T, key: f64, tiebreak: i64) {
        self.next_seq = self.next_seq.max(tiebreak.saturating_add(1));
        self.push_entry(SelectorEntry { item, key, tiebreak });
    }

    /// The weakest retained item (next to be evicted or popped)
    pub fn peek_min(&self) -> Result<&T> {
        self.heap
            .first()
            .map(|entry| &entry.item)
            .ok_or(RankingError::EmptyStructure)
    }

    /// Key of the weakest retained item
    pub fn peek_min_key(&self) -> Result<f64> {
        self.heap
            .first()
            .map(|entry| entry.key)
            .ok_or(RankingError::EmptyStructure)
    }

    /// Remove and return the weakest retained item
    pub fn pop_min(&mut self) -> Result<T> {
        self.pop_min_entry().map(|entry| entry.item)
    }

    /// Remove and return the weakest retained entry with its key and tiebreak
    pub fn pop_min_entry(&mut self) -> Result<SelectorEntry<T>> {
        if self.heap.is_empty() {
            return Err(RankingError::EmptyStructure);
        }
        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        let entry = self.heap.pop().ok_or(RankingError::EmptyStructure)?;
        self.sift_down(0);
        Ok(entry)
    }

    /// Drain every entry, weakest first
    pub fn into_sorted_entries(mut self) -> Vec<SelectorEntry<T>> {
        let mut out = Vec::with_capacity(self.heap.len());
        while let Ok(entry) = self.pop_min_entry() {
            out.push(entry);
        }
        out
    }

    /// Drain every item, weakest first
    pub fn into_sorted_vec(self) -> Vec<T> {
        self.into_sorted_entries()
            .into_iter()
            .map(|entry| entry.item)
            .collect()
    }

    /// Drain every item, best first (the drain order reversed)
    pub fn into_ranked_vec(self) -> Vec<T> {
        let mut items = self.into_sorted_vec();
        items.reverse();
        items
    }

    /// Feed every entry of `other` through this selector, keeping keys and
    /// tiebreaks. Merging partial selectors this way keeps the same top-K as
    /// a single serial pass, provided the tiebreaks were caller-assigned.
    pub fn merge(&mut self, other: BoundedMinSelector<T>) {
        self.next_seq = self.next_seq.max(other.next_seq);
        for entry in other.heap {
            self.push_entry(entry);
        }
    }

    fn push_entry(&mut self, entry: SelectorEntry<T>) {
        match self.capacity {
            Some(0) => {}
            Some(cap) if self.heap.len() >= cap => {
                // Full: the new entry only gets in if it beats the root
                if self.compare(&entry, &self.heap[0]) == Ordering::Greater {
                    self.heap[0] = entry;
                    self.sift_down(0);
                }
            }
            _ => {
                self.heap.push(entry);
                let last = self.heap.len() - 1;
                self.sift_up(last);
            }
        }
    }

    fn ranking_key(&self, key: f64) -> f64 {
        // `+ 0.0` folds -0.0 into 0.0 so total_cmp treats them as equal
        match self.retain {
            Retain::Largest => key + 0.0,
            Retain::Smallest => -key + 0.0,
        }
    }

    fn compare(&self, a: &SelectorEntry<T>, b: &SelectorEntry<T>) -> Ordering {
        self.ranking_key(a.key)
            .total_cmp(&self.ranking_key(b.key))
            .then(a.tiebreak.cmp(&b.tiebreak))
    }

    fn less(&self, i: usize, j: usize) -> bool {
        self.compare(&self.heap[i], &self.heap[j]) == Ordering::Less
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.less(i, parent) {
                self.heap.swap(i, parent);
                i = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut smallest = i;

            if left < len && self.less(left, smallest) {
                smallest = left;
            }
            if right < len && self.less(right, smallest) {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.heap.swap(i, smallest);
            i = smallest;
        }
    }

    #[cfg(test)]
    fn heap_property_holds(&self) -> bool {
        (1..self.heap.len()).all(|i| !self.less(i, (i - 1) / 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_empty_selector() {
        let mut selector: BoundedMinSelector<u32> = BoundedMinSelector::new(3, Retain::Largest);
        assert_eq!(selector.size(), 0);
        assert_eq!(selector.peek_min(), Err(RankingError::EmptyStructure));
        assert_eq!(selector.pop_min(), Err(RankingError::EmptyStructure));
        assert_eq!(selector.peek_min_key(), Err(RankingError::EmptyStructure));
    }

    #[test]
    fn test_drain_until_empty() {
        let mut selector = BoundedMinSelector::unbounded(Retain::Largest);
        for key in [4.0, 1.0, 3.0] {
            selector.insert(key as u32, key);
        }

        let mut drained = Vec::new();
        loop {
            match selector.pop_min() {
                Ok(item) => drained.push(item),
                Err(RankingError::EmptyStructure) => break,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(drained, vec![1, 3, 4]);
    }

    #[test]
    fn test_peek_has_no_side_effect() {
        let mut selector = BoundedMinSelector::new(5, Retain::Largest);
        selector.insert("x", 2.0);
        selector.insert("y", 1.0);
        assert_eq!(selector.peek_min(), Ok(&"y"));
        assert_eq!(selector.peek_min(), Ok(&"y"));
        assert_eq!(selector.size(), 2);
    }

    #[test]
    fn test_capacity_keeps_largest() {
        let mut selector = BoundedMinSelector::new(3, Retain::Largest);
        for (i, key) in [5.0, 1.0, 9.0, 7.0, 3.0, 8.0].iter().enumerate() {
            selector.insert(i, *key);
            assert!(selector.size() <= 3);
            assert!(selector.heap_property_holds());
        }
        assert_eq!(selector.peek_min_key(), Ok(7.0));
        // keys 9.0, 8.0, 7.0 live at indices 2, 5, 3
        assert_eq!(selector.into_ranked_vec(), vec![2, 5, 3]);
    }

    #[test]
    fn test_retain_smallest() {
        let mut selector = BoundedMinSelector::new(2, Retain::Smallest);
        for key in [5.0, 1.0, 9.0, 0.5, 3.0] {
            selector.insert(key, key);
        }
        assert_eq!(selector.into_ranked_vec(), vec![0.5, 1.0]);
    }

    #[test]
    fn test_zero_capacity_holds_nothing() {
        let mut selector = BoundedMinSelector::new(0, Retain::Largest);
        selector.insert(1, 100.0);
        assert!(selector.is_empty());
    }

    #[test]
    fn test_ties_first_inserted_removed_first() {
        let mut selector = BoundedMinSelector::unbounded(Retain::Largest);
        selector.insert("first", 1.0);
        selector.insert("second", 1.0);
        selector.insert("third", 1.0);
        assert_eq!(selector.into_sorted_vec(), vec!["first", "second", "third"]);

        // With a bound, the earliest of the tied entries is the one evicted
        let mut bounded = BoundedMinSelector::new(2, Retain::Largest);
        bounded.insert("first", 1.0);
        bounded.insert("second", 1.0);
        bounded.insert("third", 1.0);
        assert_eq!(bounded.into_sorted_vec(), vec!["second", "third"]);
    }

    #[test]
    fn test_explicit_tiebreak() {
        let mut selector = BoundedMinSelector::new(2, Retain::Largest);
        // Prefer lower ids among equal keys by giving them a higher tiebreak
        for id in [3_i64, 1, 2] {
            selector.insert_with_tiebreak(id, 10.0, -id);
        }
        assert_eq!(selector.into_ranked_vec(), vec![1, 2]);
    }

    #[test]
    fn test_signed_zero_is_one_key() {
        let mut selector = BoundedMinSelector::unbounded(Retain::Largest);
        selector.insert("neg", -0.0);
        selector.insert("pos", 0.0);
        // equal keys fall back to insertion order
        assert_eq!(selector.into_sorted_vec(), vec!["neg", "pos"]);
    }

    #[test]
    fn test_matches_brute_force_sort() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for capacity in [1usize, 2, 5, 17, 64] {
            for _ in 0..20 {
                let n = rng.random_range(0..200);
                // Coarse keys so ties actually happen
                let keys: Vec<f64> = (0..n).map(|_| rng.random_range(0..40) as f64 / 2.0).collect();

                let mut selector = BoundedMinSelector::new(capacity, Retain::Largest);
                for (i, &key) in keys.iter().enumerate() {
                    selector.insert(i, key);
                    assert!(selector.size() <= capacity);
                }
                assert!(selector.heap_property_holds());

                // Brute force: best first by (key desc, later insertion first)
                let mut expected: Vec<usize> = (0..n).collect();
                expected.sort_by(|&a, &b| keys[b].total_cmp(&keys[a]).then(b.cmp(&a)));
                expected.truncate(capacity);

                assert_eq!(selector.into_ranked_vec(), expected);
            }
        }
    }

    #[test]
    fn test_drain_is_non_decreasing() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut selector = BoundedMinSelector::unbounded(Retain::Largest);
        for i in 0..500 {
            selector.insert(i, rng.random_range(-50.0..50.0));
        }

        let drained: Vec<f64> = selector.into_sorted_entries().iter().map(|e| e.key).collect();
        assert!(drained.windows(2).all(|w| w[0] <= w[1]));

        let mut reversed = drained.clone();
        reversed.reverse();
        assert!(reversed.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_merge_equals_single_pass() {
        let mut rng = StdRng::seed_from_u64(99);
        let keys: Vec<f64> = (0..300).map(|_| rng.random_range(0..25) as f64).collect();

        let mut single = BoundedMinSelector::new(10, Retain::Largest);
        for (i, &key) in keys.iter().enumerate() {
            single.insert_with_tiebreak(i, key, -(i as i64));
        }

        let mut parts: Vec<BoundedMinSelector<usize>> = Vec::new();
        for chunk_start in (0..keys.len()).step_by(70) {
            let mut part = BoundedMinSelector::new(10, Retain::Largest);
            for i in chunk_start..(chunk_start + 70).min(keys.len()) {
                part.insert_with_tiebreak(i, keys[i], -(i as i64));
            }
            parts.push(part);
        }
        let mut merged = BoundedMinSelector::new(10, Retain::Largest);
        for part in parts.into_iter().rev() {
            merged.merge(part);
        }

        assert_eq!(merged.into_ranked_vec(), single.into_ranked_vec());
    }
}
