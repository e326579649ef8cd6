//! Bounded observation window.
//!
//! # Responsibilities
//! - Keep the most recent observations, oldest first
//! - Compute the good ratio from the current contents
//!
//! # Design Decisions
//! - Ratio denominator is the window length, so unrecognized values
//!   still dilute the ratio
//! - No incremental good counter; every ratio is a fresh scan

use std::collections::VecDeque;

/// Oldest-first buffer of recent observations.
#[derive(Debug, Clone)]
pub struct Window<T> {
    entries: VecDeque<T>,
}

impl<T: PartialEq> Window<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, observation: T) {
        self.entries.push_back(observation);
    }

    /// Remove up to `count` of the oldest entries.
    pub fn evict(&mut self, count: usize) {
        let count = count.min(self.entries.len());
        self.entries.drain(..count);
    }

    /// Drop oldest entries until at most `max_len` remain.
    pub fn truncate_front(&mut self, max_len: usize) {
        let excess = self.entries.len().saturating_sub(max_len);
        self.evict(excess);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn good_count(&self, good: &T) -> usize {
        self.entries.iter().filter(|o| *o == good).count()
    }

    /// `good_count / len`, or `None` for an empty window.
    pub fn ratio(&self, good: &T) -> Option<f64> {
        if self.entries.is_empty() {
            return None;
        }
        Some(self.good_count(good) as f64 / self.entries.len() as f64)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_counts_only_good() {
        let mut w = Window::with_capacity(4);
        assert_eq!(w.ratio(&"1"), None);

        w.push("1");
        w.push("0");
        w.push("?");
        w.push("1");
        assert_eq!(w.good_count(&"1"), 2);
        assert_eq!(w.ratio(&"1"), Some(0.5));
    }

    #[test]
    fn test_evict_is_oldest_first() {
        let mut w = Window::with_capacity(4);
        for v in [1, 2, 3, 4] {
            w.push(v);
        }
        w.evict(2);
        assert_eq!(w.iter().copied().collect::<Vec<_>>(), vec![3, 4]);

        // Over-eviction empties the window without panicking
        w.evict(5);
        assert!(w.is_empty());
    }

    #[test]
    fn test_truncate_front() {
        let mut w = Window::with_capacity(8);
        for v in 0..8 {
            w.push(v);
        }
        w.truncate_front(5);
        assert_eq!(w.len(), 5);
        assert_eq!(w.iter().next(), Some(&3));

        w.truncate_front(10);
        assert_eq!(w.len(), 5);
    }
}
