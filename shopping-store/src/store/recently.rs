//! Recently-Viewed Tracker
//!
//! Bounded, deduplicated log of visited skus. Entries are kept oldest first
//! internally; [`RecentlyViewed::skus`] applies the configured order.

use crate::core::config::RecentlyViewedOrder;
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentlyViewed {
    entries: VecDeque<String>,
    max: usize,
    order: RecentlyViewedOrder,
}

impl RecentlyViewed {
    pub fn new(max: usize, order: RecentlyViewedOrder) -> Self {
        Self {
            entries: VecDeque::with_capacity(max),
            max,
            order,
        }
    }

    /// Make `sku` the most recent entry, dropping the oldest beyond capacity
    pub fn record(&mut self, sku: &str) {
        if let Some(pos) = self.entries.iter().position(|s| s == sku) {
            self.entries.remove(pos);
        }
        self.entries.push_back(sku.to_string());
        while self.entries.len() > self.max {
            self.entries.pop_front();
        }
    }

    pub fn skus(&self) -> Vec<String> {
        match self.order {
            RecentlyViewedOrder::MostRecentLast => self.entries.iter().cloned().collect(),
            RecentlyViewedOrder::MostRecentFirst => self.entries.iter().rev().cloned().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_moves_and_caps() {
        let mut log = RecentlyViewed::new(3, RecentlyViewedOrder::MostRecentFirst);
        for sku in ["P1", "P2", "P3", "P1", "P4"] {
            log.record(sku);
        }
        assert_eq!(log.skus(), vec!["P4", "P1", "P3"]);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_most_recent_last_order() {
        let mut log = RecentlyViewed::new(5, RecentlyViewedOrder::MostRecentLast);
        log.record("P1");
        log.record("P2");
        log.record("P1");
        assert_eq!(log.skus(), vec!["P2", "P1"]);
    }

    #[test]
    fn test_never_exceeds_capacity_or_duplicates() {
        let mut log = RecentlyViewed::new(4, RecentlyViewedOrder::MostRecentLast);
        for i in 0..50 {
            log.record(&format!("P{}", i % 7));
            let skus = log.skus();
            assert!(skus.len() <= 4);
            let mut unique = skus.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), skus.len());
        }
    }
}
