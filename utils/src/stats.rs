//! Runtime counters.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// A thread-safe counter collection for engine statistics.
///
/// The counter set is fixed at construction; incrementing an unknown name is
/// a no-op rather than a panic, since stats must never take a service down.
pub struct StatsCounter {
    counters: HashMap<&'static str, AtomicU64>,
}

impl StatsCounter {
    pub fn new(names: &[&'static str]) -> Self {
        let mut counters = HashMap::new();
        for &name in names {
            counters.insert(name, AtomicU64::new(0));
        }
        Self { counters }
    }

    pub fn increment(&self, name: &str) {
        if let Some(counter) = self.counters.get(name) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn add(&self, name: &str, value: u64) {
        if let Some(counter) = self.counters.get(name) {
            counter.fetch_add(value, Ordering::Relaxed);
        }
    }

    pub fn get(&self, name: &str) -> u64 {
        self.counters
            .get(name)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub fn snapshot(&self) -> HashMap<&'static str, u64> {
        self.counters
            .iter()
            .map(|(name, counter)| (*name, counter.load(Ordering::Relaxed)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_and_add() {
        let stats = StatsCounter::new(&["claims", "rebuilds"]);
        stats.increment("claims");
        stats.add("claims", 4);
        assert_eq!(stats.get("claims"), 5);
        assert_eq!(stats.get("rebuilds"), 0);
    }

    #[test]
    fn unknown_names_are_noops() {
        let stats = StatsCounter::new(&["claims"]);
        stats.increment("nope");
        assert_eq!(stats.get("nope"), 0);
    }
}
