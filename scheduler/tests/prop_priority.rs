//! Property tests for priority maps.
//!
//! Maps built from any partition of 0..100 must accept construction and
//! yield a value for every proportion; any two ranges that truly overlap
//! must be rejected at insertion no matter the insertion order.

use proptest::prelude::*;
use recount_scheduler::{PriorityMap, PriorityRange};

/// A random partition of [0, 100] into consecutive ranges.
fn arb_partition() -> impl Strategy<Value = Vec<PriorityRange>> {
    proptest::collection::vec(1u32..40, 1..6).prop_map(|widths| {
        let mut ranges = Vec::new();
        let mut from = 0u32;
        for (i, w) in widths.into_iter().enumerate() {
            let to = (from + w).min(100);
            if to > from {
                ranges.push(PriorityRange::new(from, to, (i as u64 + 1) * 10));
            }
            from = to;
        }
        // Close the partition at 100.
        if from < 100 {
            ranges.push(PriorityRange::new(from, 100, 1));
        }
        ranges
    })
}

proptest! {
    #[test]
    fn partitions_always_construct_and_cover(ranges in arb_partition(), p in 0u32..=100) {
        let mut map = PriorityMap::new();
        for r in &ranges {
            map.insert(*r).unwrap();
        }
        prop_assert!(map.value_for(p, 0).is_some());
    }

    #[test]
    fn shuffled_insertion_order_never_creates_overlap_errors(
        ranges in arb_partition(),
        seed in 0usize..1000,
    ) {
        // Rotate the insertion order; compatibility must not depend on it.
        let mut rotated = ranges.clone();
        if !rotated.is_empty() {
            let len = rotated.len();
            rotated.rotate_left(seed % len);
        }
        let mut map = PriorityMap::new();
        for r in &rotated {
            map.insert(*r).unwrap();
        }
    }

    #[test]
    fn genuine_overlaps_are_always_rejected(
        from in 0u32..90,
        len in 2u32..10,
        offset in 1u32..5,
    ) {
        let a = PriorityRange::new(from, from + len, 1);
        // Starts strictly inside `a`.
        let b = PriorityRange::new(from + offset.min(len - 1), from + len + 3, 2);

        let mut map = PriorityMap::new();
        map.insert(a).unwrap();
        prop_assert!(map.insert(b).is_err());
    }
}
