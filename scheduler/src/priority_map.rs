//! Piecewise priority maps.
//!
//! A map is a set of non-overlapping `[from%, to%) → weight` ranges. The
//! upper bound is exclusive except at 100, which closes the last range so a
//! fully-resolved proportion still maps. A range may additionally let the
//! first K arrivals take its weight regardless of the percentage criterion
//! (the two criteria are a disjunction).
//!
//! Maps compose two ways: [`MapWithDefault`] falls back to a system-wide
//! default where a specific map has no value, and [`MapProduct`] multiplies
//! the section and category factors into the final coefficient.

use crate::SchedulerError;
use recount_types::PriorityRangeSpec;
use std::fmt;

/// One `[from%, to%) → weight` range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriorityRange {
    pub from_pct: u32,
    pub to_pct: u32,
    pub weight: u64,
    /// The first K arrivals bypass the percentage criterion.
    pub first_n: Option<u64>,
}

impl PriorityRange {
    pub fn new(from_pct: u32, to_pct: u32, weight: u64) -> Self {
        Self {
            from_pct,
            to_pct,
            weight,
            first_n: None,
        }
    }

    /// Whether this range applies to the given proportion / arrival order.
    fn applies(&self, proportion: u32, arrival_order: u64) -> bool {
        let by_proportion =
            self.from_pct <= proportion && (self.to_pct == 100 || self.to_pct > proportion);
        let by_arrival = self.first_n.is_some_and(|k| arrival_order <= k);
        by_proportion || by_arrival
    }

    /// Two ranges are compatible when their percentage intervals do not
    /// overlap.
    fn compatible_with(&self, other: &PriorityRange) -> bool {
        self.to_pct <= other.from_pct || other.to_pct <= self.from_pct
    }
}

impl From<PriorityRangeSpec> for PriorityRange {
    fn from(spec: PriorityRangeSpec) -> Self {
        Self {
            from_pct: spec.from_pct,
            to_pct: spec.to_pct,
            weight: spec.weight,
            first_n: spec.first_n,
        }
    }
}

impl fmt::Display for PriorityRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}%..{}% -> {}",
            self.from_pct, self.to_pct, self.weight
        )
    }
}

/// A validated set of non-overlapping ranges, kept sorted by `from_pct`.
#[derive(Clone, Debug, Default)]
pub struct PriorityMap {
    ranges: Vec<PriorityRange>,
}

impl PriorityMap {
    pub fn new() -> Self {
        Self { ranges: Vec::new() }
    }

    /// Build a map from configuration, failing fast on any overlap.
    pub fn from_specs(specs: &[PriorityRangeSpec]) -> Result<Self, SchedulerError> {
        let mut map = Self::new();
        for spec in specs {
            map.insert((*spec).into())?;
        }
        Ok(map)
    }

    /// Sorted insertion with a neighbor compatibility check; overlapping
    /// ranges are rejected without scanning the whole set.
    pub fn insert(&mut self, range: PriorityRange) -> Result<(), SchedulerError> {
        let pos = self
            .ranges
            .partition_point(|r| r.from_pct < range.from_pct);
        for neighbor in self.ranges[..pos]
            .last()
            .into_iter()
            .chain(self.ranges.get(pos))
        {
            if !neighbor.compatible_with(&range) {
                return Err(SchedulerError::OverlappingRanges(
                    range.to_string(),
                    neighbor.to_string(),
                ));
            }
        }
        self.ranges.insert(pos, range);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The weight for a proportion, or `None` when no range applies.
    pub fn value_for(&self, proportion: u32, arrival_order: u64) -> Option<u64> {
        self.ranges
            .iter()
            .find(|r| r.applies(proportion, arrival_order))
            .map(|r| r.weight)
    }
}

/// A specific map that delegates to a default wherever it has no value.
pub struct MapWithDefault<'a> {
    primary: &'a PriorityMap,
    fallback: &'a PriorityMap,
}

impl<'a> MapWithDefault<'a> {
    pub fn new(primary: &'a PriorityMap, fallback: &'a PriorityMap) -> Self {
        Self { primary, fallback }
    }

    pub fn value_for(&self, proportion: u32, arrival_order: u64) -> Option<u64> {
        // Not `or_else` on the Option of the weight: a primary weight of 0 is
        // a real value and must not fall through.
        match self.primary.value_for(proportion, arrival_order) {
            Some(v) => Some(v),
            None => self.fallback.value_for(proportion, arrival_order),
        }
    }
}

/// The product of two factors; `None` if either factor has no value.
pub struct MapProduct<'a> {
    section: MapWithDefault<'a>,
    category: MapWithDefault<'a>,
}

impl<'a> MapProduct<'a> {
    pub fn new(section: MapWithDefault<'a>, category: MapWithDefault<'a>) -> Self {
        Self { section, category }
    }

    /// Each factor takes its own proportion; the arrival order is shared.
    pub fn value_for(
        &self,
        section_proportion: u32,
        category_proportion: u32,
        arrival_order: u64,
    ) -> Option<u64> {
        let s = self.section.value_for(section_proportion, arrival_order)?;
        let c = self.category.value_for(category_proportion, arrival_order)?;
        Some(s * c)
    }
}
