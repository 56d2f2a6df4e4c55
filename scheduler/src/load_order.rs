//! The per-unit load-order coefficient.
//!
//! A unit's coefficient is the product of its section and category priority
//! weights, each looked up by how far that section / category has already
//! progressed. Lower coefficients are claimed first. A unit whose table has
//! no identified attachment has no coefficient at all — there is nothing to
//! read counts from, so it cannot be scheduled.

use crate::priority_map::{MapProduct, MapWithDefault, PriorityMap};
use crate::SchedulerError;
use recount_store::{Store, WorkUnitRow};
use recount_types::{CategoryId, EngineSettings, TableId, WorkUnitId};
use std::collections::HashSet;
use tracing::debug;

/// Compute the priority coefficient for one unit, or `None` when neither the
/// specific nor the default maps cover its current proportions.
pub fn unit_priority<S: Store>(
    store: &S,
    settings: &EngineSettings,
    unit: &WorkUnitRow,
) -> Result<Option<u64>, SchedulerError> {
    let table = store.get_table(unit.table)?;

    let section_default = PriorityMap::from_specs(&settings.section_priority_ranges)?;
    let section_specific = match settings.section_priority_overrides.get(&table.section.raw()) {
        Some(specs) => PriorityMap::from_specs(specs)?,
        None => PriorityMap::new(),
    };
    let category_default = PriorityMap::from_specs(&settings.category_priority_ranges)?;
    let category_specific = match settings
        .category_priority_overrides
        .get(&unit.category.raw())
    {
        Some(specs) => PriorityMap::from_specs(specs)?,
        None => PriorityMap::new(),
    };

    let (section_proportion, arrival_order) = section_progress(store, unit)?;
    let category_proportion = category_progress(store, unit.category)?;

    let product = MapProduct::new(
        MapWithDefault::new(&section_specific, &section_default),
        MapWithDefault::new(&category_specific, &category_default),
    );
    Ok(product.value_for(section_proportion, category_proportion, arrival_order))
}

/// Proportion (0..=100) of the unit's section already identified, and the
/// unit's arrival order within that section (1-based).
fn section_progress<S: Store>(
    store: &S,
    unit: &WorkUnitRow,
) -> Result<(u32, u64), SchedulerError> {
    let table = store.get_table(unit.table)?;
    let section_tables: HashSet<TableId> = store
        .tables_in_section(table.section)?
        .into_iter()
        .map(|t| t.id)
        .collect();

    let mut total = 0u64;
    let mut identified = 0u64;
    for u in store.all_units()? {
        if !section_tables.contains(&u.table) {
            continue;
        }
        total += 1;
        if u.load_order.is_some() && u.id != unit.id {
            identified += 1;
        }
    }
    if total == 0 {
        return Ok((100, 1));
    }
    let proportion = (((identified + 1) * 100) / total).min(100) as u32;
    Ok((proportion, identified + 1))
}

/// Proportion (0..=100) of the category's units already identified.
fn category_progress<S: Store>(
    store: &S,
    category: CategoryId,
) -> Result<u32, SchedulerError> {
    let units = store.units_for_category(category)?;
    if units.is_empty() {
        return Ok(100);
    }
    let identified = units.iter().filter(|u| u.load_order.is_some()).count() as u64;
    let total = units.len() as u64;
    Ok((((identified + 1) * 100) / total).min(100) as u32)
}

/// Recompute one unit's coefficient, e.g. after its assignment set changed.
pub fn refresh_unit_load_order<S: Store>(
    store: &S,
    settings: &EngineSettings,
    unit_id: WorkUnitId,
) -> Result<(), SchedulerError> {
    let unit = store.get_unit(unit_id)?;
    let has_photo = !store.attachments_for_table(unit.table)?.is_empty();
    let order = if has_photo {
        // No applicable range sorts the unit after everything configured.
        Some(
            unit_priority(store, settings, &unit)?
                .map(|w| w as f64)
                .unwrap_or(f64::MAX),
        )
    } else {
        None
    };
    store.set_load_order(unit_id, order)?;
    Ok(())
}

/// Recompute the coefficient of every unit under a table. Called when an
/// attachment associates with (or departs from) the table.
pub fn refresh_units_for_table<S: Store>(
    store: &S,
    settings: &EngineSettings,
    table: TableId,
) -> Result<(), SchedulerError> {
    let units = store.units_for_table(table)?;
    debug!(%table, units = units.len(), "refreshing load orders");
    for unit in units {
        refresh_unit_load_order(store, settings, unit.id)?;
    }
    Ok(())
}
