//! Geography and category reference data.
//!
//! Loaded once at setup by the (out-of-scope) import tooling; the engine
//! only reads it, for priority proportions and affinity tags.

use crate::StoreError;
use recount_types::{CategoryId, CircuitId, SectionId, TableId};
use serde::{Deserialize, Serialize};

/// A polling table and where it sits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub id: TableId,
    pub circuit: CircuitId,
    pub section: SectionId,
}

/// A reporting category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub id: CategoryId,
    /// Tie-break priority among categories (lower runs first).
    pub priority: u32,
}

pub trait GeoStore {
    fn insert_table(&self, row: TableRow) -> Result<(), StoreError>;

    fn insert_category(&self, row: CategoryRow) -> Result<(), StoreError>;

    fn get_table(&self, id: TableId) -> Result<TableRow, StoreError>;

    fn get_category(&self, id: CategoryId) -> Result<CategoryRow, StoreError>;

    fn tables_in_circuit(&self, circuit: CircuitId) -> Result<Vec<TableRow>, StoreError>;

    fn tables_in_section(&self, section: SectionId) -> Result<Vec<TableRow>, StoreError>;

    fn all_categories(&self) -> Result<Vec<CategoryRow>, StoreError>;
}
