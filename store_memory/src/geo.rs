//! Geography and category reference tables.

use crate::{lock, MemoryStore};
use recount_store::{CategoryRow, GeoStore, StoreError, TableRow};
use recount_types::{CategoryId, CircuitId, SectionId, TableId};

impl GeoStore for MemoryStore {
    fn insert_table(&self, row: TableRow) -> Result<(), StoreError> {
        let mut tables = lock(&self.tables)?;
        if tables.contains_key(&row.id.raw()) {
            return Err(StoreError::Duplicate(row.id.to_string()));
        }
        tables.insert(row.id.raw(), row);
        Ok(())
    }

    fn insert_category(&self, row: CategoryRow) -> Result<(), StoreError> {
        let mut categories = lock(&self.categories)?;
        if categories.contains_key(&row.id.raw()) {
            return Err(StoreError::Duplicate(row.id.to_string()));
        }
        categories.insert(row.id.raw(), row);
        Ok(())
    }

    fn get_table(&self, id: TableId) -> Result<TableRow, StoreError> {
        lock(&self.tables)?
            .get(&id.raw())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn get_category(&self, id: CategoryId) -> Result<CategoryRow, StoreError> {
        lock(&self.categories)?
            .get(&id.raw())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn tables_in_circuit(&self, circuit: CircuitId) -> Result<Vec<TableRow>, StoreError> {
        let mut rows: Vec<TableRow> = lock(&self.tables)?
            .values()
            .filter(|t| t.circuit == circuit)
            .cloned()
            .collect();
        rows.sort_by_key(|t| t.id);
        Ok(rows)
    }

    fn tables_in_section(&self, section: SectionId) -> Result<Vec<TableRow>, StoreError> {
        let mut rows: Vec<TableRow> = lock(&self.tables)?
            .values()
            .filter(|t| t.section == section)
            .cloned()
            .collect();
        rows.sort_by_key(|t| t.id);
        Ok(rows)
    }

    fn all_categories(&self) -> Result<Vec<CategoryRow>, StoreError> {
        let mut rows: Vec<CategoryRow> = lock(&self.categories)?.values().cloned().collect();
        rows.sort_by_key(|c| c.id);
        Ok(rows)
    }
}
