mod schema;

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

pub use schema::{ColumnDef, DataType, Schema, SchemaRef};

use crate::tuple::Tuple;

pub mod prelude {
    pub use super::*;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    schema: SchemaRef,
}

impl Table {
    pub fn new(name: &str, schema: SchemaRef) -> Self {
        Table {
            name: name.to_string(),
            schema,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }
}

pub type TableRef = Arc<Table>;

#[derive(Debug)]
struct StoredTable {
    table: TableRef,
    tuples: Arc<Vec<Tuple>>,
}

/// In-memory database keyed by table name.
#[derive(Debug)]
pub struct Catalog {
    tables: Mutex<HashMap<String, StoredTable>>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    pub fn new() -> Self {
        Catalog {
            tables: Mutex::new(HashMap::new()),
        }
    }

    /// Drops any table with the same name, then stores `table` with `tuples`.
    /// Returns true if a previous table was dropped.
    pub fn replace_table(&self, table: TableRef, tuples: Vec<Tuple>) -> bool {
        let name = table.name().to_string();
        let stored = StoredTable {
            table,
            tuples: Arc::new(tuples),
        };
        self.tables.lock().unwrap().insert(name, stored).is_some()
    }

    pub fn get_table(&self, table_name: &str) -> Option<TableRef> {
        self.tables
            .lock()
            .unwrap()
            .get(table_name)
            .map(|t| t.table.clone())
    }

    pub fn get_schema(&self, table_name: &str) -> Option<SchemaRef> {
        self.get_table(table_name).map(|t| t.schema())
    }

    pub fn get_tuples(&self, table_name: &str) -> Option<Arc<Vec<Tuple>>> {
        self.tables
            .lock()
            .unwrap()
            .get(table_name)
            .map(|t| t.tuples.clone())
    }

    pub fn row_count(&self, table_name: &str) -> Option<usize> {
        self.tables
            .lock()
            .unwrap()
            .get(table_name)
            .map(|t| t.tuples.len())
    }

}

pub type CatalogRef = Arc<Catalog>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuple::Field;

    fn artist_table(columns: &[&str]) -> TableRef {
        let schema = Schema::new(
            columns
                .iter()
                .map(|c| ColumnDef::new(c, DataType::Text, true))
                .collect(),
        );
        Arc::new(Table::new("artist", Arc::new(schema)))
    }

    fn text_row(values: &[&str]) -> Tuple {
        Tuple::from_fields(
            values
                .iter()
                .map(|v| Field::Text(Some(v.to_string())))
                .collect(),
        )
    }

    #[test]
    fn test_replace_table_discards_previous_contents() {
        let catalog = Catalog::new();
        let dropped = catalog.replace_table(
            artist_table(&["id", "name"]),
            vec![text_row(&["1", "Monet"]), text_row(&["2", "Manet"])],
        );
        assert!(!dropped);
        assert_eq!(catalog.row_count("artist"), Some(2));

        let dropped = catalog.replace_table(artist_table(&["full_name"]), vec![text_row(&["Degas"])]);
        assert!(dropped);
        assert_eq!(catalog.row_count("artist"), Some(1));
        assert_eq!(
            catalog.get_schema("artist").unwrap().column_names(),
            vec!["full_name"]
        );
        assert_eq!(
            catalog.get_tuples("artist").unwrap().as_slice(),
            &[text_row(&["Degas"])]
        );
    }

    #[test]
    fn test_unknown_table() {
        let catalog = Catalog::new();
        catalog.replace_table(artist_table(&["id"]), vec![]);
        assert_eq!(catalog.row_count("artist"), Some(0));
        assert_eq!(catalog.get_schema("museum"), None);
        assert_eq!(catalog.get_tuples("museum"), None);
        assert_eq!(catalog.row_count("museum"), None);
    }
}
