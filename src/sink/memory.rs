use async_trait::async_trait;
use tracing::debug;

use crate::catalog::{Catalog, CatalogRef};
use crate::error::LoadResult;
use crate::loader::TableData;

use super::TableSink;

/// Writes tables into an in-memory [`Catalog`].
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    catalog: CatalogRef,
}

impl MemorySink {
    pub fn new(catalog: CatalogRef) -> Self {
        MemorySink { catalog }
    }

    pub fn catalog(&self) -> CatalogRef {
        self.catalog.clone()
    }
}

impl From<Catalog> for MemorySink {
    fn from(catalog: Catalog) -> Self {
        MemorySink::new(catalog.into())
    }
}

#[async_trait]
impl TableSink for MemorySink {
    async fn replace_table(&mut self, data: &TableData) -> LoadResult<u64> {
        let rows = data.num_rows() as u64;
        if self
            .catalog
            .replace_table(data.table().clone(), data.tuples().clone())
        {
            debug!(table = data.name(), "dropped previous table");
        }
        Ok(rows)
    }
}
