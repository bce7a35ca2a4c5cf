mod memory;
mod sql;

use async_trait::async_trait;

use crate::error::LoadResult;
use crate::loader::TableData;

pub use memory::MemorySink;
pub use sql::{SqlSink, DEFAULT_BATCH_SIZE};

/// Destination for parsed tables.
#[async_trait]
pub trait TableSink: Send {
    /// Drops any existing table named `data.name()`, recreates it from the
    /// table's schema and writes every tuple. Returns the number of rows written.
    async fn replace_table(&mut self, data: &TableData) -> LoadResult<u64>;
}
