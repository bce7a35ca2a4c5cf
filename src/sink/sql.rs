use async_trait::async_trait;
use sqlx::any::{Any, AnyArguments};
use sqlx::query::Query;
use sqlx::{AnyConnection, Connection};
use tracing::debug;

use crate::database::{DatabaseUrl, Dialect};
use crate::ddl::{create_table_sql, drop_table_sql, insert_sql, rows_per_insert};
use crate::error::LoadResult;
use crate::loader::TableData;
use crate::tuple::Field;

use super::TableSink;

pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Writes tables through a single sqlx connection held for the whole run.
pub struct SqlSink {
    conn: AnyConnection,
    dialect: Dialect,
    batch_size: usize,
}

impl SqlSink {
    pub async fn connect(url: &DatabaseUrl, batch_size: usize) -> LoadResult<Self> {
        sqlx::any::install_default_drivers();
        debug!(url = %url, "connecting");
        let conn = AnyConnection::connect(url.as_str()).await?;
        Ok(SqlSink {
            conn,
            dialect: url.dialect(),
            batch_size: batch_size.max(1),
        })
    }

    pub async fn close(self) -> LoadResult<()> {
        self.conn.close().await?;
        Ok(())
    }
}

fn bind_field<'q>(
    query: Query<'q, Any, AnyArguments<'q>>,
    field: &'q Field,
) -> Query<'q, Any, AnyArguments<'q>> {
    match field {
        Field::Boolean(val) => query.bind(*val),
        Field::Int(val) => query.bind(*val),
        Field::Float(val) => query.bind(*val),
        Field::Text(val) => query.bind(val.as_deref()),
    }
}

#[async_trait]
impl TableSink for SqlSink {
    async fn replace_table(&mut self, data: &TableData) -> LoadResult<u64> {
        let table = data.table();
        let num_cols = table.schema().len();
        let chunk_rows = rows_per_insert(self.dialect, num_cols, self.batch_size);

        let drop_sql = drop_table_sql(table.name());
        let create_sql = create_table_sql(table, self.dialect);
        debug!(table = table.name(), sql = %create_sql, "recreating table");

        let mut tx = self.conn.begin().await?;
        sqlx::query(&drop_sql).execute(&mut *tx).await?;
        sqlx::query(&create_sql).execute(&mut *tx).await?;

        let mut written = 0;
        for chunk in data.tuples().chunks(chunk_rows) {
            let sql = insert_sql(table, self.dialect, chunk.len());
            let mut query = sqlx::query(&sql);
            for tuple in chunk {
                for field in tuple.fields() {
                    query = bind_field(query, field);
                }
            }
            written += query.execute(&mut *tx).await?.rows_affected();
            debug!(table = table.name(), written, "flushed batch");
        }
        tx.commit().await?;
        Ok(written)
    }
}
