use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

use tracing::{error, info};

use crate::config::LoaderConfig;
use crate::dataset::DatasetId;
use crate::ddl::parse_create_table;
use crate::error::{LoadError, LoadResult};
use crate::loader::{CsvTableReader, TableData};
use crate::sink::TableSink;

#[derive(Debug, Clone, PartialEq)]
pub struct TableReport {
    pub dataset: DatasetId,
    pub source: PathBuf,
    pub columns: usize,
    pub rows: u64,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub tables: Vec<TableReport>,
}

impl RunReport {
    pub fn total_rows(&self) -> u64 {
        self.tables.iter().map(|t| t.rows).sum()
    }
}

/// Loads every configured dataset, one at a time, into a sink.
///
/// The first failing dataset stops the run. Tables written before it stay
/// written and the datasets after it are not touched.
#[derive(Debug, Clone)]
pub struct BulkLoader {
    base_dir: PathBuf,
    schema_dir: Option<PathBuf>,
    datasets: Vec<DatasetId>,
    reader: CsvTableReader,
}

impl BulkLoader {
    pub fn new(base_dir: &Path, datasets: Vec<DatasetId>) -> Self {
        BulkLoader {
            base_dir: base_dir.to_path_buf(),
            schema_dir: None,
            datasets,
            reader: CsvTableReader::default(),
        }
    }

    pub fn from_config(config: &LoaderConfig) -> LoadResult<Self> {
        config.validate()?;
        Ok(BulkLoader {
            base_dir: config.base_dir.clone(),
            schema_dir: config.schema_dir.clone(),
            datasets: config.dataset_ids()?,
            reader: CsvTableReader::new(config.delimiter_byte()?, config.null_values()),
        })
    }

    pub fn with_schema_dir(mut self, schema_dir: &Path) -> Self {
        self.schema_dir = Some(schema_dir.to_path_buf());
        self
    }

    pub fn datasets(&self) -> &[DatasetId] {
        &self.datasets
    }

    /// Reads and types one dataset without touching any sink.
    pub fn prepare(&self, id: &DatasetId) -> LoadResult<TableData> {
        let schema = match &self.schema_dir {
            Some(dir) => {
                let path = id.schema_path(dir);
                if path.is_file() {
                    let sql = std::fs::read_to_string(&path).map_err(|e| LoadError::io(&path, e))?;
                    Some(Arc::new(parse_create_table(&sql)?))
                } else {
                    None
                }
            }
            None => None,
        };
        self.reader.read(id, &id.source_path(&self.base_dir), schema)
    }

    async fn load_one<S: TableSink>(&self, id: &DatasetId, sink: &mut S) -> LoadResult<TableReport> {
        let start = Instant::now();
        let source = id.source_path(&self.base_dir);
        info!(dataset = %id, source = %source.display(), "loading dataset");
        let data = self.prepare(id)?;
        let rows = sink.replace_table(&data).await?;
        let report = TableReport {
            dataset: id.clone(),
            source,
            columns: data.schema().len(),
            rows,
            elapsed: start.elapsed(),
        };
        info!(
            dataset = %id,
            rows,
            columns = report.columns,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "replaced table"
        );
        Ok(report)
    }

    pub async fn run<S: TableSink>(&self, sink: &mut S) -> LoadResult<RunReport> {
        info!(datasets = self.datasets.len(), base_dir = %self.base_dir.display(), "starting load");
        let mut report = RunReport::default();
        for id in &self.datasets {
            match self.load_one(id, sink).await {
                Ok(table) => report.tables.push(table),
                Err(e) => {
                    error!(dataset = %id, error = %e, "aborting run");
                    return Err(LoadError::Dataset {
                        dataset: id.to_string(),
                        source: Box::new(e),
                    });
                }
            }
        }
        info!(
            tables = report.tables.len(),
            rows = report.total_rows(),
            "load finished"
        );
        Ok(report)
    }
}
