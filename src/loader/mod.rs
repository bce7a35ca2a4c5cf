pub mod csv_reader;
pub mod infer;

use std::{path::Path, sync::Arc};

use tracing::debug;

use crate::{
    catalog::{SchemaRef, Table, TableRef},
    dataset::DatasetId,
    error::{LoadError, LoadResult},
    tuple::{Field, Tuple},
};

pub use csv_reader::{decode_source, read_csv_file, RawFrame};
pub use infer::infer_schema;

pub mod prelude {
    pub use super::{read_table, CsvTableReader, NullValues, TableData};
}

/// Raw cell contents read as SQL NULL, the same set pandas uses by default.
pub const DEFAULT_NULL_VALUES: [&str; 19] = [
    "", "NA", "N/A", "n/a", "#N/A", "#N/A N/A", "#NA", "<NA>", "NULL", "null", "NaN", "-NaN",
    "nan", "-nan", "None", "1.#IND", "-1.#IND", "1.#QNAN", "-1.#QNAN",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullValues(Vec<String>);

impl Default for NullValues {
    fn default() -> Self {
        NullValues(DEFAULT_NULL_VALUES.iter().map(|s| s.to_string()).collect())
    }
}

impl NullValues {
    pub fn new(tokens: Vec<String>) -> Self {
        NullValues(tokens)
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    /// True for a configured token, and for anything that parses as a float NaN
    /// (`NAN`, `-NaN`, ...), which no column type can store.
    pub fn is_null(&self, raw: &str) -> bool {
        let raw = raw.trim();
        self.0.iter().any(|token| token == raw) || raw.parse::<f64>().is_ok_and(f64::is_nan)
    }
}

/// A parsed table, ready to be written to a sink.
#[derive(Debug, Clone)]
pub struct TableData {
    table: TableRef,
    tuples: Vec<Tuple>,
}

impl TableData {
    pub fn new(table: TableRef, tuples: Vec<Tuple>) -> Self {
        TableData { table, tuples }
    }

    pub fn table(&self) -> &TableRef {
        &self.table
    }

    pub fn name(&self) -> &str {
        self.table.name()
    }

    pub fn schema(&self) -> SchemaRef {
        self.table.schema()
    }

    pub fn tuples(&self) -> &Vec<Tuple> {
        &self.tuples
    }

    pub fn num_rows(&self) -> usize {
        self.tuples.len()
    }
}

/// Reads `<id>.csv` style sources into typed tables.
#[derive(Debug, Clone)]
pub struct CsvTableReader {
    delimiter: u8,
    null_values: NullValues,
}

impl Default for CsvTableReader {
    fn default() -> Self {
        CsvTableReader {
            delimiter: b',',
            null_values: NullValues::default(),
        }
    }
}

impl CsvTableReader {
    pub fn new(delimiter: u8, null_values: NullValues) -> Self {
        CsvTableReader {
            delimiter,
            null_values,
        }
    }

    /// Reads `path` into a table named `id`. With `schema` the declared column types
    /// are used, otherwise they are inferred from the data.
    pub fn read(
        &self,
        id: &DatasetId,
        path: &Path,
        schema: Option<SchemaRef>,
    ) -> LoadResult<TableData> {
        let frame = read_csv_file(path, self.delimiter)?;
        self.build(id, frame, schema)
    }

    pub fn build(
        &self,
        id: &DatasetId,
        frame: RawFrame,
        schema: Option<SchemaRef>,
    ) -> LoadResult<TableData> {
        let name = id.as_str();
        let schema = match schema {
            Some(declared) => {
                let header: Vec<&str> = frame.header.iter().collect();
                if declared.column_names() != header {
                    return Err(LoadError::schema(
                        name,
                        format!(
                            "declared columns {:?} do not match csv header {:?}",
                            declared.column_names(),
                            header
                        ),
                    ));
                }
                declared
            }
            None => Arc::new(infer_schema(
                &frame.header,
                &frame.records,
                &self.null_values,
            )),
        };
        if schema.is_empty() {
            return Err(LoadError::schema(name, "csv header has no columns"));
        }
        if let Some(dup) = schema.find_duplicate() {
            return Err(LoadError::schema(
                name,
                format!("column {:?} appears more than once", dup),
            ));
        }
        debug!(table = name, %schema, "resolved schema");

        let mut tuples = Vec::with_capacity(frame.records.len());
        for (idx, rec) in frame.records.iter().enumerate() {
            let mut tuple = Tuple::with_capacity(schema.len());
            for (i, raw) in rec.iter().enumerate() {
                let col_def = schema.get_column(i);
                let is_null = self.null_values.is_null(raw);
                let field = Field::from_str(col_def, raw, is_null).map_err(|_| LoadError::Field {
                    table: name.to_string(),
                    row: frame.line_of(idx),
                    column: col_def.name().to_string(),
                    value: raw.to_string(),
                    data_type: *col_def.data_type(),
                })?;
                tuple.push(field);
            }
            tuples.push(tuple);
        }
        Ok(TableData::new(Arc::new(Table::new(name, schema)), tuples))
    }
}

/// Reads one dataset with the default delimiter and null tokens.
pub fn read_table(id: &DatasetId, base_dir: &Path) -> LoadResult<TableData> {
    CsvTableReader::default().read(id, &id.source_path(base_dir), None)
}
