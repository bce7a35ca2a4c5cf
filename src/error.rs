use std::path::PathBuf;

use sqlparser::parser::ParserError;
use thiserror::Error;

use crate::catalog::DataType;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed csv in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("invalid schema for table {table}: {reason}")]
    Schema { table: String, reason: String },
    #[error("table {table}, row {row}: cannot read {value:?} in column {column} as {data_type}")]
    Field {
        table: String,
        row: u64,
        column: String,
        value: String,
        data_type: DataType,
    },
    #[error("invalid dataset identifier {0:?}")]
    InvalidIdentifier(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("cannot parse schema definition: {0}")]
    SqlParse(#[from] ParserError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("loading dataset {dataset} failed")]
    Dataset {
        dataset: String,
        #[source]
        source: Box<LoadError>,
    },
}

impl LoadError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        LoadError::Csv {
            path: path.into(),
            source,
        }
    }

    pub fn schema(table: &str, reason: impl Into<String>) -> Self {
        LoadError::Schema {
            table: table.to_string(),
            reason: reason.into(),
        }
    }

    /// Innermost error, skipping the per-dataset wrapper.
    pub fn root(&self) -> &LoadError {
        match self {
            LoadError::Dataset { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type LoadResult<T> = Result<T, LoadError>;
