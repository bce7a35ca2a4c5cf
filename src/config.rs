//! Loader configuration.
//!
//! Values come from, in increasing precedence: built-in defaults, a YAML file,
//! environment variables and command line flags. The last two are resolved by the
//! binary and handed over as [`ConfigOverrides`].

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::database::DatabaseUrl;
use crate::dataset::{DatasetId, DEFAULT_DATASETS};
use crate::error::{LoadError, LoadResult};
use crate::loader::{NullValues, DEFAULT_NULL_VALUES};
use crate::sink::DEFAULT_BATCH_SIZE;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
    /// Directory holding `<dataset>.csv` files.
    pub base_dir: PathBuf,
    /// Datasets to load, in order.
    pub datasets: Vec<String>,
    pub database_url: Option<String>,
    /// Directory holding optional `<dataset>.sql` schema definitions.
    pub schema_dir: Option<PathBuf>,
    /// Maximum rows per insert statement.
    pub batch_size: usize,
    pub delimiter: char,
    /// Cell contents read as NULL.
    pub null_values: Vec<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            base_dir: PathBuf::from("."),
            datasets: DEFAULT_DATASETS.iter().map(|s| s.to_string()).collect(),
            database_url: None,
            schema_dir: None,
            batch_size: DEFAULT_BATCH_SIZE,
            delimiter: ',',
            null_values: DEFAULT_NULL_VALUES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Values that replace file settings when present.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_dir: Option<PathBuf>,
    pub datasets: Vec<String>,
    pub database_url: Option<String>,
    pub schema_dir: Option<PathBuf>,
    pub batch_size: Option<usize>,
    pub delimiter: Option<char>,
}

impl LoaderConfig {
    pub fn from_yaml_str(yaml: &str) -> LoadResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| LoadError::Config(e.to_string()))
    }

    pub fn from_file(path: &Path) -> LoadResult<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        Self::from_yaml_str(&yaml)
            .map_err(|e| LoadError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn merge(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(base_dir) = overrides.base_dir {
            self.base_dir = base_dir;
        }
        if !overrides.datasets.is_empty() {
            self.datasets = overrides.datasets;
        }
        if overrides.database_url.is_some() {
            self.database_url = overrides.database_url;
        }
        if overrides.schema_dir.is_some() {
            self.schema_dir = overrides.schema_dir;
        }
        if let Some(batch_size) = overrides.batch_size {
            self.batch_size = batch_size;
        }
        if let Some(delimiter) = overrides.delimiter {
            self.delimiter = delimiter;
        }
        self
    }

    pub fn dataset_ids(&self) -> LoadResult<Vec<DatasetId>> {
        self.datasets.iter().map(|name| DatasetId::new(name)).collect()
    }

    pub fn delimiter_byte(&self) -> LoadResult<u8> {
        if self.delimiter.is_ascii() && self.delimiter != '"' && self.delimiter != '\n' {
            Ok(self.delimiter as u8)
        } else {
            Err(LoadError::Config(format!(
                "delimiter {:?} must be a single ascii character",
                self.delimiter
            )))
        }
    }

    pub fn null_values(&self) -> NullValues {
        NullValues::new(self.null_values.clone())
    }

    pub fn database_url(&self) -> LoadResult<DatabaseUrl> {
        let raw = self
            .database_url
            .as_deref()
            .ok_or_else(|| LoadError::Config("no database url configured".to_string()))?;
        DatabaseUrl::parse(raw)
    }

    /// Checks everything that does not need the filesystem or the database.
    pub fn validate(&self) -> LoadResult<()> {
        if self.datasets.is_empty() {
            return Err(LoadError::Config("dataset list is empty".to_string()));
        }
        let ids = self.dataset_ids()?;
        if let Some(dup) = ids
            .iter()
            .enumerate()
            .find_map(|(i, id)| ids[..i].contains(id).then_some(id))
        {
            return Err(LoadError::Config(format!("dataset {} listed twice", dup)));
        }
        if self.batch_size == 0 {
            return Err(LoadError::Config("batch_size must be at least 1".to_string()));
        }
        self.delimiter_byte()?;
        Ok(())
    }
}
