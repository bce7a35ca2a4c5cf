use std::{
    fmt,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use regex::Regex;

use crate::error::{LoadError, LoadResult};

/// The "Famous Paintings" tables loaded when no dataset list is configured.
pub const DEFAULT_DATASETS: [&str; 8] = [
    "artist",
    "canvas_size",
    "image_link",
    "museum_hours",
    "museum",
    "product_size",
    "subject",
    "work",
];

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap())
}

/// Name shared by a source csv file and its destination table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetId(String);

impl DatasetId {
    pub fn new(name: &str) -> LoadResult<Self> {
        if identifier_pattern().is_match(name) {
            Ok(DatasetId(name.to_string()))
        } else {
            Err(LoadError::InvalidIdentifier(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `<base_dir>/<id>.csv`
    pub fn source_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(format!("{}.csv", self.0))
    }

    /// `<schema_dir>/<id>.sql`
    pub fn schema_path(&self, schema_dir: &Path) -> PathBuf {
        schema_dir.join(format!("{}.sql", self.0))
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn default_datasets() -> Vec<DatasetId> {
    DEFAULT_DATASETS
        .iter()
        .map(|name| DatasetId(name.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("artist")]
    #[case("museum_hours")]
    #[case("_staging")]
    #[case("work2")]
    fn test_valid_identifier(#[case] name: &str) {
        assert_eq!(DatasetId::new(name).unwrap().as_str(), name);
    }

    #[rstest]
    #[case("")]
    #[case("2work")]
    #[case("museum-hours")]
    #[case("artist; DROP TABLE work")]
    #[case("../artist")]
    fn test_invalid_identifier(#[case] name: &str) {
        assert!(matches!(
            DatasetId::new(name),
            Err(LoadError::InvalidIdentifier(n)) if n == name
        ));
    }

    #[test]
    fn test_paths() {
        let id = DatasetId::new("canvas_size").unwrap();
        assert_eq!(
            id.source_path(Path::new("/data/paintings")),
            PathBuf::from("/data/paintings/canvas_size.csv")
        );
        assert_eq!(
            id.schema_path(Path::new("schemas")),
            PathBuf::from("schemas/canvas_size.sql")
        );
    }

    #[test]
    fn test_default_datasets_are_valid() {
        let defaults = default_datasets();
        assert_eq!(defaults.len(), 8);
        for id in defaults {
            assert!(DatasetId::new(id.as_str()).is_ok());
        }
    }
}
