pub mod catalog;
pub mod conductor;
pub mod config;
pub mod database;
pub mod dataset;
pub mod ddl;
mod error;
pub mod loader;
pub mod sink;
mod tuple;

pub use error::{LoadError, LoadResult};
pub use tuple::{Field, Tuple};

pub mod prelude {
    pub use crate::catalog::prelude::*;
    pub use crate::conductor::{BulkLoader, RunReport, TableReport};
    pub use crate::config::{ConfigOverrides, LoaderConfig};
    pub use crate::database::{DatabaseUrl, Dialect};
    pub use crate::dataset::DatasetId;
    pub use crate::loader::prelude::*;
    pub use crate::sink::{MemorySink, SqlSink, TableSink};
    pub use crate::{Field, LoadError, LoadResult, Tuple};
}
