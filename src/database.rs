use std::fmt;

use url::Url;

use crate::error::{LoadError, LoadResult};

/// SQL flavour spoken by the destination database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

impl Dialect {
    /// Highest number of bind parameters a single statement may carry.
    pub fn max_bind_params(&self) -> usize {
        match self {
            Dialect::Postgres => 65535,
            Dialect::Sqlite => 32766,
        }
    }

    /// Placeholder for the 1-based parameter `idx`.
    pub fn placeholder(&self, idx: usize) -> String {
        match self {
            Dialect::Postgres => format!("${}", idx),
            Dialect::Sqlite => "?".to_string(),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Postgres => write!(f, "postgres"),
            Dialect::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// A destination connection string.
///
/// Accepts `<dialect>+<driver>://<user>:<password>@<host>/<database>` as written
/// for other database toolkits; the driver suffix is dropped because sqlx picks
/// its own driver from the dialect.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseUrl {
    dialect: Dialect,
    url: String,
}

impl DatabaseUrl {
    pub fn parse(raw: &str) -> LoadResult<Self> {
        let raw = raw.trim();
        let (scheme, rest) = raw
            .split_once(':')
            .ok_or_else(|| LoadError::Config(format!("{:?} is not a connection string", raw)))?;
        let dialect_name = scheme.split('+').next().unwrap_or(scheme).to_ascii_lowercase();
        let dialect = match dialect_name.as_str() {
            "postgresql" | "postgres" => Dialect::Postgres,
            "sqlite" => Dialect::Sqlite,
            other => {
                return Err(LoadError::Config(format!(
                    "unsupported database dialect {:?}",
                    other
                )))
            }
        };
        let url = format!("{}:{}", dialect_name, rest);
        if dialect == Dialect::Postgres {
            Url::parse(&url)
                .map_err(|e| LoadError::Config(format!("invalid connection string: {}", e)))?;
        }
        Ok(DatabaseUrl { dialect, url })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Connection string in the form sqlx expects.
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Connection string with the password replaced, for logs.
    pub fn masked(&self) -> String {
        match Url::parse(&self.url) {
            Ok(mut url) if url.password().is_some() => {
                let _ = url.set_password(Some("****"));
                url.to_string()
            }
            _ => self.url.clone(),
        }
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

impl fmt::Debug for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseUrl")
            .field("dialect", &self.dialect)
            .field("url", &self.masked())
            .finish()
    }
}
