//! SQL text for replacing a table, and `CREATE TABLE` parsing for declared schemas.

use sqlparser::ast::{ColumnOption, Ident, Statement};
use sqlparser::parser::ParserError;
use sqlparser::{dialect::GenericDialect, parser::Parser};

use crate::catalog::{ColumnDef, DataType, Schema, Table};
use crate::database::Dialect;
use crate::error::LoadResult;

/// Double-quotes an identifier, doubling any embedded quote.
pub fn quote_ident(name: &str) -> String {
    Ident::with_quote('"', name).to_string()
}

pub fn sql_type(data_type: &DataType, dialect: Dialect) -> &'static str {
    match (data_type, dialect) {
        (DataType::Boolean, _) => "BOOLEAN",
        (DataType::Int, _) => "BIGINT",
        (DataType::Float, Dialect::Postgres) => "DOUBLE PRECISION",
        (DataType::Float, Dialect::Sqlite) => "REAL",
        (DataType::Text, _) => "TEXT",
    }
}

pub fn drop_table_sql(table_name: &str) -> String {
    format!("DROP TABLE IF EXISTS {}", quote_ident(table_name))
}

pub fn create_table_sql(table: &Table, dialect: Dialect) -> String {
    let schema = table.schema();
    let columns: Vec<String> = schema
        .columns()
        .iter()
        .map(|col| {
            let mut def = format!(
                "{} {}",
                quote_ident(col.name()),
                sql_type(col.data_type(), dialect)
            );
            if !col.is_nullable() {
                def.push_str(" NOT NULL");
            }
            def
        })
        .collect();
    format!(
        "CREATE TABLE {} ({})",
        quote_ident(table.name()),
        columns.join(", ")
    )
}

/// Multi-row insert with one placeholder per cell.
pub fn insert_sql(table: &Table, dialect: Dialect, num_rows: usize) -> String {
    let schema = table.schema();
    let columns: Vec<String> = schema
        .columns()
        .iter()
        .map(|c| quote_ident(c.name()))
        .collect();
    let num_cols = columns.len();
    let mut sql = format!(
        "INSERT INTO {} ({}) VALUES ",
        quote_ident(table.name()),
        columns.join(", ")
    );
    for row in 0..num_rows {
        if row > 0 {
            sql.push_str(", ");
        }
        sql.push('(');
        for col in 0..num_cols {
            if col > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&dialect.placeholder(row * num_cols + col + 1));
        }
        sql.push(')');
    }
    sql
}

/// Rows per insert statement: `batch_size`, capped by the dialect's bind limit.
pub fn rows_per_insert(dialect: Dialect, num_cols: usize, batch_size: usize) -> usize {
    let by_params = dialect.max_bind_params() / num_cols.max(1);
    batch_size.min(by_params).max(1)
}

/// Maps a declared SQL type onto the loader's types by its base name, so
/// `VARCHAR(255)` and `NUMERIC(10, 2)` resolve like `VARCHAR` and `NUMERIC`.
fn column_type(declared: &sqlparser::ast::DataType) -> Result<DataType, ParserError> {
    let text = declared.to_string().to_ascii_uppercase();
    let base = text.split('(').next().unwrap_or(&text).trim();
    match base {
        "INT" | "INTEGER" | "BIGINT" | "SMALLINT" | "INT2" | "INT4" | "INT8" => Ok(DataType::Int),
        "REAL" | "FLOAT" | "FLOAT4" | "FLOAT8" | "DOUBLE" | "DOUBLE PRECISION" | "DECIMAL"
        | "NUMERIC" => Ok(DataType::Float),
        "BOOLEAN" | "BOOL" => Ok(DataType::Boolean),
        "TEXT" | "CHAR" | "CHARACTER" | "VARCHAR" | "CHARACTER VARYING" | "DATE" | "TIMESTAMP" => {
            Ok(DataType::Text)
        }
        _ => Err(ParserError::ParserError(format!(
            "Unsupported data type: {}",
            declared
        ))),
    }
}

/// Parses a single `CREATE TABLE` statement into a schema. The table name in the
/// statement is ignored.
pub fn parse_create_table(sql: &str) -> LoadResult<Schema> {
    let dialect = GenericDialect {};
    let statements = Parser::new(&dialect)
        .try_with_sql(sql)?
        .parse_statements()?;
    let statement = statements
        .into_iter()
        .next()
        .ok_or_else(|| ParserError::ParserError("Empty schema definition".to_string()))?;
    match statement {
        Statement::CreateTable(ct) => {
            let col_defs = ct
                .columns
                .iter()
                .map(|c| {
                    let data_type = column_type(&c.data_type)?;
                    let not_null = c
                        .options
                        .iter()
                        .any(|o| matches!(o.option, ColumnOption::NotNull));
                    Ok::<_, ParserError>(ColumnDef::new(&c.name.value, data_type, !not_null))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Schema::new(col_defs))
        }
        other => Err(ParserError::ParserError(format!(
            "Expected a CREATE TABLE statement, got {}",
            other
        ))
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;
    use std::sync::Arc;

    fn artist() -> Table {
        Table::new(
            "artist",
            Arc::new(Schema::new(vec![
                ColumnDef::new("artist_id", DataType::Int, false),
                ColumnDef::new("full_name", DataType::Text, true),
                ColumnDef::new("weight", DataType::Float, true),
            ])),
        )
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("work"), "\"work\"");
        assert_eq!(quote_ident("odd\"name"), "\"odd\"\"name\"");
    }

    #[test]
    fn test_create_table_sql() {
        assert_eq!(
            create_table_sql(&artist(), Dialect::Postgres),
            "CREATE TABLE \"artist\" (\"artist_id\" BIGINT NOT NULL, \"full_name\" TEXT, \"weight\" DOUBLE PRECISION)"
        );
        assert_eq!(
            create_table_sql(&artist(), Dialect::Sqlite),
            "CREATE TABLE \"artist\" (\"artist_id\" BIGINT NOT NULL, \"full_name\" TEXT, \"weight\" REAL)"
        );
        assert_eq!(drop_table_sql("artist"), "DROP TABLE IF EXISTS \"artist\"");
    }

    #[test]
    fn test_insert_sql() {
        assert_eq!(
            insert_sql(&artist(), Dialect::Postgres, 2),
            "INSERT INTO \"artist\" (\"artist_id\", \"full_name\", \"weight\") VALUES ($1, $2, $3), ($4, $5, $6)"
        );
        assert_eq!(
            insert_sql(&artist(), Dialect::Sqlite, 1),
            "INSERT INTO \"artist\" (\"artist_id\", \"full_name\", \"weight\") VALUES (?, ?, ?)"
        );
    }

    #[test]
    fn test_rows_per_insert() {
        assert_eq!(rows_per_insert(Dialect::Postgres, 3, 1000), 1000);
        assert_eq!(rows_per_insert(Dialect::Postgres, 100, 1000), 655);
        assert_eq!(rows_per_insert(Dialect::Sqlite, 100, 1000), 327);
        assert_eq!(rows_per_insert(Dialect::Sqlite, 40000, 1000), 1);
    }

    #[test]
    fn test_parse_create_table() {
        let sql = "CREATE TABLE museum (
            museum_id INTEGER NOT NULL,
            name VARCHAR(255) NOT NULL,
            city TEXT,
            postal DOUBLE PRECISION,
            on_display BOOLEAN
        );";
        let schema = parse_create_table(sql).unwrap();
        assert_eq!(
            schema.columns(),
            &vec![
                ColumnDef::new("museum_id", DataType::Int, false),
                ColumnDef::new("name", DataType::Text, false),
                ColumnDef::new("city", DataType::Text, true),
                ColumnDef::new("postal", DataType::Float, true),
                ColumnDef::new("on_display", DataType::Boolean, true),
            ]
        );
    }

    #[test]
    fn test_parse_create_table_rejects_other_statements() {
        assert!(matches!(
            parse_create_table("SELECT * FROM museum"),
            Err(LoadError::SqlParse(_))
        ));
        assert!(matches!(
            parse_create_table("CREATE TABLE t (shape POINT)"),
            Err(LoadError::SqlParse(_))
        ));
        assert!(parse_create_table("").is_err());
    }
}
