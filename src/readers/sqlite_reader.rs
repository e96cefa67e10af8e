//! Extraction of whole tables from downloaded SQLite databases.

use crate::error::{ProcessingError, Result};
use crate::models::{Cell, Row, Table};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row as _, SqlitePool, TypeInfo, ValueRef};
use std::path::Path;
use tracing::debug;

pub struct SqliteTableReader;

impl SqliteTableReader {
    pub fn new() -> Self {
        Self
    }

    /// Read every row of `table` (`SELECT *`), decoding each value by its
    /// SQLite storage class
    pub async fn read_table(&self, db_path: &Path, table: &str) -> Result<Table> {
        validate_identifier(table)?;

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .read_only(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let result = self.read_with_pool(&pool, db_path, table).await;
        pool.close().await;
        result
    }

    async fn read_with_pool(&self, pool: &SqlitePool, db_path: &Path, table: &str) -> Result<Table> {
        let columns = self.table_columns(pool, table).await?;
        if columns.is_empty() {
            return Err(ProcessingError::MissingTable {
                table: table.to_string(),
                path: db_path.to_path_buf(),
            });
        }

        let rows = sqlx::query(&format!("SELECT * FROM \"{}\"", table))
            .fetch_all(pool)
            .await?;
        debug!("Fetched {} rows from {}.{}", rows.len(), db_path.display(), table);

        let mut output = Table::new(table, columns)?;
        for row in &rows {
            output.push_row(decode_row(row)?)?;
        }

        Ok(output)
    }

    /// Column names in declaration order; empty when the table does not exist
    async fn table_columns(&self, pool: &SqlitePool, table: &str) -> Result<Vec<String>> {
        let rows = sqlx::query(&format!("PRAGMA table_info(\"{}\")", table))
            .fetch_all(pool)
            .await?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("name").map_err(ProcessingError::from))
            .collect()
    }
}

impl Default for SqliteTableReader {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_row(row: &SqliteRow) -> Result<Row> {
    (0..row.len()).map(|index| decode_cell(row, index)).collect()
}

fn decode_cell(row: &SqliteRow, index: usize) -> Result<Cell> {
    let storage_class = {
        let raw = row.try_get_raw(index)?;
        if raw.is_null() {
            return Ok(Cell::Missing);
        }
        raw.type_info().name().to_string()
    };

    let cell = match storage_class.as_str() {
        "INTEGER" => Cell::number(row.try_get_unchecked::<i64, _>(index)? as f64),
        "REAL" => Cell::number(row.try_get_unchecked::<f64, _>(index)?),
        "TEXT" => Cell::parse(&row.try_get_unchecked::<String, _>(index)?),
        _ => {
            let bytes = row.try_get_unchecked::<Vec<u8>, _>(index)?;
            Cell::parse(&String::from_utf8_lossy(&bytes))
        }
    };

    Ok(cell)
}

/// Table names are interpolated into SQL, so only plain identifiers pass
fn validate_identifier(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());

    if valid {
        Ok(())
    } else {
        Err(ProcessingError::InvalidFormat(format!(
            "Invalid table name: '{}'",
            name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_database(path: &Path) -> Result<()> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        sqlx::query(
            "CREATE TABLE air_quality (data_ref TEXT, date TEXT, pm25_north REAL, psi_north INTEGER)",
        )
        .execute(&pool)
        .await?;
        sqlx::query("INSERT INTO air_quality VALUES ('A1', '01/04/2014', 12.5, 40)")
            .execute(&pool)
            .await?;
        sqlx::query("INSERT INTO air_quality VALUES ('A2', '02/04/2014', NULL, '--')")
            .execute(&pool)
            .await?;

        pool.close().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_read_table_decodes_storage_classes() -> Result<()> {
        let dir = TempDir::new()?;
        let db_path = dir.path().join("air_quality.db");
        create_database(&db_path).await?;

        let table = SqliteTableReader::new()
            .read_table(&db_path, "air_quality")
            .await?;

        assert_eq!(table.columns(), ["data_ref", "date", "pm25_north", "psi_north"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0][2], Cell::Number(12.5));
        assert_eq!(table.rows()[0][3], Cell::Number(40.0));
        assert_eq!(table.rows()[1][2], Cell::Missing);
        assert_eq!(table.rows()[1][3], Cell::Missing);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_table_is_reported() -> Result<()> {
        let dir = TempDir::new()?;
        let db_path = dir.path().join("air_quality.db");
        create_database(&db_path).await?;

        let err = SqliteTableReader::new()
            .read_table(&db_path, "weather")
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessingError::MissingTable { .. }));
        Ok(())
    }

    #[test]
    fn test_identifier_validation() {
        assert!(validate_identifier("air_quality").is_ok());
        assert!(validate_identifier("weather; DROP TABLE x").is_err());
        assert!(validate_identifier("1weather").is_err());
    }
}
