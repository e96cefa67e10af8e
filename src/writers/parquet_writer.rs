use crate::error::{ProcessingError, Result};
use crate::models::{Cell, Table};
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE,
};
use arrow::array::{ArrayRef, Date32Array, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Arrow type chosen for a table column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Float,
    Date,
    Utf8,
}

pub struct ParquetWriter {
    compression: Compression,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Unsupported(format!(
                    "compression '{}'",
                    compression
                )))
            }
        };
        Ok(self)
    }

    /// Write a table to a Parquet file, one nullable Arrow column per table column
    pub fn write_table(&self, table: &Table, path: &Path) -> Result<()> {
        let kinds: Vec<ColumnKind> = (0..table.columns().len())
            .map(|index| column_kind(table, index))
            .collect();
        let schema = create_schema(table, &kinds);
        let batch = table_to_batch(table, &kinds, schema.clone())?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(DEFAULT_ROW_GROUP_SIZE)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
        writer.write(&batch)?;
        writer.close()?;

        Ok(())
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let total_rows = metadata.file_metadata().num_rows();
        let row_groups = metadata.num_row_groups();
        let schema = metadata.file_metadata().schema_descr();
        let column_names = schema
            .columns()
            .iter()
            .map(|column| column.name().to_string())
            .collect();
        let file_size = std::fs::metadata(path)?.len();

        Ok(ParquetFileInfo {
            total_rows,
            row_groups,
            column_names,
            file_size,
            compression: self.compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn column_kind(table: &Table, index: usize) -> ColumnKind {
    let mut kind = None;
    for cell in table.column_cells(index) {
        let cell_kind = match cell {
            Cell::Missing => continue,
            Cell::Number(_) => ColumnKind::Float,
            Cell::Date(_) => ColumnKind::Date,
            Cell::Text(_) => return ColumnKind::Utf8,
        };
        match kind {
            None => kind = Some(cell_kind),
            Some(existing) if existing != cell_kind => return ColumnKind::Utf8,
            Some(_) => {}
        }
    }
    kind.unwrap_or(ColumnKind::Utf8)
}

fn create_schema(table: &Table, kinds: &[ColumnKind]) -> Arc<Schema> {
    let fields: Vec<Field> = table
        .columns()
        .iter()
        .zip(kinds)
        .map(|(name, kind)| {
            let data_type = match kind {
                ColumnKind::Float => DataType::Float64,
                ColumnKind::Date => DataType::Date32,
                ColumnKind::Utf8 => DataType::Utf8,
            };
            Field::new(name, data_type, true)
        })
        .collect();

    Arc::new(Schema::new(fields))
}

fn table_to_batch(table: &Table, kinds: &[ColumnKind], schema: Arc<Schema>) -> Result<RecordBatch> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();

    let arrays: Vec<ArrayRef> = kinds
        .iter()
        .enumerate()
        .map(|(index, kind)| -> ArrayRef {
            let cells = table.column_cells(index);
            match kind {
                ColumnKind::Float => Arc::new(Float64Array::from(
                    cells.map(Cell::as_f64).collect::<Vec<_>>(),
                )),
                ColumnKind::Date => Arc::new(Date32Array::from(
                    cells
                        .map(|c| c.as_date().map(|d| (d - epoch).num_days() as i32))
                        .collect::<Vec<_>>(),
                )),
                ColumnKind::Utf8 => Arc::new(StringArray::from(
                    cells
                        .map(|c| (!c.is_missing()).then(|| c.render()))
                        .collect::<Vec<_>>(),
                )),
            }
        })
        .collect();

    Ok(RecordBatch::try_new(schema, arrays)?)
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: usize,
    pub column_names: Vec<String>,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Parquet file: {} rows, {} columns, {} row groups, {:.2} KB, compression {:?}",
            self.total_rows,
            self.column_names.len(),
            self.row_groups,
            self.file_size as f64 / 1024.0,
            self.compression
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_table() -> Table {
        let date = NaiveDate::from_ymd_opt(2014, 4, 1).unwrap();
        Table::with_rows(
            "final",
            vec![
                "date".to_string(),
                "Wind Direction".to_string(),
                "pm25_average".to_string(),
            ],
            vec![
                vec![Cell::Date(date), Cell::text("North"), Cell::Number(2.5)],
                vec![Cell::Date(date), Cell::Missing, Cell::Missing],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_column_kinds() {
        let table = sample_table();
        assert_eq!(column_kind(&table, 0), ColumnKind::Date);
        assert_eq!(column_kind(&table, 1), ColumnKind::Utf8);
        assert_eq!(column_kind(&table, 2), ColumnKind::Float);
    }

    #[test]
    fn test_write_table() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("final.parquet");
        let writer = ParquetWriter::new().with_compression("zstd")?;
        writer.write_table(&sample_table(), &path)?;

        let info = writer.get_file_info(&path)?;
        assert_eq!(info.total_rows, 2);
        assert_eq!(info.column_names, ["date", "Wind Direction", "pm25_average"]);
        Ok(())
    }

    #[test]
    fn test_unknown_compression_rejected() {
        assert!(ParquetWriter::new().with_compression("brotli-max").is_err());
    }
}
