use crate::error::Result;
use crate::models::{Cell, Row, Table};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub struct TableReader {
    drop_index_column: bool,
}

impl TableReader {
    pub fn new() -> Self {
        Self {
            drop_index_column: true,
        }
    }

    /// Keep a leading unnamed column instead of treating it as a row index
    pub fn with_index_column(mut self) -> Self {
        self.drop_index_column = false;
        self
    }

    /// Read a CSV file with a header row; the table is named after the file stem
    pub fn read_table(&self, path: &Path) -> Result<Table> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("table")
            .to_string();
        let file = File::open(path)?;
        self.read_from(file, &name)
    }

    pub fn read_from<R: Read>(&self, source: R, name: &str) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(source);

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();

        // Files written with a row index carry an unnamed first column
        let skip = usize::from(
            self.drop_index_column
                && headers
                    .first()
                    .is_some_and(|h| h.is_empty() || h.starts_with("Unnamed: 0")),
        );

        let mut table = Table::new(name, headers.into_iter().skip(skip).collect())?;
        for record in reader.records() {
            let record = record?;
            let row: Row = record.iter().skip(skip).map(Cell::parse).collect();
            table.push_row(row)?;
        }

        Ok(table)
    }
}

impl Default for TableReader {
    fn default() -> Self {
        Self::new()
    }
}
