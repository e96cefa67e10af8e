use crate::error::Result;
use crate::models::Table;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub struct TableWriter;

impl TableWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write a table as CSV with a header row, creating parent directories
    pub fn write_table(&self, table: &Table, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(path)?;
        self.write_to(table, file)
    }

    pub fn write_to<W: Write>(&self, table: &Table, sink: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(sink);

        writer.write_record(table.columns())?;
        for row in table.rows() {
            writer.write_record(row.iter().map(|cell| cell.render()))?;
        }
        writer.flush()?;

        Ok(())
    }
}

impl Default for TableWriter {
    fn default() -> Self {
        Self::new()
    }
}
