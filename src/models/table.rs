use std::collections::HashSet;

use crate::error::{ProcessingError, Result};
use crate::models::Cell;

/// Cells of one row, aligned with the owning table's columns
pub type Row = Vec<Cell>;

/// An ordered set of rows sharing a fixed column schema
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Result<Self> {
        let name = name.into();
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(ProcessingError::DuplicateColumn {
                    column: column.clone(),
                    table: name,
                });
            }
        }

        Ok(Self {
            name,
            columns,
            rows: Vec::new(),
        })
    }

    /// Build a table and check every row against the schema width
    pub fn with_rows(name: impl Into<String>, columns: Vec<String>, rows: Vec<Row>) -> Result<Self> {
        let mut table = Self::new(name, columns)?;
        table.rows.reserve(rows.len());
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Same schema and name, different rows. Widths are trusted.
    pub(crate) fn with_same_schema(&self, rows: Vec<Row>) -> Self {
        Self {
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push_row(&mut self, row: Row) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(ProcessingError::RowWidth {
                table: self.name.clone(),
                row: self.rows.len(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Index of a column that must exist
    pub fn require_column(&self, column: &str) -> Result<usize> {
        self.column_index(column)
            .ok_or_else(|| ProcessingError::missing_column(column, &self.name))
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let index = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[index])
    }

    /// Iterate the cells of one column
    pub fn column_cells(&self, index: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |row| &row[index])
    }

    /// Present numeric values of a column
    pub fn column_numbers(&self, index: usize) -> Vec<f64> {
        self.column_cells(index).filter_map(Cell::as_f64).collect()
    }

    /// Replace each cell of a column in place
    pub fn map_column<F>(&mut self, index: usize, mut f: F)
    where
        F: FnMut(&Cell) -> Cell,
    {
        for row in &mut self.rows {
            row[index] = f(&row[index]);
        }
    }

    pub fn missing_count(&self, index: usize) -> usize {
        self.column_cells(index).filter(|c| c.is_missing()).count()
    }

    /// A column is numeric when every present cell is a number
    pub fn is_numeric_column(&self, index: usize) -> bool {
        self.column_cells(index)
            .all(|c| matches!(c, Cell::Missing | Cell::Number(_)))
    }

    /// Append a column computed from whole rows
    pub fn add_column<F>(&mut self, column: &str, f: F) -> Result<()>
    where
        F: Fn(&Row) -> Cell,
    {
        if self.has_column(column) {
            return Err(ProcessingError::DuplicateColumn {
                column: column.to_string(),
                table: self.name.clone(),
            });
        }

        for row in &mut self.rows {
            let cell = f(row);
            row.push(cell);
        }
        self.columns.push(column.to_string());
        Ok(())
    }

    /// Remove the named columns; every name must exist
    pub fn drop_columns(self, columns: &[&str]) -> Result<Self> {
        let mut drop = vec![false; self.columns.len()];
        for column in columns {
            drop[self.require_column(column)?] = true;
        }

        let keep = |cells: Vec<Cell>| -> Vec<Cell> {
            cells
                .into_iter()
                .zip(&drop)
                .filter_map(|(cell, dropped)| (!dropped).then_some(cell))
                .collect()
        };

        let columns = self
            .columns
            .into_iter()
            .zip(&drop)
            .filter_map(|(column, dropped)| (!dropped).then_some(column))
            .collect();
        let rows = self.rows.into_iter().map(keep).collect();

        Ok(Self {
            name: self.name,
            columns,
            rows,
        })
    }

    /// Keep the rows whose mask entry is true
    pub fn retain_rows(&mut self, mask: &[bool]) {
        let mut flags = mask.iter();
        self.rows.retain(|_| *flags.next().unwrap_or(&false));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::with_rows(
            "sample",
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec![
                vec![Cell::Number(1.0), Cell::text("x"), Cell::Missing],
                vec![Cell::Number(2.0), Cell::text("y"), Cell::Number(5.0)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let err = Table::new("t", vec!["a".to_string(), "a".to_string()]).unwrap_err();
        assert!(matches!(err, ProcessingError::DuplicateColumn { .. }));
    }

    #[test]
    fn test_row_width_checked() {
        let mut table = sample();
        let err = table.push_row(vec![Cell::Missing]).unwrap_err();
        assert!(matches!(err, ProcessingError::RowWidth { expected: 3, found: 1, .. }));
    }

    #[test]
    fn test_drop_columns() {
        let table = sample().drop_columns(&["b"]).unwrap();
        assert_eq!(table.columns(), ["a", "c"]);
        assert_eq!(table.rows()[1], vec![Cell::Number(2.0), Cell::Number(5.0)]);

        let err = sample().drop_columns(&["zzz"]).unwrap_err();
        assert!(matches!(err, ProcessingError::MissingColumn { .. }));
    }

    #[test]
    fn test_numeric_detection_and_missing_count() {
        let table = sample();
        assert!(table.is_numeric_column(0));
        assert!(!table.is_numeric_column(1));
        assert!(table.is_numeric_column(2));
        assert_eq!(table.missing_count(2), 1);
    }

    #[test]
    fn test_add_column_and_retain() {
        let mut table = sample();
        table
            .add_column("double_a", |row| Cell::from(row[0].as_f64().map(|v| v * 2.0)))
            .unwrap();
        assert_eq!(table.cell(1, "double_a"), Some(&Cell::Number(4.0)));

        table.retain_rows(&[false, true]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.cell(0, "a"), Some(&Cell::Number(2.0)));
    }
}
