use crate::error::Result;
use crate::models::{Cell, Table};
use crate::processors::report::OutlierStats;
use crate::utils::constants::{DEFAULT_Z_THRESHOLD, SCALED_COLUMNS};
use crate::utils::stats::ZScorer;
use tracing::{debug, info, warn};

/// Log-scales the feature columns and drops rows with an extreme z-score
pub struct OutlierFilter {
    columns: Vec<String>,
    threshold: f64,
}

impl OutlierFilter {
    pub fn new() -> Self {
        Self {
            columns: SCALED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            threshold: DEFAULT_Z_THRESHOLD,
        }
    }

    pub fn with_columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Log transform then z-score filter
    pub fn apply(&self, mut table: Table) -> Result<(Table, OutlierStats)> {
        let mut stats = OutlierStats {
            rows_before: table.len(),
            ..Default::default()
        };

        let indices = self
            .columns
            .iter()
            .map(|column| table.require_column(column))
            .collect::<Result<Vec<_>>>()?;

        for (column, &index) in self.columns.iter().zip(&indices) {
            // Text that is not a number cannot be scaled
            table.map_column(index, |cell| cell.coerce_number().unwrap_or(Cell::Missing));

            if log_transform(&mut table, index) {
                debug!("{}: log transformed", column);
                stats.log_transformed.push(column.clone());
            } else {
                warn!("{}: contains 0, log transform skipped", column);
                stats.log_skipped.push(column.clone());
            }
        }

        let scores: Vec<Vec<Option<f64>>> = indices.iter().map(|&i| z_scores(&table, i)).collect();

        let mask: Vec<bool> = (0..table.len())
            .map(|row| {
                let row_scores: Vec<Option<f64>> = scores.iter().map(|column| column[row]).collect();
                passes(&row_scores, self.threshold)
            })
            .collect();

        for (column, column_scores) in self.columns.iter().zip(&scores) {
            let failures = column_scores
                .iter()
                .filter(|z| !passes(std::slice::from_ref(*z), self.threshold))
                .count();
            stats.failures_by_column.insert(column.clone(), failures);
        }

        table.retain_rows(&mask);
        stats.rows_removed = stats.rows_before - table.len();

        info!(
            "Outlier filter (|z| < {}): removed {} of {} rows",
            self.threshold, stats.rows_removed, stats.rows_before
        );

        Ok((table, stats))
    }
}

impl Default for OutlierFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace each number with its natural log, unless any value in the column
/// is exactly zero. Returns whether the column was transformed.
fn log_transform(table: &mut Table, index: usize) -> bool {
    if table.column_cells(index).any(|cell| cell.as_f64() == Some(0.0)) {
        return false;
    }
    table.map_column(index, |cell| match cell {
        Cell::Number(value) => Cell::number(value.ln()),
        other => other.clone(),
    });
    true
}

/// Z-score of every cell in a column; `None` where the cell is missing or
/// the column has no spread
fn z_scores(table: &Table, index: usize) -> Vec<Option<f64>> {
    let scorer = ZScorer::fit(&table.column_numbers(index));
    table
        .column_cells(index)
        .map(|cell| scorer?.score(cell.as_f64()?))
        .collect()
}

/// A row passes when every score is present and strictly under the threshold
pub fn passes(scores: &[Option<f64>], threshold: f64) -> bool {
    scores
        .iter()
        .all(|z| matches!(z, Some(z) if z.abs() < threshold))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_table(values: &[f64]) -> Table {
        Table::with_rows(
            "clean",
            vec!["x".to_string()],
            values.iter().map(|v| vec![Cell::number(*v)]).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_passes_threshold() {
        assert!(!passes(&[Some(0.1), Some(3.5), Some(-0.2)], 3.0));
        assert!(passes(&[Some(2.9); 10], 3.0));
        assert!(!passes(&[Some(-3.0)], 3.0));
        assert!(!passes(&[Some(0.0), None], 3.0));
    }

    #[test]
    fn test_single_outlier_among_twenty_is_dropped() {
        let mut values = vec![0.0; 19];
        values.push(1.0);
        let (table, stats) = OutlierFilter::new()
            .with_columns(&["x"])
            .apply(column_table(&values))
            .unwrap();

        // 19 zeros and a one: the one scores sqrt(19)
        assert_eq!(table.len(), 19);
        assert_eq!(stats.rows_removed, 1);
        assert_eq!(stats.log_skipped, vec!["x".to_string()]);
    }

    #[test]
    fn test_single_outlier_among_nine_is_kept() {
        let mut values = vec![0.0; 8];
        values.push(1.0);
        let (table, stats) = OutlierFilter::new()
            .with_columns(&["x"])
            .apply(column_table(&values))
            .unwrap();

        // sqrt(8) is under 3
        assert_eq!(table.len(), 9);
        assert_eq!(stats.rows_removed, 0);
    }

    #[test]
    fn test_zero_skips_log_for_whole_column() {
        let mut table = column_table(&[0.0, 1.0, 10.0]);
        assert!(!log_transform(&mut table, 0));
        assert_eq!(table.rows()[2][0], Cell::Number(10.0));

        let mut table = column_table(&[1.0, std::f64::consts::E]);
        assert!(log_transform(&mut table, 0));
        assert_eq!(table.rows()[0][0], Cell::Number(0.0));
        assert!((table.rows()[1][0].as_f64().unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_negative_value_drops_only_its_row() {
        let (table, stats) = OutlierFilter::new()
            .with_columns(&["x"])
            .apply(column_table(&[-1.0, 2.0, 3.0, 4.0]))
            .unwrap();

        assert_eq!(stats.log_transformed, vec!["x".to_string()]);
        assert_eq!(table.len(), 3);
        assert_eq!(stats.failures_by_column["x"], 1);
    }

    #[test]
    fn test_constant_column_drops_every_row() {
        let (table, stats) = OutlierFilter::new()
            .with_columns(&["x"])
            .apply(column_table(&[5.0; 4]))
            .unwrap();

        // Zero spread leaves the score undefined
        assert_eq!(table.len(), 0);
        assert_eq!(stats.rows_removed, 4);
        assert_eq!(stats.failures_by_column["x"], 4);
    }
}
