use crate::error::{ProcessingError, Result};
use crate::models::{Cell, Table};
use crate::processors::report::NormalizationStats;
use crate::utils::constants::{DATE, DEFAULT_DATE_FORMAT, NUMERIC_COLUMNS};
use chrono::NaiveDate;
use tracing::{debug, info};

/// Retypes the merged table: numeric columns to numbers, `date` to a
/// calendar date
pub struct TypeNormalizer {
    date_format: String,
    numeric_columns: Vec<String>,
}

impl TypeNormalizer {
    pub fn new() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            numeric_columns: NUMERIC_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn with_date_format(mut self, date_format: &str) -> Self {
        self.date_format = date_format.to_string();
        self
    }

    pub fn with_numeric_columns(mut self, columns: &[&str]) -> Self {
        self.numeric_columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn normalize(&self, mut table: Table) -> Result<(Table, NormalizationStats)> {
        let mut stats = NormalizationStats::default();

        let date_index = table.require_column(DATE)?;
        stats.dates_parsed = self.parse_dates(&mut table, date_index)?;
        debug!("Parsed {} dates with format {}", stats.dates_parsed, self.date_format);

        for column in &self.numeric_columns {
            let index = table.require_column(column)?;
            let mut failures = 0;
            table.map_column(index, |cell| {
                cell.coerce_number().unwrap_or_else(|| {
                    failures += 1;
                    Cell::Missing
                })
            });
            if failures > 0 {
                debug!("{}: {} values could not be read as numbers", column, failures);
            }
            stats.coercion_failures.insert(column.clone(), failures);
        }

        info!(
            "Normalized types: {} numeric columns, {} coercion failures",
            self.numeric_columns.len(),
            stats.coercion_failures.values().sum::<usize>()
        );

        Ok((table, stats))
    }

    /// Parse every date cell; the first malformed value aborts
    fn parse_dates(&self, table: &mut Table, index: usize) -> Result<usize> {
        let mut parsed = Vec::with_capacity(table.len());
        for (row, cell) in table.column_cells(index).enumerate() {
            let date = match cell {
                Cell::Date(date) => *date,
                other => {
                    let value = other.render();
                    NaiveDate::parse_from_str(&value, &self.date_format).map_err(|source| {
                        ProcessingError::DateParse {
                            row,
                            value,
                            format: self.date_format.clone(),
                            source,
                        }
                    })?
                }
            };
            parsed.push(date);
        }

        let count = parsed.len();
        let mut dates = parsed.into_iter();
        table.map_column(index, |_| dates.next().map_or(Cell::Missing, Cell::Date));
        Ok(count)
    }
}

impl Default for TypeNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merged_table(rain: &[&str], dates: &[&str]) -> Table {
        Table::with_rows(
            "merged",
            vec!["date".to_string(), "Daily Rainfall Total (mm)".to_string()],
            dates
                .iter()
                .zip(rain)
                .map(|(d, r)| vec![Cell::parse(d), Cell::parse(r)])
                .collect(),
        )
        .unwrap()
    }

    fn normalizer() -> TypeNormalizer {
        TypeNormalizer::new().with_numeric_columns(&["Daily Rainfall Total (mm)"])
    }

    #[test]
    fn test_unparseable_number_becomes_missing() {
        let table = merged_table(&["abc", "1.5", "-"], &["01/04/2014", "02/04/2014", "03/04/2014"]);
        let (table, stats) = normalizer().normalize(table).unwrap();

        assert_eq!(table.rows()[0][1], Cell::Missing);
        assert_eq!(table.rows()[1][1], Cell::Number(1.5));
        assert_eq!(table.rows()[2][1], Cell::Missing);
        assert_eq!(stats.coercion_failures["Daily Rainfall Total (mm)"], 1);
    }

    #[test]
    fn test_dates_parsed_day_first() {
        let table = merged_table(&["1"], &["02/04/2014"]);
        let (table, stats) = normalizer().normalize(table).unwrap();

        assert_eq!(stats.dates_parsed, 1);
        assert_eq!(
            table.rows()[0][0],
            Cell::Date(NaiveDate::from_ymd_opt(2014, 4, 2).unwrap())
        );
    }

    #[test]
    fn test_malformed_date_is_fatal() {
        let table = merged_table(&["1", "2"], &["01/04/2014", "2014-04-02"]);
        let err = normalizer().normalize(table).unwrap_err();

        match err {
            ProcessingError::DateParse { row, value, .. } => {
                assert_eq!(row, 1);
                assert_eq!(value, "2014-04-02");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_numeric_column_is_schema_error() {
        let table = merged_table(&["1"], &["01/04/2014"]);
        let err = TypeNormalizer::new().normalize(table).unwrap_err();
        assert!(matches!(err, ProcessingError::MissingColumn { .. }));
    }
}
