use crate::error::Result;
use crate::models::{Cell, Row, Table};
use crate::utils::constants::{
    AVERAGE_TEMPERATURE, AVERAGE_WIND_SPEED, MAX_TEMPERATURE, MAX_WIND_SPEED, MIN_TEMPERATURE,
    MIN_WIND_SPEED, PM25_AVERAGE, PM25_REGIONS, PRUNED_COLUMNS, PSI_AVERAGE, PSI_REGIONS,
};
use tracing::{debug, info};

/// A derived column and the source columns it averages
struct Derivation {
    name: &'static str,
    sources: &'static [&'static str],
}

const DERIVATIONS: [Derivation; 4] = [
    Derivation {
        name: AVERAGE_WIND_SPEED,
        sources: &[MIN_WIND_SPEED, MAX_WIND_SPEED],
    },
    Derivation {
        name: AVERAGE_TEMPERATURE,
        sources: &[MIN_TEMPERATURE, MAX_TEMPERATURE],
    },
    Derivation {
        name: PSI_AVERAGE,
        sources: &PSI_REGIONS,
    },
    Derivation {
        name: PM25_AVERAGE,
        sources: &PM25_REGIONS,
    },
];

/// Adds the averaged features and drops the columns they replace
pub struct FeatureBuilder;

impl FeatureBuilder {
    /// Append the four average columns. Returns their names.
    pub fn derive(table: &mut Table) -> Result<Vec<String>> {
        let mut derived = Vec::with_capacity(DERIVATIONS.len());

        for derivation in &DERIVATIONS {
            let indices = derivation
                .sources
                .iter()
                .map(|column| table.require_column(column))
                .collect::<Result<Vec<_>>>()?;

            table.add_column(derivation.name, |row| row_mean(row, &indices))?;

            let missing = table.missing_count(table.columns().len() - 1);
            debug!("{}: derived, {} rows missing an input", derivation.name, missing);
            derived.push(derivation.name.to_string());
        }

        info!("Derived {} feature columns", derived.len());
        Ok(derived)
    }

    /// Drop the regional and min/max source columns
    pub fn prune(table: Table) -> Result<(Table, Vec<String>)> {
        let table = table.drop_columns(&PRUNED_COLUMNS)?;
        info!(
            "Pruned {} columns, {} remain",
            PRUNED_COLUMNS.len(),
            table.columns().len()
        );
        Ok((table, PRUNED_COLUMNS.iter().map(|c| c.to_string()).collect()))
    }
}

/// Mean of the given cells; missing if any of them is not a number
fn row_mean(row: &Row, indices: &[usize]) -> Cell {
    let mut sum = 0.0;
    for &index in indices {
        match row[index].as_f64() {
            Some(value) => sum += value,
            None => return Cell::Missing,
        }
    }
    Cell::number(sum / indices.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::constants::{DAILY_RAINFALL, DATE};

    fn wide_table(rows: Vec<Vec<f64>>) -> Table {
        let mut columns: Vec<String> = vec![DATE.to_string(), DAILY_RAINFALL.to_string()];
        columns.extend(PRUNED_COLUMNS.iter().map(|c| c.to_string()));
        let rows = rows
            .into_iter()
            .map(|values| {
                let mut row = vec![Cell::text("2014-04-01"), Cell::Number(1.0)];
                row.extend(values.into_iter().map(Cell::number));
                row
            })
            .collect();
        Table::with_rows("merged", columns, rows).unwrap()
    }

    /// Source values in `PRUNED_COLUMNS` order, 0 where not given
    fn values_for(overrides: &[(&str, f64)]) -> Vec<f64> {
        PRUNED_COLUMNS
            .iter()
            .map(|column| {
                overrides
                    .iter()
                    .find(|(name, _)| name == column)
                    .map_or(0.0, |(_, v)| *v)
            })
            .collect()
    }

    #[test]
    fn test_averages() {
        let mut table = wide_table(vec![values_for(&[
            (MIN_WIND_SPEED, 10.0),
            (MAX_WIND_SPEED, 20.0),
            (MIN_TEMPERATURE, 24.0),
            (MAX_TEMPERATURE, 32.0),
            ("psi_north", 50.0),
            ("psi_south", 60.0),
            ("psi_east", 70.0),
            ("psi_west", 80.0),
            ("psi_central", 90.0),
            ("pm25_north", 10.0),
        ])]);

        let derived = FeatureBuilder::derive(&mut table).unwrap();
        assert_eq!(derived, [AVERAGE_WIND_SPEED, AVERAGE_TEMPERATURE, PSI_AVERAGE, PM25_AVERAGE]);
        assert_eq!(table.cell(0, AVERAGE_WIND_SPEED), Some(&Cell::Number(15.0)));
        assert_eq!(table.cell(0, AVERAGE_TEMPERATURE), Some(&Cell::Number(28.0)));
        assert_eq!(table.cell(0, PSI_AVERAGE), Some(&Cell::Number(70.0)));
        assert_eq!(table.cell(0, PM25_AVERAGE), Some(&Cell::Number(2.0)));
    }

    #[test]
    fn test_missing_input_gives_missing_average() {
        let mut table = wide_table(vec![vec![1.0; PRUNED_COLUMNS.len()]]);
        let index = table.require_column(MAX_WIND_SPEED).unwrap();
        table.map_column(index, |_| Cell::Missing);

        FeatureBuilder::derive(&mut table).unwrap();
        assert_eq!(table.cell(0, AVERAGE_WIND_SPEED), Some(&Cell::Missing));
        assert_eq!(table.cell(0, AVERAGE_TEMPERATURE), Some(&Cell::Number(1.0)));
    }

    #[test]
    fn test_prune_leaves_derived_and_kept_columns() {
        let mut table = wide_table(vec![vec![2.0; PRUNED_COLUMNS.len()]]);
        FeatureBuilder::derive(&mut table).unwrap();
        let (table, pruned) = FeatureBuilder::prune(table).unwrap();

        assert_eq!(pruned.len(), 17);
        assert_eq!(
            table.columns(),
            [DATE, DAILY_RAINFALL, AVERAGE_WIND_SPEED, AVERAGE_TEMPERATURE, PSI_AVERAGE, PM25_AVERAGE]
        );
    }
}
