use crate::error::Result;
use crate::models::{Cell, Table, Vocabulary};
use crate::processors::report::{ImputationStats, VocabularyStats};
use crate::utils::stats::median;
use tracing::{debug, info, warn};

/// Fill missing cells of numeric columns with the column median.
///
/// Only columns whose present cells are all numbers take part. Columns with
/// no present value at all are left missing.
pub fn impute_medians(table: &mut Table) -> ImputationStats {
    let mut stats = ImputationStats::default();

    for index in 0..table.columns().len() {
        let missing = table.missing_count(index);
        if missing == 0 {
            continue;
        }

        let column = table.columns()[index].clone();
        if !table.is_numeric_column(index) {
            debug!("{}: {} missing values left in non-numeric column", column, missing);
            stats.skipped.push(column);
            continue;
        }

        let Some(fill) = median(&table.column_numbers(index)) else {
            warn!("{}: no values to take a median from", column);
            stats.skipped.push(column);
            continue;
        };

        table.map_column(index, |cell| {
            if cell.is_missing() {
                Cell::Number(fill)
            } else {
                cell.clone()
            }
        });
        debug!("{}: filled {} cells with median {}", column, missing, fill);
        stats.imputed.insert(column, (missing, fill));
    }

    info!("Imputed missing values in {} columns", stats.imputed.len());
    stats
}

/// Replace known synonyms in the vocabulary's column with their canonical
/// spelling. Unknown values are kept as they are and counted.
pub fn reconcile<V: Vocabulary>(table: &mut Table) -> Result<VocabularyStats> {
    let index = table.require_column(V::COLUMN)?;
    let mut stats = VocabularyStats {
        column: V::COLUMN.to_string(),
        ..Default::default()
    };

    table.map_column(index, |cell| {
        let Some(raw) = cell.as_str() else {
            return cell.clone();
        };
        match V::from_synonym(raw) {
            Some(canonical) => {
                if raw != canonical.as_str() {
                    stats.substitutions += 1;
                }
                Cell::text(canonical.as_str())
            }
            None => {
                *stats.unmapped.entry(raw.to_string()).or_default() += 1;
                cell.clone()
            }
        }
    });

    if !stats.unmapped.is_empty() {
        let values: Vec<&str> = stats.unmapped.keys().map(String::as_str).collect();
        warn!("{}: unmapped values kept as-is: {}", V::COLUMN, values.join(", "));
    }
    info!("{}: {} values reconciled", V::COLUMN, stats.substitutions);

    Ok(stats)
}
