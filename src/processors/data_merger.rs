use crate::error::{ProcessingError, Result};
use crate::models::{Cell, Row, Table};
use crate::processors::report::MergeStats;
use crate::utils::constants::{DATA_REF, DATE, LEFT_SUFFIX, RIGHT_SUFFIX};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

pub struct DataMerger {
    group_key: String,
    join_key: String,
}

impl DataMerger {
    pub fn new() -> Self {
        Self {
            group_key: DATA_REF.to_string(),
            join_key: DATE.to_string(),
        }
    }

    /// Deduplicate both sources, coalesce air quality rows sharing a
    /// `data_ref`, inner-join on `date` and drop the `data_ref` columns
    pub fn merge_sources(&self, weather: &Table, air_quality: &Table) -> Result<(Table, MergeStats)> {
        weather.require_column(&self.join_key)?;
        air_quality.require_column(&self.join_key)?;

        let (weather_unique, weather_duplicates) = self.drop_exact_duplicates(weather);
        let (air_unique, air_duplicates) = self.drop_exact_duplicates(air_quality);
        info!(
            "Dropped {} duplicate weather rows and {} duplicate air quality rows",
            weather_duplicates, air_duplicates
        );

        let (air_merged, groups_merged, rows_folded) = self.coalesce_by_key(&air_unique)?;
        info!(
            "Merged {} air quality groups sharing a {} ({} rows folded)",
            groups_merged, self.group_key, rows_folded
        );

        let joined = self.inner_join(&weather_unique, &air_merged)?;
        let joined_rows = joined.len();

        let ref_columns: Vec<String> = [
            self.group_key.clone(),
            format!("{}{}", self.group_key, LEFT_SUFFIX),
            format!("{}{}", self.group_key, RIGHT_SUFFIX),
        ]
        .into_iter()
        .filter(|c| joined.has_column(c))
        .collect();
        let ref_columns: Vec<&str> = ref_columns.iter().map(String::as_str).collect();
        let merged = joined.drop_columns(&ref_columns)?.rename("merged");

        info!(
            "Joined on {}: {} rows, {} columns",
            self.join_key,
            merged.len(),
            merged.columns().len()
        );

        let stats = MergeStats {
            weather_rows: weather.len(),
            weather_duplicates,
            air_quality_rows: air_quality.len(),
            air_quality_duplicates: air_duplicates,
            groups_merged,
            rows_folded,
            joined_rows,
        };

        Ok((merged, stats))
    }

    /// Remove rows identical in every cell, keeping the first occurrence
    pub fn drop_exact_duplicates(&self, table: &Table) -> (Table, usize) {
        let mut seen: HashSet<&Row> = HashSet::with_capacity(table.len());
        let rows: Vec<Row> = table
            .rows()
            .iter()
            .filter(|row| seen.insert(*row))
            .cloned()
            .collect();

        let removed = table.len() - rows.len();
        (table.with_same_schema(rows), removed)
    }

    /// Collapse rows sharing the group key into one row each.
    ///
    /// Rows whose key occurs once come first, in input order, followed by one
    /// merged row per repeated key in order of first appearance. A lone row
    /// with a missing key is kept as a singleton; when several rows lack a key
    /// they count as a repeated key that cannot be grouped and are all
    /// dropped. Returns the table, the number of merged groups and the number
    /// of rows folded away.
    pub fn coalesce_by_key(&self, table: &Table) -> Result<(Table, usize, usize)> {
        let key_index = table.require_column(&self.group_key)?;

        let mut groups: HashMap<&Cell, Vec<usize>> = HashMap::new();
        let mut first_seen: Vec<&Cell> = Vec::new();
        let mut keyless = 0;
        for (index, row) in table.rows().iter().enumerate() {
            let key = &row[key_index];
            if key.is_missing() {
                keyless += 1;
                continue;
            }
            let members = groups.entry(key).or_default();
            if members.is_empty() {
                first_seen.push(key);
            }
            members.push(index);
        }

        if keyless > 1 {
            warn!("Dropping {} rows without a {}", keyless, self.group_key);
        }

        let mut singles = Vec::new();
        for row in table.rows() {
            let key = &row[key_index];
            let single = if key.is_missing() {
                keyless == 1
            } else {
                groups.get(key).is_some_and(|m| m.len() == 1)
            };
            if single {
                singles.push(row.clone());
            }
        }

        let mut merged = Vec::new();
        let mut rows_folded = 0;
        for key in first_seen {
            let members = &groups[key];
            if members.len() < 2 {
                continue;
            }
            let group: Vec<&Row> = members.iter().map(|&i| &table.rows()[i]).collect();
            debug!("Coalescing {} rows for {} {}", group.len(), self.group_key, key);
            merged.push(coalesce_rows(&group));
            rows_folded += group.len() - 1;
        }

        let groups_merged = merged.len();
        singles.extend(merged);
        Ok((table.with_same_schema(singles), groups_merged, rows_folded))
    }

    /// Inner join on the join key. Columns present on both sides (other than
    /// the key) get `_x` / `_y` suffixes. Missing keys never match.
    pub fn inner_join(&self, left: &Table, right: &Table) -> Result<Table> {
        let left_key = left.require_column(&self.join_key)?;
        let right_key = right.require_column(&self.join_key)?;

        let left_names: HashSet<&str> = left.columns().iter().map(String::as_str).collect();
        let right_names: HashSet<&str> = right.columns().iter().map(String::as_str).collect();
        let shared = |name: &str| name != self.join_key && left_names.contains(name) && right_names.contains(name);

        let mut columns: Vec<String> = left
            .columns()
            .iter()
            .map(|c| if shared(c.as_str()) { format!("{}{}", c, LEFT_SUFFIX) } else { c.clone() })
            .collect();
        let right_columns: Vec<usize> = (0..right.columns().len()).filter(|&i| i != right_key).collect();
        columns.extend(right_columns.iter().map(|&i| {
            let c = &right.columns()[i];
            if shared(c.as_str()) {
                format!("{}{}", c, RIGHT_SUFFIX)
            } else {
                c.clone()
            }
        }));

        let mut index: HashMap<&Cell, Vec<usize>> = HashMap::new();
        for (i, row) in right.rows().iter().enumerate() {
            let key = &row[right_key];
            if !key.is_missing() {
                index.entry(key).or_default().push(i);
            }
        }

        let mut rows = Vec::new();
        for left_row in left.rows() {
            let Some(matches) = index.get(&left_row[left_key]) else {
                continue;
            };
            for &i in matches {
                let right_row = &right.rows()[i];
                let mut row = left_row.clone();
                row.extend(right_columns.iter().map(|&c| right_row[c].clone()));
                rows.push(row);
            }
        }

        if rows.is_empty() {
            return Err(ProcessingError::EmptyJoin {
                key: self.join_key.clone(),
            });
        }

        Table::with_rows("joined", columns, rows)
    }
}

impl Default for DataMerger {
    fn default() -> Self {
        Self::new()
    }
}

/// Left-biased coalesce: each column keeps the first present value in
/// group order
pub fn coalesce_rows(group: &[&Row]) -> Row {
    let Some((first, rest)) = group.split_first() else {
        return Row::new();
    };

    let mut merged = (*first).clone();
    for candidate in rest {
        for (slot, value) in merged.iter_mut().zip(candidate.iter()) {
            if slot.is_missing() && !value.is_missing() {
                *slot = value.clone();
            }
        }
    }
    merged
}
