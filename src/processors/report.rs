use crate::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeStats {
    pub weather_rows: usize,
    pub weather_duplicates: usize,
    pub air_quality_rows: usize,
    pub air_quality_duplicates: usize,
    pub groups_merged: usize,
    pub rows_folded: usize,
    pub joined_rows: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NormalizationStats {
    pub dates_parsed: usize,
    /// Present values per column that could not be read as numbers
    pub coercion_failures: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImputationStats {
    /// Column -> (cells filled, median used)
    pub imputed: BTreeMap<String, (usize, f64)>,
    /// Columns with missing values that were not imputed
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VocabularyStats {
    pub column: String,
    pub substitutions: usize,
    pub unmapped: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OutlierStats {
    pub log_transformed: Vec<String>,
    pub log_skipped: Vec<String>,
    pub rows_before: usize,
    pub rows_removed: usize,
    /// Rows failing the threshold, per column (a row may fail several)
    pub failures_by_column: BTreeMap<String, usize>,
}

/// Everything a transformation run did, stage by stage
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransformReport {
    pub merge: Option<MergeStats>,
    pub normalization: Option<NormalizationStats>,
    pub imputation: Option<ImputationStats>,
    pub vocabularies: Vec<VocabularyStats>,
    pub derived_columns: Vec<String>,
    pub pruned_columns: Vec<String>,
    pub outliers: Option<OutlierStats>,
    pub final_rows: usize,
    pub final_columns: usize,
}

impl TransformReport {
    pub fn save_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Generate a summary report
    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Transformation Report ===\n");

        if let Some(merge) = &self.merge {
            summary.push_str(&format!(
                "Weather rows: {} ({} exact duplicates dropped)\n",
                merge.weather_rows, merge.weather_duplicates
            ));
            summary.push_str(&format!(
                "Air quality rows: {} ({} exact duplicates dropped)\n",
                merge.air_quality_rows, merge.air_quality_duplicates
            ));
            summary.push_str(&format!(
                "Coalesced groups: {} ({} rows folded)\n",
                merge.groups_merged, merge.rows_folded
            ));
            summary.push_str(&format!("Joined rows: {}\n", merge.joined_rows));
        }

        if let Some(normalization) = &self.normalization {
            let failures: usize = normalization.coercion_failures.values().sum();
            summary.push_str(&format!(
                "Dates parsed: {}, numeric coercion failures: {}\n",
                normalization.dates_parsed, failures
            ));
            for (column, count) in normalization.coercion_failures.iter().filter(|(_, c)| **c > 0) {
                summary.push_str(&format!("  {}: {}\n", column, count));
            }
        }

        if let Some(imputation) = &self.imputation {
            summary.push_str(&format!(
                "\nImputed columns: {}\n",
                imputation.imputed.len()
            ));
            for (column, (count, median)) in &imputation.imputed {
                summary.push_str(&format!("  {}: {} cells -> {}\n", column, count, median));
            }
            if !imputation.skipped.is_empty() {
                summary.push_str(&format!(
                    "Left with missing values: {}\n",
                    imputation.skipped.join(", ")
                ));
            }
        }

        for vocabulary in &self.vocabularies {
            summary.push_str(&format!(
                "{}: {} substitutions, {} unmapped values\n",
                vocabulary.column,
                vocabulary.substitutions,
                vocabulary.unmapped.values().sum::<usize>()
            ));
        }

        if !self.derived_columns.is_empty() {
            summary.push_str(&format!("Derived: {}\n", self.derived_columns.join(", ")));
        }
        if !self.pruned_columns.is_empty() {
            summary.push_str(&format!("Pruned columns: {}\n", self.pruned_columns.len()));
        }

        if let Some(outliers) = &self.outliers {
            summary.push_str(&format!(
                "\nLog transformed: {}\n",
                outliers.log_transformed.len()
            ));
            if !outliers.log_skipped.is_empty() {
                summary.push_str(&format!(
                    "Log skipped (zero present): {}\n",
                    outliers.log_skipped.join(", ")
                ));
            }
            let percentage = if outliers.rows_before == 0 {
                0.0
            } else {
                100.0 * outliers.rows_removed as f64 / outliers.rows_before as f64
            };
            summary.push_str(&format!(
                "Outlier rows removed: {} of {} ({:.1}%)\n",
                outliers.rows_removed, outliers.rows_before, percentage
            ));
        }

        summary.push_str(&format!(
            "\nFinal table: {} rows, {} columns\n",
            self.final_rows, self.final_columns
        ));

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_summary_and_json() -> Result<()> {
        let report = TransformReport {
            merge: Some(MergeStats {
                weather_rows: 10,
                weather_duplicates: 2,
                air_quality_rows: 12,
                air_quality_duplicates: 1,
                groups_merged: 3,
                rows_folded: 4,
                joined_rows: 8,
            }),
            outliers: Some(OutlierStats {
                rows_before: 8,
                rows_removed: 2,
                log_skipped: vec!["Daily Rainfall Total (mm)".to_string()],
                ..Default::default()
            }),
            final_rows: 6,
            final_columns: 14,
            ..Default::default()
        };

        let summary = report.generate_summary();
        assert!(summary.contains("Joined rows: 8"));
        assert!(summary.contains("Outlier rows removed: 2 of 8 (25.0%)"));
        assert!(summary.contains("Log skipped (zero present): Daily Rainfall Total (mm)"));

        let dir = TempDir::new()?;
        let path = dir.path().join("report.json");
        report.save_json(&path)?;
        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(value["merge"]["groups_merged"], 3);
        assert_eq!(value["final_rows"], 6);
        Ok(())
    }
}
