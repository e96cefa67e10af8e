use crate::config::TransformationConfig;
use crate::error::{Result, Stage, StageContext};
use crate::models::{DewPointCategory, Table, WindDirection};
use crate::processors::cleaner::{impute_medians, reconcile};
use crate::processors::report::{MergeStats, TransformReport};
use crate::processors::{DataMerger, FeatureBuilder, OutlierFilter, TypeNormalizer};
use crate::readers::TableReader;
use crate::utils::progress::ProgressReporter;
use crate::writers::TableWriter;
use std::path::Path;
use tracing::info;

/// Runs the merge and clean stages with the paths and options of a
/// [`TransformationConfig`]
pub struct TransformationPipeline<'a> {
    config: &'a TransformationConfig,
    show_progress: bool,
}

impl<'a> TransformationPipeline<'a> {
    pub fn new(config: &'a TransformationConfig) -> Self {
        Self {
            config,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Read both raw tables, merge them and persist the merged table
    pub fn merge_stage(&self) -> Result<MergeStats> {
        let reader = TableReader::new();
        let weather = reader
            .read_table(Path::new(&self.config.raw_weather_data_path))
            .in_stage(Stage::Merge)?;
        let air_quality = reader
            .read_table(Path::new(&self.config.raw_air_quality_data_path))
            .in_stage(Stage::Merge)?;
        info!(
            "Read {} weather rows and {} air quality rows",
            weather.len(),
            air_quality.len()
        );

        let (merged, stats) = self.merge(&weather, &air_quality)?;

        TableWriter::new()
            .write_table(&merged, Path::new(&self.config.merged_data_path))
            .in_stage(Stage::Output)?;
        info!("Merged table written to {}", self.config.merged_data_path);

        Ok(stats)
    }

    /// Re-read the merged table, clean it and persist the final table
    pub fn clean_stage(&self) -> Result<(Table, TransformReport)> {
        let merged = TableReader::new()
            .read_table(Path::new(&self.config.merged_data_path))
            .in_stage(Stage::Cleaning)?;
        info!("Read merged table: {} rows", merged.len());

        let (cleaned, report) = self.clean(merged)?;

        std::fs::create_dir_all(&self.config.clean_data_path).in_stage(Stage::Output)?;
        TableWriter::new()
            .write_table(&cleaned, Path::new(&self.config.final_data_path))
            .in_stage(Stage::Output)?;
        info!("Final table written to {}", self.config.final_data_path);

        Ok((cleaned, report))
    }

    /// Merge and clean in memory
    pub fn transform(&self, weather: &Table, air_quality: &Table) -> Result<(Table, TransformReport)> {
        let (merged, stats) = self.merge(weather, air_quality)?;
        let (cleaned, mut report) = self.clean(merged)?;
        report.merge = Some(stats);
        Ok((cleaned, report))
    }

    pub fn merge(&self, weather: &Table, air_quality: &Table) -> Result<(Table, MergeStats)> {
        let progress = ProgressReporter::new_spinner("Merging sources...", !self.show_progress);
        let result = DataMerger::new()
            .merge_sources(weather, air_quality)
            .in_stage(Stage::Merge);
        if let Ok((table, _)) = &result {
            progress.finish_with_message(&format!("Merged {} rows", table.len()));
        }
        result
    }

    /// Type normalization, imputation, vocabulary reconciliation, feature
    /// derivation, pruning and outlier removal, in that order
    pub fn clean(&self, table: Table) -> Result<(Table, TransformReport)> {
        let progress = ProgressReporter::new(5, "Normalizing types", !self.show_progress);
        let mut report = TransformReport::default();

        let (mut table, normalization) = TypeNormalizer::new()
            .with_date_format(&self.config.date_format)
            .normalize(table)
            .in_stage(Stage::TypeNormalization)?;
        report.normalization = Some(normalization);
        progress.step("Imputing missing values");

        report.imputation = Some(impute_medians(&mut table));
        progress.step("Reconciling vocabularies");

        report
            .vocabularies
            .push(reconcile::<WindDirection>(&mut table).in_stage(Stage::Cleaning)?);
        report
            .vocabularies
            .push(reconcile::<DewPointCategory>(&mut table).in_stage(Stage::Cleaning)?);
        progress.step("Deriving features");

        report.derived_columns = FeatureBuilder::derive(&mut table).in_stage(Stage::Cleaning)?;
        let (table, pruned) = FeatureBuilder::prune(table).in_stage(Stage::Cleaning)?;
        report.pruned_columns = pruned;
        progress.step("Filtering outliers");

        let (table, outliers) = OutlierFilter::new()
            .with_threshold(self.config.z_threshold)
            .apply(table)
            .in_stage(Stage::Cleaning)?;
        report.outliers = Some(outliers);
        progress.step("Done");

        report.final_rows = table.len();
        report.final_columns = table.columns().len();
        progress.finish_with_message(&format!(
            "Cleaned table: {} rows, {} columns",
            report.final_rows, report.final_columns
        ));
        info!(
            "Cleaning complete: {} rows, {} columns",
            report.final_rows, report.final_columns
        );

        Ok((table.rename("clean"), report))
    }
}
