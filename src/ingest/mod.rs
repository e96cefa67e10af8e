//! Download of the source databases and extraction of their tables to CSV.

use crate::config::IngestionConfig;
use crate::error::{Result, Stage, StageContext};
use crate::readers::SqliteTableReader;
use crate::utils::progress::ProgressReporter;
use crate::writers::TableWriter;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

pub struct DataIngestion<'a> {
    config: &'a IngestionConfig,
    client: reqwest::Client,
    show_progress: bool,
}

impl<'a> DataIngestion<'a> {
    pub fn new(config: &'a IngestionConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .in_stage(Stage::Ingestion)?;

        Ok(Self {
            config,
            client,
            show_progress: false,
        })
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Download both databases, then extract their tables
    pub async fn run(&self) -> Result<()> {
        self.download_databases().await?;
        self.extract_tables().await?;
        info!("Ingestion complete");
        Ok(())
    }

    pub async fn download_databases(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config.db_path).in_stage(Stage::Ingestion)?;

        self.download(&self.config.weather_url, Path::new(&self.config.weather_db_path))
            .await
            .in_stage(Stage::Ingestion)?;
        self.download(
            &self.config.air_quality_url,
            Path::new(&self.config.air_quality_db_path),
        )
        .await
        .in_stage(Stage::Ingestion)?;

        Ok(())
    }

    /// Write the weather and air quality tables to the raw CSV paths
    pub async fn extract_tables(&self) -> Result<()> {
        let reader = SqliteTableReader::new();
        let writer = TableWriter::new();

        let sources = [
            (
                &self.config.weather_db_path,
                &self.config.weather_table,
                &self.config.raw_weather_data_csv,
            ),
            (
                &self.config.air_quality_db_path,
                &self.config.air_quality_table,
                &self.config.raw_air_quality_data_csv,
            ),
        ];

        for (db_path, table_name, csv_path) in sources {
            let table = reader
                .read_table(Path::new(db_path), table_name)
                .await
                .in_stage(Stage::Ingestion)?;
            writer
                .write_table(&table, Path::new(csv_path))
                .in_stage(Stage::Ingestion)?;
            info!(
                "Extracted {} rows from {} to {}",
                table.len(),
                table_name,
                csv_path
            );
        }

        Ok(())
    }

    async fn download(&self, url: &str, destination: &Path) -> Result<()> {
        let progress = ProgressReporter::new_spinner(
            &format!("Downloading {}", url),
            !self.show_progress,
        );
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;

        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(destination, &bytes).await?;

        progress.finish_with_message(&format!(
            "Saved {} bytes to {}",
            bytes.len(),
            destination.display()
        ));
        info!("Downloaded {} ({} bytes) to {}", url, bytes.len(), destination.display());
        Ok(())
    }
}
