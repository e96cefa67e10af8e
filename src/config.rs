use crate::error::Result;
use crate::utils::constants::{
    AIR_QUALITY_TABLE, DEFAULT_DATE_FORMAT, DEFAULT_Z_THRESHOLD, ENV_PREFIX, WEATHER_TABLE,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use validator::Validate;

/// Settings for every pipeline stage, keyed by stage name
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PipelineConfig {
    #[validate(nested)]
    pub data_ingestion: IngestionConfig,

    #[validate(nested)]
    pub data_transformation: TransformationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IngestionConfig {
    /// Directory the databases are downloaded into
    #[validate(length(min = 1))]
    pub db_path: String,

    #[validate(url)]
    pub weather_url: String,

    #[validate(url)]
    pub air_quality_url: String,

    #[validate(length(min = 1))]
    pub weather_db_path: String,

    #[validate(length(min = 1))]
    pub air_quality_db_path: String,

    #[validate(length(min = 1))]
    pub raw_weather_data_csv: String,

    #[validate(length(min = 1))]
    pub raw_air_quality_data_csv: String,

    #[serde(default = "default_weather_table")]
    #[validate(length(min = 1))]
    pub weather_table: String,

    #[serde(default = "default_air_quality_table")]
    #[validate(length(min = 1))]
    pub air_quality_table: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TransformationConfig {
    #[validate(length(min = 1))]
    pub raw_weather_data_path: String,

    #[validate(length(min = 1))]
    pub raw_air_quality_data_path: String,

    #[validate(length(min = 1))]
    pub merged_data_path: String,

    #[validate(length(min = 1))]
    pub final_data_path: String,

    /// Directory holding the cleaned outputs
    #[validate(length(min = 1))]
    pub clean_data_path: String,

    #[serde(default = "default_date_format")]
    #[validate(length(min = 1))]
    pub date_format: String,

    #[serde(default = "default_z_threshold")]
    #[validate(range(exclusive_min = 0.0))]
    pub z_threshold: f64,
}

fn default_weather_table() -> String {
    WEATHER_TABLE.to_string()
}

fn default_air_quality_table() -> String {
    AIR_QUALITY_TABLE.to_string()
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_z_threshold() -> f64 {
    DEFAULT_Z_THRESHOLD
}

impl PipelineConfig {
    /// Load from a file (format taken from its extension) with
    /// `SOLAR_ETL__SECTION__KEY` environment overrides, then validate
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(environment())
            .build()?;
        Self::finish(settings)
    }

    /// Load from an in-memory JSON document, without environment overrides
    pub fn from_json_str(document: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(document, config::FileFormat::Json))
            .build()?;
        Self::finish(settings)
    }

    fn finish(settings: config::Config) -> Result<Self> {
        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
