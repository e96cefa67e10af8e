/// Raw tokens read as a missing value: the dash placeholders plus the
/// default NA strings of pandas' CSV reader
pub const MISSING_TOKENS: &[&str] = &[
    "", "-", "--", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Join and grouping keys
pub const DATE: &str = "date";
pub const DATA_REF: &str = "data_ref";

/// Suffixes for columns present in both joined tables
pub const LEFT_SUFFIX: &str = "_x";
pub const RIGHT_SUFFIX: &str = "_y";

/// Date formats
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";
pub const OUTPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Default source table names inside the downloaded databases
pub const WEATHER_TABLE: &str = "weather";
pub const AIR_QUALITY_TABLE: &str = "air_quality";

/// Weather columns
pub const DAILY_RAINFALL: &str = "Daily Rainfall Total (mm)";
pub const HIGHEST_30_MIN_RAINFALL: &str = "Highest 30 Min Rainfall (mm)";
pub const HIGHEST_60_MIN_RAINFALL: &str = "Highest 60 Min Rainfall (mm)";
pub const HIGHEST_120_MIN_RAINFALL: &str = "Highest 120 Min Rainfall (mm)";
pub const MIN_TEMPERATURE: &str = "Min Temperature (deg C)";
pub const MAX_TEMPERATURE: &str = "Maximum Temperature (deg C)";
pub const MIN_WIND_SPEED: &str = "Min Wind Speed (km/h)";
pub const MAX_WIND_SPEED: &str = "Max Wind Speed (km/h)";
pub const AIR_PRESSURE: &str = "Air Pressure (hPa)";
pub const WET_BULB_TEMPERATURE: &str = "Wet Bulb Temperature (deg F)";
pub const SUNSHINE_DURATION: &str = "Sunshine Duration (hrs)";
pub const CLOUD_COVER: &str = "Cloud Cover (%)";
pub const RELATIVE_HUMIDITY: &str = "Relative Humidity (%)";
pub const WIND_DIRECTION: &str = "Wind Direction";
pub const DEW_POINT_CATEGORY: &str = "Dew Point Category";

/// Air quality columns
pub const PM25_NORTH: &str = "pm25_north";
pub const PM25_SOUTH: &str = "pm25_south";
pub const PM25_EAST: &str = "pm25_east";
pub const PM25_WEST: &str = "pm25_west";
pub const PM25_CENTRAL: &str = "pm25_central";
pub const PSI_NORTH: &str = "psi_north";
pub const PSI_SOUTH: &str = "psi_south";
pub const PSI_EAST: &str = "psi_east";
pub const PSI_WEST: &str = "psi_west";
pub const PSI_CENTRAL: &str = "psi_central";

pub const PM25_REGIONS: [&str; 5] = [PM25_NORTH, PM25_SOUTH, PM25_EAST, PM25_WEST, PM25_CENTRAL];
pub const PSI_REGIONS: [&str; 5] = [PSI_NORTH, PSI_SOUTH, PSI_EAST, PSI_WEST, PSI_CENTRAL];

/// Derived features
pub const AVERAGE_WIND_SPEED: &str = "average_wind_speed";
pub const AVERAGE_TEMPERATURE: &str = "average_temperature";
pub const PSI_AVERAGE: &str = "psi_average";
pub const PM25_AVERAGE: &str = "pm25_average";

/// Columns coerced to numbers after the merge
pub const NUMERIC_COLUMNS: [&str; 18] = [
    DAILY_RAINFALL,
    HIGHEST_30_MIN_RAINFALL,
    HIGHEST_60_MIN_RAINFALL,
    HIGHEST_120_MIN_RAINFALL,
    MIN_TEMPERATURE,
    MAX_TEMPERATURE,
    MIN_WIND_SPEED,
    MAX_WIND_SPEED,
    PM25_NORTH,
    PM25_SOUTH,
    PM25_EAST,
    PM25_WEST,
    PM25_CENTRAL,
    PSI_NORTH,
    PSI_SOUTH,
    PSI_EAST,
    PSI_WEST,
    PSI_CENTRAL,
];

/// Source columns folded into derived features or judged redundant
pub const PRUNED_COLUMNS: [&str; 17] = [
    PM25_NORTH,
    PM25_SOUTH,
    PM25_EAST,
    PM25_WEST,
    PM25_CENTRAL,
    PSI_CENTRAL,
    PSI_NORTH,
    PSI_SOUTH,
    PSI_EAST,
    PSI_WEST,
    HIGHEST_30_MIN_RAINFALL,
    HIGHEST_60_MIN_RAINFALL,
    HIGHEST_120_MIN_RAINFALL,
    MIN_WIND_SPEED,
    MAX_WIND_SPEED,
    MIN_TEMPERATURE,
    MAX_TEMPERATURE,
];

/// Columns log-scaled and screened for outliers
pub const SCALED_COLUMNS: [&str; 10] = [
    AIR_PRESSURE,
    WET_BULB_TEMPERATURE,
    AVERAGE_WIND_SPEED,
    DAILY_RAINFALL,
    SUNSHINE_DURATION,
    CLOUD_COVER,
    RELATIVE_HUMIDITY,
    AVERAGE_TEMPERATURE,
    PSI_AVERAGE,
    PM25_AVERAGE,
];

/// Outlier defaults
pub const DEFAULT_Z_THRESHOLD: f64 = 3.0;

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_SAMPLE_ROWS: usize = 10;

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "SOLAR_ETL";
pub const DEFAULT_CONFIG_FILE: &str = "config.json";
