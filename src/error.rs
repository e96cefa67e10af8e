use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

/// Pipeline stage an error surfaced from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Config,
    Ingestion,
    Merge,
    TypeNormalization,
    Cleaning,
    Output,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Config => "config",
            Stage::Ingestion => "ingestion",
            Stage::Merge => "merge",
            Stage::TypeNormalization => "type normalization",
            Stage::Cleaning => "cleaning",
            Stage::Output => "output",
        };
        f.write_str(name)
    }
}

/// Coarse classification of a [`ProcessingError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Parse,
    Schema,
    Config,
}

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("SQLite error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Parquet write error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid date '{value}' in row {row} (expected format {format}): {source}")]
    DateParse {
        row: usize,
        value: String,
        format: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Missing required column '{column}' in table '{table}'")]
    MissingColumn { column: String, table: String },

    #[error("Table '{table}' not found in {}", .path.display())]
    MissingTable { table: String, path: PathBuf },

    #[error("Row {row} has {found} cells, table '{table}' expects {expected}")]
    RowWidth {
        table: String,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Duplicate column '{column}' in table '{table}'")]
    DuplicateColumn { column: String, table: String },

    #[error("Join on '{key}' produced no rows")]
    EmptyJoin { key: String },

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported option: {0}")]
    Unsupported(String),

    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<ProcessingError>,
    },
}

impl ProcessingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProcessingError::Io(_)
            | ProcessingError::Http(_)
            | ProcessingError::Database(_)
            | ProcessingError::Parquet(_)
            | ProcessingError::Arrow(_) => ErrorKind::Io,
            ProcessingError::Csv(_)
            | ProcessingError::Json(_)
            | ProcessingError::DateParse { .. }
            | ProcessingError::InvalidFormat(_) => ErrorKind::Parse,
            ProcessingError::MissingColumn { .. }
            | ProcessingError::MissingTable { .. }
            | ProcessingError::RowWidth { .. }
            | ProcessingError::DuplicateColumn { .. }
            | ProcessingError::EmptyJoin { .. } => ErrorKind::Schema,
            ProcessingError::Config(_)
            | ProcessingError::Validation(_)
            | ProcessingError::Unsupported(_) => ErrorKind::Config,
            ProcessingError::Stage { source, .. } => source.kind(),
        }
    }

    /// Stage the error was raised in, if it has been wrapped
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ProcessingError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    pub fn missing_column(column: &str, table: &str) -> Self {
        ProcessingError::MissingColumn {
            column: column.to_string(),
            table: table.to_string(),
        }
    }
}

/// Attach the originating stage to an error at a stage boundary
pub trait StageContext<T> {
    fn in_stage(self, stage: Stage) -> Result<T>;
}

impl<T, E> StageContext<T> for std::result::Result<T, E>
where
    E: Into<ProcessingError>,
{
    fn in_stage(self, stage: Stage) -> Result<T> {
        self.map_err(|e| match e.into() {
            // Keep the innermost stage
            wrapped @ ProcessingError::Stage { .. } => wrapped,
            other => ProcessingError::Stage {
                stage,
                source: Box::new(other),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_stage_wrapping_preserves_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "weather.csv");
        let result: std::result::Result<(), _> = Err(io);
        let err = result.in_stage(Stage::Merge).unwrap_err();

        assert_eq!(err.stage(), Some(Stage::Merge));
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().starts_with("merge stage failed"));
        assert!(err.source().unwrap().to_string().contains("weather.csv"));
    }

    #[test]
    fn test_inner_stage_is_kept() {
        let inner: Result<()> = Err(ProcessingError::EmptyJoin {
            key: "date".to_string(),
        })
        .in_stage(Stage::Merge);
        let err = inner.in_stage(Stage::Cleaning).unwrap_err();

        assert_eq!(err.stage(), Some(Stage::Merge));
        assert_eq!(err.kind(), ErrorKind::Schema);
    }
}
