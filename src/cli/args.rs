use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::utils::constants::{COMPRESSION_SNAPPY, DEFAULT_CONFIG_FILE, DEFAULT_SAMPLE_ROWS};

#[derive(Parser)]
#[command(name = "solar-etl")]
#[command(about = "Weather and air quality ETL for solar panel efficiency data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short,
        long,
        global = true,
        default_value = DEFAULT_CONFIG_FILE,
        help = "Configuration file (JSON, TOML or YAML)"
    )]
    pub config: PathBuf,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download the source databases and extract their tables to CSV
    Ingest,

    /// Deduplicate, coalesce and join the raw tables
    Merge,

    /// Clean the merged table into the final feature table
    Clean {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Ingest, merge and clean in order
    Run {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Display schema, missing counts and sample rows of a CSV or Parquet file
    Info {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, default_value_t = DEFAULT_SAMPLE_ROWS)]
        sample: usize,
    },
}

/// Extra outputs of the clean stage
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    #[arg(long, help = "Also export the cleaned table as Parquet")]
    pub parquet: Option<PathBuf>,

    #[arg(short = 'z', long, default_value = COMPRESSION_SNAPPY)]
    pub compression: String,

    #[arg(long, help = "Save the transformation report as JSON")]
    pub report: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_with_outputs() {
        let cli = Cli::try_parse_from([
            "solar-etl",
            "--config",
            "settings.toml",
            "clean",
            "--parquet",
            "final.parquet",
            "--compression",
            "zstd",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from("settings.toml"));
        match cli.command {
            Commands::Clean { output } => {
                assert_eq!(output.parquet, Some(PathBuf::from("final.parquet")));
                assert_eq!(output.compression, "zstd");
                assert!(output.report.is_none());
            }
            _ => panic!("expected clean command"),
        }
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["solar-etl", "info", "--file", "final.csv"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("config.json"));
        assert!(!cli.verbose);
        assert!(matches!(cli.command, Commands::Info { sample: 10, .. }));
    }
}
