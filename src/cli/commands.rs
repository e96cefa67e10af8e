use crate::cli::args::{Cli, Commands, OutputArgs};
use crate::config::PipelineConfig;
use crate::error::{Result, Stage, StageContext};
use crate::ingest::DataIngestion;
use crate::models::Table;
use crate::processors::{TransformReport, TransformationPipeline};
use crate::readers::TableReader;
use crate::writers::ParquetWriter;
use std::path::Path;

pub async fn run(cli: Cli) -> Result<()> {
    // Progress bars would interleave with a log file's contents
    let show_progress = cli.log_file.is_none();

    let load_config = || PipelineConfig::load(&cli.config).in_stage(Stage::Config);

    match cli.command {
        Commands::Ingest => {
            let config = load_config()?;
            println!("Ingesting source databases...");
            ingest(&config, show_progress).await?;
            println!("Ingestion complete!");
        }

        Commands::Merge => {
            let config = load_config()?;
            println!("Merging raw tables...");
            let stats = TransformationPipeline::new(&config.data_transformation)
                .with_progress(show_progress)
                .merge_stage()?;
            let report = TransformReport {
                merge: Some(stats),
                ..Default::default()
            };
            println!("\n{}", report.generate_summary());
            println!(
                "Merged table written to {}",
                config.data_transformation.merged_data_path
            );
        }

        Commands::Clean { output } => {
            let config = load_config()?;
            println!("Cleaning merged table...");
            let (table, report) = TransformationPipeline::new(&config.data_transformation)
                .with_progress(show_progress)
                .clean_stage()?;
            finish_clean(&config, &table, &report, &output)?;
        }

        Commands::Run { output } => {
            let config = load_config()?;
            println!("Running full pipeline...");
            ingest(&config, show_progress).await?;

            let pipeline =
                TransformationPipeline::new(&config.data_transformation).with_progress(show_progress);
            let stats = pipeline.merge_stage()?;
            let (table, mut report) = pipeline.clean_stage()?;
            report.merge = Some(stats);
            finish_clean(&config, &table, &report, &output)?;
        }

        Commands::Info { file, sample } => show_info(&file, sample)?,
    }

    Ok(())
}

async fn ingest(config: &PipelineConfig, show_progress: bool) -> Result<()> {
    DataIngestion::new(&config.data_ingestion)?
        .with_progress(show_progress)
        .run()
        .await
}

/// Print the report and write the optional Parquet and JSON outputs
fn finish_clean(
    config: &PipelineConfig,
    table: &Table,
    report: &TransformReport,
    output: &OutputArgs,
) -> Result<()> {
    println!("\n{}", report.generate_summary());
    println!(
        "Final table written to {}",
        config.data_transformation.final_data_path
    );

    if let Some(path) = &output.parquet {
        let writer = ParquetWriter::new()
            .with_compression(&output.compression)
            .in_stage(Stage::Output)?;
        writer.write_table(table, path).in_stage(Stage::Output)?;
        let file_info = writer.get_file_info(path).in_stage(Stage::Output)?;
        println!("\n{}", file_info.summary());
    }

    if let Some(path) = &output.report {
        report.save_json(path).in_stage(Stage::Output)?;
        println!("Report saved to {}", path.display());
    }

    Ok(())
}

fn show_info(file: &Path, sample: usize) -> Result<()> {
    println!("Analyzing table file: {}", file.display());

    let is_parquet = file
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet"));

    if is_parquet {
        let file_info = ParquetWriter::new().get_file_info(file)?;
        println!("\n{}", file_info.summary());
        println!("\nColumns:");
        for name in &file_info.column_names {
            println!("  {}", name);
        }
        return Ok(());
    }

    let table = TableReader::new().read_table(file)?;
    print!("{}", describe_table(&table, sample));
    Ok(())
}

/// Schema, row count, missing counts per column and the first rows
pub fn describe_table(table: &Table, sample: usize) -> String {
    let mut summary = String::new();

    summary.push_str(&format!(
        "\nTable '{}': {} rows, {} columns\n",
        table.name(),
        table.len(),
        table.columns().len()
    ));

    summary.push_str("\nColumns (missing values):\n");
    for (index, column) in table.columns().iter().enumerate() {
        let kind = if table.is_numeric_column(index) {
            "numeric"
        } else {
            "text"
        };
        summary.push_str(&format!(
            "  {} [{}]: {}\n",
            column,
            kind,
            table.missing_count(index)
        ));
    }

    if sample > 0 && !table.is_empty() {
        summary.push_str(&format!(
            "\nSample rows (showing {} of {}):\n",
            sample.min(table.len()),
            table.len()
        ));
        summary.push_str(&format!("  {}\n", table.columns().join(" | ")));
        for row in table.rows().iter().take(sample) {
            let cells: Vec<String> = row.iter().map(|c| c.render()).collect();
            summary.push_str(&format!("  {}\n", cells.join(" | ")));
        }
    }

    summary
}
