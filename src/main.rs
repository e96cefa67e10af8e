use anyhow::Context;
use clap::Parser;
use solar_etl::cli::{init_tracing, run, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_file.as_deref()).context("failed to set up logging")?;
    run(cli).await.context("solar-etl failed")?;
    Ok(())
}
