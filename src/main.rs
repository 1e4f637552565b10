mod chart;
mod cli;
mod error;
mod palette;
mod record;
mod table;
mod transform;
mod ui;
mod viewer;
mod viewport;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use std::io::Write;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_tracing(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let path = cli.input.clone().unwrap_or_else(record::default_input_path);
    let records = record::load_records(&path)?;
    if records.is_empty() {
        tracing::info!(path = %path.display(), "no events recorded");
        return Ok(ExitCode::FAILURE);
    }

    let events = transform::transform_all(records)?;

    if cli.dump {
        let mut stdout = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, &events).context("failed to write events")?;
        writeln!(stdout)?;
        return Ok(ExitCode::SUCCESS);
    }

    let chart = chart::Chart::build(&events);
    viewer::run(path, chart).context("viewer failed")?;
    Ok(ExitCode::SUCCESS)
}
