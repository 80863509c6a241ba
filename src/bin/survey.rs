use anyhow::{Context, Result};
use std::io::{self, Write};
use clap::Parser;
use tabular_eda::cli::Args;
use tabular_eda::{config, run_menu, telemetry, SurveyConfig, SurveySession};

fn main() -> Result<()> {
    telemetry::init();

    let args = Args::parse();
    let config: SurveyConfig = match &args.config {
        Some(path) => config::load(path).with_context(|| format!("reading config {}", path.display()))?,
        None => SurveyConfig::default(),
    };
    let path = args.path_or("COVID_19.csv");

    let mut session =
        SurveySession::load(&path, config).with_context(|| format!("loading {}", path.display()))?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "Data read from file: {}", path.display())?;
    run_menu(&mut session, io::stdin().lock(), &mut out)?;
    Ok(())
}
