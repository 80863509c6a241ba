use anyhow::{Context, Result};
use std::io::{self, BufWriter, Write};
use clap::Parser;
use tabular_eda::cli::Args;
use tabular_eda::{config, owid, telemetry, OwidConfig};

fn main() -> Result<()> {
    telemetry::init();

    let args = Args::parse();
    let config: OwidConfig = match &args.config {
        Some(path) => config::load(path).with_context(|| format!("reading config {}", path.display()))?,
        None => OwidConfig::default(),
    };
    let path = args.path_or("owid-covid-data.csv");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    owid::run(&path, &config, &mut out).with_context(|| format!("analysing {}", path.display()))?;
    out.flush()?;
    Ok(())
}
