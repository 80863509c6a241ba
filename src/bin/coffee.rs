use anyhow::{Context, Result};
use std::io::{self, BufWriter, Write};
use clap::Parser;
use tabular_eda::cli::Args;
use tabular_eda::{coffee, telemetry};

fn main() -> Result<()> {
    telemetry::init();

    let args = Args::parse();
    let dir = args.path_or("./coffee_data/");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    coffee::run(&dir, &mut out).with_context(|| format!("reading dataset from {}", dir.display()))?;
    out.flush()?;
    Ok(())
}
