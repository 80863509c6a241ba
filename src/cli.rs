//! Command-line arguments shared by the binaries: `[PATH] [--config FILE]`

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, PartialEq, Eq, Default)]
#[command(author, version, about = "Exploratory analysis of a fixed tabular dataset")]
pub struct Args {
    /// Dataset to read; each program has its own default
    pub path: Option<PathBuf>,
    /// JSON file overriding the built-in settings
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    pub fn path_or(&self, default: &str) -> PathBuf {
        self.path.clone().unwrap_or_else(|| PathBuf::from(default))
    }
}
