//! Coffee sales overview: structure, summaries and top sales

use eda_core::describe::{describe, duplicate_count, info, missing_counts, Include};
use eda_core::display::{render_counts, render_describe, render_info, render_table};
use eda_core::{loader, Error, Result, Table};
use eda_frame::{sort_by, SortKey};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Column the top rows are ranked by
pub const MONEY_COLUMN: &str = "money";

/// File names in `dir`, sorted
pub fn list_files(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// First `.csv` file of `dir` by name
pub fn find_csv(dir: &Path) -> Result<PathBuf> {
    list_files(dir)?
        .into_iter()
        .find(|name| name.ends_with(".csv"))
        .map(|name| dir.join(name))
        .ok_or_else(|| Error::InvalidInput(format!("no CSV file found in {}", dir.display())))
}

/// Print the overview of an already loaded table
pub fn report<W: Write>(table: &Table, out: &mut W) -> Result<()> {
    writeln!(out, "First rows:\n")?;
    write!(out, "{}", render_table(table, 5)?)?;

    writeln!(out, "\nStructural information:\n")?;
    write!(out, "{}", render_info(&info(table), table.n_rows()))?;

    writeln!(out, "\nDescriptive statistics:\n")?;
    write!(out, "{}", render_describe(&describe(table, Include::All)?))?;

    writeln!(out, "\nMissing values:\n")?;
    write!(out, "{}", render_counts("missing", &missing_counts(table)))?;

    writeln!(out, "\nDuplicate rows:\n")?;
    writeln!(out, "Number of duplicates: {}", duplicate_count(table)?)?;

    writeln!(out, "\nSorting by {MONEY_COLUMN}:\n")?;
    match sort_by(table, &[SortKey::descending(MONEY_COLUMN)]) {
        Ok(sorted) => write!(out, "{}", render_table(&sorted, 10)?)?,
        Err(e) if e.is_missing_column() => writeln!(out, "Column '{MONEY_COLUMN}' not found.")?,
        Err(e) => return Err(e),
    }
    Ok(())
}

/// Locate the dataset in `dir`, load it and print the overview
pub fn run<P: AsRef<Path>, W: Write>(dir: P, out: &mut W) -> Result<Table> {
    let dir = dir.as_ref();
    writeln!(out, "Files in dataset: {:?}", list_files(dir)?)?;
    let path = find_csv(dir)?;
    let table = loader::read_csv(&path)?;
    writeln!(
        out,
        "File loaded: {}",
        path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default()
    )?;
    report(&table, out)?;
    Ok(table)
}
