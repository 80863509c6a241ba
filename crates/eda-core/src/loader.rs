//! CSV loading with per-column type inference
//!
//! Files are read by the polars CSV reader in two passes: the first infers
//! a dtype per column over every row, the second re-reads with the dtypes
//! settled (integers widened to `Float64`, all-missing columns read as
//! `Float64`, columns holding infinities kept as text). Header names are
//! taken from the raw first record and made unique before they are applied.

use crate::table::Table;
use crate::value::ColumnKind;
use crate::{Error, Result};
use polars::prelude::*;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Strings treated as missing when reading
pub const MISSING_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "#N/A", "-NaN", "-nan",
];

/// Options controlling CSV decoding
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter
    pub delimiter: u8,
    /// Whether the first record holds column names
    pub has_headers: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: true,
        }
    }
}

/// True if a raw field should be read as missing
pub fn is_missing_marker(field: &str) -> bool {
    MISSING_MARKERS.contains(&field.trim())
}

/// Parse a finite number; missing markers, infinities and text give `None`
pub fn parse_number(field: &str) -> Option<f64> {
    let trimmed = field.trim();
    if is_missing_marker(trimmed) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Read a CSV file with default options
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Table> {
    read_csv_with(path, &CsvOptions::default())
}

/// Read a CSV file
pub fn read_csv_with<P: AsRef<Path>>(path: P, options: &CsvOptions) -> Result<Table> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let table = read_csv_from_reader(file, options)?;
    info!(path = %path.display(), rows = table.n_rows(), cols = table.n_cols(), "loaded table");
    Ok(table)
}

/// Read CSV data from any reader
///
/// Short rows are padded with missing cells and surplus fields are
/// dropped.
pub fn read_csv_from_reader<R: Read>(mut reader: R, options: &CsvOptions) -> Result<Table> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Table::from(DataFrame::empty()));
    }

    let inferred = read_frame(&bytes, options, None)?;
    let dtypes = settle_dtypes(&inferred)?;
    let mut df = read_frame(&bytes, options, Some(Arc::new(dtypes)))?;

    let names = if options.has_headers {
        dedupe_names(&header_record(&bytes, options.delimiter)?)
    } else {
        (0..df.width()).map(|i| format!("column_{i}")).collect()
    };
    if names.len() != df.width() {
        return Err(Error::InvalidInput(format!(
            "malformed CSV: {} header names for {} columns",
            names.len(),
            df.width()
        )));
    }
    df.set_column_names(names)?;
    for column in df.get_columns() {
        debug!(column = %column.name(), dtype = %ColumnKind::of(column.dtype()), "inferred column type");
    }
    Ok(Table::from(df))
}

fn read_frame(bytes: &[u8], options: &CsvOptions, dtypes: Option<Arc<Vec<DataType>>>) -> Result<DataFrame> {
    let markers: Vec<PlSmallStr> = MISSING_MARKERS.iter().map(|m| (*m).into()).collect();
    let parse_options = CsvParseOptions::default()
        .with_separator(options.delimiter)
        .with_null_values(Some(NullValues::AllColumns(markers)))
        .with_missing_is_null(true)
        .with_truncate_ragged_lines(true);
    let df = CsvReadOptions::default()
        .with_has_header(options.has_headers)
        .with_infer_schema_length(None)
        .with_dtype_overwrite(dtypes)
        .with_parse_options(parse_options)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?;
    Ok(df)
}

/// Final dtype of each inferred column
///
/// A column is numeric only when every present value is a finite number;
/// one holding no value at all is numeric too.
fn settle_dtypes(inferred: &DataFrame) -> Result<Vec<DataType>> {
    let has_rows = inferred.height() > 0;
    inferred
        .get_columns()
        .iter()
        .map(|column| {
            let all_missing = has_rows && column.null_count() == column.len();
            let dtype = match ColumnKind::of(column.dtype()) {
                _ if all_missing => DataType::Float64,
                ColumnKind::Float => {
                    let widened = column.as_materialized_series().cast(&DataType::Float64)?;
                    let finite = widened.f64()?.into_iter().flatten().all(f64::is_finite);
                    if finite {
                        DataType::Float64
                    } else {
                        DataType::String
                    }
                }
                _ => column.dtype().clone(),
            };
            Ok(dtype)
        })
        .collect()
}

fn header_record(bytes: &[u8], delimiter: u8) -> Result<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    let mut record = csv::StringRecord::new();
    rdr.read_record(&mut record)?;
    Ok(record.iter().map(str::to_string).collect())
}

/// Unique column names: an empty name becomes `Unnamed`; a repeated name
/// gets a `.N` suffix, and the counter moves on until the result is unused
fn dedupe_names(raw: &[String]) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    raw.iter()
        .map(|name| {
            let mut name = if name.is_empty() { "Unnamed".to_string() } else { name.clone() };
            let mut count = counts.get(&name).copied().unwrap_or(0);
            while count > 0 {
                counts.insert(name.clone(), count + 1);
                name = format!("{name}.{count}");
                count = counts.get(&name).copied().unwrap_or(0);
            }
            counts.insert(name.clone(), count + 1);
            name
        })
        .collect()
}
