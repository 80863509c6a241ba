//! Mapping of yes/no answers to booleans

use eda_core::{bool_series, ColumnKind, Result, Table};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Accepted spellings for each answer, compared trimmed and lowercased
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YesNoMapping {
    pub truthy: Vec<String>,
    pub falsy: Vec<String>,
    /// Prefix of undecided answers (`Maybe`, `Maybe (можливо)`, ...);
    /// these become missing
    pub undecided_prefix: String,
}

impl Default for YesNoMapping {
    fn default() -> Self {
        let owned = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect();
        Self {
            truthy: owned(&["yes", "y", "так", "true", "1", "1.0"]),
            falsy: owned(&["no", "n", "ні", "false", "0", "0.0"]),
            undecided_prefix: "maybe".to_string(),
        }
    }
}

/// Interpretation of one answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    Undecided,
    Unrecognised,
}

impl YesNoMapping {
    pub fn classify(&self, raw: &str) -> Answer {
        let key = raw.trim().to_lowercase();
        if self.truthy.iter().any(|t| *t == key) {
            Answer::Yes
        } else if self.falsy.iter().any(|f| *f == key) {
            Answer::No
        } else if key.starts_with(&self.undecided_prefix) {
            Answer::Undecided
        } else {
            Answer::Unrecognised
        }
    }
}

/// What happened to one mapped column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingReport {
    pub column: String,
    pub yes: usize,
    pub no: usize,
    pub cleared: usize,
    /// Answers left untouched because no spelling matched
    pub unrecognised: usize,
    /// True when the column was stored as `Bool`
    pub is_bool: bool,
}

/// Map a column of answers through `mapping`
///
/// Undecided answers become missing. When every remaining answer is
/// recognised the column becomes `Bool`; otherwise it stays text, with the
/// recognised answers rewritten as `True`/`False`.
pub fn map_yes_no(table: &mut Table, name: &str, mapping: &YesNoMapping) -> Result<MappingReport> {
    let mut report = MappingReport {
        column: name.to_string(),
        yes: 0,
        no: 0,
        cleared: 0,
        unrecognised: 0,
        is_bool: false,
    };
    if table.kind(name)? == ColumnKind::Bool {
        let flags = table.series(name)?.bool()?;
        report.yes = flags.into_iter().filter(|b| *b == Some(true)).count();
        report.no = flags.into_iter().filter(|b| *b == Some(false)).count();
        report.is_bool = true;
        return Ok(report);
    }

    let answers: Vec<Option<(Answer, String)>> = table
        .labels(name)?
        .into_iter()
        .map(|label| label.map(|raw| (mapping.classify(&raw), raw)))
        .collect();
    for (answer, _) in answers.iter().flatten() {
        match answer {
            Answer::Yes => report.yes += 1,
            Answer::No => report.no += 1,
            Answer::Undecided => report.cleared += 1,
            Answer::Unrecognised => report.unrecognised += 1,
        }
    }

    let series = if report.unrecognised == 0 {
        report.is_bool = true;
        let flags: Vec<Option<bool>> = answers
            .iter()
            .map(|a| match a {
                Some((Answer::Yes, _)) => Some(true),
                Some((Answer::No, _)) => Some(false),
                _ => None,
            })
            .collect();
        bool_series(name, &flags)
    } else {
        let text: Vec<Option<String>> = answers
            .into_iter()
            .map(|a| match a {
                Some((Answer::Yes, _)) => Some("True".to_string()),
                Some((Answer::No, _)) => Some("False".to_string()),
                Some((Answer::Unrecognised, raw)) => Some(raw),
                Some((Answer::Undecided, _)) | None => None,
            })
            .collect();
        Series::new(name.into(), text)
    };
    table.upsert(series)?;
    debug!(?report, "mapped yes/no column");
    Ok(report)
}
