//! Schema reduction: choosing low-cardinality text columns and converting
//! them to categorical storage

use eda_core::{ColumnKind, Result, Table};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Limits for automatic categorical conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryPolicy {
    /// Maximum number of columns converted
    pub max_columns: usize,
    /// Absolute cap on distinct values
    pub max_unique: usize,
    /// Cap on distinct values as a fraction of the row count
    pub max_unique_ratio: f64,
}

impl Default for CategoryPolicy {
    fn default() -> Self {
        Self {
            max_columns: 4,
            max_unique: 50,
            max_unique_ratio: 0.5,
        }
    }
}

impl CategoryPolicy {
    /// Largest cardinality a column may have to be eligible:
    /// `min(max_unique, max_unique_ratio * n_rows)`
    pub fn cardinality_bound(&self, n_rows: usize) -> f64 {
        (self.max_unique as f64).min(self.max_unique_ratio * n_rows as f64)
    }

    pub fn is_eligible(&self, n_unique: usize, n_rows: usize) -> bool {
        n_unique as f64 <= self.cardinality_bound(n_rows)
    }
}

/// A text column eligible for conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCandidate {
    pub name: String,
    pub n_unique: usize,
}

/// Eligible text columns, fewest distinct values first, capped at
/// `policy.max_columns`; ties keep table order
///
/// Columns with no present value are never candidates.
pub fn select_candidates(table: &Table, policy: &CategoryPolicy) -> Result<Vec<CategoryCandidate>> {
    let n_rows = table.n_rows();
    let mut candidates = Vec::new();
    for name in table.columns_of_kind(ColumnKind::Text) {
        let n_unique = table.n_unique(&name)?;
        if n_unique > 0 && policy.is_eligible(n_unique, n_rows) {
            candidates.push(CategoryCandidate { name, n_unique });
        }
    }
    candidates.sort_by_key(|c| c.n_unique);
    candidates.truncate(policy.max_columns);
    Ok(candidates)
}

/// Convert one column of any type to categorical, using each cell's label,
/// and return its sorted categories
pub fn to_category(table: &mut Table, name: &str) -> Result<Vec<String>> {
    if table.kind(name)? != ColumnKind::Category {
        let labels = Series::new(name.into(), table.labels(name)?);
        let categorical = labels.cast(&DataType::Categorical(None, CategoricalOrdering::Lexical))?;
        table.upsert(categorical)?;
    }
    table.categories(name)
}

/// Select and convert eligible columns, returning the converted names
pub fn reduce_schema(table: &mut Table, policy: &CategoryPolicy) -> Result<Vec<String>> {
    let selected: Vec<String> = select_candidates(table, policy)?
        .into_iter()
        .map(|c| c.name)
        .collect();
    for name in &selected {
        to_category(table, name)?;
    }
    info!(columns = ?selected, "converted to category");
    Ok(selected)
}
