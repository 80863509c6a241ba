//! One histogram per group of a table column

use crate::traits::HistogramBuilder;
use crate::types::Histogram;
use eda_core::{Result, Table, Value};
use tracing::debug;

/// Histograms of `value` split by the labels of `group`
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedHistograms {
    pub value: String,
    pub group: String,
    /// Groups in sorted key order
    pub groups: Vec<(String, Histogram)>,
}

impl GroupedHistograms {
    pub fn get(&self, label: &str) -> Option<&Histogram> {
        self.groups
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, h)| h)
    }
}

/// Bin the non-missing `value` cells of each `group`, each group over its
/// own range
///
/// Rows with a missing group label are left out. Groups are ordered by
/// their key value (false before true, numbers numerically, text
/// lexicographically).
pub fn histograms_by_group<B: HistogramBuilder + ?Sized>(
    table: &Table,
    value: &str,
    group: &str,
    builder: &B,
) -> Result<GroupedHistograms> {
    let values = table.floats(value)?;
    let keys = table.values(group)?;

    let mut groups: Vec<(Value, String, Vec<f64>)> = Vec::new();
    for (cell, key) in values.into_iter().zip(keys) {
        let Some(label) = key.label() else { continue };
        let slot = match groups.iter().position(|(_, l, _)| *l == label) {
            Some(pos) => pos,
            None => {
                groups.push((key, label, Vec::new()));
                groups.len() - 1
            }
        };
        if let Some(v) = cell {
            groups[slot].2.push(v);
        }
    }
    groups.sort_by(|a, b| a.0.sort_cmp(&b.0));

    let groups = groups
        .into_iter()
        .map(|(_, label, sample)| Ok((label, builder.build(&sample)?)))
        .collect::<Result<Vec<_>>>()?;
    debug!(value, group, n_groups = groups.len(), "built grouped histograms");
    Ok(GroupedHistograms {
        value: value.to_string(),
        group: group.to_string(),
        groups,
    })
}
