//! Resolving display names against the labels present in a dataset

use crate::sequence::get_close_matches;
use eda_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// How a name was resolved
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchKind {
    Exact,
    CaseInsensitive,
    Fuzzy { score: f64 },
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => f.write_str("exact"),
            Self::CaseInsensitive => f.write_str("case-insensitive"),
            Self::Fuzzy { score } => write!(f, "fuzzy ({score:.3})"),
        }
    }
}

/// A resolved label
#[derive(Debug, Clone, PartialEq)]
pub struct EntityMatch {
    pub label: String,
    pub kind: MatchKind,
}

/// Matches names exactly, then ignoring case, then by similarity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityMatcher {
    /// Minimum similarity for a fuzzy match, in `[0, 1]`
    pub cutoff: f64,
}

impl Default for EntityMatcher {
    fn default() -> Self {
        Self { cutoff: 0.7 }
    }
}

impl EntityMatcher {
    pub fn new(cutoff: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&cutoff) {
            return Err(Error::InvalidParameter(format!(
                "cutoff must be in [0, 1], got {cutoff}"
            )));
        }
        Ok(Self { cutoff })
    }

    /// Best label for `name` among `labels`, or `None`
    ///
    /// Case-insensitive matching returns the first such label in order.
    pub fn find<S: AsRef<str>>(&self, name: &str, labels: &[S]) -> Option<EntityMatch> {
        if let Some(label) = labels.iter().map(|l| l.as_ref()).find(|l| *l == name) {
            return Some(EntityMatch {
                label: label.to_string(),
                kind: MatchKind::Exact,
            });
        }
        let lowered = name.to_lowercase();
        if let Some(label) = labels
            .iter()
            .map(|l| l.as_ref())
            .find(|l| l.to_lowercase() == lowered)
        {
            return Some(EntityMatch {
                label: label.to_string(),
                kind: MatchKind::CaseInsensitive,
            });
        }
        let found = get_close_matches(name, labels, 1, self.cutoff)
            .into_iter()
            .next()
            .map(|(label, score)| EntityMatch {
                label: label.to_string(),
                kind: MatchKind::Fuzzy { score },
            });
        debug!(name, matched = ?found, "entity lookup");
        found
    }

    /// Resolve each name in order, keeping the unmatched ones as `None`
    pub fn find_all<S: AsRef<str>, N: AsRef<str>>(
        &self,
        names: &[N],
        labels: &[S],
    ) -> Vec<(String, Option<EntityMatch>)> {
        names
            .iter()
            .map(|n| (n.as_ref().to_string(), self.find(n.as_ref(), labels)))
            .collect()
    }
}
