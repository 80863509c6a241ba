//! Cell values and the logical kinds of frame columns

use chrono::{NaiveDateTime, Timelike};
use polars::prelude::DataType;
use std::cmp::Ordering;
use std::fmt;

/// Logical kind of a column, as the analysis stages see it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// 64-bit floating point numbers
    Float,
    /// Free text
    Text,
    /// Small fixed set of labels
    Category,
    /// True/false flags
    Bool,
    /// Timestamps without timezone
    Date,
}

impl ColumnKind {
    /// Kind of a polars dtype; integers count as `Float`, all-null columns
    /// too
    pub fn of(dtype: &DataType) -> Self {
        match dtype {
            DataType::Boolean => Self::Bool,
            DataType::String => Self::Text,
            DataType::Categorical(..) | DataType::Enum(..) => Self::Category,
            DataType::Datetime(..) | DataType::Date => Self::Date,
            DataType::Null
            | DataType::Float32
            | DataType::Float64
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt32
            | DataType::UInt64 => Self::Float,
            _ => Self::Text,
        }
    }

    /// Short lowercase name, as printed by `info`
    pub fn name(&self) -> &'static str {
        match self {
            Self::Float => "float64",
            Self::Text => "object",
            Self::Category => "category",
            Self::Bool => "bool",
            Self::Date => "datetime64",
        }
    }

    /// True for types that hold numbers
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Float)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single owned cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Missing,
    Float(f64),
    Text(String),
    Bool(bool),
    Date(NaiveDateTime),
}

impl Value {
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Numeric view of the value; booleans count as 0/1
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) if !v.is_nan() => Some(*v),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Label used for grouping and categorical conversion
    pub fn label(&self) -> Option<String> {
        if self.is_missing() {
            None
        } else {
            Some(self.to_string())
        }
    }

    /// Total order used for sorting: missing values sort last
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        match (self.is_missing(), other.is_missing()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            (false, false) => {}
        }
        match (self, other) {
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (a, b) => a.to_string().cmp(&b.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("NaN"),
            Self::Float(v) => f.write_str(&format_float(*v)),
            Self::Text(s) => f.write_str(s),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Date(d) => {
                if d.hour() == 0 && d.minute() == 0 && d.second() == 0 {
                    write!(f, "{}", d.date())
                } else {
                    write!(f, "{}", d.format("%Y-%m-%d %H:%M:%S"))
                }
            }
        }
    }
}

/// Format a float the way tables print it: integral values keep one
/// decimal, everything else is limited to six significant decimals.
pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "inf".to_string() } else { "-inf".to_string() }
    } else if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.1}")
    } else {
        let s = format!("{v:.6}");
        let trimmed = s.trim_end_matches('0');
        trimmed.trim_end_matches('.').to_string()
    }
}
