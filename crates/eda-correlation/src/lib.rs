//! Normality-driven correlation of two aligned series
//!
//! Each series is tested for normality (Shapiro-Wilk up to 5000 points,
//! D'Agostino-Pearson beyond). Pearson's r is used only when both tests
//! fail to reject normality; otherwise Spearman's rank correlation is used.
//! A normality test that cannot run is recorded, not hidden, and counts as
//! "not normal".
//!
//! ```rust
//! use eda_correlation::{CorrelationMethod, StatisticalComparator};
//!
//! let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
//! let y = [2.0, 4.1, 5.9, 8.2, 9.9, 12.1, 14.0, 15.8];
//! let result = StatisticalComparator::default().compare(&x, &y).unwrap();
//! assert!(result.correlation.coefficient > 0.99);
//! assert!(matches!(
//!     result.method(),
//!     CorrelationMethod::Pearson | CorrelationMethod::Spearman
//! ));
//! ```

pub mod comparator;
pub mod correlation;
pub mod dagostino;
pub mod shapiro;
pub mod traits;
pub mod types;

pub use comparator::{ComparatorPolicy, StatisticalComparator};
pub use correlation::{pearson, spearman};
pub use dagostino::DagostinoPearson;
pub use shapiro::ShapiroWilk;
pub use traits::NormalityTest;
pub use types::{
    Comparison, Correlation, CorrelationMethod, NormalityAssessment, NormalityResult,
    NormalityTestKind,
};
