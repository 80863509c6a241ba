//! Entity name matching
//!
//! Names from configuration ("Czechia", "United States") are resolved
//! against the labels that actually occur in a dataset. Resolution tries an
//! exact match, then a case-insensitive one, then the single most similar
//! label whose Ratcliff/Obershelp similarity reaches the cutoff.
//!
//! ```rust
//! use eda_match::{EntityMatcher, MatchKind};
//!
//! let labels = ["Hungary", "Poland"];
//! let m = EntityMatcher::default().find("poland", &labels).unwrap();
//! assert_eq!(m.label, "Poland");
//! assert_eq!(m.kind, MatchKind::CaseInsensitive);
//! assert!(EntityMatcher::default().find("Xyzzyland", &labels).is_none());
//! ```

pub mod matcher;
pub mod sequence;

pub use matcher::{EntityMatch, EntityMatcher, MatchKind};
pub use sequence::{get_close_matches, ratio, SequenceMatcher};
