//! Geography label normalization.
//!
//! Raw datasets, the membership table and the topology all spell county
//! names differently (`"Adams County"`, `"Adams county, TX"`, `"ADAMS"`).
//! Everything is joined on a [`GeographyKey`]: the lowercase name with the
//! `county` suffix, any qualifier after a comma and any parenthetical removed.

use serde::{Deserialize, Serialize};

use crate::states::StateCode;

/// Normalized, join-ready county identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeographyKey(String);

impl GeographyKey {
    /// Normalize a free-text label into a key.
    pub fn from_label(label: &str) -> Self {
        Self(normalize_geography_label(label))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for GeographyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::borrow::Borrow<str> for GeographyKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Lowercase, cut at the first `county` / comma / parenthesis, collapse whitespace.
///
/// Idempotent: none of the cut markers survive, so a second pass is a no-op.
pub fn normalize_geography_label(label: &str) -> String {
    let lowered = label.to_lowercase();
    let mut cut = lowered.len();
    for marker in ["county", ",", "("] {
        if let Some(pos) = lowered.find(marker) {
            cut = cut.min(pos);
        }
    }
    lowered[..cut].split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract the state code from a `"Name County, ST"` style label.
///
/// Only a trailing two-letter token that names a known state is accepted;
/// anything else yields `None` so the state can be derived later.
pub fn split_state_suffix(label: &str) -> Option<StateCode> {
    let (_, suffix) = label.rsplit_once(',')?;
    StateCode::parse(suffix.trim())
}
