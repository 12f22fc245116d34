//! Lookup errors for the domain model.
//!
//! Loader, configuration and controller failures have their own types in the
//! crates that raise them; this one covers references into the static
//! tables of `evl-core`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvlError {
    /// Reference that matches no entry, e.g. a state name nobody knows.
    #[error("unknown {kind}: {name}")]
    Unknown { kind: &'static str, name: String },
}

pub type EvlResult<T> = Result<T, EvlError>;

impl EvlError {
    pub fn unknown(kind: &'static str, name: impl Into<String>) -> Self {
        EvlError::Unknown {
            kind,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EvlError::unknown("state", "Atlantis");
        assert_eq!(err.to_string(), "unknown state: Atlantis");
    }
}
