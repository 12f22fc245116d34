//! Error types for the atlas controller.

use evl_core::EvlError;
use evl_io::LoadError;
use thiserror::Error;

/// Result type for controller operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from controller operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An input failed to load; the atlas never becomes interactive.
    #[error("failed to load atlas inputs: {0}")]
    Load(#[from] LoadError),

    /// Year outside the selector range.
    #[error("year {year} is outside the selectable range {min}..={max}")]
    YearOutOfRange { year: u16, min: u16, max: u16 },

    /// Clicked or requested state, county or id is not known.
    #[error(transparent)]
    Lookup(#[from] EvlError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The loader task died before finishing.
    #[error("loader task failed: {0}")]
    Join(String),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(e: tokio::task::JoinError) -> Self {
        Error::Join(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_out_of_range_message() {
        let err = Error::YearOutOfRange {
            year: 2040,
            min: 2023,
            max: 2035,
        };
        assert_eq!(
            err.to_string(),
            "year 2040 is outside the selectable range 2023..=2035"
        );
    }

    #[test]
    fn test_load_error_wraps() {
        let err: Error = LoadError::NoSources.into();
        assert!(matches!(err, Error::Load(LoadError::NoSources)));
        assert!(err.to_string().starts_with("failed to load atlas inputs"));
    }

    #[test]
    fn test_lookup_error_is_transparent() {
        let err: Error = EvlError::unknown("state", "Atlantis").into();
        assert_eq!(err.to_string(), "unknown state: Atlantis");
    }
}
