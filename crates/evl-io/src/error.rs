//! Load errors.
//!
//! Every variant is fatal for startup: the atlas never renders from a
//! partially loaded input. Per-field coercion problems are not errors; they
//! are reported through [`crate::diagnostics::ImportDiagnostics`].

use std::path::PathBuf;

use thiserror::Error;

/// Result type for loaders.
pub type LoadResult<T> = std::result::Result<T, LoadError>;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {origin}: {source}")]
    Csv {
        origin: String,
        #[source]
        source: csv::Error,
    },

    #[error("{origin} has no '{column}' column (accepted headers: {accepted})")]
    MissingColumn {
        origin: String,
        column: &'static str,
        accepted: String,
    },

    #[error("malformed JSON in {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{origin} is missing topology object '{object}'")]
    MissingObject { origin: String, object: String },

    #[error("{origin}: {message}")]
    Malformed { origin: String, message: String },

    #[error("no demand years configured")]
    NoSources,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_message() {
        let err = LoadError::MissingColumn {
            origin: "2023.csv".into(),
            column: "hour",
            accepted: "Hour, hour_of_day".into(),
        };
        assert_eq!(
            err.to_string(),
            "2023.csv has no 'hour' column (accepted headers: Hour, hour_of_day)"
        );
    }
}
