//! County membership table loader (`counties-by-state.json`).

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use evl_core::CountyMembership;

use crate::error::{LoadError, LoadResult};

/// Read a `{ "State": ["X County", ...] }` JSON document from disk.
pub fn load_membership(path: &Path) -> LoadResult<CountyMembership> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_membership(BufReader::new(file), &path.display().to_string())
}

pub fn parse_membership<R: Read>(reader: R, origin: &str) -> LoadResult<CountyMembership> {
    let raw: BTreeMap<String, Vec<String>> =
        serde_json::from_reader(reader).map_err(|source| LoadError::Json {
            origin: origin.to_string(),
            source,
        })?;
    if raw.is_empty() {
        return Err(LoadError::Malformed {
            origin: origin.to_string(),
            message: "membership table lists no states".to_string(),
        });
    }
    let table = CountyMembership::new(raw);
    tracing::debug!(origin, states = table.len(), "county membership loaded");
    Ok(table)
}
