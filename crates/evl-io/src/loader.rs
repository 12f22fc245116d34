//! Startup loading of every input.
//!
//! All sources are read and normalized before anything is returned; a single
//! failure aborts the whole load so no partially populated dataset escapes.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use evl_core::{
    backfill_state, CountyMembership, Dataset, DemandRecord, GeographyKey, HourOfDay, StateCode,
    StateRegistry, Topology, Year,
};

use crate::demand::load_demand_csv;
use crate::diagnostics::ImportDiagnostics;
use crate::error::{LoadError, LoadResult};
use crate::membership::load_membership;
use crate::schema::DemandSchema;
use crate::topology::load_topology;

/// Where the inputs live.
#[derive(Debug, Clone)]
pub struct DataSources {
    pub data_dir: PathBuf,
    /// File name template; `{year}` is replaced by each configured year.
    pub demand_file_pattern: String,
    pub membership_file: PathBuf,
    pub topology_file: PathBuf,
    pub years: Vec<u16>,
    pub schema: DemandSchema,
}

impl DataSources {
    pub fn demand_path(&self, year: Year) -> PathBuf {
        self.resolve(Path::new(
            &self
                .demand_file_pattern
                .replace("{year}", &year.value().to_string()),
        ))
    }

    pub fn membership_path(&self) -> PathBuf {
        self.resolve(&self.membership_file)
    }

    pub fn topology_path(&self) -> PathBuf {
        self.resolve(&self.topology_file)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }
}

/// Everything the atlas needs, fully loaded.
#[derive(Debug)]
pub struct LoadedInputs {
    pub dataset: Dataset,
    pub topology: Topology,
    pub diagnostics: ImportDiagnostics,
}

/// Load the membership table, the topology and every configured year.
pub fn load_all(sources: &DataSources) -> LoadResult<LoadedInputs> {
    if sources.years.is_empty() {
        return Err(LoadError::NoSources);
    }

    let membership = load_membership(&sources.membership_path())?;
    let topology = load_topology(&sources.topology_path())?;

    let mut diagnostics = ImportDiagnostics::new();
    let mut records = Vec::new();
    for &year in &sources.years {
        let year = Year(year);
        let path = sources.demand_path(year);
        let parsed = load_demand_csv(&path, year, &sources.schema)?;
        tracing::debug!(
            path = %path.display(),
            %year,
            records = parsed.records.len(),
            "demand source loaded"
        );
        records.extend(parsed.records);
        diagnostics.merge(parsed.diagnostics);
    }

    let records = drop_resolved_duplicates(records, &membership, &mut diagnostics);

    diagnostics.stats.states = membership.len();
    diagnostics.stats.counties = topology.counties.len();
    diagnostics.log_summary();

    Ok(LoadedInputs {
        dataset: Dataset::new(records, membership),
        topology,
        diagnostics,
    })
}

/// Drop rows that collide once stateless rows take their membership state.
///
/// `"Travis County"` and `"Travis County, TX"` parse to different raw keys but
/// name the same county; the first row in load order wins. Rows whose state
/// stays unknown are compared on `None`. The records themselves are not
/// back-filled here.
fn drop_resolved_duplicates(
    records: Vec<DemandRecord>,
    membership: &CountyMembership,
    diagnostics: &mut ImportDiagnostics,
) -> Vec<DemandRecord> {
    let registry = StateRegistry::global();
    let mut seen: HashSet<(Year, Option<StateCode>, GeographyKey, HourOfDay)> = HashSet::new();
    let mut kept = Vec::with_capacity(records.len());

    for record in records {
        if let Some(hour) = record.hour_of_day {
            let state = record
                .known_state()
                .or_else(|| backfill_state(&record.geography_key, membership, registry));
            let key = (record.year, state, record.geography_key.clone(), hour);
            if !seen.insert(key) {
                diagnostics.add_skipped_row(
                    "duplicate",
                    &format!("{} demand", record.year),
                    None,
                    format!(
                        "'{}' at {} duplicates an earlier row of the same county; keeping the first",
                        record.label, hour
                    ),
                );
                continue;
            }
        }
        kept.push(record);
    }

    diagnostics.stats.records = kept.len();
    kept
}
