//! Demand table normalizer.
//!
//! Turns one raw CSV (one projection year) into [`DemandRecord`]s. Header
//! problems abort the load; cell problems only mark the value missing.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use evl_core::{
    split_state_suffix, DemandRecord, GeographyKey, HourOfDay, Kilowatts, StateCode,
    StateRegistry, Year,
};

use crate::diagnostics::ImportDiagnostics;
use crate::error::{LoadError, LoadResult};
use crate::schema::{DemandSchema, ResolvedColumns};

/// Records of one source plus what went wrong while reading it.
#[derive(Debug, Default)]
pub struct ParsedDemand {
    pub records: Vec<DemandRecord>,
    pub diagnostics: ImportDiagnostics,
}

/// Read a demand CSV from disk.
pub fn load_demand_csv(path: &Path, year: Year, schema: &DemandSchema) -> LoadResult<ParsedDemand> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_demand_csv(file, &path.display().to_string(), year, schema)
}

/// Parse a demand CSV; `year` applies to rows without a usable year column.
pub fn parse_demand_csv<R: Read>(
    reader: R,
    origin: &str,
    year: Year,
    schema: &DemandSchema,
) -> LoadResult<ParsedDemand> {
    let csv_err = |source| LoadError::Csv {
        origin: origin.to_string(),
        source,
    };
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);
    let headers = rdr.headers().map_err(csv_err)?.clone();
    let columns = schema.resolve(&headers, origin)?;

    let mut parsed = ParsedDemand::default();
    parsed.diagnostics.stats.sources = 1;
    let mut seen: HashSet<(Year, Option<StateCode>, GeographyKey, HourOfDay)> = HashSet::new();

    for row in rdr.records() {
        let row = row.map_err(csv_err)?;
        parsed.diagnostics.stats.rows += 1;
        let line = row.position().map(|p| p.line());
        if let Some(record) = normalize_row(&row, &columns, year, origin, line, &mut parsed.diagnostics)
        {
            if let Some(hour) = record.hour_of_day {
                let key = (record.year, record.known_state(), record.geography_key.clone(), hour);
                if !seen.insert(key) {
                    parsed.diagnostics.add_skipped_row(
                        "duplicate",
                        origin,
                        line,
                        format!(
                            "duplicate row for '{}' at {} in {}; keeping the first",
                            record.label, hour, record.year
                        ),
                    );
                    continue;
                }
            }
            parsed.records.push(record);
        }
    }

    parsed.diagnostics.stats.records = parsed.records.len();
    Ok(parsed)
}

fn normalize_row(
    row: &StringRecord,
    columns: &ResolvedColumns,
    default_year: Year,
    origin: &str,
    line: Option<u64>,
    diagnostics: &mut ImportDiagnostics,
) -> Option<DemandRecord> {
    let cell = |idx: usize| row.get(idx).unwrap_or("");

    let label = cell(columns.geography);
    if GeographyKey::from_label(label).is_empty() {
        diagnostics.add_skipped_row(
            "label",
            origin,
            line,
            format!("unusable geography label '{label}'"),
        );
        return None;
    }

    let year = match columns.year.map(cell) {
        Some(raw) if !raw.is_empty() => match raw.parse::<u16>() {
            Ok(y) => Year(y),
            Err(_) => {
                diagnostics.add_missing_value(
                    origin,
                    line,
                    format!("non-numeric year '{raw}', using {default_year}"),
                );
                default_year
            }
        },
        _ => default_year,
    };

    let state = columns
        .state
        .map(cell)
        .filter(|raw| !raw.is_empty())
        .and_then(|raw| StateRegistry::global().resolve(raw).map(|info| info.code))
        .or_else(|| split_state_suffix(label));

    let raw_hour = cell(columns.hour);
    let hour = HourOfDay::parse_lossy(raw_hour);
    if hour.is_none() {
        diagnostics.add_missing_value(
            origin,
            line,
            format!("hour '{raw_hour}' for '{label}' is not an integer in 0..=23"),
        );
    }

    let raw_demand = cell(columns.demand);
    let mut demand = Kilowatts::parse_lossy(raw_demand);
    if demand.is_missing() {
        diagnostics.add_missing_value(
            origin,
            line,
            format!("non-numeric demand '{raw_demand}' for '{label}'"),
        );
    } else if demand.value() < 0.0 {
        diagnostics.add_missing_value(
            origin,
            line,
            format!("negative demand '{raw_demand}' for '{label}'"),
        );
        demand = Kilowatts::MISSING;
    }

    Some(DemandRecord::new(year, hour, label, state, demand))
}
