//! Aggregation engine.
//!
//! [`compute_aggregate`] is a pure function of `(year, hour, scope)` and the
//! immutable [`Dataset`]. The only side effect is the compute-once state
//! back-fill on records that arrived without a state code.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use evl_core::{Dataset, HourOfDay, StateCode, StateRegistry, Year};
use serde::{Deserialize, Serialize};

use crate::domain::{Domain, Extrema};

/// Geographic scope of an aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "lowercase")]
pub enum Scope {
    /// Per-state sums across all counties.
    State,
    /// Raw per-county values of one open state.
    County { state: StateCode },
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::State => write!(f, "states"),
            Scope::County { state } => write!(f, "counties of {state}"),
        }
    }
}

/// The `(year, hour, scope)` triple an aggregate is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AggregateKey {
    pub year: Year,
    pub hour: HourOfDay,
    pub scope: Scope,
}

/// Value shown for one geography.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    Value(f64),
    /// No record (or only missing values) for this geography; never zero.
    NoData,
}

impl Reading {
    pub fn value(self) -> Option<f64> {
        match self {
            Reading::Value(v) => Some(v),
            Reading::NoData => None,
        }
    }
}

/// Output of one aggregate computation.
///
/// Ids are USPS state codes in state scope and geography keys in county
/// scope. Anything absent from `values` reads as [`Reading::NoData`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateView {
    pub key: AggregateKey,
    pub values: BTreeMap<String, f64>,
    /// Geographies the scope knows about that have no value.
    pub no_data: BTreeSet<String>,
    pub domain: Domain,
}

impl AggregateView {
    pub fn lookup(&self, id: &str) -> Reading {
        self.values
            .get(id)
            .copied()
            .map_or(Reading::NoData, Reading::Value)
    }

    /// Values in descending order, ties broken by id.
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> =
            self.values.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }

    pub fn scope(&self) -> Scope {
        self.key.scope
    }
}

/// Compute the aggregate for one `(year, hour, scope)`.
pub fn compute_aggregate(dataset: &Dataset, key: AggregateKey) -> AggregateView {
    match key.scope {
        Scope::State => state_aggregate(dataset, key),
        Scope::County { state } => county_aggregate(dataset, key, state),
    }
}

fn state_aggregate(dataset: &Dataset, key: AggregateKey) -> AggregateView {
    let mut sums: BTreeMap<StateCode, f64> = BTreeMap::new();
    // One value per county, first wins, matching the county view.
    let mut counted: HashSet<(StateCode, &str)> = HashSet::new();
    let mut unassigned = 0usize;
    for record in dataset.records_at(key.year, key.hour) {
        let Some(value) = record.avg_demand_kw.present() else {
            continue;
        };
        match dataset.state_of(record) {
            Some(state) => {
                if counted.insert((state, record.geography_key.as_str())) {
                    *sums.entry(state).or_insert(0.0) += value;
                }
            }
            None => unassigned += 1,
        }
    }
    if unassigned > 0 {
        tracing::debug!(
            year = %key.year,
            hour = %key.hour,
            unassigned,
            "records without a derivable state left out of state sums"
        );
    }

    let domain = Domain::anchored_at_zero(sums.values().copied().reduce(f64::max));
    let values: BTreeMap<String, f64> = sums
        .into_iter()
        .map(|(state, sum)| (state.to_string(), sum))
        .collect();
    let no_data = StateRegistry::global()
        .all()
        .iter()
        .map(|info| info.code.to_string())
        .filter(|code| !values.contains_key(code))
        .collect();

    AggregateView {
        key,
        values,
        no_data,
        domain,
    }
}

fn county_aggregate(dataset: &Dataset, key: AggregateKey, open: StateCode) -> AggregateView {
    let entry = StateRegistry::global()
        .by_code(open)
        .and_then(|info| dataset.membership().entry(info.name));

    let mut values = BTreeMap::new();
    let mut extrema = Extrema::default();
    if let Some(entry) = entry {
        for record in dataset.records_at(key.year, key.hour) {
            if !entry.contains(&record.geography_key) {
                continue;
            }
            // Same county name in another state.
            if dataset.state_of(record).is_some_and(|state| state != open) {
                continue;
            }
            let Some(value) = record.avg_demand_kw.present() else {
                continue;
            };
            if !values.contains_key(record.geography_key.as_str()) {
                values.insert(record.geography_key.to_string(), value);
                extrema.push(value);
            }
        }
    } else {
        tracing::debug!(state = %open, "open state has no membership entry");
    }

    let no_data = entry
        .map(|e| {
            e.keys
                .iter()
                .map(|k| k.to_string())
                .filter(|k| !values.contains_key(k))
                .collect()
        })
        .unwrap_or_default();

    AggregateView {
        key,
        values,
        no_data,
        domain: Domain::observed(extrema.get()),
    }
}
