//! Normalized demand records.

use once_cell::sync::OnceCell;

use crate::geography::GeographyKey;
use crate::membership::CountyMembership;
use crate::states::{StateCode, StateRegistry};
use crate::units::{HourOfDay, Kilowatts, Year};

/// Average power demand of one county at one hour of one year.
///
/// Immutable after load except for the state code, which may be derived
/// lazily from the membership table. The derivation runs at most once per
/// record; concurrent readers observe either nothing or the final value.
#[derive(Debug, Clone)]
pub struct DemandRecord {
    pub year: Year,
    /// `None` when the raw hour could not be parsed; such rows never match a query.
    pub hour_of_day: Option<HourOfDay>,
    pub geography_key: GeographyKey,
    /// Label as it appeared in the source, for tooltips and diagnostics.
    pub label: String,
    pub avg_demand_kw: Kilowatts,
    state: OnceCell<Option<StateCode>>,
}

impl DemandRecord {
    pub fn new(
        year: Year,
        hour_of_day: Option<HourOfDay>,
        label: impl Into<String>,
        state: Option<StateCode>,
        avg_demand_kw: Kilowatts,
    ) -> Self {
        let label = label.into();
        let cell = OnceCell::new();
        if let Some(code) = state {
            let _ = cell.set(Some(code));
        }
        Self {
            year,
            hour_of_day,
            geography_key: GeographyKey::from_label(&label),
            label,
            avg_demand_kw,
            state: cell,
        }
    }

    /// State code if it is already known, without triggering derivation.
    pub fn known_state(&self) -> Option<StateCode> {
        self.state.get().copied().flatten()
    }

    /// True once the state has been resolved, successfully or not.
    pub fn state_resolved(&self) -> bool {
        self.state.get().is_some()
    }

    /// Return the state, deriving and caching it on first use.
    pub fn state_or_backfill<F>(&self, derive: F) -> Option<StateCode>
    where
        F: FnOnce(&GeographyKey) -> Option<StateCode>,
    {
        *self.state.get_or_init(|| derive(&self.geography_key))
    }

    /// Back-fill from the membership table: the key must belong to exactly one state.
    pub fn state_from_membership(
        &self,
        membership: &CountyMembership,
        registry: &StateRegistry,
    ) -> Option<StateCode> {
        self.state_or_backfill(|key| backfill_state(key, membership, registry))
    }
}

/// Unique membership state for a key; ambiguous or unknown keys give `None`.
pub fn backfill_state(
    key: &GeographyKey,
    membership: &CountyMembership,
    registry: &StateRegistry,
) -> Option<StateCode> {
    match membership.states_containing(key).as_slice() {
        [single] => registry.by_name(single).map(|info| info.code),
        _ => None,
    }
}
