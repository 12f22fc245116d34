//! Query-ready in-memory dataset.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::membership::CountyMembership;
use crate::record::DemandRecord;
use crate::states::{StateCode, StateRegistry};
use crate::units::{HourOfDay, Year};

/// Normalized demand records of every loaded year plus the membership table.
///
/// Records are indexed by `(year, hour)` so one aggregate touches only the
/// rows of its slot. The dataset is immutable once built; the only interior
/// mutation is the compute-once state back-fill on [`DemandRecord`].
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<DemandRecord>,
    slots: HashMap<(Year, HourOfDay), Vec<usize>>,
    years: BTreeSet<Year>,
    membership: Arc<CountyMembership>,
}

impl Dataset {
    pub fn new(records: Vec<DemandRecord>, membership: CountyMembership) -> Self {
        let mut slots: HashMap<(Year, HourOfDay), Vec<usize>> = HashMap::new();
        let mut years = BTreeSet::new();
        for (idx, record) in records.iter().enumerate() {
            years.insert(record.year);
            if let Some(hour) = record.hour_of_day {
                slots.entry((record.year, hour)).or_default().push(idx);
            }
        }
        Self {
            records,
            slots,
            years,
            membership: Arc::new(membership),
        }
    }

    /// Records of one `(year, hour)` slot, in load order.
    pub fn records_at(
        &self,
        year: Year,
        hour: HourOfDay,
    ) -> impl Iterator<Item = &DemandRecord> + '_ {
        self.slots
            .get(&(year, hour))
            .into_iter()
            .flatten()
            .map(move |&idx| &self.records[idx])
    }

    /// State of a record, back-filling from the membership table on first use.
    pub fn state_of(&self, record: &DemandRecord) -> Option<StateCode> {
        record.state_from_membership(&self.membership, StateRegistry::global())
    }

    pub fn membership(&self) -> &CountyMembership {
        &self.membership
    }

    pub fn records(&self) -> &[DemandRecord] {
        &self.records
    }

    pub fn years(&self) -> impl Iterator<Item = Year> + '_ {
        self.years.iter().copied()
    }

    pub fn has_year(&self, year: Year) -> bool {
        self.years.contains(&year)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
