//! Drill-down selection state.
//!
//! At most one state is open at a time. Opening another replaces it; the
//! county view never stacks.

use std::ops::RangeInclusive;

use evl_core::{Layer, StateCode, StateRegistry, Year};
use evl_ts::Scope;

use crate::error::{Error, Result};

/// Last feature under the pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverTarget {
    pub layer: Layer,
    pub id: String,
}

#[derive(Debug, Clone)]
pub struct Selection {
    year: Year,
    years: RangeInclusive<u16>,
    open_state: Option<StateCode>,
    hovered: Option<HoverTarget>,
}

impl Selection {
    /// `initial` is assumed to lie within `years`.
    pub fn new(initial: Year, years: RangeInclusive<u16>) -> Self {
        Self {
            year: initial,
            years,
            open_state: None,
            hovered: None,
        }
    }

    /// Open the county view of `reference` (name, USPS code or FIPS id).
    ///
    /// Returns whether the open state changed.
    pub fn select_state(&mut self, reference: &str) -> Result<bool> {
        let info = StateRegistry::global().require(reference)?;
        let changed = self.open_state != Some(info.code);
        self.open_state = Some(info.code);
        Ok(changed)
    }

    /// Close the county view. Returns whether a state was open.
    pub fn clear(&mut self) -> bool {
        self.open_state.take().is_some()
    }

    /// Returns whether the year changed. Out-of-range years leave the
    /// selection untouched.
    pub fn select_year(&mut self, year: u16) -> Result<bool> {
        if !self.years.contains(&year) {
            return Err(Error::YearOutOfRange {
                year,
                min: *self.years.start(),
                max: *self.years.end(),
            });
        }
        let changed = self.year != Year(year);
        self.year = Year(year);
        Ok(changed)
    }

    pub fn hover(&mut self, layer: Layer, id: impl Into<String>) {
        self.hovered = Some(HoverTarget {
            layer,
            id: id.into(),
        });
    }

    pub fn leave(&mut self) {
        self.hovered = None;
    }

    /// Aggregation scope implied by the open state.
    pub fn scope(&self) -> Scope {
        match self.open_state {
            Some(state) => Scope::County { state },
            None => Scope::State,
        }
    }

    pub fn year(&self) -> Year {
        self.year
    }

    pub fn open_state(&self) -> Option<StateCode> {
        self.open_state
    }

    pub fn hovered(&self) -> Option<&HoverTarget> {
        self.hovered.as_ref()
    }

    pub fn years(&self) -> RangeInclusive<u16> {
        self.years.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evl_core::EvlError;

    fn selection() -> Selection {
        Selection::new(Year(2023), 2023..=2035)
    }

    fn code(raw: &str) -> StateCode {
        StateCode::parse(raw).unwrap()
    }

    #[test]
    fn test_select_state_replaces() {
        let mut s = selection();
        assert_eq!(s.scope(), Scope::State);
        assert!(s.select_state("Texas").unwrap());
        assert_eq!(s.scope(), Scope::County { state: code("TX") });

        // Topology id of Colorado.
        assert!(s.select_state("08").unwrap());
        assert_eq!(s.open_state(), Some(code("CO")));

        assert!(!s.select_state("co").unwrap());
    }

    #[test]
    fn test_unknown_state_leaves_selection() {
        let mut s = selection();
        s.select_state("TX").unwrap();
        assert!(matches!(
            s.select_state("Atlantis"),
            Err(Error::Lookup(EvlError::Unknown { kind: "state", .. }))
        ));
        assert_eq!(s.open_state(), Some(code("TX")));
    }

    #[test]
    fn test_clear() {
        let mut s = selection();
        assert!(!s.clear());
        s.select_state("Texas").unwrap();
        assert!(s.clear());
        assert_eq!(s.scope(), Scope::State);
    }

    #[test]
    fn test_select_year_bounds() {
        let mut s = selection();
        assert!(s.select_year(2035).unwrap());
        assert!(!s.select_year(2035).unwrap());
        let err = s.select_year(2036).unwrap_err();
        assert!(matches!(
            err,
            Error::YearOutOfRange {
                year: 2036,
                min: 2023,
                max: 2035
            }
        ));
        assert_eq!(s.year(), Year(2035));
    }

    #[test]
    fn test_hover_tracking() {
        let mut s = selection();
        s.hover(Layer::County, "48453");
        assert_eq!(s.hovered().map(|h| h.id.as_str()), Some("48453"));
        s.leave();
        assert!(s.hovered().is_none());
    }
}
