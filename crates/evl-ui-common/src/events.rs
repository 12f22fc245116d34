//! Event types for reactive UI updates.

use evl_core::{HourOfDay, StateCode, Year};
use evl_ts::Scope;

/// Events broadcast by the controller after state changes.
#[derive(Debug, Clone, PartialEq)]
pub enum AtlasEvent {
    /// The clock started running.
    ClockStarted,

    /// The clock was paused.
    ClockPaused,

    /// The clock was rewound to zero.
    ClockReset,

    /// The simulated hour of day changed (or was forced by a reset).
    HourChanged { hour: HourOfDay },

    /// A state was opened, or the county view was closed (`None`).
    SelectionChanged { open_state: Option<StateCode> },

    /// The active year changed.
    YearChanged { year: Year },

    /// The map was repainted for this triple.
    Repainted {
        year: Year,
        hour: HourOfDay,
        scope: Scope,
    },
}
