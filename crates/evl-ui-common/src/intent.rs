//! Typed intents consumed by the controller.
//!
//! Surfaces never mutate atlas state directly; they translate clicks,
//! hovers, slider moves and transport buttons into an [`Intent`] and hand it
//! to [`crate::AtlasService`].

use evl_core::Layer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Transport: start the clock.
    Start,
    /// Transport: pause the clock.
    Pause,
    /// Transport: stop, rewind to 00:00:00 and close any open state.
    Reset,
    /// Periodic tick from the clock driver, stamped with its run.
    Tick { generation: u64 },
    /// Click on a state: open its county view. Accepts a name, USPS code or
    /// topology id.
    SelectState(String),
    /// Close the county view.
    ClearSelection,
    /// Year slider moved.
    SelectYear(u16),
    /// Pointer entered a feature.
    Hover { layer: Layer, id: String },
    /// Pointer left the map.
    Leave,
    /// Stop processing intents.
    Shutdown,
}

impl Intent {
    /// Name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Start => "start",
            Intent::Pause => "pause",
            Intent::Reset => "reset",
            Intent::Tick { .. } => "tick",
            Intent::SelectState(_) => "select_state",
            Intent::ClearSelection => "clear_selection",
            Intent::SelectYear(_) => "select_year",
            Intent::Hover { .. } => "hover",
            Intent::Leave => "leave",
            Intent::Shutdown => "shutdown",
        }
    }

    /// Transport, selection and year changes; logged as user actions.
    pub fn is_command(&self) -> bool {
        !matches!(
            self,
            Intent::Tick { .. } | Intent::Hover { .. } | Intent::Leave | Intent::Shutdown
        )
    }
}
