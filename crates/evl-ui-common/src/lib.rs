//! # evl-ui-common: Atlas Controller
//!
//! Runtime side of the EV load atlas: the simulated clock, the drill-down
//! selection and the controller that turns user intents into repaints.
//!
//! ## Architecture
//!
//! ```text
//! surface ──Intent──► AtlasService ──► evl-ts (aggregate) ──► evl-viz (scale, plan)
//!    ▲                    │                                          │
//!    └──── paint / chart / clock readout ◄───────────────────────────┘
//! ```
//!
//! ## Core Components
//!
//! - [`AtlasService`]: owns all mutable state; applies [`Intent`]s in order
//!   and paints once per batch with the latest `(year, hour, scope)`
//! - [`SimClock`] / [`ClockDriver`]: virtual time, edge-triggered hour
//!   changes, tick generations that invalidate ticks queued before a pause
//! - [`Selection`]: active year and the one open state
//! - [`RenderSurface`]: the seam to the mapping library
//! - [`AtlasConfig`]: `~/.evload/config.toml`
//!
//! ## Usage
//!
//! ```ignore
//! use evl_ui_common::{AtlasConfig, AtlasService, Intent, RecordingSurface};
//!
//! let mut atlas = AtlasService::bootstrap(AtlasConfig::load()?, RecordingSurface::new()).await?;
//! atlas.dispatch(Intent::SelectState("Texas".into()))?;
//! atlas.dispatch(Intent::Start)?;
//! atlas.run().await;
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod intent;
pub mod logging;
pub mod selection;
pub mod service;
pub mod surface;

// Re-exports for convenience
pub use clock::{ClockDriver, ClockSettings, ClockState, SimClock, TickOutcome};
pub use config::{
    AtlasConfig, ChartConfig, ClockConfig, DataConfig, LoggingConfig, ScaleConfig, SelectorConfig,
};
pub use error::{Error, Result};
pub use events::AtlasEvent;
pub use intent::Intent;
pub use logging::init_logging;
pub use selection::{HoverTarget, Selection};
pub use service::AtlasService;
pub use surface::{RecordingSurface, RenderSurface};
