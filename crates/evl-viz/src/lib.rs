//! # evl-viz: Scales, Legend and Paint Plans
//!
//! Everything between an aggregate and pixels, without touching pixels:
//!
//! - [`PowerScale`]: power-law (γ = 2 by default) value → color mapping,
//!   one instance per level with its own anchor colors.
//! - [`Legend`]: gradient stops and labels describing the active scale.
//! - [`plan_paint`]: one [`Fill`] per visible feature, missing values in the
//!   palette's no-data color.
//! - [`ComparisonChart`]: top-N bars colored like the map.
//! - [`format_clock`]: the `HH:MM:SS` readout of the simulated clock.

pub mod chart;
pub mod color;
pub mod legend;
pub mod paint;
pub mod readout;
pub mod scale;

pub use chart::{Bar, ComparisonChart};
pub use color::Rgb;
pub use legend::{format_kw, Legend, LegendStop};
pub use paint::{plan_paint, tooltip_text, Fill, PaintPlan};
pub use readout::format_clock;
pub use scale::{Anchors, Palette, PowerScale};
