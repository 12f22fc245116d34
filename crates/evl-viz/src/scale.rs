//! Power-law color scales.
//!
//! Values map onto `[0, 1]` through `sign(x)·|x|^γ` before interpolating
//! between two anchor colors, so the many small readings of a skewed demand
//! distribution stay compressed and the few large ones stand out. State and
//! county scales are separate instances with their own anchors.

use evl_core::Layer;
use evl_ts::{Domain, Reading};
use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// Anchor colors of one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchors {
    pub low: Rgb,
    pub high: Rgb,
}

/// Colors and exponent shared by every scale the atlas builds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub exponent: f64,
    pub state: Anchors,
    pub county: Anchors,
    /// Fill for geographies without data; never produced by a scale.
    pub no_data: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            exponent: 2.0,
            state: Anchors {
                low: Rgb::new(0x08, 0x30, 0x6b),
                high: Rgb::new(0xff, 0xe6, 0x00),
            },
            county: Anchors {
                low: Rgb::new(0x1a, 0x98, 0x50),
                high: Rgb::new(0xd7, 0x30, 0x27),
            },
            no_data: Rgb::new(0x80, 0x80, 0x80),
        }
    }
}

impl Palette {
    pub fn anchors(&self, level: Layer) -> Anchors {
        match level {
            Layer::State => self.state,
            Layer::County => self.county,
        }
    }

    /// Reject palettes whose no-data color lies on either gradient, or whose
    /// exponent is unusable.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.exponent.is_finite() && self.exponent > 0.0) {
            return Err(format!("scale exponent must be positive, got {}", self.exponent));
        }
        for level in [Layer::State, Layer::County] {
            let anchors = self.anchors(level);
            let collides = (0..=255).any(|step| {
                anchors.low.lerp(anchors.high, step as f64 / 255.0) == self.no_data
            });
            if collides {
                return Err(format!(
                    "no-data color {} also appears on the {level} gradient",
                    self.no_data
                ));
            }
        }
        Ok(())
    }
}

fn signed_pow(x: f64, exponent: f64) -> f64 {
    x.signum() * x.abs().powf(exponent)
}

/// Value → color mapping over one domain. Cheap to build; rebuilt on every
/// aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerScale {
    level: Layer,
    domain: Domain,
    exponent: f64,
    anchors: Anchors,
    no_data: Rgb,
}

impl PowerScale {
    pub fn build(domain: Domain, level: Layer, palette: &Palette) -> Self {
        Self {
            level,
            domain,
            exponent: palette.exponent,
            anchors: palette.anchors(level),
            no_data: palette.no_data,
        }
    }

    /// Position of `value` on the gradient, clamped to `[0, 1]`; `None` for NaN.
    pub fn normalize(&self, value: f64) -> Option<f64> {
        if value.is_nan() {
            return None;
        }
        let lo = signed_pow(self.domain.min, self.exponent);
        let hi = signed_pow(self.domain.max, self.exponent);
        let span = hi - lo;
        if !span.is_finite() || span <= 0.0 {
            return Some(0.0);
        }
        Some(((signed_pow(value, self.exponent) - lo) / span).clamp(0.0, 1.0))
    }

    pub fn color(&self, value: f64) -> Rgb {
        match self.normalize(value) {
            Some(t) => self.anchors.low.lerp(self.anchors.high, t),
            None => self.no_data,
        }
    }

    pub fn color_for(&self, reading: Reading) -> Rgb {
        match reading {
            Reading::Value(v) => self.color(v),
            Reading::NoData => self.no_data,
        }
    }

    pub fn level(&self) -> Layer {
        self.level
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn anchors(&self) -> Anchors {
        self.anchors
    }

    pub fn no_data(&self) -> Rgb {
        self.no_data
    }

    pub fn exponent(&self) -> f64 {
        self.exponent
    }
}
