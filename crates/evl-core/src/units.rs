//! Unit-safe quantities for charging demand data.
//!
//! Demand is carried as [`Kilowatts`]. A missing or unparseable reading is
//! encoded as NaN and must be skipped by every reduction (see
//! [`Kilowatts::is_missing`]); it is never coerced to zero.
//!
//! ```
//! use evl_core::units::{HourOfDay, Kilowatts};
//!
//! let total = Kilowatts(120.0) + Kilowatts(30.0);
//! assert_eq!(total.value(), 150.0);
//! assert!(Kilowatts::MISSING.is_missing());
//! assert_eq!(HourOfDay::new(23).map(|h| h.value()), Some(23));
//! assert!(HourOfDay::new(24).is_none());
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

macro_rules! impl_unit_ops {
    ($type:ty, $unit_name:literal) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                if self.0.is_nan() {
                    write!(f, "n/a {}", $unit_name)
                } else {
                    write!(f, "{:.1} {}", self.0, $unit_name)
                }
            }
        }

        impl $type {
            /// Create a new value
            #[inline]
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            /// Get the raw numeric value
            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }

            /// Check if value is finite
            #[inline]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }
    };
}

/// Average power demand in kilowatts (kW).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Kilowatts(pub f64);

impl_unit_ops!(Kilowatts, "kW");

impl Kilowatts {
    /// Sentinel for a reading that could not be parsed.
    pub const MISSING: Kilowatts = Kilowatts(f64::NAN);

    /// Parse a raw text field; anything non-numeric becomes [`Kilowatts::MISSING`].
    pub fn parse_lossy(raw: &str) -> Self {
        raw.trim()
            .replace(',', "")
            .parse::<f64>()
            .map(Kilowatts)
            .unwrap_or(Self::MISSING)
    }

    /// True when the reading must be excluded from sums and extrema.
    #[inline]
    pub fn is_missing(self) -> bool {
        !self.0.is_finite()
    }

    /// The value if present.
    #[inline]
    pub fn present(self) -> Option<f64> {
        if self.is_missing() {
            None
        } else {
            Some(self.0)
        }
    }
}

/// Hour of the simulated day, always in `0..=23`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HourOfDay(u8);

impl HourOfDay {
    pub const MIDNIGHT: HourOfDay = HourOfDay(0);

    /// Validated constructor; `None` outside `0..=23`.
    pub const fn new(hour: u8) -> Option<Self> {
        if hour < 24 {
            Some(Self(hour))
        } else {
            None
        }
    }

    /// Hour of day for an elapsed number of simulated milliseconds.
    pub const fn from_offset_millis(offset_ms: u64) -> Self {
        Self(((offset_ms / 3_600_000) % 24) as u8)
    }

    /// Parse a raw text field such as `"5"` or `"5.0"`.
    pub fn parse_lossy(raw: &str) -> Option<Self> {
        let value: f64 = raw.trim().parse().ok()?;
        if value.fract() != 0.0 || !(0.0..24.0).contains(&value) {
            return None;
        }
        Self::new(value as u8)
    }

    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for HourOfDay {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        HourOfDay::new(value).ok_or_else(|| format!("hour {value} is outside 0..=23"))
    }
}

impl From<HourOfDay> for u8 {
    fn from(hour: HourOfDay) -> Self {
        hour.0
    }
}

impl std::fmt::Display for HourOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

/// Calendar year of a demand projection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[repr(transparent)]
pub struct Year(pub u16);

impl Year {
    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for Year {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
