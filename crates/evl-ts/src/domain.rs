//! Value ranges that color scales are built over.

use serde::{Deserialize, Serialize};

/// Numeric range a color scale is built over. Always `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    /// State-level domain: anchored at zero so hours stay comparable.
    ///
    /// An empty or all-zero hour gets `[0, 1]` instead of a zero-width range.
    pub fn anchored_at_zero(observed_max: Option<f64>) -> Self {
        match observed_max {
            Some(max) if max > 0.0 => Domain { min: 0.0, max },
            _ => Domain { min: 0.0, max: 1.0 },
        }
    }

    /// County-level domain from observed extrema, widened by one unit on each
    /// side when degenerate. No observations behave like a single `0`.
    pub fn observed(extrema: Option<(f64, f64)>) -> Self {
        let (min, max) = extrema.unwrap_or((0.0, 0.0));
        if min == max {
            Domain {
                min: min - 1.0,
                max: max + 1.0,
            }
        } else {
            Domain { min, max }
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Running min/max over present values.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Extrema(Option<(f64, f64)>);

impl Extrema {
    pub(crate) fn push(&mut self, value: f64) {
        self.0 = Some(match self.0 {
            Some((lo, hi)) => (lo.min(value), hi.max(value)),
            None => (value, value),
        });
    }

    pub(crate) fn get(self) -> Option<(f64, f64)> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchored_at_zero() {
        assert_eq!(Domain::anchored_at_zero(Some(42.0)), Domain { min: 0.0, max: 42.0 });
        assert_eq!(Domain::anchored_at_zero(Some(0.0)), Domain { min: 0.0, max: 1.0 });
        assert_eq!(Domain::anchored_at_zero(None), Domain { min: 0.0, max: 1.0 });
    }

    #[test]
    fn test_degenerate_domain_widened() {
        assert_eq!(
            Domain::observed(Some((120.0, 120.0))),
            Domain { min: 119.0, max: 121.0 }
        );
        assert_eq!(Domain::observed(None), Domain { min: -1.0, max: 1.0 });
        assert_eq!(Domain::observed(Some((2.0, 5.0))), Domain { min: 2.0, max: 5.0 });
    }

    #[test]
    fn test_extrema() {
        let mut ext = Extrema::default();
        assert!(ext.get().is_none());
        for v in [3.0, -1.0, 7.5] {
            ext.push(v);
        }
        assert_eq!(ext.get(), Some((-1.0, 7.5)));
    }
}
