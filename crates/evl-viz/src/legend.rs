//! Legend model: a passive view of the active scale.

use evl_core::Layer;
use evl_ts::Domain;
use serde::Serialize;

use crate::color::Rgb;
use crate::scale::PowerScale;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendStop {
    pub value: f64,
    pub color: Rgb,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub level: Layer,
    pub domain: Domain,
    pub low: Rgb,
    pub high: Rgb,
    pub no_data: Rgb,
    pub stops: Vec<LegendStop>,
}

/// Compact kW label: `"950 kW"`, `"12.5 kW"`, `"1.2 MW"`.
pub fn format_kw(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1000.0 {
        format!("{:.1} MW", value / 1000.0)
    } else if magnitude >= 100.0 || value == value.trunc() {
        format!("{value:.0} kW")
    } else {
        format!("{value:.1} kW")
    }
}

impl Legend {
    /// Evenly spaced stops across the domain (at least the two endpoints).
    pub fn from_scale(scale: &PowerScale, stops: usize) -> Self {
        let domain = scale.domain();
        let n = stops.max(2);
        let stops = (0..n)
            .map(|i| {
                let value = domain.min + domain.span() * i as f64 / (n - 1) as f64;
                LegendStop {
                    value,
                    color: scale.color(value),
                    label: format_kw(value),
                }
            })
            .collect();
        let anchors = scale.anchors();
        Self {
            level: scale.level(),
            domain,
            low: anchors.low,
            high: anchors.high,
            no_data: scale.no_data(),
            stops,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.level {
            Layer::State => "State demand (sum of counties)",
            Layer::County => "County demand",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::Palette;

    #[test]
    fn test_stops_span_domain() {
        let scale = PowerScale::build(
            Domain { min: 0.0, max: 400.0 },
            Layer::State,
            &Palette::default(),
        );
        let legend = Legend::from_scale(&scale, 5);
        let values: Vec<f64> = legend.stops.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![0.0, 100.0, 200.0, 300.0, 400.0]);
        assert_eq!(legend.stops[0].color, legend.low);
        assert_eq!(legend.stops[4].color, legend.high);
        assert_eq!(legend.stops[4].label, "400 kW");
    }

    #[test]
    fn test_minimum_two_stops() {
        let scale = PowerScale::build(
            Domain { min: 119.0, max: 121.0 },
            Layer::County,
            &Palette::default(),
        );
        let legend = Legend::from_scale(&scale, 0);
        assert_eq!(legend.stops.len(), 2);
        assert_eq!(legend.title(), "County demand");
    }

    #[test]
    fn test_format_kw() {
        assert_eq!(format_kw(950.0), "950 kW");
        assert_eq!(format_kw(12.5), "12.5 kW");
        assert_eq!(format_kw(3.0), "3 kW");
        assert_eq!(format_kw(1250.0), "1.2 MW");
    }
}
