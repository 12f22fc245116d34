//! Paint plans: one fill per visible feature for a given aggregate.
//!
//! A plan is everything a surface needs to draw one frame. State scope
//! paints every state feature; county scope paints only the counties of the
//! open state, matched to values by geography key.

use evl_core::{Layer, StateRegistry, Topology};
use evl_ts::{AggregateKey, AggregateView, Reading, Scope};
use serde::Serialize;

use crate::color::Rgb;
use crate::legend::{format_kw, Legend};
use crate::scale::{Palette, PowerScale};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fill {
    pub layer: Layer,
    /// Topology feature id (FIPS).
    pub id: String,
    pub name: String,
    pub color: Rgb,
    #[serde(skip)]
    pub reading: Reading,
}

/// Hover text: `"Travis: 120 kW"` or `"Travis: no data"`.
pub fn tooltip_text(name: &str, reading: Reading) -> String {
    match reading {
        Reading::Value(v) => format!("{name}: {}", format_kw(v)),
        Reading::NoData => format!("{name}: no data"),
    }
}

impl Fill {
    pub fn tooltip(&self) -> String {
        tooltip_text(&self.name, self.reading)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaintPlan {
    pub key: AggregateKey,
    pub fills: Vec<Fill>,
    pub legend: Legend,
}

impl PaintPlan {
    pub fn fill(&self, id: &str) -> Option<&Fill> {
        self.fills.iter().find(|f| f.id == id)
    }

    pub fn level(&self) -> Layer {
        self.legend.level
    }
}

/// Build the scale for `view` and color every feature of its scope.
pub fn plan_paint(
    view: &AggregateView,
    topology: &Topology,
    palette: &Palette,
    legend_stops: usize,
) -> PaintPlan {
    let level = match view.scope() {
        Scope::State => Layer::State,
        Scope::County { .. } => Layer::County,
    };
    let scale = PowerScale::build(view.domain, level, palette);
    let registry = StateRegistry::global();

    let fills = match view.scope() {
        Scope::State => topology
            .states
            .iter()
            .map(|feature| {
                // Features outside the registry (territories) read as no data.
                let reading = registry
                    .by_fips(&feature.id)
                    .map_or(Reading::NoData, |info| view.lookup(info.code.as_str()));
                Fill {
                    layer: Layer::State,
                    id: feature.id.clone(),
                    name: feature.name.clone(),
                    color: scale.color_for(reading),
                    reading,
                }
            })
            .collect(),
        Scope::County { state } => {
            let fips = registry.by_code(state).map(|info| info.fips).unwrap_or_default();
            topology
                .counties_in_state(fips)
                .map(|feature| {
                    let reading = view.lookup(feature.geography_key().as_str());
                    Fill {
                        layer: Layer::County,
                        id: feature.id.clone(),
                        name: feature.name.clone(),
                        color: scale.color_for(reading),
                        reading,
                    }
                })
                .collect()
        }
    };

    PaintPlan {
        key: view.key,
        fills,
        legend: Legend::from_scale(&scale, legend_stops),
    }
}
