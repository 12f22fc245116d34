//! Render surface seam.
//!
//! The mapping library that owns geometry and projection sits behind
//! [`RenderSurface`]. The controller only ever hands it finished paint
//! plans and strings; it never asks the surface to recompute geometry.

use evl_core::Topology;
use evl_viz::{ComparisonChart, PaintPlan};

pub trait RenderSurface {
    /// Construct the map paths once, after every input has loaded.
    fn build(&mut self, topology: &Topology);

    /// Apply fills and the legend. Geometry stays as built.
    fn paint(&mut self, plan: &PaintPlan);

    fn show_chart(&mut self, chart: &ComparisonChart);

    /// Update the `HH:MM:SS` readout.
    fn set_clock(&mut self, readout: &str);

    fn show_tooltip(&mut self, text: &str);

    fn hide_tooltip(&mut self);
}

/// Headless surface that records everything it is asked to do.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub built: Option<(usize, usize)>,
    pub paints: Vec<PaintPlan>,
    pub charts: Vec<ComparisonChart>,
    pub clock: Option<String>,
    pub clock_updates: usize,
    pub tooltip: Option<String>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_paint(&self) -> Option<&PaintPlan> {
        self.paints.last()
    }

    pub fn paint_count(&self) -> usize {
        self.paints.len()
    }
}

impl RenderSurface for RecordingSurface {
    fn build(&mut self, topology: &Topology) {
        self.built = Some((topology.states.len(), topology.counties.len()));
    }

    fn paint(&mut self, plan: &PaintPlan) {
        self.paints.push(plan.clone());
    }

    fn show_chart(&mut self, chart: &ComparisonChart) {
        self.charts.push(chart.clone());
    }

    fn set_clock(&mut self, readout: &str) {
        self.clock = Some(readout.to_string());
        self.clock_updates += 1;
    }

    fn show_tooltip(&mut self, text: &str) {
        self.tooltip = Some(text.to_string());
    }

    fn hide_tooltip(&mut self) {
        self.tooltip = None;
    }
}
