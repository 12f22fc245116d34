//! Comparison bar chart
//!
//! Top-N geographies of the current aggregate as horizontal bars, colored
//! with the active scale so the chart reads the same as the map.

use evl_ts::AggregateView;
use serde::Serialize;

use crate::color::Rgb;
use crate::legend::format_kw;
use crate::scale::PowerScale;

/// A single bar in the chart
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Bar {
    pub id: String,
    pub label: String,
    pub value: f64,
    pub color: Rgb,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComparisonChart {
    pub title: Option<String>,
    pub bars: Vec<Bar>,
    pub bar_width: usize,
    pub show_values: bool,
}

impl Default for ComparisonChart {
    fn default() -> Self {
        Self::new()
    }
}

impl ComparisonChart {
    pub fn new() -> Self {
        Self {
            title: None,
            bars: Vec::new(),
            bar_width: 40,
            show_values: true,
        }
    }

    /// Highest `limit` values of `view`, labelled through `label`.
    pub fn from_view<F>(view: &AggregateView, scale: &PowerScale, limit: usize, label: F) -> Self
    where
        F: Fn(&str) -> String,
    {
        let bars = view
            .ranked()
            .into_iter()
            .take(limit)
            .map(|(id, value)| Bar {
                id: id.to_string(),
                label: label(id),
                value,
                color: scale.color(value),
            })
            .collect();
        Self {
            bars,
            ..Self::new()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn bar_width(mut self, width: usize) -> Self {
        self.bar_width = width;
        self
    }

    pub fn show_values(mut self, show: bool) -> Self {
        self.show_values = show;
        self
    }

    pub fn has_bars(&self) -> bool {
        !self.bars.is_empty()
    }

    /// Render the chart as ASCII art lines
    pub fn render_lines(&self) -> Vec<String> {
        if self.bars.is_empty() {
            return vec!["(no data for this hour)".to_string()];
        }

        let mut lines = Vec::new();
        if let Some(title) = &self.title {
            lines.push(title.clone());
            lines.push(String::new());
        }

        let max_val = self
            .bars
            .iter()
            .map(|b| b.value)
            .fold(0.0_f64, f64::max);
        let max_label_len = self
            .bars
            .iter()
            .map(|b| b.label.chars().count())
            .max()
            .unwrap_or(0);

        for bar in &self.bars {
            let normalized = if max_val > 0.0 {
                (bar.value / max_val).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let filled = (normalized * self.bar_width as f64) as usize;
            let visual = "█".repeat(filled);
            let padding = " ".repeat(self.bar_width.saturating_sub(filled));
            let label_padding =
                " ".repeat(max_label_len.saturating_sub(bar.label.chars().count()));

            let line = if self.show_values {
                format!(
                    "{}{} │{}{}│ {}",
                    bar.label,
                    label_padding,
                    visual,
                    padding,
                    format_kw(bar.value)
                )
            } else {
                format!("{}{} │{}{}│", bar.label, label_padding, visual, padding)
            };
            lines.push(line);
        }
        lines
    }
}
