//! Atlas configuration.
//!
//! [`AtlasConfig`] is stored in `~/.evload/config.toml`. Every section is
//! optional; unspecified values fall back to the defaults below.

use std::path::{Path, PathBuf};
use std::time::Duration;

use evl_io::{DataSources, DemandSchema};
use evl_viz::{Anchors, Palette, Rgb};
use serde::{Deserialize, Serialize};

use crate::clock::{ClockSettings, MAX_ADVANCE_PER_TICK_MS};
use crate::error::{Error, Result};

/// Main configuration for the atlas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Input file locations.
    pub data: DataConfig,

    /// Simulated clock pacing.
    pub clock: ClockConfig,

    /// Color scales.
    pub scale: ScaleConfig,

    /// Year selector range.
    pub selector: SelectorConfig,

    /// Log output.
    pub logging: LoggingConfig,

    /// Comparison chart.
    pub chart: ChartConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory relative file names resolve against.
    pub data_dir: PathBuf,

    /// Demand table name; `{year}` is replaced by each year.
    pub demand_file_pattern: String,

    pub membership_file: PathBuf,

    pub topology_file: PathBuf,

    /// Years to load.
    pub years: Vec<u16>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            demand_file_pattern: "{year}_gov_fleet_EV_load_profiles.csv".to_string(),
            membership_file: PathBuf::from("counties-by-state.json"),
            topology_file: PathBuf::from("counties-albers-10m.json"),
            years: (2023..=2035).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Real time between ticks.
    pub tick_period_ms: u64,

    /// Virtual milliseconds per real millisecond.
    pub speed_multiplier: u64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: 10,
            speed_multiplier: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    /// Power-law exponent.
    pub exponent: f64,
    pub state_low: Rgb,
    pub state_high: Rgb,
    pub county_low: Rgb,
    pub county_high: Rgb,
    /// Fill for geographies without data.
    pub no_data: Rgb,
    /// Number of labelled legend stops.
    pub legend_stops: usize,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        let palette = Palette::default();
        Self {
            exponent: palette.exponent,
            state_low: palette.state.low,
            state_high: palette.state.high,
            county_low: palette.county.low,
            county_high: palette.county.high,
            no_data: palette.no_data,
            legend_stops: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub min_year: u16,
    pub max_year: u16,
    pub initial_year: u16,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            min_year: 2023,
            max_year: 2035,
            initial_year: 2023,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `EVLOAD_LOG` is unset.
    pub level: String,

    /// Directory for hourly rolling JSON logs.
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Bars shown in the comparison chart.
    pub top_n: usize,

    /// Width of the longest bar, in cells.
    pub bar_width: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            bar_width: 40,
        }
    }
}

impl AtlasConfig {
    /// Get the default config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".evload"))
    }

    /// Get the default config file path.
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Load configuration from the default location.
    ///
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Reject settings the atlas cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.clock.tick_period_ms == 0 {
            return Err(Error::Config("clock.tick_period_ms must be positive".into()));
        }
        if self.clock.speed_multiplier == 0 {
            return Err(Error::Config("clock.speed_multiplier must be positive".into()));
        }
        if !self.clock_settings().crosses_at_most_one_hour() {
            return Err(Error::Config(format!(
                "clock advances {} ms per tick; at most {MAX_ADVANCE_PER_TICK_MS} ms keeps one hour change per tick",
                self.clock_settings().advance_per_tick()
            )));
        }
        let selector = &self.selector;
        if selector.min_year > selector.max_year {
            return Err(Error::Config(format!(
                "selector range {}..={} is inverted",
                selector.min_year, selector.max_year
            )));
        }
        if !(selector.min_year..=selector.max_year).contains(&selector.initial_year) {
            return Err(Error::Config(format!(
                "initial year {} is outside {}..={}",
                selector.initial_year, selector.min_year, selector.max_year
            )));
        }
        if self.data.years.is_empty() {
            return Err(Error::Config("data.years must list at least one year".into()));
        }
        self.palette().validate().map_err(Error::Config)
    }

    pub fn palette(&self) -> Palette {
        Palette {
            exponent: self.scale.exponent,
            state: Anchors {
                low: self.scale.state_low,
                high: self.scale.state_high,
            },
            county: Anchors {
                low: self.scale.county_low,
                high: self.scale.county_high,
            },
            no_data: self.scale.no_data,
        }
    }

    pub fn clock_settings(&self) -> ClockSettings {
        ClockSettings {
            tick_period: Duration::from_millis(self.clock.tick_period_ms),
            speed_multiplier: self.clock.speed_multiplier,
        }
    }

    pub fn sources(&self) -> DataSources {
        DataSources {
            data_dir: self.data.data_dir.clone(),
            demand_file_pattern: self.data.demand_file_pattern.clone(),
            membership_file: self.data.membership_file.clone(),
            topology_file: self.data.topology_file.clone(),
            years: self.data.years.clone(),
            schema: DemandSchema::default(),
        }
    }
}
