//! Configuration management for mousetrail.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "mousetrail";

/// Subdirectory holding recorded sessions.
const SESSIONS_DIR_NAME: &str = "mouse_data";

/// Subdirectory holding rendered images and dashboards.
const HEATMAPS_DIR_NAME: &str = "heatmaps";

/// Largest accepted Gaussian sigma, in grid cells.
pub const MAX_SIGMA: f64 = 100.0;

/// Largest accepted number of heatmap bin edges per axis.
pub const MAX_GRID_SIZE: usize = 1000;

/// Largest accepted heatmap image side, in pixels.
pub const MAX_IMAGE_SIDE: u32 = 16_384;

/// Largest accepted bin count for dashboard panels.
pub const MAX_PANEL_BINS: usize = 10_000;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `MOUSETRAIL_`, sections split on `__`)
/// 2. TOML config file at `~/.config/mousetrail/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Screen geometry.
    pub screen: ScreenConfig,
    /// Recording behavior.
    pub recording: RecordingConfig,
    /// Movement heatmap rendering.
    pub heatmap: HeatmapConfig,
    /// Dashboard panels.
    pub dashboard: DashboardConfig,
    /// Output locations.
    pub output: OutputConfig,
}

/// Screen geometry used as the extent of heatmaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Screen width in pixels.
    pub width: u32,
    /// Screen height in pixels.
    pub height: u32,
    /// Replace width/height with the detected display size when possible.
    pub detect: bool,
}

/// Recording-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingConfig {
    /// Side of the square cells hover time is accumulated in, in pixels.
    pub hover_cell_size: u32,
    /// Stop recording when Escape is pressed.
    pub stop_on_escape: bool,
    /// Capacity of the channel between the input hook and the recorder.
    pub channel_capacity: usize,
}

/// Movement heatmap configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapConfig {
    /// Number of bin edges per axis (yields `grid_size - 1` bins).
    pub grid_size: usize,
    /// Standard deviation of the Gaussian smoothing, in bins.
    pub sigma: f64,
    /// Output image width in pixels.
    pub image_width: u32,
    /// Output image height in pixels.
    pub image_height: u32,
    /// Opacity of the heat layer over the white background.
    pub alpha: f64,
}

/// Dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Bins in the activity timeline histogram.
    pub timeline_bins: usize,
    /// Bins in the speed distribution histogram.
    pub speed_bins: usize,
    /// Bins in the hover duration histogram.
    pub hover_bins: usize,
    /// Horizontal hexagon count of the click heatmap.
    pub click_gridsize: usize,
    /// The movement path panel is only drawn above this many moves.
    pub path_min_points: usize,
    /// Approximate number of points the movement path is sampled down to.
    pub path_max_points: usize,
}

/// Output locations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for session JSON files.
    /// Defaults to `~/.local/share/mousetrail/mouse_data`
    pub data_dir: Option<PathBuf>,
    /// Directory for heatmaps and dashboards.
    /// Defaults to `~/.local/share/mousetrail/heatmaps`
    pub heatmap_dir: Option<PathBuf>,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            detect: true,
        }
    }
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            hover_cell_size: 10,
            stop_on_escape: true,
            channel_capacity: 4096,
        }
    }
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            grid_size: 50,
            sigma: 1.0,
            image_width: 1400,
            image_height: 1000,
            alpha: 0.8,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            timeline_bins: 50,
            speed_bins: 30,
            hover_bins: 30,
            click_gridsize: 20,
            path_min_points: 100,
            path_max_points: 1000,
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("MOUSETRAIL_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.screen.width == 0 || self.screen.height == 0 {
            return Err(invalid(format!(
                "screen size must be non-zero (got {}x{})",
                self.screen.width, self.screen.height
            )));
        }

        if self.recording.hover_cell_size == 0 {
            return Err(invalid("hover_cell_size must be greater than 0"));
        }

        if self.recording.channel_capacity == 0 {
            return Err(invalid("channel_capacity must be greater than 0"));
        }

        if !(2..=MAX_GRID_SIZE).contains(&self.heatmap.grid_size) {
            return Err(invalid(format!(
                "grid_size must be between 2 and {MAX_GRID_SIZE} (got {})",
                self.heatmap.grid_size
            )));
        }

        if !(0.0..=MAX_SIGMA).contains(&self.heatmap.sigma) {
            return Err(invalid(format!(
                "sigma must be between 0 and {MAX_SIGMA} (got {})",
                self.heatmap.sigma
            )));
        }

        if !(0.0..=1.0).contains(&self.heatmap.alpha) {
            return Err(invalid(format!(
                "alpha must be between 0 and 1 (got {})",
                self.heatmap.alpha
            )));
        }

        let sides = [
            ("image_width", self.heatmap.image_width),
            ("image_height", self.heatmap.image_height),
        ];
        for (name, value) in sides {
            if !(1..=MAX_IMAGE_SIDE).contains(&value) {
                return Err(invalid(format!(
                    "{name} must be between 1 and {MAX_IMAGE_SIDE} (got {value})"
                )));
            }
        }

        let bins = [
            ("timeline_bins", self.dashboard.timeline_bins),
            ("speed_bins", self.dashboard.speed_bins),
            ("hover_bins", self.dashboard.hover_bins),
            ("click_gridsize", self.dashboard.click_gridsize),
        ];
        for (name, value) in bins {
            if !(1..=MAX_PANEL_BINS).contains(&value) {
                return Err(invalid(format!(
                    "{name} must be between 1 and {MAX_PANEL_BINS} (got {value})"
                )));
            }
        }

        if self.dashboard.path_max_points == 0 {
            return Err(invalid("path_max_points must be greater than 0"));
        }

        Ok(())
    }

    /// Directory for session files, resolving defaults if not set.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.output
            .data_dir
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(SESSIONS_DIR_NAME))
    }

    /// Directory for rendered output, resolving defaults if not set.
    #[must_use]
    pub fn heatmap_dir(&self) -> PathBuf {
        self.output
            .heatmap_dir
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(HEATMAPS_DIR_NAME))
    }

    /// Screen extent as floating point `(width, height)`.
    #[must_use]
    pub fn screen_extent(&self) -> (f64, f64) {
        (f64::from(self.screen.width), f64::from(self.screen.height))
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::ConfigValidation {
        message: message.into(),
    }
}
