//! Visualization configuration file support.
//!
//! One `VisualizationConfig` replaces the per-page constants of the individual clock
//! visualizations: start time, loop duration, scaling divisor, secondary attribute, hour
//! convention and input tuning. Every field has a default, so an empty file is valid.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{EngineError, EngineResult};
use crate::input::{DragTrack, DEFAULT_WHEEL_THRESHOLD};
use crate::models::{HourConvention, SecondaryAttribute};
use crate::services::aggregation::AggregationOptions;
use crate::services::cursor::DEFAULT_STEP_MINUTES;
use crate::services::playback::DEFAULT_LOOP_DURATION_MS;

/// File name searched by [`VisualizationConfig::from_default_location`].
pub const CONFIG_FILE_NAME: &str = "collision_clock.toml";

/// Engine configuration from file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizationConfig {
    /// Clock time shown before any input arrives.
    #[serde(default = "default_start_time")]
    pub start_time: NaiveTime,
    #[serde(default = "default_loop_duration_ms")]
    pub loop_duration_ms: u64,
    /// Divisor turning raw counts into daily averages; absent means raw counts only.
    #[serde(default)]
    pub scaling_constant: Option<f64>,
    #[serde(default)]
    pub secondary_attribute: SecondaryAttribute,
    #[serde(default)]
    pub hour_convention: HourConvention,
    #[serde(default = "default_wheel_threshold")]
    pub wheel_threshold: f64,
    #[serde(default = "default_step_minutes")]
    pub step_minutes: u32,
    #[serde(default)]
    pub track: TrackSettings,
}

/// Pixel extent of the horizontal drag track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackSettings {
    #[serde(default = "default_track_left")]
    pub left: f64,
    #[serde(default = "default_track_right")]
    pub right: f64,
}

fn default_start_time() -> NaiveTime {
    NaiveTime::MIN
}

fn default_loop_duration_ms() -> u64 {
    DEFAULT_LOOP_DURATION_MS
}

fn default_wheel_threshold() -> f64 {
    DEFAULT_WHEEL_THRESHOLD
}

fn default_step_minutes() -> u32 {
    DEFAULT_STEP_MINUTES
}

fn default_track_left() -> f64 {
    60.0
}

fn default_track_right() -> f64 {
    720.0
}

impl Default for TrackSettings {
    fn default() -> Self {
        Self {
            left: default_track_left(),
            right: default_track_right(),
        }
    }
}

impl TrackSettings {
    pub fn to_track(&self) -> DragTrack {
        DragTrack::new(self.left, self.right)
    }
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            start_time: default_start_time(),
            loop_duration_ms: default_loop_duration_ms(),
            scaling_constant: None,
            secondary_attribute: SecondaryAttribute::default(),
            hour_convention: HourConvention::default(),
            wheel_threshold: default_wheel_threshold(),
            step_minutes: default_step_minutes(),
            track: TrackSettings::default(),
        }
    }
}

impl FromStr for VisualizationConfig {
    type Err = EngineError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let config: VisualizationConfig = toml::from_str(content).map_err(|e| {
            EngineError::configuration(format!("Failed to parse config file: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }
}

impl VisualizationConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(VisualizationConfig)` if the file was read, parsed and validated
    /// * `Err(EngineError::Configuration)` otherwise
    pub fn from_file<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            EngineError::configuration(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        content.parse()
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `collision_clock.toml` in:
    /// 1. Current directory
    /// 2. `engine/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> EngineResult<Self> {
        let search_paths = [
            PathBuf::from(CONFIG_FILE_NAME),
            PathBuf::from("engine").join(CONFIG_FILE_NAME),
            PathBuf::from("..").join(CONFIG_FILE_NAME),
        ];

        for path in search_paths.iter() {
            if path.exists() {
                return Self::from_file(path);
            }
        }

        Err(EngineError::configuration(format!(
            "No {} found in standard locations",
            CONFIG_FILE_NAME
        )))
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> EngineResult<()> {
        if self.loop_duration_ms == 0 {
            return Err(EngineError::configuration("loop_duration_ms must be positive"));
        }
        if let Some(constant) = self.scaling_constant {
            if !(constant.is_finite() && constant > 0.0) {
                return Err(EngineError::configuration(format!(
                    "scaling_constant must be a positive number, got {}",
                    constant
                )));
            }
        }
        if !(self.wheel_threshold.is_finite() && self.wheel_threshold >= 0.0) {
            return Err(EngineError::configuration(
                "wheel_threshold must be a non-negative number",
            ));
        }
        if self.step_minutes == 0 {
            return Err(EngineError::configuration("step_minutes must be positive"));
        }
        if !(self.track.right > self.track.left) {
            return Err(EngineError::configuration(format!(
                "track.right ({}) must be greater than track.left ({})",
                self.track.right, self.track.left
            )));
        }
        Ok(())
    }

    pub fn aggregation_options(&self) -> AggregationOptions {
        AggregationOptions {
            secondary: self.secondary_attribute,
            scaling_constant: self.scaling_constant,
        }
    }
}
