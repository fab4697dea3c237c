use crate::runner::OutputFormat;
use anyhow::{Context, Result};
use momentum_core::Coord;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Tool configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Release velocity limits
    #[serde(default)]
    pub fling: FlingConfig,

    /// Virtual frame clock driving the continuation
    #[serde(default)]
    pub pump: PumpConfig,

    /// Rendering of reported frames
    #[serde(default)]
    pub output: OutputConfig,
}

/// Per-axis release velocity limits, in distance units per millisecond
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlingConfig {
    #[serde(default = "default_max_velocity")]
    pub max_velocity_x: f64,

    #[serde(default = "default_max_velocity")]
    pub max_velocity_y: f64,
}

impl Default for FlingConfig {
    fn default() -> Self {
        Self {
            max_velocity_x: default_max_velocity(),
            max_velocity_y: default_max_velocity(),
        }
    }
}

impl FlingConfig {
    pub fn max_velocity(&self) -> Coord {
        Coord::new(self.max_velocity_x, self.max_velocity_y)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PumpConfig {
    /// Time between frames in milliseconds
    #[serde(default = "default_frame_interval")]
    pub frame_interval_ms: f64,

    /// Frames after which a still-running motion is halted
    #[serde(default = "default_max_frames")]
    pub max_frames: u32,

    /// Halt the motion once this much time has elapsed
    #[serde(default)]
    pub halt_after_ms: Option<f64>,
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: default_frame_interval(),
            max_frames: default_max_frames(),
            halt_after_ms: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_max_velocity() -> f64 {
    2.0
}

fn default_frame_interval() -> f64 {
    16.0
}

fn default_max_frames() -> u32 {
    2_000
}

impl Config {
    /// Load configuration from a file, auto-detecting TOML or JSON format
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Self::from_toml(&content),
            Some("json") => Self::from_json(&content),
            // TOML first, JSON as a fallback
            _ => Self::from_toml(&content).or_else(|_| Self::from_json(&content)),
        }
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse config as TOML")
    }

    /// Parse configuration from JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("failed to parse config as JSON")
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        for (name, max) in [
            ("fling.max_velocity_x", self.fling.max_velocity_x),
            ("fling.max_velocity_y", self.fling.max_velocity_y),
        ] {
            if !(max.is_finite() && max > 0.0) {
                anyhow::bail!("{name} must be a positive number, got {max}");
            }
        }

        let interval = self.pump.frame_interval_ms;
        if !(interval.is_finite() && interval > 0.0) {
            anyhow::bail!("pump.frame_interval_ms must be a positive number, got {interval}");
        }

        if self.pump.max_frames == 0 {
            anyhow::bail!("pump.max_frames cannot be zero");
        }

        let negative = |halt: &f64| halt.is_nan() || *halt < 0.0;
        if let Some(halt) = self.pump.halt_after_ms.filter(negative) {
            anyhow::bail!("pump.halt_after_ms cannot be negative, got {halt}");
        }

        Ok(())
    }
}
