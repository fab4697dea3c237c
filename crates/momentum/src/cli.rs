use crate::{config::Config, runner::OutputFormat};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

pub mod replay;
pub mod simulate;

/// Options shared by every command that runs a fling.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Path to a configuration file (TOML or JSON).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Time between frames in milliseconds. Overrides the config file.
    #[arg(long)]
    pub frame_interval: Option<f64>,

    /// Halt the motion once this many milliseconds have elapsed.
    #[arg(long)]
    pub halt_after: Option<f64>,

    /// Output format. Overrides the config file.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

impl RunArgs {
    /// Load the config file (or defaults), apply overrides and validate.
    pub fn load(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::debug!("loading config from {}", path.display());
                Config::from_file(path)?
            }
            None => Config::default(),
        };

        if let Some(interval) = self.frame_interval {
            config.pump.frame_interval_ms = interval;
        }
        if let Some(halt) = self.halt_after {
            config.pump.halt_after_ms = Some(halt);
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }

        config.validate()?;
        Ok(config)
    }
}
