use super::RunArgs;
use crate::runner::{render, run_fling};
use anyhow::{Context, Result};
use clap::Args;
use std::{fs, path::PathBuf};

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Path to the gesture trace.
    pub trace: PathBuf,

    #[command(flatten)]
    pub run: RunArgs,
}

impl ReplayArgs {
    pub fn run(&self) -> Result<()> {
        let config = self.run.load()?;
        let source = fs::read_to_string(&self.trace)
            .with_context(|| format!("failed to read trace {}", self.trace.display()))?;
        let trace = momentum_trace::parse(&source)
            .with_context(|| format!("invalid trace {}", self.trace.display()))?;

        let release = trace
            .replay(config.fling.max_velocity())
            .context("trace has no release")?;
        tracing::info!(
            "released at ({}, {}) after {} ms with velocity ({:.3}, {:.3})",
            release.x,
            release.y,
            trace.duration(),
            release.velocity_x,
            release.velocity_y
        );

        let outcome = run_fling(release.position(), release.velocity(), &config.pump);
        println!("{}", render(&outcome, config.output.format)?);
        Ok(())
    }
}
