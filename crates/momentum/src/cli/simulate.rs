use super::RunArgs;
use crate::runner::{render, run_fling};
use anyhow::Result;
use clap::Args;
use momentum_core::{Coord, clamp_velocity};

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Start position on the x axis.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub start_x: f64,

    /// Start position on the y axis.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub start_y: f64,

    /// Release velocity on the x axis, in distance per millisecond.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub velocity_x: f64,

    /// Release velocity on the y axis, in distance per millisecond.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub velocity_y: f64,

    #[command(flatten)]
    pub run: RunArgs,
}

impl SimulateArgs {
    pub fn run(&self) -> Result<()> {
        let config = self.run.load()?;
        let max = config.fling.max_velocity();
        let requested = Coord::new(self.velocity_x, self.velocity_y);
        let velocity = requested.zip_with(max, clamp_velocity);
        if velocity != requested {
            tracing::warn!(
                "velocity ({}, {}) clamped to ({}, {})",
                requested.x,
                requested.y,
                velocity.x,
                velocity.y
            );
        }

        let outcome = run_fling(
            Coord::new(self.start_x, self.start_y),
            velocity,
            &config.pump,
        );
        println!("{}", render(&outcome, config.output.format)?);
        Ok(())
    }
}
