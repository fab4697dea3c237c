//! Drives a fling on a virtual frame clock and renders what it reports.

use crate::config::PumpConfig;
use anyhow::{Context, Result};
use clap::ValueEnum;
use momentum_core::{Coord, FrameQueue, continue_motion};
use serde::{Deserialize, Serialize};
use std::{cell::RefCell, fmt::Write as _, rc::Rc};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Frame context handed to every step: the virtual clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    pub index: u32,
    pub now: f64,
}

/// One reported position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frame {
    pub index: u32,
    pub time: f64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub start_x: f64,
    pub start_y: f64,
    pub velocity_x: f64,
    pub velocity_y: f64,
    /// Whether the run ended through the motion handle rather than at rest.
    pub halted: bool,
    pub frames: Vec<Frame>,
}

/// Run a fling to completion, ticking the frame queue every
/// `frame_interval_ms`.
///
/// The motion is halted through its handle once `halt_after_ms` has
/// elapsed or `max_frames` frames have run; the halt takes effect on the
/// following frame.
pub fn run_fling(start: Coord, velocity: Coord, pump: &PumpConfig) -> Outcome {
    let frames: Rc<RefCell<Vec<Frame>>> = Rc::default();
    let recorded = frames.clone();
    let mut queue = FrameQueue::<FrameClock>::new();
    let handle = continue_motion(
        start.x,
        start.y,
        velocity.x,
        velocity.y,
        move |x: f64, y: f64, clock: &mut FrameClock| {
            recorded.borrow_mut().push(Frame {
                index: clock.index,
                time: clock.now,
                x,
                y,
            });
        },
        &mut queue,
    );

    let mut clock = FrameClock::default();
    loop {
        let live = queue.tick(clock.now, &mut clock);
        clock.index += 1;
        if live == 0 {
            break;
        }

        let expired = pump.halt_after_ms.is_some_and(|limit| clock.now >= limit);
        if !handle.is_halted() && (expired || clock.index >= pump.max_frames) {
            tracing::info!(frames = clock.index, elapsed = clock.now, "halting motion");
            handle.halt();
        }
        clock.now += pump.frame_interval_ms;
    }

    let frames = frames.take();
    tracing::debug!(frames = frames.len(), "fling finished");
    Outcome {
        start_x: start.x,
        start_y: start.y,
        velocity_x: velocity.x,
        velocity_y: velocity.y,
        halted: handle.is_halted(),
        frames,
    }
}

/// Render an outcome for stdout.
pub fn render(outcome: &Outcome, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(outcome).context("failed to render frames as JSON")
        }
        OutputFormat::Table => {
            let mut out = String::new();
            writeln!(
                out,
                "{:>5} {:>9} {:>10} {:>10} {:>10} {:>10}",
                "frame", "time_ms", "x", "y", "dx", "dy"
            )?;
            for frame in &outcome.frames {
                writeln!(
                    out,
                    "{:>5} {:>9.1} {:>10.3} {:>10.3} {:>10.3} {:>10.3}",
                    frame.index,
                    frame.time,
                    frame.x,
                    frame.y,
                    frame.x - outcome.start_x,
                    frame.y - outcome.start_y
                )?;
            }
            let ending = if outcome.halted { "halted" } else { "at rest" };
            write!(out, "{} frames, {ending}", outcome.frames.len())?;
            Ok(out)
        }
    }
}
