use momentum_core::{Coord, calc_velocity, clamp_velocity, velocity::calc_velocity_2d};
use serde::Serialize;

/// Where and how fast the pointer was moving when it was lifted.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Release {
    pub time: f64,
    pub x: f64,
    pub y: f64,
    pub velocity_x: f64,
    pub velocity_y: f64,
}

impl Release {
    pub fn position(&self) -> Coord {
        Coord::new(self.x, self.y)
    }

    pub fn velocity(&self) -> Coord {
        Coord::new(self.velocity_x, self.velocity_y)
    }
}

/// Folds pointer samples of one drag into a smoothed per-axis velocity.
///
/// The tracker owns the running estimate that [`calc_velocity`] expects its
/// caller to thread through.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    max_velocity: Coord,
    last: Option<(f64, Coord)>,
    velocity: Coord,
}

impl GestureTracker {
    /// `max_velocity` bounds each axis of the released velocity.
    pub fn new(max_velocity: Coord) -> Self {
        Self {
            max_velocity,
            last: None,
            velocity: Coord::ZERO,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.last.is_some()
    }

    /// Current (unclamped) estimate.
    pub fn velocity(&self) -> Coord {
        self.velocity
    }

    pub fn press(&mut self, time: f64, position: Coord) {
        self.last = Some((time, position));
        self.velocity = Coord::ZERO;
    }

    /// Record a pointer move. A drag without a press starts the gesture.
    pub fn drag(&mut self, time: f64, position: Coord) -> Coord {
        let Some((last_time, last_position)) = self.last else {
            self.press(time, position);
            return self.velocity;
        };
        self.velocity = calc_velocity_2d(position - last_position, time - last_time, self.velocity);
        self.last = Some((time, position));
        tracing::trace!(
            time,
            velocity_x = self.velocity.x,
            velocity_y = self.velocity.y,
            "drag sample"
        );
        self.velocity
    }

    /// Lift the pointer at `time`.
    ///
    /// The idle gap since the last sample counts as a sample without
    /// displacement, so a pointer that rested before lifting releases slower.
    /// Returns `None` when the pointer was not down.
    pub fn release(&mut self, time: f64) -> Option<Release> {
        let (last_time, position) = self.last.take()?;
        let idle = time - last_time;
        let velocity = Coord::new(
            clamp_velocity(calc_velocity(0.0, idle, self.velocity.x), self.max_velocity.x),
            clamp_velocity(calc_velocity(0.0, idle, self.velocity.y), self.max_velocity.y),
        );
        self.velocity = Coord::ZERO;

        tracing::debug!(
            time,
            idle,
            velocity_x = velocity.x,
            velocity_y = velocity.y,
            "pointer released"
        );
        Some(Release {
            time,
            x: position.x,
            y: position.y,
            velocity_x: velocity.x,
            velocity_y: velocity.y,
        })
    }
}
