//! Smoothed velocity estimation.
//!
//! [`calc_velocity`] is an exponential moving average over raw sample
//! velocities. It holds no state: the caller threads the previous estimate
//! through successive calls.
//!
//! Units are distance per millisecond; times are milliseconds.

use crate::coord::Coord;

/// Sample interval at which the blend weight is pinned to [`REFERENCE_WEIGHT`].
pub const REFERENCE_INTERVAL: f64 = 10.0;

/// Weight given to a new sample spanning [`REFERENCE_INTERVAL`].
pub const REFERENCE_WEIGHT: f64 = 0.6;

/// Time constant (ms) of the weight's approach to 1.
pub const WEIGHT_TIME_CONSTANT: f64 = 37.0;

/// Weight of a new sample spanning `delta_time` against the prior estimate.
///
/// Strictly increasing in `delta_time` and strictly below 1 for any finite
/// interval, so a single sample never fully erases the history.
pub fn blend_weight(delta_time: f64) -> f64 {
    let history = 1.0 - REFERENCE_WEIGHT;
    1.0 - history * (-(delta_time - REFERENCE_INTERVAL) / WEIGHT_TIME_CONSTANT).exp()
}

/// Fold one displacement sample into the running velocity estimate.
///
/// A sample with no elapsed time (or a malformed negative/NaN one) carries
/// no rate information and returns `previous_velocity` untouched.
pub fn calc_velocity(delta_position: f64, delta_time: f64, previous_velocity: f64) -> f64 {
    if delta_time.is_nan() || delta_time <= 0.0 {
        return previous_velocity;
    }
    let instant = delta_position / delta_time;
    previous_velocity + (instant - previous_velocity) * blend_weight(delta_time)
}

/// [`calc_velocity`] applied to both axes with a shared interval.
pub fn calc_velocity_2d(delta: Coord, delta_time: f64, previous: Coord) -> Coord {
    delta.zip_with(previous, |d, p| calc_velocity(d, delta_time, p))
}

/// Clamp a velocity to `[-|max|, |max|]`.
///
/// Non-finite velocities clamp to zero so a corrupt estimate can never start
/// a runaway fling.
pub fn clamp_velocity(velocity: f64, max: f64) -> f64 {
    if !velocity.is_finite() {
        return 0.0;
    }
    let limit = max.abs();
    velocity.max(-limit).min(limit)
}
