//! Inertial continuation of a released gesture.
//!
//! A [`Motion`] carries a position forward from its release velocity,
//! decaying the velocity every frame until it comes to rest or its
//! [`MotionHandle`] is halted. It is driven by a [`Scheduler`] and reports
//! every position through a [`MotionSink`].
//!
//! Units are distance per millisecond; times are milliseconds.

use crate::{
    coord::Coord,
    scheduler::{Flow, FrameStep, Scheduler},
};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Per-axis speed under which a motion is considered at rest.
pub const MIN_VELOCITY: f64 = 0.02;

/// Time constant (ms) of the exponential velocity decay.
pub const DECAY_TIME_CONSTANT: f64 = 160.0;

/// Distance travelled per unit of release velocity over a complete fling.
///
/// A frame covers `velocity * GLIDE_DISTANCE * (1 - decay(delta))`, so the
/// displacements telescope and the total travel does not depend on how the
/// frames are spaced.
pub const GLIDE_DISTANCE: f64 = 203.7;

/// Velocity factor remaining after `delta` milliseconds.
///
/// `decay(0) == 1` and strictly decreasing for positive deltas.
pub fn decay(delta: f64) -> f64 {
    (-delta / DECAY_TIME_CONSTANT).exp()
}

fn frame_delta(delta: f64) -> f64 {
    // negative and NaN deltas advance nothing
    if delta > 0.0 {
        delta
    } else {
        0.0
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

/// Receives every position a motion reports.
///
/// Returning [`Flow::Stop`] ends the motion the same way coming to rest does.
/// Closures returning `Flow`, `bool` or `()` all qualify.
pub trait MotionSink<Ctx> {
    fn on_motion(&mut self, x: f64, y: f64, ctx: &mut Ctx) -> Flow;
}

impl<Ctx, F, R> MotionSink<Ctx> for F
where
    F: FnMut(f64, f64, &mut Ctx) -> R,
    R: Into<Flow>,
{
    fn on_motion(&mut self, x: f64, y: f64, ctx: &mut Ctx) -> Flow {
        self(x, y, ctx).into()
    }
}

/// Cancellation handle for a running [`Motion`].
///
/// Halting is cooperative: the motion notices on its next frame, reports
/// nothing further and stops.
#[derive(Clone, Debug, Default)]
pub struct MotionHandle {
    halted: Arc<AtomicBool>,
}

impl MotionHandle {
    /// Request the motion to stop at the next frame boundary.
    ///
    /// Idempotent, and a no-op once the motion has already finished.
    pub fn halt(&self) {
        self.halted.store(true, Ordering::Relaxed);
    }

    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::Relaxed)
    }
}

/// State of one fling, advanced one frame per [`FrameStep::step`] call.
pub struct Motion<S> {
    position: Coord,
    velocity: Coord,
    max_velocity: Coord,
    halted: Arc<AtomicBool>,
    primed: bool,
    frames: u32,
    sink: S,
}

impl<S> Motion<S> {
    /// Create a motion starting at `start` with the given release velocity.
    ///
    /// Non-finite velocity components are treated as zero.
    pub fn new(start: Coord, velocity: Coord, sink: S) -> (Self, MotionHandle) {
        let handle = MotionHandle::default();
        let max_velocity = velocity.map(finite_or_zero);
        let motion = Self {
            position: start,
            velocity: max_velocity,
            max_velocity,
            halted: handle.halted.clone(),
            primed: false,
            frames: 0,
            sink,
        };
        (motion, handle)
    }

    pub fn position(&self) -> Coord {
        self.position
    }

    pub fn velocity(&self) -> Coord {
        self.velocity
    }

    /// Velocity the motion was released with.
    pub fn max_velocity(&self) -> Coord {
        self.max_velocity
    }

    /// Number of positions reported so far, including the priming frame.
    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn is_resting(&self) -> bool {
        self.velocity.max_abs() < MIN_VELOCITY
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn integrate(&mut self, delta: f64) {
        let remaining = decay(delta);
        self.position += self.velocity * (GLIDE_DISTANCE * (1.0 - remaining));
        self.velocity = self.velocity * remaining;
    }
}

impl<Ctx, S: MotionSink<Ctx>> FrameStep<Ctx> for Motion<S> {
    fn step(&mut self, elapsed: f64, delta: f64, ctx: &mut Ctx) -> Flow {
        if self.halted.load(Ordering::Relaxed) {
            tracing::debug!(elapsed, frames = self.frames, "motion halted");
            return Flow::Stop;
        }

        // The priming frame reports the start position untouched.
        if self.primed {
            self.integrate(frame_delta(delta));
        } else {
            self.primed = true;
        }

        tracing::trace!(
            elapsed,
            delta,
            x = self.position.x,
            y = self.position.y,
            "motion frame"
        );
        self.frames += 1;
        if self
            .sink
            .on_motion(self.position.x, self.position.y, ctx)
            .is_stop()
        {
            tracing::debug!(elapsed, frames = self.frames, "motion stopped by callback");
            return Flow::Stop;
        }

        if self.frames > 1 && self.is_resting() {
            tracing::debug!(elapsed, frames = self.frames, "motion came to rest");
            return Flow::Stop;
        }

        Flow::Continue
    }
}

/// Start a fling at `(start_x, start_y)` moving at `(max_velocity_x,
/// max_velocity_y)`, which the caller has already clamped.
///
/// Registers exactly one frame step with `scheduler`. The first frame it
/// runs reports the start position unchanged; every later frame decays the
/// velocity, advances the position and reports it through `on_motion`.
pub fn continue_motion<Ctx, S, Sch>(
    start_x: f64,
    start_y: f64,
    max_velocity_x: f64,
    max_velocity_y: f64,
    on_motion: S,
    scheduler: &mut Sch,
) -> MotionHandle
where
    S: MotionSink<Ctx> + 'static,
    Sch: Scheduler<Ctx> + ?Sized,
{
    let (motion, handle) = Motion::new(
        Coord::new(start_x, start_y),
        Coord::new(max_velocity_x, max_velocity_y),
        on_motion,
    );
    tracing::debug!(
        start_x,
        start_y,
        velocity_x = motion.velocity.x,
        velocity_y = motion.velocity.y,
        "starting motion"
    );
    scheduler.run_series(Box::new(motion));
    handle
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    /// Keeps registered steps so tests can pump them by hand.
    #[derive(Default)]
    struct Captured {
        steps: Vec<Box<dyn FrameStep<()>>>,
    }

    impl Scheduler<()> for Captured {
        fn run_series(&mut self, step: Box<dyn FrameStep<()>>) {
            self.steps.push(step);
        }
    }

    type Reports = Rc<RefCell<Vec<(f64, f64)>>>;

    fn recorder() -> (Reports, impl FnMut(f64, f64, &mut ()) -> bool + 'static) {
        let reports: Reports = Rc::default();
        let sink = reports.clone();
        (reports, move |x: f64, y: f64, _: &mut ()| {
            sink.borrow_mut().push((x, y));
            true
        })
    }

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected} ± {tolerance}, got {actual}"
        );
    }

    /// Drive a fling from (141, 104) at 100ms frames, optionally halting once
    /// `halt_after` has elapsed. Returns the x offsets reported after the
    /// priming frame.
    fn run_fling(velocity: f64, halt_after: Option<f64>) -> Vec<f64> {
        let (reports, sink) = recorder();
        let mut scheduler = Captured::default();
        let handle = continue_motion(141.0, 104.0, velocity, velocity, sink, &mut scheduler);
        assert_eq!(scheduler.steps.len(), 1);
        let mut step = scheduler.steps.pop().unwrap();

        assert!(step.step(0.0, 0.0, &mut ()).is_continue());
        assert_eq!(reports.borrow().as_slice(), &[(141.0, 104.0)]);
        reports.borrow_mut().clear();

        let mut time = 0.0;
        let mut flow = Flow::Continue;
        while flow.is_continue() && time < 10_000.0 {
            time += 100.0;
            flow = step.step(time, 100.0, &mut ());
            if halt_after.is_some_and(|limit| time >= limit) {
                handle.halt();
            }
        }
        assert!(flow.is_stop());

        reports
            .borrow()
            .iter()
            .map(|&(x, y)| {
                assert_close(x - 141.0, y - 104.0, 1e-3);
                x - 141.0
            })
            .collect()
    }

    fn assert_offsets(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "offsets: {actual:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert_close(*a, *e, 1.0);
        }
    }

    #[test]
    fn follows_positive_inertia() {
        let offsets = run_fling(0.665, None);
        assert_offsets(&offsets, &[63.0, 97.0, 115.0, 125.0, 130.0, 133.0]);
    }

    #[test]
    fn follows_negative_inertia() {
        let offsets = run_fling(-0.665, None);
        assert_offsets(&offsets, &[-63.0, -97.0, -115.0, -125.0, -130.0, -133.0]);
    }

    #[test]
    fn mirrored_velocity_mirrors_offsets_exactly() {
        let positive = run_fling(0.665, None);
        let negative = run_fling(-0.665, None);
        assert_eq!(positive.len(), negative.len());
        for (p, n) in positive.iter().zip(&negative) {
            assert_close(*p, -*n, 1e-9);
        }
    }

    #[test]
    fn halts_positive_inertia() {
        let offsets = run_fling(0.665, Some(300.0));
        assert_offsets(&offsets, &[63.0, 97.0, 115.0]);
    }

    #[test]
    fn halts_negative_inertia() {
        let offsets = run_fling(-0.665, Some(300.0));
        assert_offsets(&offsets, &[-63.0, -97.0, -115.0]);
    }

    #[test]
    fn halt_before_first_frame_reports_nothing() {
        let (reports, sink) = recorder();
        let mut scheduler = Captured::default();
        let handle = continue_motion(0.0, 0.0, 1.0, 1.0, sink, &mut scheduler);
        handle.halt();
        handle.halt();
        assert!(handle.is_halted());

        let mut step = scheduler.steps.pop().unwrap();
        assert!(step.step(0.0, 0.0, &mut ()).is_stop());
        assert!(reports.borrow().is_empty());
    }

    #[test]
    fn halt_after_rest_is_harmless() {
        let (_, sink) = recorder();
        let mut queue = crate::FrameQueue::<()>::new();
        let handle = continue_motion(0.0, 0.0, 0.0, 0.0, sink, &mut queue);
        let mut now = 0.0;
        while queue.tick(now, &mut ()) > 0 {
            now += 16.0;
        }
        handle.halt();
        handle.halt();
        assert!(queue.is_empty());
    }

    #[test]
    fn zero_axis_stays_put() {
        let (reports, sink) = recorder();
        let mut scheduler = Captured::default();
        continue_motion(10.0, 20.0, 0.0, -0.5, sink, &mut scheduler);
        let mut step = scheduler.steps.pop().unwrap();
        let mut time = 0.0;
        let mut delta = 0.0;
        while step.step(time, delta, &mut ()).is_continue() {
            delta = 16.0;
            time += delta;
        }
        let reports = reports.borrow();
        assert!(reports.len() > 2);
        assert!(reports.iter().all(|&(x, _)| x == 10.0));
        assert!(reports.windows(2).all(|w| w[1].1 <= w[0].1));
    }

    #[test]
    fn zero_delta_frames_do_not_move() {
        let (reports, sink) = recorder();
        let (mut motion, _handle) = Motion::new(Coord::new(5.0, 5.0), Coord::new(1.0, 1.0), sink);
        assert!(motion.step(0.0, 0.0, &mut ()).is_continue());
        assert!(motion.step(0.0, 0.0, &mut ()).is_continue());
        assert_eq!(motion.velocity(), Coord::new(1.0, 1.0));
        assert!(motion.step(16.0, 16.0, &mut ()).is_continue());
        assert!(motion.step(16.0, 0.0, &mut ()).is_continue());
        let reports = reports.borrow();
        assert_eq!(reports[0], (5.0, 5.0));
        assert_eq!(reports[1], (5.0, 5.0));
        assert!(reports[2].0 > 5.0);
        assert_eq!(reports[2], reports[3]);
        assert_eq!(motion.frames(), 4);
    }

    #[test]
    fn callback_stop_ends_motion() {
        let calls = Rc::new(RefCell::new(0));
        let counter = calls.clone();
        let sink = move |_: f64, _: f64, _: &mut ()| {
            *counter.borrow_mut() += 1;
            if *counter.borrow() == 2 { Flow::Stop } else { Flow::Continue }
        };
        let (mut motion, _handle) = Motion::new(Coord::ZERO, Coord::new(2.0, 0.0), sink);
        assert!(motion.step(0.0, 0.0, &mut ()).is_continue());
        assert!(motion.step(16.0, 16.0, &mut ()).is_stop());
        assert_eq!(*calls.borrow(), 2);
        assert!(!motion.is_resting());
    }

    #[test]
    fn unit_callback_keeps_running() {
        let (mut motion, _handle) =
            Motion::new(Coord::ZERO, Coord::new(1.0, 0.0), |_: f64, _: f64, _: &mut ()| {});
        assert!(motion.step(0.0, 0.0, &mut ()).is_continue());
        assert!(motion.step(16.0, 16.0, &mut ()).is_continue());
    }

    #[test]
    fn non_finite_velocity_comes_to_rest() {
        let (_, sink) = recorder();
        let (mut motion, _handle) =
            Motion::new(Coord::ZERO, Coord::new(f64::NAN, f64::INFINITY), sink);
        assert_eq!(motion.velocity(), Coord::ZERO);
        assert!(motion.step(0.0, 0.0, &mut ()).is_continue());
        assert!(motion.step(16.0, 16.0, &mut ()).is_stop());
        assert_eq!(motion.position(), Coord::ZERO);
    }

    #[test]
    fn malformed_deltas_never_accelerate() {
        let (_, sink) = recorder();
        let (mut motion, _handle) = Motion::new(Coord::ZERO, Coord::new(1.0, -1.0), sink);
        motion.step(0.0, 0.0, &mut ());
        for delta in [-100.0, f64::NAN, f64::NEG_INFINITY] {
            motion.step(0.0, delta, &mut ());
            assert_eq!(motion.velocity(), Coord::new(1.0, -1.0));
            assert_eq!(motion.position(), Coord::ZERO);
        }
        assert!(motion.step(0.0, f64::INFINITY, &mut ()).is_stop());
        assert!(motion.position().x.is_finite());
    }

    #[test]
    fn decay_is_monotone() {
        assert_eq!(decay(0.0), 1.0);
        assert!(decay(16.0) < 1.0);
        assert!(decay(100.0) < decay(16.0));
    }

    /// Total x travel of a 0.665/ms fling from the origin at a fixed frame delta.
    fn travel_at(delta: f64) -> f64 {
        let (mut motion, _handle) =
            Motion::new(Coord::ZERO, Coord::new(0.665, 0.0), |_: f64, _: f64, _: &mut ()| {});
        let mut time = 0.0;
        motion.step(time, 0.0, &mut ());
        loop {
            time += delta;
            if motion.step(time, delta, &mut ()).is_stop() {
                return motion.position().x;
            }
        }
    }

    #[test]
    fn travel_does_not_depend_on_frame_spacing() {
        let reference = travel_at(100.0);
        assert_close(travel_at(16.0), reference, 1.0);
        assert_close(travel_at(8.0), reference, 1.0);
    }

    #[test]
    fn stalled_frame_never_overshoots_the_glide() {
        let limit = 0.665 * GLIDE_DISTANCE;
        for delta in [250.0, 1_000.0, 60_000.0] {
            let travel = travel_at(delta);
            assert!(travel <= limit, "{delta}ms frames travelled {travel}");
            assert_close(travel, travel_at(100.0), 4.0);
        }
    }

    #[test]
    fn speed_never_increases_and_motion_terminates() {
        bolero::check!()
            .with_type::<(i16, i16, u8)>()
            .for_each(|&(vx, vy, frame)| {
                // speeds up to ±8 distance/ms, frames of 1..=256ms
                let velocity = Coord::new(f64::from(vx) / 4096.0, f64::from(vy) / 4096.0);
                let delta = f64::from(frame) + 1.0;
                let (mut motion, _handle) =
                    Motion::new(Coord::ZERO, velocity, |_: f64, _: f64, _: &mut ()| {});

                let start = velocity.max_abs().max(MIN_VELOCITY);
                let bound = (DECAY_TIME_CONSTANT / delta * (start / MIN_VELOCITY).ln()).ceil()
                    as u32
                    + 2;

                let mut previous = motion.velocity();
                let mut time = 0.0;
                assert!(motion.step(time, 0.0, &mut ()).is_continue());
                loop {
                    time += delta;
                    let flow = motion.step(time, delta, &mut ());
                    let current = motion.velocity();
                    assert!(current.x.abs() <= previous.x.abs());
                    assert!(current.y.abs() <= previous.y.abs());
                    previous = current;
                    if flow.is_stop() {
                        break;
                    }
                    assert!(motion.frames() <= bound, "exceeded {bound} frames");
                }
            });
    }
}
