//! Frame scheduling contract.
//!
//! A scheduler accepts a [`FrameStep`] and invokes it once per frame with the
//! time elapsed since the series started, the time since the previous frame,
//! and a caller-defined frame context. It invokes the step again only while
//! the step keeps returning [`Flow::Continue`].

/// Result of one frame: keep the series alive or end it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

impl Flow {
    pub const fn is_continue(self) -> bool {
        matches!(self, Flow::Continue)
    }

    pub const fn is_stop(self) -> bool {
        matches!(self, Flow::Stop)
    }
}

impl From<bool> for Flow {
    fn from(keep_going: bool) -> Self {
        if keep_going { Flow::Continue } else { Flow::Stop }
    }
}

/// Callbacks with nothing to say keep the series running.
impl From<()> for Flow {
    fn from(_: ()) -> Self {
        Flow::Continue
    }
}

/// A function invoked once per frame until it returns [`Flow::Stop`].
pub trait FrameStep<Ctx> {
    fn step(&mut self, elapsed: f64, delta: f64, ctx: &mut Ctx) -> Flow;
}

impl<Ctx, F> FrameStep<Ctx> for F
where
    F: FnMut(f64, f64, &mut Ctx) -> Flow,
{
    fn step(&mut self, elapsed: f64, delta: f64, ctx: &mut Ctx) -> Flow {
        self(elapsed, delta, ctx)
    }
}

/// Anything that can run a series of frame steps.
pub trait Scheduler<Ctx> {
    /// Take ownership of `step` and invoke it on every frame until it stops.
    fn run_series(&mut self, step: Box<dyn FrameStep<Ctx>>);
}

struct Series<Ctx> {
    step: Box<dyn FrameStep<Ctx>>,
    // (first frame, previous frame), set on the first tick
    times: Option<(f64, f64)>,
}

/// A minimal frame pump: every [`tick`](FrameQueue::tick) runs each live
/// series once, in registration order.
///
/// A series sees `(0, 0)` on its first frame; afterwards `elapsed` is
/// measured from that first frame and `delta` from the previous one.
pub struct FrameQueue<Ctx> {
    series: Vec<Series<Ctx>>,
}

impl<Ctx> Default for FrameQueue<Ctx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ctx> FrameQueue<Ctx> {
    pub fn new() -> Self {
        Self { series: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Drop every series without invoking it again.
    pub fn clear(&mut self) {
        if !self.series.is_empty() {
            tracing::debug!(dropped = self.series.len(), "frame queue cleared");
        }
        self.series.clear();
    }

    /// Run one frame at time `now` (milliseconds). Returns the number of
    /// series still alive afterwards.
    pub fn tick(&mut self, now: f64, ctx: &mut Ctx) -> usize {
        self.series.retain_mut(|series| {
            let (elapsed, delta) = match series.times {
                None => {
                    series.times = Some((now, now));
                    (0.0, 0.0)
                }
                Some((first, previous)) => {
                    series.times = Some((first, now));
                    (now - first, now - previous)
                }
            };
            series.step.step(elapsed, delta, ctx).is_continue()
        });
        self.series.len()
    }
}

impl<Ctx> Scheduler<Ctx> for FrameQueue<Ctx> {
    fn run_series(&mut self, step: Box<dyn FrameStep<Ctx>>) {
        self.series.push(Series { step, times: None });
    }
}
