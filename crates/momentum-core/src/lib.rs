//! Momentum primitives for gesture-driven UI motion.
//!
//! The crate has no knowledge of input devices or views: callers feed it
//! positional samples and receive positions back through a callback, one
//! frame at a time, from whatever scheduler they drive it with.

pub mod coord;
pub mod motion;
pub mod scheduler;
pub mod velocity;

pub use coord::Coord;
pub use motion::{Motion, MotionHandle, MotionSink, continue_motion};
pub use scheduler::{Flow, FrameQueue, FrameStep, Scheduler};
pub use velocity::{calc_velocity, clamp_velocity};
