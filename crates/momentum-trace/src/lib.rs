//! Recorded pointer gestures and the release velocity they produce.

mod parser;
mod tracker;

pub use parser::{Event, EventKind, Trace, TraceError, parse};
pub use tracker::{GestureTracker, Release};

#[cfg(test)]
mod testing;
