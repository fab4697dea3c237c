//! Line-oriented gesture traces.
//!
//! ```text
//! # time (ms)  x       y
//! down 0       141     104
//! move 16      129.75  104
//! up   40
//! ```
//!
//! `#` starts a comment. A trace holds exactly one gesture: a `down`, any
//! number of `move`s, and a closing `up`, with non-decreasing times.

use crate::tracker::{GestureTracker, Release};
use momentum_core::Coord;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EventKind {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up,
}

impl EventKind {
    fn name(&self) -> &'static str {
        match self {
            EventKind::Down { .. } => "down",
            EventKind::Move { .. } => "move",
            EventKind::Up => "up",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Event {
    pub line: usize,
    pub time: f64,
    #[serde(flatten)]
    pub kind: EventKind,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Trace {
    pub events: Vec<Event>,
}

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("unknown event '{word}' at line {line}, column {column}")]
    UnknownEvent {
        line: usize,
        column: usize,
        word: String,
    },

    #[error("missing {field} for '{event}' at line {line}")]
    MissingField {
        line: usize,
        event: &'static str,
        field: &'static str,
    },

    #[error("invalid number '{raw}' at line {line}, column {column}")]
    InvalidNumber {
        line: usize,
        column: usize,
        raw: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    #[error("non-finite number '{raw}' at line {line}, column {column}")]
    NonFinite {
        line: usize,
        column: usize,
        raw: String,
    },

    #[error("unexpected '{raw}' at line {line}, column {column}")]
    TrailingInput {
        line: usize,
        column: usize,
        raw: String,
    },

    #[error("time {time} at line {line} is earlier than the previous event at {previous}")]
    TimeWentBackwards { line: usize, time: f64, previous: f64 },

    #[error("'{event}' at line {line} before the pointer went down")]
    NotPressed { line: usize, event: &'static str },

    #[error("'down' at line {line} while the pointer is already down")]
    AlreadyPressed { line: usize },

    #[error("'{event}' at line {line} after the pointer was released")]
    AfterRelease { line: usize, event: &'static str },

    #[error("trace ends without releasing the pointer")]
    MissingRelease,
}

/// Whitespace separated fields with their 1-based columns.
fn fields(line: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut rest = line;
    let mut offset = 0;
    std::iter::from_fn(move || {
        let trimmed = rest.trim_start();
        offset += rest.len() - trimmed.len();
        if trimmed.is_empty() {
            return None;
        }
        let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
        let field = (offset + 1, &trimmed[..end]);
        offset += end;
        rest = &trimmed[end..];
        Some(field)
    })
}

struct Fields<I> {
    line: usize,
    event: &'static str,
    inner: I,
}

impl<'a, I: Iterator<Item = (usize, &'a str)>> Fields<I> {
    fn number(&mut self, field: &'static str) -> Result<f64, TraceError> {
        let (column, raw) = self.inner.next().ok_or(TraceError::MissingField {
            line: self.line,
            event: self.event,
            field,
        })?;
        let value: f64 = raw.parse().map_err(|source| TraceError::InvalidNumber {
            line: self.line,
            column,
            raw: raw.to_string(),
            source,
        })?;
        if !value.is_finite() {
            return Err(TraceError::NonFinite {
                line: self.line,
                column,
                raw: raw.to_string(),
            });
        }
        Ok(value)
    }

    fn finish(mut self) -> Result<(), TraceError> {
        match self.inner.next() {
            Some((column, raw)) => Err(TraceError::TrailingInput {
                line: self.line,
                column,
                raw: raw.to_string(),
            }),
            None => Ok(()),
        }
    }
}

fn parse_line(line: usize, text: &str) -> Result<Option<Event>, TraceError> {
    let text = text.split('#').next().unwrap_or_default();
    let mut words = fields(text);
    let Some((column, word)) = words.next() else {
        return Ok(None);
    };

    let event = match word {
        "down" => "down",
        "move" => "move",
        "up" => "up",
        _ => {
            return Err(TraceError::UnknownEvent {
                line,
                column,
                word: word.to_string(),
            });
        }
    };

    let mut args = Fields {
        line,
        event,
        inner: words,
    };
    let time = args.number("time")?;
    let kind = match event {
        "up" => EventKind::Up,
        _ => {
            let x = args.number("x")?;
            let y = args.number("y")?;
            if event == "down" {
                EventKind::Down { x, y }
            } else {
                EventKind::Move { x, y }
            }
        }
    };
    args.finish()?;

    Ok(Some(Event { line, time, kind }))
}

/// Parse and validate a single-gesture trace.
pub fn parse(input: &str) -> Result<Trace, TraceError> {
    let mut events: Vec<Event> = Vec::new();
    let mut pressed = false;
    let mut released = false;

    for (idx, text) in input.lines().enumerate() {
        let Some(event) = parse_line(idx + 1, text)? else {
            continue;
        };

        if released {
            return Err(TraceError::AfterRelease {
                line: event.line,
                event: event.kind.name(),
            });
        }
        if let Some(previous) = events.last().filter(|p| event.time < p.time) {
            return Err(TraceError::TimeWentBackwards {
                line: event.line,
                time: event.time,
                previous: previous.time,
            });
        }
        match event.kind {
            EventKind::Down { .. } if pressed => {
                return Err(TraceError::AlreadyPressed { line: event.line });
            }
            EventKind::Down { .. } => pressed = true,
            _ if !pressed => {
                return Err(TraceError::NotPressed {
                    line: event.line,
                    event: event.kind.name(),
                });
            }
            EventKind::Up => released = true,
            EventKind::Move { .. } => {}
        }

        events.push(event);
    }

    if !released {
        return Err(TraceError::MissingRelease);
    }

    tracing::debug!(events = events.len(), "parsed gesture trace");
    Ok(Trace { events })
}

impl Trace {
    /// Feed every event through a [`GestureTracker`] and return the release.
    pub fn replay(&self, max_velocity: Coord) -> Option<Release> {
        let mut tracker = GestureTracker::new(max_velocity);
        let mut release = None;
        for event in &self.events {
            match event.kind {
                EventKind::Down { x, y } => tracker.press(event.time, Coord::new(x, y)),
                EventKind::Move { x, y } => {
                    tracker.drag(event.time, Coord::new(x, y));
                }
                EventKind::Up => release = tracker.release(event.time),
            }
        }
        release
    }

    /// Duration from the first to the last event.
    pub fn duration(&self) -> f64 {
        match (self.events.first(), self.events.last()) {
            (Some(first), Some(last)) => last.time - first.time,
            _ => 0.0,
        }
    }
}
