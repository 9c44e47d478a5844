//! Translation of raw host input into navigation requests.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::EngineError;

/// Wheel delta magnitude that must be exceeded before a step fires.
pub const DEFAULT_WHEEL_THRESHOLD: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepDirection {
    Forward,
    Backward,
}

/// Accumulates wheel deltas until the threshold is crossed.
///
/// Scrolling up (negative delta) steps forward in time, scrolling down steps backward.
/// Exactly one step fires per crossing and the accumulator then resets to zero;
/// sub-threshold deltas are kept for the next event.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelAccumulator {
    threshold: f64,
    accumulated: f64,
}

impl Default for WheelAccumulator {
    fn default() -> Self {
        Self::new(DEFAULT_WHEEL_THRESHOLD)
    }
}

impl WheelAccumulator {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.abs(),
            accumulated: 0.0,
        }
    }

    pub fn push(&mut self, delta: f64) -> Option<StepDirection> {
        if !delta.is_finite() {
            return None;
        }
        self.accumulated += delta;
        let direction = if self.accumulated < -self.threshold {
            StepDirection::Forward
        } else if self.accumulated > self.threshold {
            StepDirection::Backward
        } else {
            return None;
        };
        self.accumulated = 0.0;
        Some(direction)
    }

    pub fn pending(&self) -> f64 {
        self.accumulated
    }
}

/// Horizontal drag track mapping a pointer x coordinate onto the 24-hour clock.
///
/// Positions outside the track clamp to its ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragTrack {
    pub left: f64,
    pub right: f64,
}

impl DragTrack {
    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    pub fn hours_at(&self, x: f64) -> f64 {
        let width = self.right - self.left;
        if !(width > 0.0) || !x.is_finite() {
            return 0.0;
        }
        let x = x.clamp(self.left, self.right);
        (x - self.left) / width * 24.0
    }

    /// Inverse of [`hours_at`](Self::hours_at): where the drag handle sits for `hours`.
    pub fn position_of(&self, hours: f64) -> f64 {
        self.left + (hours.clamp(0.0, 24.0) / 24.0) * (self.right - self.left)
    }
}

/// A single event delivered by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    Wheel(f64),
    Drag(f64),
    SliderIndex(usize),
    SliderHours(f64),
    Filter(String),
    NextBucket,
    PreviousBucket,
}

impl FromStr for InputEvent {
    type Err = EngineError;

    /// Parse the textual form used by replay scripts, e.g. `wheel -40`, `drag 310`,
    /// `slider 3`, `hour 18.5`, `filter Bicycle`, `next`, `prev`.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (command, argument) = match line.split_once(char::is_whitespace) {
            Some((command, argument)) => (command, argument.trim()),
            None => (line, ""),
        };

        let number = |kind: &str| -> Result<f64, EngineError> {
            argument.parse::<f64>().map_err(|_| {
                EngineError::InvalidInput(format!("{} expects a number: '{}'", kind, line))
            })
        };

        match command.to_ascii_lowercase().as_str() {
            "wheel" => Ok(InputEvent::Wheel(number("wheel")?)),
            "drag" => Ok(InputEvent::Drag(number("drag")?)),
            "hour" => Ok(InputEvent::SliderHours(number("hour")?)),
            "slider" => argument
                .parse::<usize>()
                .map(InputEvent::SliderIndex)
                .map_err(|_| {
                    EngineError::InvalidInput(format!("slider expects an index: '{}'", line))
                }),
            "filter" => Ok(InputEvent::Filter(argument.to_string())),
            "next" => Ok(InputEvent::NextBucket),
            "prev" | "previous" => Ok(InputEvent::PreviousBucket),
            _ => Err(EngineError::InvalidInput(format!("unknown command: '{}'", line))),
        }
    }
}
