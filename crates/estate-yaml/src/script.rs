//! Gesture scripts.
//!
//! A script is a list of input steps replayed against a slider on a virtual
//! clock. Coordinates are horizontal pixels relative to the widget's left
//! edge; the vertical coordinate is always the track's centre line.
//!
//! ```yaml
//! steps:
//!   - action: press
//!     x: 84
//!   - action: move
//!     x: 300
//!   - action: wait
//!     ms: 60
//!   - action: release
//! ```

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Press at `x`. Without a pointer id this is the mouse.
    Press {
        /// Horizontal offset
        x: f32,
        /// Pointer id for multi-touch
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pointer: Option<u32>,
    },
    /// Move a pressed pointer to `x`.
    Move {
        /// Horizontal offset
        x: f32,
        /// Pointer id for multi-touch
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pointer: Option<u32>,
    },
    /// Lift a pointer, at `x` or where it last was.
    Release {
        /// Horizontal offset
        #[serde(default, skip_serializing_if = "Option::is_none")]
        x: Option<f32>,
        /// Pointer id for multi-touch
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pointer: Option<u32>,
    },
    /// The system aborts a pointer.
    Cancel {
        /// Pointer id for multi-touch
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pointer: Option<u32>,
    },
    /// Let virtual time pass.
    Wait {
        /// Milliseconds
        ms: u32,
    },
    /// Push values from the host.
    Sync {
        /// New low value
        low: f64,
        /// New high value
        high: f64,
        /// New minimum, current one if absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        /// New maximum, current one if absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    /// Tear the slider down.
    Unmount,
}

impl Step {
    /// Pointer id the step refers to, if it is a pointer step.
    #[must_use]
    pub const fn pointer(&self) -> Option<u32> {
        match self {
            Self::Press { pointer, .. }
            | Self::Move { pointer, .. }
            | Self::Release { pointer, .. }
            | Self::Cancel { pointer } => *pointer,
            Self::Wait { .. } | Self::Sync { .. } | Self::Unmount => None,
        }
    }
}

/// A sequence of steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GestureScript {
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Steps in order
    pub steps: Vec<Step>,
}

impl GestureScript {
    /// Parse and validate a script.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or a coordinate is not
    /// finite.
    pub fn from_yaml(yaml: &str) -> Result<Self, ParseError> {
        let script: Self = serde_yaml_ng::from_str(yaml)?;
        script.validate()?;
        debug!(steps = script.steps.len(), "gesture script loaded");
        Ok(script)
    }

    /// Read, parse and validate a script file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&text)
    }

    /// Serialize script to YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, ParseError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Reject non-finite coordinates and values.
    ///
    /// # Errors
    ///
    /// Names the offending step index.
    pub fn validate(&self) -> Result<(), ParseError> {
        for (index, step) in self.steps.iter().enumerate() {
            let finite = match step {
                Step::Press { x, .. } | Step::Move { x, .. } => x.is_finite(),
                Step::Release { x, .. } => x.map_or(true, f32::is_finite),
                Step::Sync {
                    low,
                    high,
                    min,
                    max,
                } => [Some(*low), Some(*high), *min, *max]
                    .into_iter()
                    .flatten()
                    .all(f64::is_finite),
                Step::Cancel { .. } | Step::Wait { .. } | Step::Unmount => true,
            };
            if !finite {
                return Err(ParseError::invalid(
                    &format!("steps[{index}]"),
                    "must use finite numbers",
                ));
            }
        }
        Ok(())
    }

    /// Total virtual time the script waits.
    #[must_use]
    pub fn total_wait_ms(&self) -> u64 {
        self.steps
            .iter()
            .map(|step| match step {
                Step::Wait { ms } => u64::from(*ms),
                _ => 0,
            })
            .sum()
    }
}
