//! Replaying gesture scripts against a slider on a virtual clock.
//!
//! The replayer turns each [`Step`] into widget input, advances time only on
//! `wait` steps, and timestamps every notification the slider delivers.

use estate_core::{
    Constraints, Event, LifecyclePhase, MouseButton, Point, PointerId, Rect, Size, Widget,
};
use estate_widgets::{BuildError, RangeChanged, RangeError, RangeSlider, SyncOutcome};
use estate_yaml::{GestureScript, SliderManifest, Step};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info};

/// Errors from building or driving a replay.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The manifest could not become a slider
    #[error(transparent)]
    Build(#[from] BuildError),
    /// A sync step carried invalid values
    #[error("step {index}: {source}")]
    Sync {
        /// Index of the failing step
        index: usize,
        /// Why it failed
        #[source]
        source: RangeError,
    },
}

/// A notification delivered to the host at a virtual time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Notification {
    /// Virtual time in milliseconds
    pub at_ms: u64,
    /// Low value delivered
    pub low: f64,
    /// High value delivered
    pub high: f64,
}

/// Result of a sync step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncRecord {
    /// Virtual time in milliseconds
    pub at_ms: u64,
    /// What the slider did with it
    pub outcome: SyncOutcome,
}

/// Everything observable from one replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    /// Notifications in delivery order
    pub notifications: Vec<Notification>,
    /// Outcome of each sync step
    pub syncs: Vec<SyncRecord>,
    /// Low value at the end
    pub low: f64,
    /// High value at the end
    pub high: f64,
    /// Virtual time at the end
    pub clock_ms: u64,
    /// Whether the slider is still mounted
    pub mounted: bool,
}

/// Drives a laid-out slider step by step.
#[derive(Debug)]
pub struct Replayer {
    slider: RangeSlider,
    line_y: f32,
    clock_ms: u64,
    mouse_x: f32,
    pointers: HashMap<u32, f32>,
    notifications: Vec<Notification>,
    syncs: Vec<SyncRecord>,
}

impl Replayer {
    /// Lay `slider` out at `bounds` and start the clock at zero.
    pub fn new(mut slider: RangeSlider, bounds: Rect) -> Self {
        slider.layout(bounds);
        Self {
            slider,
            line_y: bounds.center().y,
            clock_ms: 0,
            mouse_x: 0.0,
            pointers: HashMap::new(),
            notifications: Vec::new(),
            syncs: Vec::new(),
        }
    }

    /// Build the slider described by `manifest`, laid out at the manifest
    /// width and its preferred height.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest is invalid.
    pub fn from_manifest(manifest: &SliderManifest) -> Result<Self, ReplayError> {
        let slider = RangeSlider::from_manifest(manifest)?;
        let size = slider.measure(Constraints::loose(Size::new(manifest.width, f32::INFINITY)));
        let bounds = Rect::new(0.0, 0.0, manifest.width, size.height);
        Ok(Self::new(slider, bounds))
    }

    /// The slider being driven.
    #[must_use]
    pub const fn slider(&self) -> &RangeSlider {
        &self.slider
    }

    /// Virtual time elapsed.
    #[must_use]
    pub const fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    /// Notifications delivered so far.
    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Apply one step.
    ///
    /// # Errors
    ///
    /// Returns an error if a sync step carries invalid values.
    pub fn step(&mut self, index: usize, step: &Step) -> Result<(), ReplayError> {
        debug!(index, ?step, at_ms = self.clock_ms, "replay step");
        match *step {
            Step::Press { x, pointer } => {
                let position = self.track(pointer, x);
                let event = match pointer {
                    None => Event::MouseDown {
                        position,
                        button: MouseButton::Left,
                    },
                    Some(id) => Event::PointerDown {
                        pointer_id: PointerId(id),
                        position,
                        button: None,
                    },
                };
                self.send(&event);
            }
            Step::Move { x, pointer } => {
                let position = self.track(pointer, x);
                let event = match pointer {
                    None => Event::MouseMove { position },
                    Some(id) => Event::PointerMove {
                        pointer_id: PointerId(id),
                        position,
                    },
                };
                self.send(&event);
            }
            Step::Release { x, pointer } => {
                let x = x.unwrap_or_else(|| self.last_x(pointer));
                let position = self.track(pointer, x);
                let event = match pointer {
                    None => Event::MouseUp {
                        position,
                        button: MouseButton::Left,
                    },
                    Some(id) => {
                        self.pointers.remove(&id);
                        Event::PointerUp {
                            pointer_id: PointerId(id),
                            position,
                            button: None,
                        }
                    }
                };
                self.send(&event);
            }
            Step::Cancel { pointer } => match pointer {
                Some(id) => {
                    self.pointers.remove(&id);
                    self.send(&Event::PointerCancel {
                        pointer_id: PointerId(id),
                    });
                }
                // A mouse cannot be cancelled by the system; lift it instead.
                None => {
                    let position = Point::new(self.mouse_x, self.line_y);
                    self.send(&Event::MouseUp {
                        position,
                        button: MouseButton::Left,
                    });
                }
            },
            Step::Wait { ms } => self.wait(ms),
            Step::Sync {
                low,
                high,
                min,
                max,
            } => {
                let range = *self.slider.range();
                let outcome = self
                    .slider
                    .sync(
                        low,
                        high,
                        min.unwrap_or_else(|| range.min()),
                        max.unwrap_or_else(|| range.max()),
                    )
                    .map_err(|source| ReplayError::Sync { index, source })?;
                self.syncs.push(SyncRecord {
                    at_ms: self.clock_ms,
                    outcome,
                });
            }
            Step::Unmount => self.slider.lifecycle(LifecyclePhase::Unmount),
        }
        Ok(())
    }

    /// Run every step of `script` and report.
    ///
    /// # Errors
    ///
    /// Stops at the first failing step.
    pub fn run(mut self, script: &GestureScript) -> Result<ReplayReport, ReplayError> {
        for (index, step) in script.steps.iter().enumerate() {
            self.step(index, step)?;
        }
        let report = self.report();
        info!(
            notifications = report.notifications.len(),
            clock_ms = report.clock_ms,
            "replay finished"
        );
        Ok(report)
    }

    /// Snapshot of what has been observed so far.
    #[must_use]
    pub fn report(&self) -> ReplayReport {
        let (low, high) = self.slider.values();
        ReplayReport {
            notifications: self.notifications.clone(),
            syncs: self.syncs.clone(),
            low,
            high,
            clock_ms: self.clock_ms,
            mounted: self.slider.is_mounted(),
        }
    }

    /// Advance in slices that end where a timer falls due, so every
    /// notification is stamped with the time it fired.
    fn wait(&mut self, ms: u32) {
        let mut left = ms;
        loop {
            let slice = self.slider.next_due_ms().map_or(left, |due| due.min(left));
            left -= slice;
            self.clock_ms += u64::from(slice);
            let fired = self.slider.advance(slice);
            self.record(fired);
            if left == 0 {
                break;
            }
        }
    }

    fn track(&mut self, pointer: Option<u32>, x: f32) -> Point {
        match pointer {
            None => self.mouse_x = x,
            Some(id) => {
                self.pointers.insert(id, x);
            }
        }
        Point::new(x, self.line_y)
    }

    fn last_x(&self, pointer: Option<u32>) -> f32 {
        pointer
            .and_then(|id| self.pointers.get(&id).copied())
            .unwrap_or(self.mouse_x)
    }

    /// Pointer input only ever yields a notification when a press flushes a
    /// settling thumb.
    fn send(&mut self, event: &Event) {
        if let Some(message) = self.slider.event(event) {
            if let Ok(change) = message.downcast::<RangeChanged>() {
                self.record(vec![*change]);
            }
        }
    }

    fn record(&mut self, fired: Vec<RangeChanged>) {
        let at_ms = self.clock_ms;
        self.notifications
            .extend(fired.into_iter().map(|change| Notification {
                at_ms,
                low: change.low,
                high: change.high,
            }));
    }
}
