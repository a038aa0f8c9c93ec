//! Dual-thumb range slider.
//!
//! Two thumbs share one horizontal track that maps linearly onto a numeric
//! domain. The low thumb can never pass within one step of the high thumb and
//! vice versa. Drags stream value changes through a per-thumb trailing-edge
//! debounce, and every release delivers one more notification after a short
//! settle window so the host always sees the final clamped pair.
//!
//! Time is driven by the host through [`Event::Tick`] or
//! [`RangeSlider::advance`]; nothing fires on its own.

use crate::format::ValueFormat;
use estate_core::{
    widget::LayoutResult, AccessibleRole, Canvas, Color, Constraints, Debouncer, DragTracker,
    Event, FontWeight, GradientStop, LifecyclePhase, Point, PointerKey, Rect, Size, TextStyle,
    TypeId, Widget,
};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use thiserror::Error;
use tracing::{debug, trace};

/// Default quiet period before a streaming change is delivered.
pub const DEFAULT_DEBOUNCE_MS: u32 = 50;
/// Default delay between a release and its forced notification.
pub const DEFAULT_SETTLE_MS: u32 = 10;
/// Number of evenly spaced track markers.
pub const MARKER_COUNT: usize = 5;

const LABEL_SIZE: f32 = 12.0;
const LABEL_GAP: f32 = 4.0;
const HIT_SLOP: f32 = 8.0;
const MARKER_LENGTH: f32 = 6.0;
const GRID_EPSILON: f64 = 1e-9;

type ChangeCallback = Box<dyn FnMut(f64, f64) + Send + Sync>;
type Formatter = Box<dyn Fn(f64) -> String + Send + Sync>;

/// Message emitted when the selected range is delivered to the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeChanged {
    /// Lower bound of the selection
    pub low: f64,
    /// Upper bound of the selection
    pub high: f64,
}

impl RangeChanged {
    /// Create a change message.
    #[must_use]
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }
}

/// Errors raised for malformed slider input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RangeError {
    /// A bound or value was NaN or infinite.
    #[error("{field} must be finite, got {value}")]
    NonFinite {
        /// Offending field
        field: &'static str,
        /// Offending value
        value: f64,
    },
    /// `min` was greater than `max`.
    #[error("min ({min}) is greater than max ({max})")]
    Inverted {
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },
    /// `step` was zero or negative.
    #[error("step must be positive, got {0}")]
    InvalidStep(f64),
    /// A thumb value fell outside the domain.
    #[error("{field} value {value} lies outside [{min}, {max}]")]
    OutOfRange {
        /// Offending field
        field: &'static str,
        /// Offending value
        value: f64,
        /// Domain minimum
        min: f64,
        /// Domain maximum
        max: f64,
    },
    /// The low value was greater than the high value.
    #[error("low value {low} is greater than high value {high}")]
    Crossed {
        /// Low value
        low: f64,
        /// High value
        high: f64,
    },
}

fn check_finite(field: &'static str, value: f64) -> Result<f64, RangeError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(RangeError::NonFinite { field, value })
    }
}

/// The numeric domain a slider selects from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DomainRange {
    min: f64,
    max: f64,
    step: f64,
}

impl DomainRange {
    /// Validate and create a domain. `min == max` is allowed and pins both
    /// thumbs.
    ///
    /// # Errors
    ///
    /// Returns an error if any input is not finite, `min > max`, or
    /// `step <= 0`.
    pub fn new(min: f64, max: f64, step: f64) -> Result<Self, RangeError> {
        let min = check_finite("min", min)?;
        let max = check_finite("max", max)?;
        let step = check_finite("step", step)?;
        if min > max {
            return Err(RangeError::Inverted { min, max });
        }
        if step <= 0.0 {
            return Err(RangeError::InvalidStep(step));
        }
        Ok(Self { min, max, step })
    }

    /// Domain minimum.
    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Domain maximum.
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Quantization step.
    #[must_use]
    pub const fn step(&self) -> f64 {
        self.step
    }

    /// `max - min`.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Whether the domain collapses to a single value.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.span() <= 0.0
    }

    /// Round to the nearest step counted from `min`.
    #[must_use]
    pub fn quantize(&self, value: f64) -> f64 {
        self.steps_from_min(value).round().mul_add(self.step, self.min)
    }

    /// Clamp into `[min, max]`.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    /// Whether `value` lies in `[min, max]`.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    // Grid bounds for the sibling clamp never round toward the sibling.
    fn quantize_down(&self, value: f64) -> f64 {
        (self.steps_from_min(value) + GRID_EPSILON)
            .floor()
            .mul_add(self.step, self.min)
    }

    fn quantize_up(&self, value: f64) -> f64 {
        (self.steps_from_min(value) - GRID_EPSILON)
            .ceil()
            .mul_add(self.step, self.min)
    }

    fn steps_from_min(&self, value: f64) -> f64 {
        (value - self.min) / self.step
    }
}

/// One of the two handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Thumb {
    /// Selects the lower bound
    Low,
    /// Selects the upper bound
    High,
}

impl Thumb {
    /// Both thumbs, low first.
    pub const BOTH: [Self; 2] = [Self::Low, Self::High];

    /// The sibling thumb.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
        }
    }
}

/// Where a thumb is in its press-to-settle cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DragPhase {
    /// Not being touched
    #[default]
    Idle,
    /// Following a pointer
    Dragging,
    /// Released, waiting for the forced notification
    Settling,
}

/// Result of an external value update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncOutcome {
    /// New values were applied and thumbs repositioned.
    Applied,
    /// Values matched the current state; nothing changed.
    Unchanged,
    /// A thumb is being dragged or settling; the update was dropped.
    IgnoredWhileDragging,
}

#[derive(Debug)]
struct ThumbState {
    value: f64,
    position: f64,
    origin: f64,
    /// Offset from `origin` given by the latest move
    drag_dx: f64,
    phase: DragPhase,
    tracker: DragTracker,
    debounce: Debouncer<RangeChanged>,
    release: Debouncer<()>,
}

impl ThumbState {
    const fn new(value: f64) -> Self {
        Self {
            value,
            position: 0.0,
            origin: 0.0,
            drag_dx: 0.0,
            phase: DragPhase::Idle,
            tracker: DragTracker::new(),
            debounce: Debouncer::new(DEFAULT_DEBOUNCE_MS),
            release: Debouncer::new(DEFAULT_SETTLE_MS),
        }
    }

    fn pending(&self) -> usize {
        usize::from(self.debounce.is_pending()) + usize::from(self.release.is_pending())
    }
}

/// Range slider widget selecting a `[low, high]` sub-range.
pub struct RangeSlider {
    range: DomainRange,
    low: ThumbState,
    high: ThumbState,
    /// Usable track length in pixels
    track_width: f64,
    bounds: Rect,
    thumb_radius: f32,
    track_height: f32,
    show_markers: bool,
    /// Gradient stops for the active range
    track_colors: Vec<Color>,
    track_color: Color,
    active_color: Color,
    thumb_color: Color,
    marker_color: Color,
    label_style: TextStyle,
    disabled: bool,
    mounted: bool,
    formatter: Formatter,
    on_change: Option<ChangeCallback>,
    test_id_value: Option<String>,
    accessible_name_value: Option<String>,
}

impl fmt::Debug for RangeSlider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeSlider")
            .field("range", &self.range)
            .field("low", &self.low.value)
            .field("high", &self.high.value)
            .field("track_width", &self.track_width)
            .field("low_phase", &self.low.phase)
            .field("high_phase", &self.high.phase)
            .field("disabled", &self.disabled)
            .field("mounted", &self.mounted)
            .finish_non_exhaustive()
    }
}

impl RangeSlider {
    /// Create a slider selecting `[low, high]` within `range`.
    ///
    /// # Errors
    ///
    /// Returns an error if either value is not finite, lies outside the
    /// domain, or `low > high`.
    pub fn new(range: DomainRange, low: f64, high: f64) -> Result<Self, RangeError> {
        for (field, value) in [("low", low), ("high", high)] {
            check_finite(field, value)?;
            if !range.contains(value) {
                return Err(RangeError::OutOfRange {
                    field,
                    value,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        if low > high {
            return Err(RangeError::Crossed { low, high });
        }

        Ok(Self {
            range,
            low: ThumbState::new(low),
            high: ThumbState::new(high),
            track_width: 0.0,
            bounds: Rect::default(),
            thumb_radius: 12.0,
            track_height: 4.0,
            show_markers: false,
            track_colors: Vec::new(),
            track_color: Color::new(0.8, 0.8, 0.8, 1.0),
            active_color: Color::new(0.2, 0.6, 1.0, 1.0),
            thumb_color: Color::WHITE,
            marker_color: Color::new(0.6, 0.6, 0.6, 1.0),
            label_style: TextStyle {
                size: LABEL_SIZE,
                color: Color::new(0.2, 0.2, 0.2, 1.0),
                weight: FontWeight::Medium,
            },
            disabled: false,
            mounted: true,
            formatter: Box::new(crate::format::plain),
            on_change: None,
            test_id_value: None,
            accessible_name_value: None,
        })
    }

    // ===== Builder =====

    /// Callback receiving every delivered `(low, high)` pair.
    #[must_use]
    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(f64, f64) + Send + Sync + 'static,
    {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Custom label formatter.
    #[must_use]
    pub fn format_value<F>(mut self, formatter: F) -> Self
    where
        F: Fn(f64) -> String + Send + Sync + 'static,
    {
        self.formatter = Box::new(formatter);
        self
    }

    /// Use one of the built-in label formats.
    #[must_use]
    pub fn value_format(self, format: ValueFormat) -> Self {
        self.format_value(move |v| format.format(v))
    }

    /// Draw tick markers along the track.
    #[must_use]
    pub const fn show_markers(mut self, show: bool) -> Self {
        self.show_markers = show;
        self
    }

    /// Colors for the active range. Two or more draw a gradient.
    #[must_use]
    pub fn track_colors(mut self, colors: Vec<Color>) -> Self {
        self.track_colors = colors;
        self
    }

    /// Set the track length before the first layout pass.
    #[must_use]
    pub fn track_width(mut self, width: f32) -> Self {
        self.track_width = f64::from(width.max(0.0));
        self.reposition();
        self
    }

    /// Set thumb radius.
    #[must_use]
    pub fn thumb_radius(mut self, radius: f32) -> Self {
        self.thumb_radius = radius.max(0.0);
        self
    }

    /// Set track height.
    #[must_use]
    pub fn track_height(mut self, height: f32) -> Self {
        self.track_height = height.max(0.0);
        self
    }

    /// Set track background color.
    #[must_use]
    pub const fn track_color(mut self, color: Color) -> Self {
        self.track_color = color;
        self
    }

    /// Set active range color, used when no track colors are given.
    #[must_use]
    pub const fn active_color(mut self, color: Color) -> Self {
        self.active_color = color;
        self
    }

    /// Set thumb color.
    #[must_use]
    pub const fn thumb_color(mut self, color: Color) -> Self {
        self.thumb_color = color;
        self
    }

    /// Set marker color.
    #[must_use]
    pub const fn marker_color(mut self, color: Color) -> Self {
        self.marker_color = color;
        self
    }

    /// Quiet period before streaming changes are delivered.
    #[must_use]
    pub fn debounce_ms(mut self, delay_ms: u32) -> Self {
        self.low.debounce.set_delay_ms(delay_ms);
        self.high.debounce.set_delay_ms(delay_ms);
        self
    }

    /// Delay between a release and its forced notification.
    #[must_use]
    pub fn settle_ms(mut self, delay_ms: u32) -> Self {
        self.low.release.set_delay_ms(delay_ms);
        self.high.release.set_delay_ms(delay_ms);
        self
    }

    /// Set disabled state.
    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set test ID.
    #[must_use]
    pub fn with_test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id_value = Some(id.into());
        self
    }

    /// Set accessible name.
    #[must_use]
    pub fn with_accessible_name(mut self, name: impl Into<String>) -> Self {
        self.accessible_name_value = Some(name.into());
        self
    }

    // ===== Accessors =====

    /// Current low value.
    #[must_use]
    pub const fn low(&self) -> f64 {
        self.low.value
    }

    /// Current high value.
    #[must_use]
    pub const fn high(&self) -> f64 {
        self.high.value
    }

    /// Current `(low, high)` pair.
    #[must_use]
    pub const fn values(&self) -> (f64, f64) {
        (self.low.value, self.high.value)
    }

    /// The domain.
    #[must_use]
    pub const fn range(&self) -> &DomainRange {
        &self.range
    }

    /// Thumb offset along the track in pixels.
    #[must_use]
    pub const fn position(&self, thumb: Thumb) -> f64 {
        self.thumb(thumb).position
    }

    /// Usable track length in pixels.
    #[must_use]
    pub const fn get_track_width(&self) -> f64 {
        self.track_width
    }

    /// Drag phase of a thumb.
    #[must_use]
    pub const fn phase(&self, thumb: Thumb) -> DragPhase {
        self.thumb(thumb).phase
    }

    /// Whether any thumb is following a pointer.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        Thumb::BOTH
            .iter()
            .any(|t| self.phase(*t) == DragPhase::Dragging)
    }

    /// Whether any thumb is dragging or settling.
    #[must_use]
    pub fn is_interacting(&self) -> bool {
        Thumb::BOTH
            .iter()
            .any(|t| self.phase(*t) != DragPhase::Idle)
    }

    /// Number of notifications waiting on a timer.
    #[must_use]
    pub fn pending_notifications(&self) -> usize {
        self.low.pending() + self.high.pending()
    }

    /// Milliseconds until the next pending notification falls due.
    #[must_use]
    pub fn next_due_ms(&self) -> Option<u32> {
        if !self.mounted {
            return None;
        }
        Thumb::BOTH
            .iter()
            .flat_map(|t| {
                let state = self.thumb(*t);
                [state.debounce.remaining_ms(), state.release.remaining_ms()]
            })
            .flatten()
            .min()
    }

    /// Whether the slider is mounted.
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Whether the slider is disabled.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Format a value with the configured formatter.
    #[must_use]
    pub fn format(&self, value: f64) -> String {
        (self.formatter)(value)
    }

    /// Formatted `(low, high)` labels.
    #[must_use]
    pub fn labels(&self) -> (String, String) {
        (self.format(self.low.value), self.format(self.high.value))
    }

    // ===== Mapping =====

    /// Map a track offset to a quantized domain value.
    #[must_use]
    pub fn position_to_value(&self, position: f64) -> f64 {
        let width = self.track_width;
        if self.range.is_degenerate() || width <= 0.0 {
            return self.range.min;
        }
        let ratio = position.clamp(0.0, width) / width;
        let raw = ratio.mul_add(self.range.span(), self.range.min);
        self.range.clamp(self.range.quantize(raw))
    }

    /// Map a domain value to a track offset.
    #[must_use]
    pub fn value_to_position(&self, value: f64) -> f64 {
        if self.range.is_degenerate() || self.track_width <= 0.0 {
            return 0.0;
        }
        let ratio = ((value - self.range.min) / self.range.span()).clamp(0.0, 1.0);
        ratio * self.track_width
    }

    // ===== Drag operations =====

    /// Begin dragging `thumb`. A thumb still settling from its last release
    /// delivers that notification first, and it is returned.
    pub fn drag_start(&mut self, thumb: Thumb) -> Option<RangeChanged> {
        if !self.mounted || self.disabled || self.phase(thumb) == DragPhase::Dragging {
            return None;
        }
        let flushed = self.flush_release(thumb);
        let state = self.thumb_mut(thumb);
        state.origin = state.position;
        state.drag_dx = 0.0;
        state.phase = DragPhase::Dragging;
        debug!(?thumb, value = state.value, "drag started");
        flushed
    }

    /// Move `thumb` by `dx` pixels from where its drag began. Returns
    /// whether the thumb was dragging.
    pub fn drag_move(&mut self, thumb: Thumb, dx: f64) -> bool {
        if !self.mounted || self.phase(thumb) != DragPhase::Dragging || !dx.is_finite() {
            return false;
        }
        self.apply_drag(thumb, dx, false);
        let change = self.current();
        let state = self.thumb_mut(thumb);
        state.drag_dx = dx;
        state.debounce.schedule(change);
        true
    }

    /// Release `thumb` at `dx` pixels from where its drag began.
    ///
    /// Any pending streaming notification is dropped, the final value is
    /// committed, and a forced notification is scheduled after the settle
    /// delay.
    pub fn drag_end(&mut self, thumb: Thumb, dx: f64) -> bool {
        if !self.mounted || self.phase(thumb) != DragPhase::Dragging {
            return false;
        }
        self.thumb_mut(thumb).debounce.cancel();
        if dx.is_finite() {
            self.apply_drag(thumb, dx, true);
        }
        let state = self.thumb_mut(thumb);
        state.tracker.reset();
        state.phase = DragPhase::Settling;
        state.release.schedule(());
        debug!(?thumb, value = state.value, "drag released");
        true
    }

    fn apply_drag(&mut self, thumb: Thumb, dx: f64, snap: bool) {
        let raw = (self.thumb(thumb).origin + dx).clamp(0.0, self.track_width.max(0.0));
        let value = self.position_to_value(raw);
        let clamped = self.clamp_against_sibling(thumb, value);
        #[allow(clippy::float_cmp)]
        let position = if snap || clamped != value || self.range.is_degenerate() {
            self.value_to_position(clamped)
        } else {
            raw
        };
        let state = self.thumb_mut(thumb);
        state.value = clamped;
        state.position = position;
        trace!(?thumb, value = clamped, position, "thumb moved");
    }

    /// Clamp `value` so `thumb` stays at least one step from its sibling
    /// and inside the domain.
    fn clamp_against_sibling(&self, thumb: Thumb, value: f64) -> f64 {
        let range = &self.range;
        match thumb {
            Thumb::Low => {
                let upper = range.quantize_down(self.high.value - range.step);
                value.min(upper).max(range.min)
            }
            Thumb::High => {
                let lower = range.quantize_up(self.low.value + range.step);
                value.max(lower).min(range.max)
            }
        }
    }

    fn flush_release(&mut self, thumb: Thumb) -> Option<RangeChanged> {
        self.thumb_mut(thumb).release.cancel()?;
        let change = self.current();
        self.notify(change);
        self.thumb_mut(thumb).phase = DragPhase::Idle;
        debug!(?thumb, "settle flushed by new press");
        Some(change)
    }

    // ===== Time and host updates =====

    /// Advance timers by `delta_ms` and deliver whatever fell due, in the
    /// order it fell due.
    pub fn advance(&mut self, delta_ms: u32) -> Vec<RangeChanged> {
        if !self.mounted {
            return Vec::new();
        }

        let mut due: Vec<(u32, RangeChanged)> = Vec::new();
        let mut settled = Vec::new();
        for thumb in Thumb::BOTH {
            let live = self.current();
            let state = self.thumb_mut(thumb);
            if let Some(wait) = state.debounce.remaining_ms() {
                if let Some(change) = state.debounce.advance(delta_ms) {
                    due.push((wait, change));
                }
            }
            if let Some(wait) = state.release.remaining_ms() {
                if state.release.advance(delta_ms).is_some() {
                    due.push((wait, live));
                    settled.push(thumb);
                }
            }
        }
        due.sort_by_key(|(wait, _)| *wait);

        let fired: Vec<RangeChanged> = due.into_iter().map(|(_, change)| change).collect();
        for change in &fired {
            self.notify(*change);
        }
        for thumb in settled {
            self.thumb_mut(thumb).phase = DragPhase::Idle;
            debug!(?thumb, "thumb settled");
        }
        fired
    }

    /// Apply values and bounds from the host.
    ///
    /// Values are clamped into the new bounds. While any thumb is dragging
    /// or settling the update is dropped, not queued.
    ///
    /// # Errors
    ///
    /// Returns an error if the bounds are invalid, a value is not finite, or
    /// the clamped `low > high`.
    pub fn sync(
        &mut self,
        low: f64,
        high: f64,
        min: f64,
        max: f64,
    ) -> Result<SyncOutcome, RangeError> {
        let range = DomainRange::new(min, max, self.range.step)?;
        let low = range.clamp(check_finite("low", low)?);
        let high = range.clamp(check_finite("high", high)?);
        if low > high {
            return Err(RangeError::Crossed { low, high });
        }
        if self.is_interacting() {
            debug!(low, high, "external update ignored while dragging");
            return Ok(SyncOutcome::IgnoredWhileDragging);
        }
        #[allow(clippy::float_cmp)]
        let unchanged = range == self.range && low == self.low.value && high == self.high.value;
        if unchanged {
            return Ok(SyncOutcome::Unchanged);
        }

        self.range = range;
        self.low.value = low;
        self.high.value = high;
        self.reposition();
        debug!(low, high, min, max, "external update applied");
        Ok(SyncOutcome::Applied)
    }

    /// Apply new values within the current bounds.
    ///
    /// # Errors
    ///
    /// See [`sync`](Self::sync).
    pub fn set_values(&mut self, low: f64, high: f64) -> Result<SyncOutcome, RangeError> {
        self.sync(low, high, self.range.min, self.range.max)
    }

    /// Drop every pending timer and stop responding to input.
    pub fn unmount(&mut self) {
        let dropped = self.pending_notifications();
        for thumb in Thumb::BOTH {
            let state = self.thumb_mut(thumb);
            state.debounce.cancel();
            state.release.cancel();
            state.tracker.reset();
            state.phase = DragPhase::Idle;
        }
        self.reposition();
        self.mounted = false;
        debug!(dropped, "range slider unmounted");
    }

    // ===== Internals =====

    const fn thumb(&self, thumb: Thumb) -> &ThumbState {
        match thumb {
            Thumb::Low => &self.low,
            Thumb::High => &self.high,
        }
    }

    fn thumb_mut(&mut self, thumb: Thumb) -> &mut ThumbState {
        match thumb {
            Thumb::Low => &mut self.low,
            Thumb::High => &mut self.high,
        }
    }

    const fn current(&self) -> RangeChanged {
        RangeChanged::new(self.low.value, self.high.value)
    }

    fn notify(&mut self, change: RangeChanged) {
        trace!(low = change.low, high = change.high, "range delivered");
        if let Some(callback) = self.on_change.as_mut() {
            callback(change.low, change.high);
        }
    }

    fn reposition(&mut self) {
        for thumb in Thumb::BOTH {
            let position = self.value_to_position(self.thumb(thumb).value);
            let state = self.thumb_mut(thumb);
            if state.phase == DragPhase::Dragging {
                state.origin = position - state.drag_dx;
            }
            state.position = position;
        }
    }

    fn label_height(&self) -> f32 {
        self.label_style.size + LABEL_GAP
    }

    fn track_origin(&self) -> Point {
        Point::new(
            self.bounds.x + self.thumb_radius,
            self.bounds.y + self.label_height() + self.thumb_radius,
        )
    }

    #[allow(clippy::cast_possible_truncation)]
    fn thumb_center(&self, thumb: Thumb) -> Point {
        let origin = self.track_origin();
        Point::new(origin.x + self.position(thumb) as f32, origin.y)
    }

    /// Pick the thumb a press at `point` grabs, skipping thumbs already
    /// owned by another pointer.
    fn hit_test(&self, point: Point) -> Option<Thumb> {
        let zone = Rect::new(
            self.bounds.x - HIT_SLOP,
            self.bounds.y - HIT_SLOP,
            2.0f32.mul_add(HIT_SLOP, self.bounds.width),
            2.0f32.mul_add(HIT_SLOP, self.bounds.height),
        );
        if !zone.contains_point(&point) {
            return None;
        }

        let reach = self.thumb_radius + HIT_SLOP;
        let distance = |thumb: Thumb| (point.x - self.thumb_center(thumb).x).abs();
        let grabbable = |thumb: Thumb| {
            self.phase(thumb) != DragPhase::Dragging && distance(thumb) <= reach
        };

        match (grabbable(Thumb::Low), grabbable(Thumb::High)) {
            (false, false) => None,
            (true, false) => Some(Thumb::Low),
            (false, true) => Some(Thumb::High),
            (true, true) => {
                let (low, high) = (distance(Thumb::Low), distance(Thumb::High));
                if low < high {
                    Some(Thumb::Low)
                } else if high < low {
                    Some(Thumb::High)
                } else {
                    Some(self.tie_break(point))
                }
            }
        }
    }

    /// Equidistant thumbs: go by side of the shared centre, and when the
    /// press lands exactly on it pick the thumb that has room to move.
    fn tie_break(&self, point: Point) -> Thumb {
        let centre = (self.thumb_center(Thumb::Low).x + self.thumb_center(Thumb::High).x) / 2.0;
        if point.x < centre {
            Thumb::Low
        } else if point.x > centre || self.low.position <= 0.0 {
            Thumb::High
        } else {
            Thumb::Low
        }
    }

    fn owner(&self, pointer: PointerKey) -> Option<Thumb> {
        Thumb::BOTH
            .into_iter()
            .find(|t| self.thumb(*t).tracker.owned_by(pointer))
    }

    fn pointer_press(&mut self, pointer: PointerKey, position: Point) -> Option<RangeChanged> {
        if self.disabled || self.track_width <= 0.0 || self.owner(pointer).is_some() {
            return None;
        }
        let thumb = self.hit_test(position)?;
        let flushed = self.drag_start(thumb);
        if self.phase(thumb) == DragPhase::Dragging {
            self.thumb_mut(thumb).tracker.begin(pointer, position);
        }
        flushed
    }

    fn pointer_motion(&mut self, pointer: PointerKey, position: Point) {
        let Some(thumb) = self.owner(pointer) else {
            return;
        };
        if let Some(dx) = self.thumb_mut(thumb).tracker.update(pointer, position) {
            self.drag_move(thumb, f64::from(dx));
        }
    }

    fn pointer_release(&mut self, pointer: PointerKey, position: Point) {
        let Some(thumb) = self.owner(pointer) else {
            return;
        };
        if let Some(dx) = self.thumb_mut(thumb).tracker.end(pointer, position) {
            self.drag_end(thumb, f64::from(dx));
        }
    }

    fn pointer_cancel(&mut self, pointer: PointerKey) {
        let Some(thumb) = self.owner(pointer) else {
            return;
        };
        if let Some(dx) = self.thumb_mut(thumb).tracker.cancel(pointer) {
            self.drag_end(thumb, f64::from(dx));
        }
    }
}

fn boxed(change: RangeChanged) -> Box<dyn Any + Send> {
    Box::new(change)
}

impl Widget for RangeSlider {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        let preferred = Size::new(200.0, self.thumb_radius.mul_add(2.0, self.label_height()));
        constraints.constrain(preferred)
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        self.track_width = f64::from(2.0f32.mul_add(-self.thumb_radius, bounds.width).max(0.0));
        self.reposition();
        LayoutResult {
            size: bounds.size(),
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn paint(&self, canvas: &mut dyn Canvas) {
        let origin = self.track_origin();
        let width = self.track_width as f32;
        let top = origin.y - self.track_height / 2.0;

        canvas.fill_rect(
            Rect::new(origin.x, top, width, self.track_height),
            self.track_color,
        );

        let low_x = self.low.position as f32;
        let high_x = self.high.position as f32;
        let active = Rect::new(
            origin.x + low_x,
            top,
            (high_x - low_x).max(0.0),
            self.track_height,
        );
        match self.track_colors.as_slice() {
            [] => canvas.fill_rect(active, self.active_color),
            [single] => canvas.fill_rect(active, *single),
            colors => canvas.fill_gradient_rect(active, &GradientStop::evenly_spaced(colors)),
        }

        if self.show_markers {
            let below = top + self.track_height + 2.0;
            for i in 0..MARKER_COUNT {
                let x = origin.x + width * i as f32 / (MARKER_COUNT - 1) as f32;
                canvas.draw_line(
                    Point::new(x, below),
                    Point::new(x, below + MARKER_LENGTH),
                    self.marker_color,
                    1.0,
                );
            }
        }

        let thumb_color = if self.disabled {
            Color::new(0.6, 0.6, 0.6, 1.0)
        } else {
            self.thumb_color
        };
        for thumb in Thumb::BOTH {
            let center = self.thumb_center(thumb);
            canvas.fill_circle(center, self.thumb_radius, thumb_color);
            canvas.stroke_circle(center, self.thumb_radius, self.active_color, 2.0);
        }

        for thumb in Thumb::BOTH {
            let text = self.format(self.thumb(thumb).value);
            let estimate = text.chars().count() as f32 * self.label_style.size * 0.5;
            let x = (self.thumb_center(thumb).x - estimate / 2.0).max(self.bounds.x);
            canvas.draw_text(&text, Point::new(x, self.bounds.y), &self.label_style);
        }
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        if !self.mounted {
            return None;
        }
        // Every due notification reaches `on_change`, but only the last one
        // becomes the message. Use `advance` to observe all of them.
        if let Event::Tick { delta_ms } = event {
            return self.advance(*delta_ms).pop().map(boxed);
        }
        if let Some(pointer) = event.cancellation() {
            self.pointer_cancel(pointer);
        } else if let Some((pointer, position)) = event.press() {
            return self.pointer_press(pointer, position).map(boxed);
        } else if let Some((pointer, position)) = event.motion() {
            self.pointer_motion(pointer, position);
        } else if let Some((pointer, position)) = event.release() {
            self.pointer_release(pointer, position);
        }
        None
    }

    fn lifecycle(&mut self, phase: LifecyclePhase) {
        match phase {
            LifecyclePhase::Mount => self.mounted = true,
            LifecyclePhase::Unmount => self.unmount(),
        }
    }

    fn is_interactive(&self) -> bool {
        self.mounted && !self.disabled
    }

    fn is_focusable(&self) -> bool {
        self.is_interactive()
    }

    fn accessible_name(&self) -> Option<&str> {
        self.accessible_name_value.as_deref()
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Slider
    }

    fn test_id(&self) -> Option<&str> {
        self.test_id_value.as_deref()
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}
