//! Widget implementations for Estate.
//!
//! The centrepiece is [`RangeSlider`], a two-thumb slider for picking a
//! sub-range such as a price band or an area filter.

pub mod format;
mod manifest;
pub mod range_slider;

pub use format::ValueFormat;
pub use manifest::BuildError;
pub use range_slider::{
    DomainRange, DragPhase, RangeChanged, RangeError, RangeSlider, SyncOutcome, Thumb,
    DEFAULT_DEBOUNCE_MS, DEFAULT_SETTLE_MS, MARKER_COUNT,
};
