//! Core types and traits for the Estate widget toolkit.
//!
//! This crate provides foundational types used throughout Estate:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`]
//! - Color representation: [`Color`]
//! - Layout constraints: [`Constraints`]
//! - Input: [`Event`], [`PointerKey`], and [`DragTracker`] for drags
//! - Time: [`Debouncer`], driven by [`Event::Tick`]
//! - Rendering: [`Widget`], [`Canvas`], [`RecordingCanvas`], [`DrawCommand`]

mod canvas;
mod color;
mod constraints;
pub mod draw;
mod event;
mod geometry;
pub mod gesture;
mod lifecycle;
pub mod timer;
pub mod widget;

pub use canvas::RecordingCanvas;
pub use color::{Color, ColorParseError};
pub use constraints::Constraints;
pub use draw::{BoxStyle, DrawCommand, GradientStop, StrokeStyle};
pub use event::{Event, MouseButton, PointerId, PointerKey, TouchId};
pub use geometry::{Point, Rect, Size};
pub use gesture::{ActiveDrag, DragTracker};
pub use lifecycle::LifecyclePhase;
pub use timer::Debouncer;
pub use widget::{
    AccessibleRole, Canvas, FontWeight, LayoutResult, TextStyle, TypeId, Widget,
};
