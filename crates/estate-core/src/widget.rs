//! Widget trait and related types.
//!
//! Widgets follow a measure-layout-paint cycle and receive input through
//! [`Widget::event`]:
//!
//! 1. **Measure**: Compute intrinsic size given constraints
//! 2. **Layout**: Position self within allocated bounds
//! 3. **Paint**: Generate draw commands for rendering
//!
//! Messages a widget wants its owner to see are returned from `event` as
//! boxed `Any` values and downcast by the receiver.
//!
//! # Examples
//!
//! ```
//! use estate_core::{TypeId, TextStyle, FontWeight};
//!
//! let string_type = TypeId::of::<String>();
//! let i32_type = TypeId::of::<i32>();
//! assert_ne!(string_type, i32_type);
//!
//! let style = TextStyle::default();
//! assert_eq!(style.weight, FontWeight::Normal);
//! ```

use crate::constraints::Constraints;
use crate::draw::GradientStop;
use crate::event::Event;
use crate::geometry::{Point, Rect, Size};
use crate::lifecycle::LifecyclePhase;
use crate::Color;
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Type identifier for widget types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(std::any::TypeId);

impl TypeId {
    /// Get the type ID for a type.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self(std::any::TypeId::of::<T>())
    }
}

/// Result of laying out a widget.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutResult {
    /// Computed size after layout
    pub size: Size,
}

/// Core widget trait that all UI elements implement.
pub trait Widget: Send + Sync {
    /// Get the type identifier for this widget type.
    fn type_id(&self) -> TypeId;

    /// Compute intrinsic size constraints.
    fn measure(&self, constraints: Constraints) -> Size;

    /// Position self within allocated bounds.
    fn layout(&mut self, bounds: Rect) -> LayoutResult;

    /// Generate draw commands for rendering.
    fn paint(&self, canvas: &mut dyn Canvas);

    /// Handle input events.
    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>>;

    /// Get child widgets for tree traversal.
    fn children(&self) -> &[Box<dyn Widget>] {
        &[]
    }

    /// Mount/unmount notification from the host.
    fn lifecycle(&mut self, _phase: LifecyclePhase) {}

    /// Check if this widget is interactive (can receive focus/events).
    fn is_interactive(&self) -> bool {
        false
    }

    /// Check if this widget can receive keyboard focus.
    fn is_focusable(&self) -> bool {
        false
    }

    /// Get the accessible name for screen readers.
    fn accessible_name(&self) -> Option<&str> {
        None
    }

    /// Get the accessible role.
    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Generic
    }

    /// Get the test ID for this widget (if any).
    fn test_id(&self) -> Option<&str> {
        None
    }

    /// Get the current bounds of this widget.
    fn bounds(&self) -> Rect {
        Rect::default()
    }
}

/// Canvas trait for paint operations.
///
/// This is a minimal abstraction over the rendering backend.
pub trait Canvas {
    /// Draw a filled rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draw a stroked rectangle.
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32);

    /// Fill a rectangle with a horizontal gradient.
    fn fill_gradient_rect(&mut self, rect: Rect, stops: &[GradientStop]);

    /// Draw a filled circle.
    fn fill_circle(&mut self, center: Point, radius: f32, color: Color);

    /// Draw a stroked circle.
    fn stroke_circle(&mut self, center: Point, radius: f32, color: Color, width: f32);

    /// Draw a line between two points.
    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f32);

    /// Draw text.
    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle);
}

/// Text style for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in pixels
    pub size: f32,
    /// Text color
    pub color: Color,
    /// Font weight
    pub weight: FontWeight,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 14.0,
            color: Color::BLACK,
            weight: FontWeight::Normal,
        }
    }
}

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontWeight {
    /// Light (300)
    Light,
    /// Normal (400)
    Normal,
    /// Medium (500)
    Medium,
    /// Bold (700)
    Bold,
}

/// Accessible role for screen readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccessibleRole {
    /// Generic element
    #[default]
    Generic,
    /// Button
    Button,
    /// Slider
    Slider,
    /// Text label
    Label,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_id() {
        let id1 = TypeId::of::<u32>();
        let id2 = TypeId::of::<u32>();
        let id3 = TypeId::of::<String>();

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_text_style_default() {
        let style = TextStyle::default();
        assert_eq!(style.size, 14.0);
        assert_eq!(style.weight, FontWeight::Normal);
        assert_eq!(style.color, Color::BLACK);
    }

    #[test]
    fn test_accessible_role_default() {
        assert_eq!(AccessibleRole::default(), AccessibleRole::Generic);
    }

    #[test]
    fn test_layout_result_default() {
        let result = LayoutResult::default();
        assert_eq!(result.size, Size::new(0.0, 0.0));
    }
}
