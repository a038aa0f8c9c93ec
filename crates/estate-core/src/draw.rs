//! Draw commands.
//!
//! All painting reduces to these primitives, which a backend replays.

use crate::widget::TextStyle;
use crate::{Color, Point, Rect};
use serde::{Deserialize, Serialize};

/// Stroke style for outlines and lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// Stroke color
    pub color: Color,
    /// Stroke width in pixels
    pub width: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
        }
    }
}

/// Box style for rectangles and circles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStyle {
    /// Fill color (None = no fill)
    pub fill: Option<Color>,
    /// Stroke style (None = no stroke)
    pub stroke: Option<StrokeStyle>,
}

impl BoxStyle {
    /// Create a box with only fill color.
    #[must_use]
    pub const fn fill(color: Color) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
        }
    }

    /// Create a box with only stroke.
    #[must_use]
    pub const fn stroke(style: StrokeStyle) -> Self {
        Self {
            fill: None,
            stroke: Some(style),
        }
    }
}

/// One color stop of a horizontal linear gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Offset along the gradient, 0.0 (left) to 1.0 (right)
    pub offset: f32,
    /// Color at this offset
    pub color: Color,
}

impl GradientStop {
    /// Create a stop; the offset is clamped to [0, 1].
    #[must_use]
    pub fn new(offset: f32, color: Color) -> Self {
        Self {
            offset: offset.clamp(0.0, 1.0),
            color,
        }
    }

    /// Spread `colors` evenly from 0.0 to 1.0.
    #[must_use]
    pub fn evenly_spaced(colors: &[Color]) -> Vec<Self> {
        match colors.len() {
            0 => Vec::new(),
            1 => vec![Self::new(0.0, colors[0])],
            n => {
                let last = (n - 1) as f32;
                colors
                    .iter()
                    .enumerate()
                    .map(|(i, c)| Self::new(i as f32 / last, *c))
                    .collect()
            }
        }
    }
}

/// Drawing primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Draw a rectangle
    Rect {
        /// Rectangle bounds
        bounds: Rect,
        /// Box style
        style: BoxStyle,
    },

    /// Fill a rectangle with a left-to-right gradient
    Gradient {
        /// Rectangle bounds
        bounds: Rect,
        /// Color stops, ordered by offset
        stops: Vec<GradientStop>,
    },

    /// Draw a circle
    Circle {
        /// Center point
        center: Point,
        /// Radius
        radius: f32,
        /// Box style
        style: BoxStyle,
    },

    /// Draw a line segment
    Line {
        /// Start point
        from: Point,
        /// End point
        to: Point,
        /// Stroke style
        style: StrokeStyle,
    },

    /// Draw text
    Text {
        /// Text content
        content: String,
        /// Position
        position: Point,
        /// Text style
        style: TextStyle,
    },
}

impl DrawCommand {
    /// Create a filled rectangle.
    #[must_use]
    pub const fn filled_rect(bounds: Rect, color: Color) -> Self {
        Self::Rect {
            bounds,
            style: BoxStyle::fill(color),
        }
    }

    /// Create a filled circle.
    #[must_use]
    pub const fn filled_circle(center: Point, radius: f32, color: Color) -> Self {
        Self::Circle {
            center,
            radius,
            style: BoxStyle::fill(color),
        }
    }

    /// Fill color of a rect or circle, if it has one.
    #[must_use]
    pub fn fill_color(&self) -> Option<Color> {
        match self {
            Self::Rect { style, .. } | Self::Circle { style, .. } => style.fill,
            _ => None,
        }
    }
}
