//! Canvas implementations for rendering.

use crate::draw::{BoxStyle, DrawCommand, GradientStop, StrokeStyle};
use crate::widget::{Canvas, TextStyle};
use crate::{Color, Point, Rect};

/// A Canvas implementation that records draw operations as `DrawCommand`s.
///
/// This is useful for:
/// - Testing (verify what was painted)
/// - Serialization (send commands to another process)
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    /// Create a new empty recording canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the recorded draw commands.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take ownership of the recorded commands, clearing the canvas.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Get the number of recorded commands.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Check if no commands have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Clear all recorded commands.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// All text drawn so far, in order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { content, .. } => Some(content.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::filled_rect(rect, color));
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        self.commands.push(DrawCommand::Rect {
            bounds: rect,
            style: BoxStyle::stroke(StrokeStyle { color, width }),
        });
    }

    fn fill_gradient_rect(&mut self, rect: Rect, stops: &[GradientStop]) {
        self.commands.push(DrawCommand::Gradient {
            bounds: rect,
            stops: stops.to_vec(),
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        self.commands
            .push(DrawCommand::filled_circle(center, radius, color));
    }

    fn stroke_circle(&mut self, center: Point, radius: f32, color: Color, width: f32) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            style: BoxStyle::stroke(StrokeStyle { color, width }),
        });
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            style: StrokeStyle { color, width },
        });
    }

    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            content: text.to_string(),
            position,
            style: style.clone(),
        });
    }
}
