//! Test harness for Estate widgets.

use estate_core::{
    Constraints, Event, LifecyclePhase, MouseButton, Point, PointerId, RecordingCanvas, Rect,
    Widget,
};
use std::any::Any;
use std::collections::HashMap;
use std::fmt::Debug;

/// Drives one widget with synthetic input on a virtual clock.
///
/// Every message the widget returns is kept so tests can assert on what the
/// host would have seen.
pub struct Harness<W: Widget> {
    /// Widget being tested
    widget: W,
    /// Viewport the widget is measured against
    viewport: Rect,
    /// Bounds given to the widget at layout
    bounds: Rect,
    /// Vertical coordinate for all input
    line_y: Option<f32>,
    /// Last mouse x
    cursor: f32,
    /// Last x per pointer id
    pointers: HashMap<u32, f32>,
    /// Virtual time in milliseconds
    clock_ms: u64,
    /// Collected messages
    messages: Vec<Box<dyn Any + Send>>,
}

impl<W: Widget> Harness<W> {
    /// Create a harness and lay the widget out in a 1280x720 viewport.
    pub fn new(widget: W) -> Self {
        let mut harness = Self {
            widget,
            viewport: Rect::new(0.0, 0.0, 1280.0, 720.0),
            bounds: Rect::default(),
            line_y: None,
            cursor: 0.0,
            pointers: HashMap::new(),
            clock_ms: 0,
            messages: Vec::new(),
        };
        harness.relayout();
        harness
    }

    /// Set the viewport size and lay out again.
    #[must_use]
    pub fn viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = Rect::new(0.0, 0.0, width, height);
        self.relayout();
        self
    }

    /// Lay the widget out at exact bounds.
    #[must_use]
    pub fn layout_at(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self.widget.layout(bounds);
        self
    }

    /// Vertical coordinate used for input. Defaults to the bounds' centre.
    #[must_use]
    pub const fn line_y(mut self, y: f32) -> Self {
        self.line_y = Some(y);
        self
    }

    // === Event Simulation ===

    /// Deliver one event, keeping any message it produces.
    pub fn send(&mut self, event: &Event) -> &mut Self {
        if let Some(message) = self.widget.event(event) {
            self.messages.push(message);
        }
        self
    }

    /// Press the left mouse button at `x`.
    pub fn press(&mut self, x: f32) -> &mut Self {
        self.cursor = x;
        let position = self.at(x);
        self.send(&Event::MouseDown {
            position,
            button: MouseButton::Left,
        })
    }

    /// Move the mouse to `x`.
    pub fn drag_to(&mut self, x: f32) -> &mut Self {
        self.cursor = x;
        let position = self.at(x);
        self.send(&Event::MouseMove { position })
    }

    /// Release the left mouse button where the cursor is.
    pub fn release(&mut self) -> &mut Self {
        let position = self.at(self.cursor);
        self.send(&Event::MouseUp {
            position,
            button: MouseButton::Left,
        })
    }

    /// Press, move and release in one go.
    pub fn drag(&mut self, from: f32, to: f32) -> &mut Self {
        self.press(from).drag_to(to).release()
    }

    /// Put pointer `id` down at `x`.
    pub fn pointer_down(&mut self, id: u32, x: f32) -> &mut Self {
        self.pointers.insert(id, x);
        let position = self.at(x);
        self.send(&Event::PointerDown {
            pointer_id: PointerId(id),
            position,
            button: None,
        })
    }

    /// Move pointer `id` to `x`.
    pub fn pointer_move(&mut self, id: u32, x: f32) -> &mut Self {
        self.pointers.insert(id, x);
        let position = self.at(x);
        self.send(&Event::PointerMove {
            pointer_id: PointerId(id),
            position,
        })
    }

    /// Lift pointer `id` where it last was.
    pub fn pointer_up(&mut self, id: u32) -> &mut Self {
        let x = self.pointers.remove(&id).unwrap_or(self.cursor);
        let position = self.at(x);
        self.send(&Event::PointerUp {
            pointer_id: PointerId(id),
            position,
            button: None,
        })
    }

    /// The system cancels pointer `id`.
    pub fn pointer_cancel(&mut self, id: u32) -> &mut Self {
        self.pointers.remove(&id);
        self.send(&Event::PointerCancel {
            pointer_id: PointerId(id),
        })
    }

    /// Advance virtual time with a single tick.
    ///
    /// A widget returns at most one message per event, so when several
    /// timers fall due inside one wait only the widget's chosen message is
    /// collected. Split the wait to observe each of them.
    pub fn wait(&mut self, ms: u32) -> &mut Self {
        self.clock_ms += u64::from(ms);
        self.send(&Event::Tick { delta_ms: ms })
    }

    /// Mount the widget again.
    pub fn mount(&mut self) -> &mut Self {
        self.widget.lifecycle(LifecyclePhase::Mount);
        self
    }

    /// Tear the widget down.
    pub fn unmount(&mut self) -> &mut Self {
        self.widget.lifecycle(LifecyclePhase::Unmount);
        self
    }

    // === Inspection ===

    /// The widget under test.
    pub const fn widget(&self) -> &W {
        &self.widget
    }

    /// Mutable access to the widget under test.
    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    /// Give the widget back.
    pub fn into_inner(self) -> W {
        self.widget
    }

    /// Bounds the widget was laid out at.
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Virtual time elapsed.
    pub const fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    /// Paint into a fresh recording canvas.
    pub fn paint(&self) -> RecordingCanvas {
        let mut canvas = RecordingCanvas::new();
        self.widget.paint(&mut canvas);
        canvas
    }

    /// Every collected message of type `T`, oldest first.
    pub fn messages<T: Clone + 'static>(&self) -> Vec<T> {
        self.messages
            .iter()
            .filter_map(|m| m.downcast_ref::<T>().cloned())
            .collect()
    }

    /// Number of collected messages of any type.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Forget collected messages.
    pub fn clear_messages(&mut self) -> &mut Self {
        self.messages.clear();
        self
    }

    // === Assertions ===

    /// Assert how many messages were collected.
    pub fn assert_message_count(&self, expected: usize) -> &Self {
        let actual = self.messages.len();
        assert_eq!(
            actual, expected,
            "Expected {expected} messages but collected {actual}"
        );
        self
    }

    /// Assert the most recent message of type `T`.
    pub fn assert_last_message<T>(&self, expected: &T) -> &Self
    where
        T: Clone + PartialEq + Debug + 'static,
    {
        let messages = self.messages::<T>();
        match messages.last() {
            Some(actual) => assert_eq!(
                actual, expected,
                "Expected last message {expected:?} but got {actual:?}"
            ),
            None => panic!("Expected last message {expected:?} but none was collected"),
        }
        self
    }

    /// Assert the text drawn by the widget, in paint order.
    pub fn assert_texts(&self, expected: &[&str]) -> &Self {
        let canvas = self.paint();
        let actual = canvas.texts();
        assert_eq!(
            actual, expected,
            "Expected painted text {expected:?} but got {actual:?}"
        );
        self
    }

    // === Internal ===

    fn relayout(&mut self) {
        let size = self
            .widget
            .measure(Constraints::loose(self.viewport.size()));
        self.bounds = Rect::new(self.viewport.x, self.viewport.y, size.width, size.height);
        self.widget.layout(self.bounds);
    }

    fn at(&self, x: f32) -> Point {
        let y = self.line_y.unwrap_or_else(|| self.bounds.center().y);
        Point::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use estate_core::{widget::LayoutResult, Canvas, Color, Size, TypeId};

    /// Echoes pointer x positions and tick durations back as messages.
    struct EchoWidget {
        bounds: Rect,
        mounted: bool,
    }

    impl EchoWidget {
        const fn new() -> Self {
            Self {
                bounds: Rect::new(0.0, 0.0, 0.0, 0.0),
                mounted: true,
            }
        }
    }

    impl Widget for EchoWidget {
        fn type_id(&self) -> TypeId {
            TypeId::of::<Self>()
        }
        fn measure(&self, c: Constraints) -> Size {
            c.constrain(Size::new(300.0, 40.0))
        }
        fn layout(&mut self, b: Rect) -> LayoutResult {
            self.bounds = b;
            LayoutResult { size: b.size() }
        }
        fn paint(&self, canvas: &mut dyn Canvas) {
            canvas.fill_rect(self.bounds, Color::WHITE);
            canvas.draw_text("echo", self.bounds.origin(), &Default::default());
        }
        fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
            if !self.mounted {
                return None;
            }
            if let Event::Tick { delta_ms } = event {
                return Some(Box::new(*delta_ms));
            }
            event
                .press()
                .or_else(|| event.motion())
                .or_else(|| event.release())
                .map(|(_, p)| Box::new(p) as Box<dyn Any + Send>)
        }
        fn lifecycle(&mut self, phase: LifecyclePhase) {
            self.mounted = phase.is_live();
        }
        fn bounds(&self) -> Rect {
            self.bounds
        }
    }

    #[test]
    fn test_new_lays_out_in_viewport() {
        let h = Harness::new(EchoWidget::new()).viewport(200.0, 100.0);
        assert_eq!(h.bounds(), Rect::new(0.0, 0.0, 200.0, 40.0));
        assert_eq!(h.widget().bounds(), h.bounds());
    }

    #[test]
    fn test_mouse_drag_uses_centre_line() {
        let mut h = Harness::new(EchoWidget::new());
        h.drag(10.0, 50.0);
        assert_eq!(
            h.messages::<Point>(),
            vec![
                Point::new(10.0, 20.0),
                Point::new(50.0, 20.0),
                Point::new(50.0, 20.0)
            ]
        );
    }

    #[test]
    fn test_line_y_override() {
        let mut h = Harness::new(EchoWidget::new()).line_y(7.0);
        h.press(1.0);
        h.assert_last_message(&Point::new(1.0, 7.0));
    }

    #[test]
    fn test_pointer_up_uses_last_position() {
        let mut h = Harness::new(EchoWidget::new());
        h.pointer_down(3, 5.0).pointer_move(3, 25.0).pointer_up(3);
        h.assert_message_count(3)
            .assert_last_message(&Point::new(25.0, 20.0));
        h.pointer_down(4, 5.0).pointer_cancel(4);
        h.assert_message_count(4);
    }

    #[test]
    fn test_wait_advances_clock() {
        let mut h = Harness::new(EchoWidget::new());
        h.wait(30).wait(20);
        assert_eq!(h.clock_ms(), 50);
        assert_eq!(h.messages::<u32>(), vec![30, 20]);
    }

    #[test]
    fn test_unmount_and_mount() {
        let mut h = Harness::new(EchoWidget::new());
        h.unmount().press(1.0);
        h.assert_message_count(0);
        h.mount().press(1.0);
        h.assert_message_count(1);
        h.clear_messages();
        assert_eq!(h.message_count(), 0);
    }

    #[test]
    fn test_assert_texts() {
        let h = Harness::new(EchoWidget::new());
        h.assert_texts(&["echo"]);
        assert_eq!(h.paint().command_count(), 2);
    }

    #[test]
    #[should_panic(expected = "Expected 2 messages but collected 0")]
    fn test_assert_message_count_panics() {
        let h = Harness::new(EchoWidget::new());
        h.assert_message_count(2);
    }

    #[test]
    #[should_panic(expected = "none was collected")]
    fn test_assert_last_message_panics_when_empty() {
        let h = Harness::new(EchoWidget::new());
        h.assert_last_message(&0u32);
    }
}
