//! Price filter: drag both thumbs of a lakh/crore slider and print what the
//! host receives.
//!
//! Run with: `cargo run -p estate --example price_filter`

use estate::{
    DomainRange, Event, MouseButton, Point, RangeSlider, RecordingCanvas, Rect, ValueFormat,
    Widget,
};

fn main() -> Result<(), estate::RangeError> {
    let range = DomainRange::new(0.0, 50_000_000.0, 100_000.0)?;
    let mut slider = RangeSlider::new(range, 2_500_000.0, 15_000_000.0)?
        .value_format(ValueFormat::lakh("₹"))
        .show_markers(true)
        .on_change(|low, high| println!("filter -> [{low}, {high}]"));

    // 320px of track plus two 12px thumb halves.
    slider.layout(Rect::new(0.0, 0.0, 344.0, 40.0));
    let y = 20.0;

    let (low_label, high_label) = slider.labels();
    println!("initial: {low_label} .. {high_label}");

    slider.event(&Event::MouseDown {
        position: Point::new(28.0, y),
        button: MouseButton::Left,
    });
    for x in (28..=120).step_by(4) {
        slider.event(&Event::MouseMove {
            position: Point::new(x as f32, y),
        });
        slider.event(&Event::Tick { delta_ms: 16 });
    }
    slider.event(&Event::MouseUp {
        position: Point::new(120.0, y),
        button: MouseButton::Left,
    });
    slider.event(&Event::Tick { delta_ms: 16 });

    let (low_label, high_label) = slider.labels();
    println!("final: {low_label} .. {high_label}");

    let mut canvas = RecordingCanvas::new();
    slider.paint(&mut canvas);
    println!("painted {} draw commands", canvas.command_count());
    Ok(())
}
