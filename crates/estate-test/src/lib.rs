//! Testing harness for Estate widgets.
//!
//! Drive a widget with synthetic input on a virtual clock and inspect the
//! messages it emits:
//!
//! ```ignore
//! let mut h = Harness::new(slider).viewport(344.0, 40.0);
//! h.press(28.0).drag_to(200.0).release().wait(10);
//! h.assert_message_count(1);
//! ```

#![allow(clippy::missing_panics_doc)]

mod harness;

pub use harness::Harness;
