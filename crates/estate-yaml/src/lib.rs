//! YAML configuration for Estate widgets.
//!
//! - [`SliderManifest`]: declarative range slider configuration
//! - [`GestureScript`]: scripted input replayed on a virtual clock

mod error;
mod manifest;
mod script;

pub use error::ParseError;
pub use manifest::{FormatSpec, SliderManifest};
pub use script::{GestureScript, Step};
