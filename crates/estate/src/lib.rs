//! Estate: range selection widgets for property search.
//!
//! ```
//! use estate::{DomainRange, RangeSlider, ValueFormat};
//!
//! let range = DomainRange::new(0.0, 50_000_000.0, 100_000.0)?;
//! let slider = RangeSlider::new(range, 2_500_000.0, 15_000_000.0)?
//!     .value_format(ValueFormat::lakh("₹"))
//!     .on_change(|low, high| println!("{low}..{high}"));
//! assert_eq!(slider.labels().0, "₹25L");
//! # Ok::<(), estate::RangeError>(())
//! ```

pub use estate_core::*;
pub use estate_widgets as widgets;
pub use estate_yaml as yaml;

pub use estate_widgets::{
    BuildError, DomainRange, DragPhase, RangeChanged, RangeError, RangeSlider, SyncOutcome,
    Thumb, ValueFormat,
};
pub use estate_yaml::{GestureScript, ParseError, SliderManifest, Step};

pub mod replay;

pub use replay::{Notification, ReplayError, ReplayReport, Replayer};
