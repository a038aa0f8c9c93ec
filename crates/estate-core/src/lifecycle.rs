//! Widget lifecycle phases.
//!
//! The host tells a widget when it enters and leaves the tree. Widgets that
//! own timers must drop them on [`LifecyclePhase::Unmount`] so nothing fires
//! into a torn-down context.

use serde::{Deserialize, Serialize};

/// Lifecycle phase for widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecyclePhase {
    /// Widget is being created/mounted.
    Mount,
    /// Widget is being removed/unmounted.
    Unmount,
}

impl LifecyclePhase {
    /// Whether the widget is live after this phase.
    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Mount)
    }
}
