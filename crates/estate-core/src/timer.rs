//! Tick-driven timers.
//!
//! Time only moves when the host calls `advance` (usually from
//! [`Event::Tick`](crate::Event::Tick)), so timers are deterministic under test
//! and never fire outside the owning widget's event handling.

/// A single-slot delayed task: scheduling replaces whatever is pending.
///
/// Used for trailing-edge debouncing. Each [`schedule`](Self::schedule)
/// restarts the delay and overwrites the payload, so a burst of calls
/// collapses into one delivery carrying the last payload.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    /// Delay in milliseconds
    delay_ms: u32,
    /// Time elapsed since the last schedule
    elapsed_ms: u32,
    /// Pending payload
    pending: Option<T>,
}

impl<T> Debouncer<T> {
    /// Create a debouncer with the given delay.
    #[must_use]
    pub const fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            elapsed_ms: 0,
            pending: None,
        }
    }

    /// Configured delay.
    #[must_use]
    pub const fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    /// Change the delay. Applies to the pending payload too.
    pub fn set_delay_ms(&mut self, delay_ms: u32) {
        self.delay_ms = delay_ms;
    }

    /// Schedule `payload`, cancelling anything pending. Returns the payload
    /// that was replaced.
    pub fn schedule(&mut self, payload: T) -> Option<T> {
        self.elapsed_ms = 0;
        self.pending.replace(payload)
    }

    /// Cancel the pending payload.
    pub fn cancel(&mut self) -> Option<T> {
        self.elapsed_ms = 0;
        self.pending.take()
    }

    /// Whether a payload is waiting.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Milliseconds until the pending payload fires, if any.
    #[must_use]
    pub fn remaining_ms(&self) -> Option<u32> {
        self.pending
            .as_ref()
            .map(|_| self.delay_ms.saturating_sub(self.elapsed_ms))
    }

    /// Advance time. Returns the payload once its delay has elapsed.
    ///
    /// A zero delay fires on the first advance after scheduling, including
    /// `advance(0)`.
    pub fn advance(&mut self, delta_ms: u32) -> Option<T> {
        self.pending.as_ref()?;
        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms);
        if self.elapsed_ms >= self.delay_ms {
            self.elapsed_ms = 0;
            self.pending.take()
        } else {
            None
        }
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(0)
    }
}
