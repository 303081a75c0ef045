//! PTT (Push-To-Talk) classifier
//!
//! Turns channel A readings into a latched transmit flag.
//! Activation waits for the press to hold through the activation delay;
//! release is immediate. Delaying only the ON edge absorbs contact bounce
//! (heard remotely as a pop) without adding talk-off lag.

use crate::clock::Millis;
use crate::config::{ACTIVATION_DELAY_MS, TH_PTT};

/// PTT state machine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PttPhase {
    /// Not pressed (or a press was just discarded)
    Idle,
    /// Press observed at `since`, waiting out the activation delay
    Pending { since: Millis },
    /// Transmitting
    Latched,
}

/// PTT classifier
///
/// Holds the only cross-tick state in the firmware. `pending` and
/// `latched` are phases of one enum, so they can never both be set.
#[derive(Debug, Clone)]
pub struct PttClassifier {
    /// Raw readings strictly below this are "pressed"
    threshold: u16,
    /// Press confirmation delay in milliseconds
    activation_delay_ms: u32,
    /// Current phase
    phase: PttPhase,
}

impl PttClassifier {
    /// Create new PTT classifier
    ///
    /// # Arguments
    /// * `threshold` - Raw ADC value below which the line counts as keyed
    /// * `activation_delay_ms` - Continuous press required before latching
    pub const fn new(threshold: u16, activation_delay_ms: u32) -> Self {
        Self {
            threshold,
            activation_delay_ms,
            phase: PttPhase::Idle,
        }
    }

    /// Classify one channel A sample.
    ///
    /// # Arguments
    /// * `raw` - Raw ADC reading (lower = pressed)
    /// * `now` - Current monotonic time
    ///
    /// Returns the latched transmit flag. A press released before the
    /// delay elapses is dropped without ever reporting true.
    #[inline]
    pub fn tick(&mut self, raw: u16, now: Millis) -> bool {
        let pressed = self.is_pressed_raw(raw);

        self.phase = match (self.phase, pressed) {
            (_, false) => PttPhase::Idle,
            (PttPhase::Latched, true) => PttPhase::Latched,
            (PttPhase::Pending { since }, true) => self.confirm(since, now),
            // Delay is checked on the first tick too, so a zero delay latches at once
            (PttPhase::Idle, true) => self.confirm(now, now),
        };

        self.is_latched()
    }

    #[inline]
    fn confirm(&self, since: Millis, now: Millis) -> PttPhase {
        if now.wrapping_since(since) >= self.activation_delay_ms {
            PttPhase::Latched
        } else {
            PttPhase::Pending { since }
        }
    }

    /// Raw comparator, no state involved.
    #[inline]
    pub fn is_pressed_raw(&self, raw: u16) -> bool {
        raw < self.threshold
    }

    /// Get current phase
    #[inline]
    pub fn phase(&self) -> PttPhase {
        self.phase
    }

    /// Check if PTT is latched (transmitting)
    #[inline]
    pub fn is_latched(&self) -> bool {
        self.phase == PttPhase::Latched
    }

    /// Check if a press is waiting out the activation delay
    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self.phase, PttPhase::Pending { .. })
    }

    /// Time the pending press was first seen, if any
    #[inline]
    pub fn pending_since(&self) -> Option<Millis> {
        match self.phase {
            PttPhase::Pending { since } => Some(since),
            _ => None,
        }
    }

    #[inline]
    pub fn threshold(&self) -> u16 {
        self.threshold
    }

    #[inline]
    pub fn activation_delay_ms(&self) -> u32 {
        self.activation_delay_ms
    }

    /// Reset to initial state
    #[inline]
    pub fn reset(&mut self) {
        self.phase = PttPhase::Idle;
    }
}

impl Default for PttClassifier {
    fn default() -> Self {
        Self::new(TH_PTT, ACTIVATION_DELAY_MS)
    }
}
