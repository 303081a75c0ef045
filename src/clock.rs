//! Monotonic millisecond time source.
//!
//! The hardware counter is a fixed-width `u32` that wraps after ~49.7 days.
//! All elapsed-time math goes through [`Millis::wrapping_since`], so a
//! delay that straddles the wrap still measures correctly.

use core::cell::Cell;

/// Timestamp from a wrapping 32-bit millisecond counter.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Millis(u32);

impl Millis {
    pub const ZERO: Self = Self(0);

    #[inline]
    pub const fn new(ms: u32) -> Self {
        Self(ms)
    }

    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Milliseconds elapsed from `earlier` to `self`, wraparound-safe.
    #[inline]
    pub const fn wrapping_since(self, earlier: Millis) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    #[inline]
    pub const fn wrapping_add(self, ms: u32) -> Millis {
        Millis(self.0.wrapping_add(ms))
    }
}

impl From<u32> for Millis {
    fn from(ms: u32) -> Self {
        Self(ms)
    }
}

/// Source of monotonic time for the tick driver.
pub trait Clock {
    /// Current time. Must never go backwards except by wrapping.
    fn now(&self) -> Millis;
}

impl<C: Clock + ?Sized> Clock for &C {
    #[inline]
    fn now(&self) -> Millis {
        (**self).now()
    }
}

/// Clock that only moves when told to.
///
/// Used by tests and the host simulation to step through delay windows
/// deterministically.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u32>,
}

impl ManualClock {
    pub const fn new(start: Millis) -> Self {
        Self {
            now: Cell::new(start.0),
        }
    }

    pub fn set(&self, now: Millis) {
        self.now.set(now.0);
    }

    /// Move forward by `ms`, wrapping like the hardware counter.
    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now(&self) -> Millis {
        Millis(self.now.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapping_since_plain() {
        assert_eq!(Millis::new(150).wrapping_since(Millis::new(100)), 50);
        assert_eq!(Millis::new(100).wrapping_since(Millis::new(100)), 0);
    }

    #[test]
    fn test_wrapping_since_across_overflow() {
        let before = Millis::new(u32::MAX - 9);
        let after = before.wrapping_add(25);
        assert_eq!(after.as_u32(), 15);
        assert_eq!(after.wrapping_since(before), 25);
    }

    #[test]
    fn test_manual_clock_advance_wraps() {
        let clock = ManualClock::new(Millis::new(u32::MAX));
        clock.advance(1);
        assert_eq!(clock.now(), Millis::ZERO);
        clock.set(Millis::new(42));
        assert_eq!(clock.now().as_u32(), 42);
    }

    #[test]
    fn test_clock_by_reference() {
        fn read<C: Clock>(c: C) -> Millis {
            c.now()
        }
        let clock = ManualClock::new(Millis::new(7));
        assert_eq!(read(&clock), Millis::new(7));
    }
}
