//! ESP-IDF monotonic clock.

use crate::clock::{Clock, Millis};

/// Milliseconds since boot from `esp_timer`, truncated to the wrapping
/// 32-bit counter the classifiers expect.
#[derive(Debug, Clone, Copy, Default)]
pub struct EspClock;

impl Clock for EspClock {
    #[inline]
    fn now(&self) -> Millis {
        // SAFETY: esp_timer_get_time is always safe to call after boot
        let us = unsafe { esp_idf_svc::sys::esp_timer_get_time() };
        Millis::new((us / 1000) as u32)
    }
}
