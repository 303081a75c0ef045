//! Module: report
//!
//! Purpose: HID button report. One byte per tick, one bit per button.
//!
//! Architecture:
//! - Bit layout matches [`HID_REPORT_DESCRIPTOR`] (4 buttons + 4 pad bits)
//! - Button 1 is reserved and always reads 0
//! - Sent every tick, changed or not; the host side deduplicates
//!
//! Safety: Safe. No unsafe blocks. Copy types only.

use crate::config::REPORT_SYNC;

/// Button report sent to the host once per tick
///
/// Bit layout:
/// - Bit 0: button 0, PTT (latched)
/// - Bit 1: button 1, reserved (always 0)
/// - Bit 2: button 2, UP (GND-short band)
/// - Bit 3: button 3, DOWN
/// - Bits 4-7: padding (always 0)
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonReport(u8);

impl ButtonReport {
    /// PTT bit mask (button 0)
    pub const PTT: u8 = 0x01;

    /// Reserved bit mask (button 1)
    pub const RESERVED: u8 = 0x02;

    /// UP bit mask (button 2)
    pub const UP: u8 = 0x04;

    /// DOWN bit mask (button 3)
    pub const DOWN: u8 = 0x08;

    /// Bits that may ever be set
    pub const VALID: u8 = Self::PTT | Self::UP | Self::DOWN;

    /// No buttons pressed
    pub const EMPTY: Self = Self(0);

    /// Number of buttons declared in the HID descriptor
    pub const BUTTON_COUNT: u8 = 4;

    /// Build a report from the three classified states.
    #[inline]
    pub const fn new(ptt: bool, up: bool, down: bool) -> Self {
        let mut bits = 0;
        if ptt {
            bits |= Self::PTT;
        }
        if up {
            bits |= Self::UP;
        }
        if down {
            bits |= Self::DOWN;
        }
        Self(bits)
    }

    /// Build from raw bits. Reserved and padding bits are cleared.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::VALID)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn ptt(self) -> bool {
        self.0 & Self::PTT != 0
    }

    #[inline]
    pub const fn up(self) -> bool {
        self.0 & Self::UP != 0
    }

    #[inline]
    pub const fn down(self) -> bool {
        self.0 & Self::DOWN != 0
    }

    /// State of button `index` as the host numbers them (0-based).
    ///
    /// Out-of-range indices read as released.
    #[inline]
    pub const fn button(self, index: u8) -> bool {
        index < Self::BUTTON_COUNT && self.0 & (1 << index) != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Serial frame: sync byte followed by the report byte.
    #[inline]
    pub const fn to_frame(self) -> [u8; 2] {
        [REPORT_SYNC, self.0]
    }
}

impl core::fmt::Display for ButtonReport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "ptt={} up={} down={}",
            self.ptt() as u8,
            self.up() as u8,
            self.down() as u8
        )
    }
}

/// HID report descriptor for the report above: a gamepad with four
/// one-bit buttons followed by four constant padding bits.
pub const HID_REPORT_DESCRIPTOR: [u8; 29] = [
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x05, // Usage (Game Pad)
    0xA1, 0x01, // Collection (Application)
    0x05, 0x09, //   Usage Page (Button)
    0x19, 0x01, //   Usage Minimum (Button 1)
    0x29, 0x04, //   Usage Maximum (Button 4)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x04, //   Report Count (4)
    0x81, 0x02, //   Input (Data, Var, Abs)
    0x75, 0x04, //   Report Size (4)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x03, //   Input (Const, Var, Abs)
    0xC0, // End Collection
];

// ============================================================================
// Tests
// ============================================================================
