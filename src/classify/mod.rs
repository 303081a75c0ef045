//! Signal classifiers
//!
//! Pure logic, no hardware dependencies. Each classifier consumes raw ADC
//! readings and produces button states. Fully testable on host.
//!
//! - PTT: channel A, activation delay, immediate release
//! - UP/DOWN: channel B, two-threshold band split, stateless

pub mod ptt;
pub mod updown;

pub use ptt::{PttClassifier, PttPhase};
pub use updown::{UpDown, UpDownClassifier};
