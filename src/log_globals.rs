//! Global log stream and fault state.
//!
//! One control loop, so one producer per stream.

use crate::fault::FaultState;
use crate::logging::LogStream;

/// Log stream for the tick loop.
///
/// Single producer (tick driver), single consumer (log drain).
pub static LOG_STREAM: LogStream = LogStream::new();

/// Fault latch shared by the tick driver and the drain's status report.
pub static FAULT_STATE: FaultState = FaultState::new();
