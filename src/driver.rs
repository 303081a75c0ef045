//! Tick driver: one sample + classify + report cycle.
//!
//! Each tick:
//! 1. read channel A → PTT classifier
//! 2. read channel B → UP/DOWN classifier
//! 3. report all three buttons (every tick, changed or not)
//!
//! The two classifiers are independent. The driver never sleeps; cadence
//! is the caller's loop. State changes are logged, steady ticks are silent.

use crate::classify::{PttClassifier, PttPhase, UpDown, UpDownClassifier};
use crate::clock::{Clock, Millis};
use crate::config::{Thresholds, ACTIVATION_DELAY_MS};
use crate::fault::{FaultCode, FaultState};
use crate::hal::{ButtonReporter, Channel, ChannelReader};
use crate::logging::LogStream;
use crate::report::ButtonReport;
use crate::{rt_debug, rt_error, rt_info};

/// Per-tick sampling, classification and reporting.
///
/// # Example
///
/// ```ignore
/// static LOG: LogStream = LogStream::new();
/// static FAULT: FaultState = FaultState::new();
///
/// let mut driver = TickDriver::new(reader, reporter, clock, Thresholds::DEFAULT, &LOG, &FAULT);
/// loop {
///     driver.tick();
///     sleep_ms(TICK_PERIOD_MS);
/// }
/// ```
pub struct TickDriver<'a, R, P, C> {
    reader: R,
    reporter: P,
    clock: C,

    ptt: PttClassifier,
    updown: UpDownClassifier,

    // Substituted for a channel whose read fails: classifies as released/neutral
    fallback_raw: u16,

    log: &'a LogStream,
    fault: &'a FaultState,

    // One bit per FaultCode already logged in the current failure streak
    fault_streaks: u8,

    last_band: UpDown,
    last_report: ButtonReport,
    ticks: u32,
}

impl<'a, R, P, C> TickDriver<'a, R, P, C>
where
    R: ChannelReader,
    P: ButtonReporter,
    C: Clock,
{
    /// Create a driver with the configured activation delay.
    pub fn new(
        reader: R,
        reporter: P,
        clock: C,
        thresholds: Thresholds,
        log: &'a LogStream,
        fault: &'a FaultState,
    ) -> Self {
        Self::with_classifiers(
            reader,
            reporter,
            clock,
            PttClassifier::new(thresholds.ptt, ACTIVATION_DELAY_MS),
            UpDownClassifier::new(thresholds.low, thresholds.high),
            thresholds.adc_max,
            log,
            fault,
        )
    }

    /// Create a driver around explicitly built classifiers.
    #[allow(clippy::too_many_arguments)]
    pub fn with_classifiers(
        reader: R,
        reporter: P,
        clock: C,
        ptt: PttClassifier,
        updown: UpDownClassifier,
        adc_max: u16,
        log: &'a LogStream,
        fault: &'a FaultState,
    ) -> Self {
        Self {
            reader,
            reporter,
            clock,
            ptt,
            updown,
            fallback_raw: adc_max,
            log,
            fault,
            fault_streaks: 0,
            last_band: UpDown::Neutral,
            last_report: ButtonReport::EMPTY,
            ticks: 0,
        }
    }

    /// Run one cycle and return the report that was sent.
    pub fn tick(&mut self) -> ButtonReport {
        let now = self.clock.now();
        let mut faulted = false;

        // 1. Channel A → PTT
        let raw_ptt = self.sample(Channel::Ptt, now, &mut faulted);
        let before = self.ptt.phase();
        let ptt = self.ptt.tick(raw_ptt, now);
        self.log_ptt_transition(before, raw_ptt, now);

        // 2. Channel B → UP/DOWN
        let raw_updown = self.sample(Channel::UpDown, now, &mut faulted);
        let band = self.updown.classify(raw_updown);
        if band != self.last_band {
            rt_info!(self.log, now, "UP/DOWN {} (raw={})", band.as_str(), raw_updown);
            self.last_band = band;
        }

        // 3. Report every tick
        let report = ButtonReport::new(ptt, band.up(), band.down());
        if let Err(err) = self.reporter.report(report) {
            if self.record_fault(FaultCode::ReportFailed, 0) {
                rt_error!(self.log, now, "report {}: {}", report.bits(), err);
            }
            faulted = true;
        }

        if !faulted {
            self.fault_streaks = 0;
            if self.fault.is_active() {
                rt_info!(self.log, now, "fault cleared ({} total)", self.fault.count());
                self.fault.clear();
            }
        }

        self.last_report = report;
        self.ticks = self.ticks.wrapping_add(1);
        report
    }

    fn sample(&mut self, channel: Channel, now: Millis, faulted: &mut bool) -> u16 {
        match self.reader.read(channel) {
            Ok(raw) => raw,
            Err(err) => {
                let data = match channel {
                    Channel::Ptt => 0,
                    Channel::UpDown => 1,
                };
                if self.record_fault(FaultCode::AdcReadFailed, data) {
                    rt_error!(self.log, now, "{} {}, treating as released", channel.as_str(), err);
                }
                *faulted = true;
                self.fallback_raw
            }
        }
    }

    /// Returns `true` on the first fault of this kind since the last clean tick.
    fn record_fault(&mut self, code: FaultCode, data: u32) -> bool {
        let bit = 1 << code as u8;
        let first = self.fault_streaks & bit == 0;
        self.fault_streaks |= bit;
        self.fault.set(code, data);
        first
    }

    fn log_ptt_transition(&self, before: PttPhase, raw: u16, now: Millis) {
        match (before, self.ptt.phase()) {
            (PttPhase::Idle, PttPhase::Pending { .. }) => {
                rt_debug!(self.log, now, "PTT press seen (raw={})", raw);
            }
            (PttPhase::Pending { since }, PttPhase::Latched) => {
                rt_info!(self.log, now, "PTT on after {} ms", now.wrapping_since(since));
            }
            (PttPhase::Idle, PttPhase::Latched) => {
                rt_info!(self.log, now, "PTT on");
            }
            (PttPhase::Pending { since }, PttPhase::Idle) => {
                rt_debug!(self.log, now, "PTT press dropped after {} ms", now.wrapping_since(since));
            }
            (PttPhase::Latched, PttPhase::Idle) => {
                rt_info!(self.log, now, "PTT off");
            }
            _ => {}
        }
    }

    /// Report sent by the last tick.
    #[inline]
    pub fn last_report(&self) -> ButtonReport {
        self.last_report
    }

    /// Ticks run since creation (wrapping).
    #[inline]
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    #[inline]
    pub fn ptt(&self) -> &PttClassifier {
        &self.ptt
    }

    #[inline]
    pub fn reader_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    #[inline]
    pub fn reporter(&self) -> &P {
        &self.reporter
    }

    #[inline]
    pub fn reporter_mut(&mut self) -> &mut P {
        &mut self.reporter
    }
}
