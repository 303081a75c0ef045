//! RustPttHid - Main entry point
//!
//! On the ESP32-S3:
//! 1. Bring up ADC1 (GPIO1 = channel A/PTT, GPIO2 = channel B/UP-DOWN)
//! 2. Bring up UART1 TX on GPIO17 toward the USB HID bridge
//! 3. Tick forever: sample, classify, report, drain logs, sleep
//!
//! On the host the same driver replays a scripted accessory session
//! against a manual clock and prints the log and report changes.

#[cfg(target_os = "espidf")]
fn main() -> Result<(), esp_idf_svc::sys::EspError> {
    target::run()
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    host::run();
}

#[cfg(target_os = "espidf")]
mod target {
    use esp_idf_svc::hal::adc::oneshot::AdcDriver;
    use esp_idf_svc::hal::delay::FreeRtos;
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::sys::EspError;

    use rust_ptt_hid::config::{TARGET_ADC_BITS, TICK_PERIOD_MS};
    use rust_ptt_hid::hal::{AdcChannelReader, EspClock, SerialHidReporter};
    use rust_ptt_hid::{rt_info, Clock, LogDrain, Thresholds, TickDriver, FAULT_STATE, LOG_STREAM};

    pub fn run() -> Result<(), EspError> {
        // Initialize ESP-IDF
        esp_idf_svc::sys::link_patches();

        let peripherals = Peripherals::take()?;

        let adc = AdcDriver::new(peripherals.adc1)?;
        let reader = AdcChannelReader::new(&adc, peripherals.pins.gpio1, peripherals.pins.gpio2)?;
        let reporter = SerialHidReporter::new(peripherals.uart1, peripherals.pins.gpio17)?;
        let clock = EspClock;

        rt_info!(LOG_STREAM, clock.now(), "{}", env!("VERSION_STRING"));

        let mut driver = TickDriver::new(
            reader,
            reporter,
            clock,
            Thresholds::for_resolution(TARGET_ADC_BITS),
            &LOG_STREAM,
            &FAULT_STATE,
        );
        let mut drain = LogDrain::new();

        loop {
            driver.tick();
            drain.drain(&LOG_STREAM, clock.now(), |line| print!("{}", line));
            FreeRtos::delay_ms(TICK_PERIOD_MS);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
mod host {
    use rust_ptt_hid::config::{ACTIVATION_DELAY_MS, TICK_PERIOD_MS};
    use rust_ptt_hid::{
        rt_info, ButtonReport, ButtonReporter, Channel, ChannelReader, Clock, HalError, LogDrain,
        ManualClock, Millis, Thresholds, TickDriver, FAULT_STATE, LOG_STREAM,
    };

    /// Holds the voltages the accessory currently presents.
    struct ScriptedReader {
        ptt: u16,
        updown: u16,
    }

    impl ChannelReader for ScriptedReader {
        fn read(&mut self, channel: Channel) -> Result<u16, HalError> {
            Ok(match channel {
                Channel::Ptt => self.ptt,
                Channel::UpDown => self.updown,
            })
        }
    }

    /// Prints a report line only when the bits change.
    #[derive(Default)]
    struct StdoutReporter {
        last: Option<ButtonReport>,
        sent: u32,
    }

    impl ButtonReporter for StdoutReporter {
        fn report(&mut self, report: ButtonReport) -> Result<(), HalError> {
            self.sent += 1;
            if self.last != Some(report) {
                println!("    report #{:<4} {}", self.sent, report);
                self.last = Some(report);
            }
            Ok(())
        }
    }

    /// (label, duration ms, channel A raw, channel B raw)
    const SCRIPT: &[(&str, u32, u16, u16)] = &[
        ("idle", 50, 1023, 1023),
        ("tap shorter than activation delay", 40, 200, 1023),
        ("idle", 50, 1023, 1023),
        ("bouncy press", 10, 850, 1023),
        ("bounce open", 10, 950, 1023),
        ("held press", 300, 150, 1023),
        ("release", 50, 1023, 1023),
        ("UP (GND short)", 60, 1023, 12),
        ("DOWN (pull-down)", 60, 1023, 170),
        ("idle", 50, 1023, 1023),
    ];

    pub fn run() {
        let clock = ManualClock::new(Millis::ZERO);
        let mut drain = LogDrain::new();

        rt_info!(LOG_STREAM, clock.now(), "{} (host replay)", env!("VERSION_STRING"));
        rt_info!(
            LOG_STREAM,
            clock.now(),
            "tick {} ms, activation delay {} ms",
            TICK_PERIOD_MS,
            ACTIVATION_DELAY_MS
        );

        let reader = ScriptedReader { ptt: 1023, updown: 1023 };
        let mut driver = TickDriver::new(
            reader,
            StdoutReporter::default(),
            &clock,
            Thresholds::DEFAULT,
            &LOG_STREAM,
            &FAULT_STATE,
        );

        for &(label, duration_ms, ptt, updown) in SCRIPT {
            println!("-- {} (A={}, B={}, {} ms)", label, ptt, updown, duration_ms);
            {
                let reader = driver.reader_mut();
                reader.ptt = ptt;
                reader.updown = updown;
            }

            for _ in 0..duration_ms / TICK_PERIOD_MS {
                driver.tick();
                drain.drain(&LOG_STREAM, clock.now(), |line| print!("{}", line));
                clock.advance(TICK_PERIOD_MS);
            }
        }

        let fault = FAULT_STATE.snapshot();
        println!(
            "{} ticks, {} reports sent, {} faults (last: {})",
            driver.ticks(),
            driver.reporter().sent,
            fault.count,
            fault.code.as_str()
        );
    }
}
