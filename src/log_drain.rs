//! Log drain: moves entries out of a [`LogStream`] into a text sink.
//!
//! Runs between ticks, never inside one. On target the sink is the ESP-IDF
//! console (stdout on UART0/USB-JTAG); on host it is plain stdout.
//!
//! Line format: `[timestamp_ms] LEVEL: message\n`

use core::fmt::Write;

use crate::clock::Millis;
use crate::config::LOG_DROP_REPORT_MS;
use crate::logging::{valid_prefix, BufWriter, LogEntry, LogStream};

/// Size of one formatted line, including the timestamp prefix.
pub const LINE_BUF_LEN: usize = 128;

/// Format log entry to text.
///
/// Returns the number of bytes written to `buf`.
pub fn format_log_entry(entry: &LogEntry, buf: &mut [u8]) -> usize {
    let mut writer = BufWriter { buf, pos: 0 };

    let _ = writeln!(
        writer,
        "[{:10}] {}: {}",
        entry.timestamp_ms,
        entry.level.as_str(),
        entry.message()
    );

    writer.pos
}

/// Drain state: remembers when dropped messages were last reported.
#[derive(Debug, Default)]
pub struct LogDrain {
    last_dropped_report: Option<Millis>,
}

impl LogDrain {
    pub const fn new() -> Self {
        Self {
            last_dropped_report: None,
        }
    }

    /// Write every pending entry of `stream` to `sink`, one line per call.
    ///
    /// At most every [`LOG_DROP_REPORT_MS`] a warning line with the number of
    /// dropped messages is emitted (only if any were dropped).
    ///
    /// Returns the number of entries drained.
    pub fn drain<F, const N: usize>(&mut self, stream: &LogStream<N>, now: Millis, mut sink: F) -> usize
    where
        F: FnMut(&str),
    {
        let mut line = [0u8; LINE_BUF_LEN];
        let mut count = 0;

        while let Some(entry) = stream.drain() {
            let len = format_log_entry(&entry, &mut line);
            sink(valid_prefix(&line[..len]));
            count += 1;
        }

        let due = match self.last_dropped_report {
            None => true,
            Some(last) => now.wrapping_since(last) >= LOG_DROP_REPORT_MS,
        };

        if due {
            let dropped = stream.dropped();
            if dropped > 0 {
                let mut writer = BufWriter { buf: &mut line, pos: 0 };
                let _ = writeln!(writer, "[{:10}] WARN: Dropped log messages: {}", now.as_u32(), dropped);
                let len = writer.pos;
                sink(valid_prefix(&line[..len]));
                stream.reset_dropped();
            }
            self.last_dropped_report = Some(now);
        }

        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogLevel, MAX_MSG_LEN};

    #[test]
    fn test_format_log_entry() {
        let entry = LogEntry {
            timestamp_ms: 1234567,
            level: LogLevel::Info,
            len: 11,
            msg: {
                let mut msg = [0u8; MAX_MSG_LEN];
                msg[..11].copy_from_slice(b"Hello world");
                msg
            },
        };

        let mut buf = [0u8; LINE_BUF_LEN];
        let len = format_log_entry(&entry, &mut buf);

        let formatted = core::str::from_utf8(&buf[..len]).unwrap();
        assert_eq!(formatted, "[   1234567] INFO: Hello world\n");
    }

    #[test]
    fn test_format_truncated_message() {
        let entry = LogEntry {
            timestamp_ms: 999,
            level: LogLevel::Error,
            len: 5,
            msg: {
                let mut msg = [0u8; MAX_MSG_LEN];
                msg[..10].copy_from_slice(b"TEST12345X"); // Only first 5 used
                msg
            },
        };

        let mut buf = [0u8; LINE_BUF_LEN];
        let len = format_log_entry(&entry, &mut buf);

        let formatted = core::str::from_utf8(&buf[..len]).unwrap();
        assert!(formatted.contains("ERROR"));
        assert!(formatted.contains("TEST1"));
        assert!(!formatted.contains("X"));
    }

    #[test]
    fn test_cut_multibyte_message_still_printed() {
        let stream = LogStream::<4>::new();
        let mut drain = LogDrain::new();
        let mut lines = Vec::new();

        // 'é' straddles the message limit and loses its second byte
        let text = format!("{}é", "a".repeat(MAX_MSG_LEN - 1));
        stream.push(Millis::new(5), LogLevel::Info, text.as_bytes());
        drain.drain(&stream, Millis::new(5), |l| lines.push(l.to_string()));

        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0],
            format!("[         5] INFO: {}\n", "a".repeat(MAX_MSG_LEN - 1))
        );
    }

    #[test]
    fn test_drain_emits_lines_in_order() {
        let stream = LogStream::<8>::new();
        stream.push(Millis::new(10), LogLevel::Info, b"first");
        stream.push(Millis::new(20), LogLevel::Warn, b"second");

        let mut lines = Vec::new();
        let mut drain = LogDrain::new();
        let n = drain.drain(&stream, Millis::new(30), |l| lines.push(l.to_string()));

        assert_eq!(n, 2);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("INFO: first\n"));
        assert!(lines[1].ends_with("WARN: second\n"));
        assert!(!stream.has_entries());
    }

    #[test]
    fn test_dropped_report_is_rate_limited() {
        let stream = LogStream::<2>::new();
        let mut drain = LogDrain::new();
        let mut lines = Vec::new();

        // Overflow: 2 queued, 1 dropped
        for i in 0..3 {
            stream.push(Millis::new(i), LogLevel::Debug, b"x");
        }
        drain.drain(&stream, Millis::new(100), |l| lines.push(l.to_string()));
        assert_eq!(lines.len(), 3);
        assert!(lines[2].contains("Dropped log messages: 1"));
        assert_eq!(stream.dropped(), 0);

        // Overflow again before the interval elapses: no report yet
        lines.clear();
        for i in 0..3 {
            stream.push(Millis::new(200 + i), LogLevel::Debug, b"y");
        }
        drain.drain(&stream, Millis::new(300), |l| lines.push(l.to_string()));
        assert_eq!(lines.len(), 2);
        assert_eq!(stream.dropped(), 1);

        // Interval elapsed: report now
        lines.clear();
        drain.drain(&stream, Millis::new(100 + LOG_DROP_REPORT_MS), |l| {
            lines.push(l.to_string())
        });
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Dropped log messages: 1"));
    }
}
