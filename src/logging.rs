//! RT-safe logging for RustPttHid.
//!
//! # Architecture
//!
//! ```text
//! Tick loop              LogStream             Drain
//! ─────────              ─────────             ─────
//!
//! rt_log!() ──────────▶ [L0][L1][L2] ──────▶ console / stdout
//! format on stack         lock-free            between ticks
//! never blocks            ring buffer
//! ```
//!
//! # Rules
//!
//! - The tick path never calls blocking output (`println!`, UART writes)
//! - The tick path logs through `rt_log!()` and friends
//! - Messages are dropped (and counted) when the ring is full
//! - Messages above [`crate::config::LOG_LEVEL`] are never formatted

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::clock::Millis;

/// Maximum message length.
pub const MAX_MSG_LEN: usize = 80;

/// Log buffer size (number of entries).
pub const LOG_BUFFER_SIZE: usize = 64;

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl LogLevel {
    /// Convert to string for output.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }

    /// True if messages at this level pass the compile-time filter.
    #[inline]
    pub fn enabled(self) -> bool {
        self <= crate::config::LOG_LEVEL
    }
}

/// A single log entry.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct LogEntry {
    /// Timestamp in milliseconds (wrapping counter).
    pub timestamp_ms: u32,
    /// Log level.
    pub level: LogLevel,
    /// Message length.
    pub len: u8,
    /// Message bytes (not null-terminated).
    pub msg: [u8; MAX_MSG_LEN],
}

impl LogEntry {
    const EMPTY: Self = Self {
        timestamp_ms: 0,
        level: LogLevel::Info,
        len: 0,
        msg: [0; MAX_MSG_LEN],
    };

    /// Message text, up to the last complete UTF-8 character.
    pub fn message(&self) -> &str {
        valid_prefix(&self.msg[..self.len as usize])
    }
}

impl Default for LogEntry {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Longest valid UTF-8 prefix of `bytes`.
///
/// Truncation in [`format_to_buffer`] can split a multi-byte character.
pub(crate) fn valid_prefix(bytes: &[u8]) -> &str {
    match core::str::from_utf8(bytes) {
        Ok(text) => text,
        // SAFETY: valid_up_to() marks the end of a checked UTF-8 prefix
        Err(err) => unsafe { core::str::from_utf8_unchecked(&bytes[..err.valid_up_to()]) },
    }
}

/// One ring slot.
///
/// `seq` tells who owns the slot: the producer for lap position `p` may write
/// it when `seq == p`, the consumer may read it when `seq == p + 1`. It is
/// stored relative to the slot index so every slot starts at zero.
struct Slot {
    seq: AtomicU32,
    entry: UnsafeCell<LogEntry>,
}

impl Slot {
    #[allow(clippy::declare_interior_mutable_const)]
    const EMPTY: Self = Self {
        seq: AtomicU32::new(0),
        entry: UnsafeCell::new(LogEntry::EMPTY),
    };
}

/// Lock-free log stream (multiple producers, multiple consumers).
///
/// - Any thread can push; slots are claimed with `compare_exchange`
/// - Push never blocks (drops message if full)
/// - The drain reads between ticks
pub struct LogStream<const N: usize = LOG_BUFFER_SIZE> {
    slots: [Slot; N],
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
}

// SAFETY: A slot's entry is written only by the producer whose CAS claimed
// its position and read only by the consumer whose CAS claimed it; the
// per-slot seq (Release/Acquire) hands ownership between the two.
unsafe impl<const N: usize> Sync for LogStream<N> {}
unsafe impl<const N: usize> Send for LogStream<N> {}

impl<const N: usize> LogStream<N> {
    const MASK: usize = N - 1;

    /// Create a new empty log stream.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "Log buffer size must be power of 2");

        Self {
            slots: [Slot::EMPTY; N],
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    #[inline]
    fn seq(&self, idx: usize) -> u32 {
        self.slots[idx].seq.load(Ordering::Acquire).wrapping_add(idx as u32)
    }

    #[inline]
    fn publish(&self, idx: usize, seq: u32) {
        self.slots[idx]
            .seq
            .store(seq.wrapping_sub(idx as u32), Ordering::Release);
    }

    /// Push a log entry (never blocks).
    ///
    /// Returns `true` if message was queued, `false` if dropped (ring full).
    /// Messages longer than [`MAX_MSG_LEN`] are truncated.
    #[inline]
    pub fn push(&self, timestamp: Millis, level: LogLevel, msg: &[u8]) -> bool {
        let mut pos = self.write_idx.load(Ordering::Relaxed);

        loop {
            let idx = (pos as usize) & Self::MASK;
            let lag = self.seq(idx).wrapping_sub(pos) as i32;

            if lag < 0 {
                // Slot still holds an entry from the previous lap
                self.dropped.fetch_add(1, Ordering::Relaxed);
                return false;
            }

            if lag > 0 {
                pos = self.write_idx.load(Ordering::Relaxed);
                continue;
            }

            match self.write_idx.compare_exchange_weak(
                pos,
                pos.wrapping_add(1),
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => {
                    // SAFETY: The CAS gave this producer sole ownership of
                    // slot `idx` until it is published below.
                    unsafe {
                        let entry = &mut *self.slots[idx].entry.get();
                        entry.timestamp_ms = timestamp.as_u32();
                        entry.level = level;
                        entry.len = msg.len().min(MAX_MSG_LEN) as u8;
                        entry.msg[..entry.len as usize]
                            .copy_from_slice(&msg[..entry.len as usize]);
                    }
                    self.publish(idx, pos.wrapping_add(1));
                    return true;
                }
                Err(current) => pos = current,
            }
        }
    }

    /// Drain next log entry.
    ///
    /// Returns `None` if no entries available.
    #[inline]
    pub fn drain(&self) -> Option<LogEntry> {
        let mut pos = self.read_idx.load(Ordering::Relaxed);

        loop {
            let idx = (pos as usize) & Self::MASK;
            let lag = self.seq(idx).wrapping_sub(pos.wrapping_add(1)) as i32;

            if lag < 0 {
                // Empty, or the producer has not finished writing
                return None;
            }

            if lag > 0 {
                pos = self.read_idx.load(Ordering::Relaxed);
                continue;
            }

            match self.read_idx.compare_exchange_weak(
                pos,
                pos.wrapping_add(1),
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => {
                    // SAFETY: Published slot, claimed by this consumer
                    let entry = unsafe { *self.slots[idx].entry.get() };
                    self.publish(idx, pos.wrapping_add(N as u32));
                    return Some(entry);
                }
                Err(current) => pos = current,
            }
        }
    }

    /// Get count of dropped messages.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Reset dropped counter (e.g., after reporting).
    #[inline]
    pub fn reset_dropped(&self) {
        self.dropped.store(0, Ordering::Relaxed);
    }

    /// Check if there are entries to drain.
    #[inline]
    pub fn has_entries(&self) -> bool {
        self.pending() != 0
    }

    /// Get number of entries waiting to be drained.
    ///
    /// Includes entries a producer has claimed but not yet published.
    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }
}

impl<const N: usize> Default for LogStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a message into a buffer, truncating at the end of `buf`.
///
/// Returns the number of bytes written.
#[inline]
pub fn format_to_buffer(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    let mut writer = BufWriter { buf, pos: 0 };
    let _ = core::fmt::write(&mut writer, args);
    writer.pos
}

/// `core::fmt::Write` over a fixed byte slice. Excess output is discarded.
pub(crate) struct BufWriter<'a> {
    pub(crate) buf: &'a mut [u8],
    pub(crate) pos: usize,
}

impl core::fmt::Write for BufWriter<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let bytes = s.as_bytes();
        let remaining = self.buf.len() - self.pos;
        let to_write = bytes.len().min(remaining);
        self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
        self.pos += to_write;
        Ok(())
    }
}

/// RT-safe log macro.
///
/// Use this in the tick path instead of println!.
///
/// # Example
///
/// ```ignore
/// rt_log!(LogLevel::Info, LOG_STREAM, now, "PTT latched after {} ms", held);
/// ```
#[macro_export]
macro_rules! rt_log {
    ($level:expr, $stream:expr, $timestamp:expr, $($arg:tt)*) => {{
        let level: $crate::logging::LogLevel = $level;
        if level.enabled() {
            let mut buf = [0u8; $crate::logging::MAX_MSG_LEN];
            let len = $crate::logging::format_to_buffer(&mut buf, format_args!($($arg)*));
            $stream.push($timestamp, level, &buf[..len]);
        }
    }};
}

/// RT-safe info log.
#[macro_export]
macro_rules! rt_info {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Info, $stream, $timestamp, $($arg)*)
    };
}

/// RT-safe error log.
#[macro_export]
macro_rules! rt_error {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Error, $stream, $timestamp, $($arg)*)
    };
}

/// RT-safe debug log.
#[macro_export]
macro_rules! rt_debug {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Debug, $stream, $timestamp, $($arg)*)
    };
}

/// RT-safe trace log (maximum verbosity).
#[macro_export]
macro_rules! rt_trace {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Trace, $stream, $timestamp, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_stream_basic() {
        let stream = LogStream::<16>::new();

        assert!(stream.push(Millis::new(1000), LogLevel::Info, b"test message"));
        assert!(stream.has_entries());
        assert_eq!(stream.pending(), 1);

        let entry = stream.drain().unwrap();
        assert_eq!(entry.timestamp_ms, 1000);
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.message(), "test message");

        assert!(!stream.has_entries());
        assert!(stream.drain().is_none());
    }

    #[test]
    fn test_log_stream_full() {
        let stream = LogStream::<4>::new();

        assert!(stream.push(Millis::new(1), LogLevel::Info, b"1"));
        assert!(stream.push(Millis::new(2), LogLevel::Info, b"2"));
        assert!(stream.push(Millis::new(3), LogLevel::Info, b"3"));
        assert!(stream.push(Millis::new(4), LogLevel::Info, b"4"));

        // Should drop
        assert!(!stream.push(Millis::new(5), LogLevel::Info, b"5"));
        assert_eq!(stream.dropped(), 1);
        assert_eq!(stream.pending(), 4);

        // Drain one, should be able to push again
        assert_eq!(stream.drain().unwrap().message(), "1");
        assert!(stream.push(Millis::new(6), LogLevel::Info, b"6"));

        let order: Vec<u32> = core::iter::from_fn(|| stream.drain())
            .map(|e| e.timestamp_ms)
            .collect();
        assert_eq!(order, vec![2, 3, 4, 6]);

        stream.reset_dropped();
        assert_eq!(stream.dropped(), 0);
    }

    #[test]
    fn test_long_message_truncated() {
        let stream = LogStream::<4>::new();
        let long = [b'x'; MAX_MSG_LEN + 20];
        assert!(stream.push(Millis::ZERO, LogLevel::Warn, &long));
        assert_eq!(stream.drain().unwrap().len as usize, MAX_MSG_LEN);
    }

    #[test]
    fn test_format_to_buffer() {
        let mut buf = [0u8; 32];
        let len = format_to_buffer(&mut buf, format_args!("Hello {}", 42));
        assert_eq!(&buf[..len], b"Hello 42");

        let mut small = [0u8; 4];
        let len = format_to_buffer(&mut small, format_args!("Hello {}", 42));
        assert_eq!(&small[..len], b"Hell");
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Trace);
    }

    #[test]
    fn test_macro_respects_level_filter() {
        let stream = LogStream::<8>::new();

        crate::rt_info!(stream, Millis::new(10), "ptt {}", "on");
        crate::rt_trace!(stream, Millis::new(11), "raw={}", 512);

        // LOG_LEVEL is Debug: trace is filtered out
        assert_eq!(stream.pending(), 1);
        let entry = stream.drain().unwrap();
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.message(), "ptt on");
    }

    #[test]
    fn test_cut_multibyte_char_keeps_prefix() {
        let stream = LogStream::<4>::new();
        // 79 ASCII bytes + 'é' (2 bytes): the cut lands inside 'é'
        let mut msg = [b'a'; MAX_MSG_LEN + 1];
        msg[MAX_MSG_LEN - 1..].copy_from_slice("é".as_bytes());
        assert!(stream.push(Millis::ZERO, LogLevel::Info, &msg));

        let entry = stream.drain().unwrap();
        assert_eq!(entry.len as usize, MAX_MSG_LEN);
        assert_eq!(entry.message().len(), MAX_MSG_LEN - 1);
        assert!(entry.message().bytes().all(|b| b == b'a'));
    }

    #[test]
    fn test_concurrent_producers_never_lose_accepted_entries() {
        const THREADS: u32 = 8;
        const PER_THREAD: u32 = 16;

        for _ in 0..500 {
            let stream = LogStream::<64>::new();
            let accepted = AtomicU32::new(0);

            std::thread::scope(|scope| {
                for t in 0..THREADS {
                    let stream = &stream;
                    let accepted = &accepted;
                    scope.spawn(move || {
                        for i in 0..PER_THREAD {
                            if stream.push(Millis::new(t * 1000 + i), LogLevel::Info, b"x") {
                                accepted.fetch_add(1, Ordering::Relaxed);
                            }
                        }
                    });
                }
            });

            let accepted = accepted.load(Ordering::Relaxed);
            let drained: Vec<u32> = core::iter::from_fn(|| stream.drain())
                .map(|e| e.timestamp_ms)
                .collect();

            assert_eq!(drained.len() as u32, accepted);
            assert_eq!(accepted + stream.dropped(), THREADS * PER_THREAD);

            // Each producer's entries stay in push order
            for t in 0..THREADS {
                let own: Vec<u32> = drained.iter().copied().filter(|ts| ts / 1000 == t).collect();
                assert!(own.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }

    #[test]
    fn test_concurrent_push_and_drain() {
        const THREADS: u32 = 4;
        const PER_THREAD: u32 = 2000;

        let stream = LogStream::<16>::new();
        let accepted = AtomicU32::new(0);
        let done = AtomicU32::new(0);
        let mut drained = 0u32;

        std::thread::scope(|scope| {
            for t in 0..THREADS {
                let (stream, accepted, done) = (&stream, &accepted, &done);
                scope.spawn(move || {
                    for i in 0..PER_THREAD {
                        if stream.push(Millis::new(t * PER_THREAD + i), LogLevel::Debug, b"tick") {
                            accepted.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                    done.fetch_add(1, Ordering::Release);
                });
            }

            while done.load(Ordering::Acquire) < THREADS {
                while let Some(entry) = stream.drain() {
                    assert_eq!(entry.message(), "tick");
                    drained += 1;
                }
            }
        });

        while stream.drain().is_some() {
            drained += 1;
        }
        assert_eq!(drained, accepted.load(Ordering::Relaxed));
        assert_eq!(drained + stream.dropped(), THREADS * PER_THREAD);
    }

    #[test]
    fn test_index_wraparound() {
        let stream = LogStream::<4>::new();
        for i in 0..1000u32 {
            assert!(stream.push(Millis::new(i), LogLevel::Debug, b"tick"));
            assert_eq!(stream.drain().unwrap().timestamp_ms, i);
        }
        assert_eq!(stream.dropped(), 0);
    }
}
