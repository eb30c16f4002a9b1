//! Serial and time abstractions for the modem driver.
//!
//! The SIM800L is a half-duplex command/response peripheral behind a UART.
//! The driver only needs two things from the platform: a byte-oriented
//! serial link with a non-blocking availability check, and a monotonic
//! millisecond counter to bound every wait.

#![allow(missing_docs)]

/// A byte-oriented duplex serial link to the module.
///
/// The link makes no framing guarantees; the driver performs its own CRLF
/// delimiter detection on top of raw bytes. The driver owns the link
/// exclusively for its lifetime, so implementations do not need to be
/// shareable.
pub trait SerialPort {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Number of bytes ready to be read without blocking
    fn available(&mut self) -> usize;
    /// Read the next byte. Only valid when `available()` is non-zero.
    fn read_byte(&mut self) -> Result<u8, Self::Error>;
    /// Write all bytes of `buf` to the link
    fn write(&mut self, buf: &[u8]) -> Result<(), Self::Error>;
    /// Block until previously written bytes are physically sent
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// A monotonic millisecond counter.
///
/// Timeouts are measured from call entry with coarse millisecond
/// granularity; the counter must never go backwards but is allowed to wrap.
pub trait Clock {
    /// Milliseconds elapsed since some fixed epoch
    fn now_ms(&mut self) -> u64;
}
