//! Error type for the AT protocol engine.

/// An error raised by a single AT exchange.
///
/// A failed exchange never poisons the driver; the caller may retry the
/// whole logical operation on any of these.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// No terminator condition was met within the deadline. The scratch
    /// buffer may hold partial data and must not be trusted.
    Timeout,
    /// The serial link failed while reading.
    ReadError,
    /// The serial link failed while writing or flushing.
    WriteError,
    /// A frame was read but the expected token was not present in it.
    UnexpectedResponse,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Timeout => defmt::write!(f, "Timeout"),
            Error::ReadError => defmt::write!(f, "ReadError"),
            Error::WriteError => defmt::write!(f, "WriteError"),
            Error::UnexpectedResponse => defmt::write!(f, "UnexpectedResponse"),
        }
    }
}
