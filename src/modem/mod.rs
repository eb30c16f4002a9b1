//! SIM800L AT protocol engine and driver.
//!
//! The driver is a strictly sequential command/response engine: one AT
//! exchange is in flight at a time, every wait is bounded by a timeout, and
//! all response data lands in fixed-capacity buffers owned by the driver.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │  HTTP session state  │  do_get / do_post
//! │  machine (http)      │
//! └──────────┬───────────┘
//!            │
//! ┌──────────▼───────────┐    ┌────────────────┐    ┌────────────────┐
//! │   Command emitter    │───▶│  Frame reader  │───▶│    Response    │
//! │   (send_command)     │    │  (read_frame)  │    │    matcher     │
//! └──────────┬───────────┘    └───────┬────────┘    └────────────────┘
//!            │                        │
//!            ▼                        ▼
//!         SerialPort (byte transport, exclusively owned)
//! ```
//!
//! The module answers every command with one or more CRLF-delimited lines;
//! a logical response frame is a configured number of CRLF pairs. Because
//! the module usually trails an extra `OK` line that the previous exchange
//! did not consume, every command emission starts by draining whatever is
//! still pending on the link.
//!
//! # Status codes
//!
//! HTTP operations return `Result<u16, HttpError>`: `Ok` carries the HTTP
//! status echoed by the module (e.g. 200), `Err` a driver-level failure
//! whose [`HttpError::code`] value preserves the legacy numeric code space
//! (701..707 for protocol steps, 408 for a server timeout).

pub mod error;
pub mod http;
pub mod scan;

mod commands;
mod driver;

pub use driver::Sim800l;
pub use error::Error;
pub use http::HttpError;

/// Timeout applied to ordinary AT exchanges, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u32 = 5_000;

/// Window of the inbound drain performed before each command, in
/// milliseconds.
pub const DRAIN_TIMEOUT_MS: u32 = 500;

/// CRLF pairs that terminate an ordinary exchange: the command echo line
/// plus the answer line. A trailing `OK` line the module appends after the
/// answer stays on the link and is drained before the next command.
pub const DEFAULT_CRLF_PAIRS: u8 = 2;

/// Settle window after a power-mode switch command, in milliseconds.
pub(crate) const POWER_SWITCH_SETTLE_MS: u32 = 10_000;

/// Timeout for GPRS bearer configuration commands, in milliseconds.
pub(crate) const GPRS_CONFIG_TIMEOUT_MS: u32 = 20_000;

/// Timeout for GPRS bearer connect/disconnect, in milliseconds. The SIM800
/// specification allows up to 85 s; 65 s matches the module's observed
/// worst case.
pub(crate) const GPRS_BEARER_TIMEOUT_MS: u32 = 65_000;

/// Functionality level of the module, as reported by `AT+CFUN?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerMode {
    /// Minimum functionality, RF front-end off (`AT+CFUN=0`)
    Minimum,
    /// Full functionality (`AT+CFUN=1`)
    Normal,
    /// Sleep mode, RF off but SIM powered (`AT+CFUN=4`)
    Sleep,
    /// The module answered with an unrecognized functionality level
    Unknown,
    /// The module answered with an error, or not at all
    Error,
}

/// Network registration state, as reported by `AT+CREG?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkRegistration {
    /// Not registered and not searching for an operator
    NotRegistered,
    /// Registered on the home network
    RegisteredHome,
    /// Not registered, searching for an operator
    Searching,
    /// Registration denied by the network
    Denied,
    /// Registered on a roaming network
    RegisteredRoaming,
    /// The module answered with an unrecognized registration state
    Unknown,
    /// The module answered with an error, or not at all
    Error,
}

#[cfg(feature = "defmt")]
impl defmt::Format for PowerMode {
    fn format(&self, f: defmt::Formatter) {
        match self {
            PowerMode::Minimum => defmt::write!(f, "Minimum"),
            PowerMode::Normal => defmt::write!(f, "Normal"),
            PowerMode::Sleep => defmt::write!(f, "Sleep"),
            PowerMode::Unknown => defmt::write!(f, "Unknown"),
            PowerMode::Error => defmt::write!(f, "Error"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for NetworkRegistration {
    fn format(&self, f: defmt::Formatter) {
        match self {
            NetworkRegistration::NotRegistered => defmt::write!(f, "NotRegistered"),
            NetworkRegistration::RegisteredHome => defmt::write!(f, "RegisteredHome"),
            NetworkRegistration::Searching => defmt::write!(f, "Searching"),
            NetworkRegistration::Denied => defmt::write!(f, "Denied"),
            NetworkRegistration::RegisteredRoaming => defmt::write!(f, "RegisteredRoaming"),
            NetworkRegistration::Unknown => defmt::write!(f, "Unknown"),
            NetworkRegistration::Error => defmt::write!(f, "Error"),
        }
    }
}
