//! # libgsm - SIM800L GSM/GPRS driver
//!
//! A driver for the SIMCom SIM800L GSM/GPRS module, speaking the module's
//! textual AT command protocol over any byte-oriented serial link. It exposes
//! HTTP/S GET and POST, GPRS bearer management, power-mode control, and
//! network/signal status queries. The crate is designed for embedded systems
//! and supports `no_std` environments.
//!
//! ## Features
//!
//! ### HTTP/S client
//! - GET and POST through the module's HTTP application layer
//! - Automatic SSL selection from the `https://` URL scheme
//! - Bounded response body storage in a caller-sized receive buffer
//!
//! ### Modem control
//! - GPRS bearer setup (APN), connect and disconnect
//! - Power-mode queries and transitions with legal-transition checking
//! - Network registration and signal quality queries
//!
//! ### Bounded resource usage
//! - Zero-allocation: all protocol buffers are fixed-capacity (`heapless`)
//! - Every read is bounded by a timeout or a buffer capacity; the driver
//!   never blocks indefinitely
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! libgsm = "0.1.0"
//! ```
//!
//! Implement [`transport::SerialPort`] for your UART and
//! [`transport::Clock`] for your millisecond tick source, then drive the
//! module:
//!
//! ```rust,no_run
//! use libgsm::modem::Sim800l;
//! use libgsm::transport::{Clock, SerialPort};
//! # struct Uart;
//! # impl SerialPort for Uart {
//! #     type Error = ();
//! #     fn available(&mut self) -> usize { 0 }
//! #     fn read_byte(&mut self) -> Result<u8, Self::Error> { Err(()) }
//! #     fn write(&mut self, _buf: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct Millis;
//! # impl Clock for Millis {
//! #     fn now_ms(&mut self) -> u64 { 0 }
//! # }
//!
//! let mut modem: Sim800l<Uart, Millis> = Sim800l::new(Uart, Millis);
//!
//! if modem.is_ready() && modem.setup_gprs("internet") && modem.connect_gprs() {
//!     match modem.do_get("https://example.com/api/data", 10_000) {
//!         Ok(200) => {
//!             let _body = modem.data_received();
//!         }
//!         Ok(_status) => { /* server answered with a non-200 status */ }
//!         Err(_err) => { /* a protocol step failed */ }
//!     }
//!     modem.disconnect_gprs();
//! }
//! ```
//!
//! ## Platform support
//!
//! This library works on:
//! - Embedded microcontrollers (ARM Cortex-M, RISC-V, etc.)
//! - Linux-based devices with a serial adapter
//! - Any platform supporting Rust's `core` library
//!
//! ## Optional features
//!
//! - `std`: Enable standard library support (default: disabled)
//! - `defmt`: Enable defmt formatting of the status and error types

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

/// AT protocol engine and the SIM800L driver built on top of it.
///
/// This module contains the command/response engine (frame reading, command
/// emission, response matching), the typed status queries, and the HTTP
/// session state machine.
pub mod modem;

/// Hardware abstractions the driver is generic over.
///
/// The driver owns exactly one serial link and one monotonic clock for the
/// whole of its lifetime; implement these traits to bind it to a platform.
pub mod transport;
