//! The SIM800L driver: command/response engine, status queries, GPRS.

use heapless::Vec;

use crate::modem::error::Error;
use crate::modem::{commands, scan};
use crate::modem::{
    DEFAULT_CRLF_PAIRS, DEFAULT_TIMEOUT_MS, DRAIN_TIMEOUT_MS, GPRS_BEARER_TIMEOUT_MS,
    GPRS_CONFIG_TIMEOUT_MS, NetworkRegistration, POWER_SWITCH_SETTLE_MS, PowerMode,
};
use crate::transport::{Clock, SerialPort};

/// Driver for a SIM800L module on a dedicated serial link.
///
/// The driver owns two fixed-capacity buffers: a scratch buffer of `BUF`
/// bytes holding the raw text of the most recent response frame, and a
/// receive buffer of `RECV` bytes holding the HTTP body from the most
/// recent successful GET or POST. Both capacities are chosen by the caller;
/// the defaults fit ordinary status traffic and small response bodies.
///
/// All operations are synchronous and strictly sequential: no operation
/// starts before the previous one has completed, and every wait is bounded
/// by a timeout. The driver stays usable after any failed call.
pub struct Sim800l<S, C, const BUF: usize = 128, const RECV: usize = 256>
where
    S: SerialPort,
    C: Clock,
{
    pub(crate) serial: S,
    pub(crate) clock: C,
    /// Scratch buffer: most recent raw response frame. Overwritten on every
    /// exchange, never trusted after a failed read.
    pub(crate) buffer: Vec<u8, BUF>,
    /// Receive buffer: HTTP body of the most recent successful GET/POST.
    pub(crate) recv: Vec<u8, RECV>,
}

impl<S, C, const BUF: usize, const RECV: usize> Sim800l<S, C, BUF, RECV>
where
    S: SerialPort,
    C: Clock,
{
    /// Create a driver owning `serial` and `clock` exclusively.
    pub fn new(serial: S, clock: C) -> Self {
        Self {
            serial,
            clock,
            buffer: Vec::new(),
            recv: Vec::new(),
        }
    }

    /// Release the transport and clock, consuming the driver.
    pub fn release(self) -> (S, C) {
        (self.serial, self.clock)
    }

    /// Check that the module answers `AT` with `OK`.
    pub fn is_ready(&mut self) -> bool {
        self.send_and_check(
            commands::AT,
            DEFAULT_TIMEOUT_MS,
            commands::RSP_OK,
            DEFAULT_CRLF_PAIRS,
        )
        .is_ok()
    }

    /// Flush the link and discard every byte still pending on the inbound
    /// side.
    ///
    /// Call this after an externally performed hardware reset: the module
    /// emits an unsolicited boot banner that must not be mistaken for a
    /// command answer.
    pub fn purge(&mut self) -> Result<(), Error> {
        self.serial.flush().map_err(|_| Error::WriteError)?;
        while self.serial.available() > 0 {
            self.serial.read_byte().map_err(|_| Error::ReadError)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Status queries
    // ------------------------------------------------------------------

    /// Query the current power mode (`AT+CFUN?`).
    pub fn get_power_mode(&mut self) -> PowerMode {
        if self.send_command(commands::CFUN_QUERY).is_err() {
            return PowerMode::Error;
        }
        if self
            .read_frame(DEFAULT_TIMEOUT_MS, DEFAULT_CRLF_PAIRS)
            .is_err()
        {
            return PowerMode::Error;
        }
        if self.answer_contains_error() {
            return PowerMode::Error;
        }

        let Some(idx) = scan::find(&self.buffer, commands::CFUN_MARKER.as_bytes()) else {
            return PowerMode::Unknown;
        };
        match self.buffer.get(idx + commands::CFUN_MARKER.len()) {
            Some(b'0') => PowerMode::Minimum,
            Some(b'1') => PowerMode::Normal,
            Some(b'4') => PowerMode::Sleep,
            _ => PowerMode::Unknown,
        }
    }

    /// Switch the module to `mode` and verify the switch took effect.
    ///
    /// From `Sleep` or `Minimum` the only legal target is `Normal`; a
    /// direct transition between `Sleep` and `Minimum` fails without
    /// emitting any command. Returns `true` when a re-query reports the
    /// requested mode.
    pub fn set_power_mode(&mut self, mode: PowerMode) -> bool {
        if matches!(mode, PowerMode::Error | PowerMode::Unknown) {
            return false;
        }

        let current = self.get_power_mode();
        if matches!(current, PowerMode::Error | PowerMode::Unknown) {
            return false;
        }
        if current == mode {
            return true;
        }
        if matches!(current, PowerMode::Sleep | PowerMode::Minimum) && mode != PowerMode::Normal {
            return false;
        }

        let command = match mode {
            PowerMode::Minimum => commands::CFUN_MINIMUM,
            PowerMode::Sleep => commands::CFUN_SLEEP,
            _ => commands::CFUN_NORMAL,
        };
        if self.send_command(command).is_err() {
            return false;
        }

        // The module may restate its registration status or emit an OK on
        // its own schedule while switching; discard all of it.
        self.read_to_forget(POWER_SWITCH_SETTLE_MS);

        self.get_power_mode() == mode
    }

    /// Query the network registration state (`AT+CREG?`).
    pub fn get_registration_status(&mut self) -> NetworkRegistration {
        if self.send_command(commands::CREG_QUERY).is_err() {
            return NetworkRegistration::Error;
        }
        if self
            .read_frame(DEFAULT_TIMEOUT_MS, DEFAULT_CRLF_PAIRS)
            .is_err()
        {
            return NetworkRegistration::Error;
        }
        if self.answer_contains_error() {
            return NetworkRegistration::Error;
        }

        let Some(idx) = scan::find(&self.buffer, commands::CREG_MARKER.as_bytes()) else {
            return NetworkRegistration::Unknown;
        };
        // The answer is `+CREG: <n>,<stat>`; the registration state is the
        // second field.
        match self.buffer.get(idx + commands::CREG_MARKER.len() + 2) {
            Some(b'0') => NetworkRegistration::NotRegistered,
            Some(b'1') => NetworkRegistration::RegisteredHome,
            Some(b'2') => NetworkRegistration::Searching,
            Some(b'3') => NetworkRegistration::Denied,
            Some(b'5') => NetworkRegistration::RegisteredRoaming,
            _ => NetworkRegistration::Unknown,
        }
    }

    /// Query the received signal strength (`AT+CSQ`).
    ///
    /// Returns the RSSI indication in `[0, 31]`; 0 stands for "unknown or
    /// no signal" and is also returned for any answer that does not match
    /// the expected `+CSQ: <rssi>,<ber>` layout.
    pub fn get_signal(&mut self) -> u8 {
        if self.send_command(commands::CSQ).is_err() {
            return 0;
        }
        if self
            .read_frame(DEFAULT_TIMEOUT_MS, DEFAULT_CRLF_PAIRS)
            .is_err()
        {
            return 0;
        }

        // The frame must open with the command echo; anything else means
        // the link is out of sync.
        let Some(echo) = scan::find(&self.buffer, commands::CSQ.as_bytes()) else {
            return 0;
        };
        if echo != 0 {
            return 0;
        }

        let Some(comma) = scan::find_from(&self.buffer, b",", echo) else {
            return 0;
        };
        if comma < 2 {
            return 0;
        }

        let units = self.buffer[comma - 1];
        if !units.is_ascii_digit() {
            return 0;
        }
        let mut value = units - b'0';

        let tens = self.buffer[comma - 2];
        if tens != b' ' {
            if !tens.is_ascii_digit() {
                return 0;
            }
            // A third digit before the comma is not a conforming answer.
            if comma >= 3 && self.buffer[comma - 3].is_ascii_digit() {
                return 0;
            }
            value += (tens - b'0') * 10;
        }

        if value > 31 { 0 } else { value }
    }

    // ------------------------------------------------------------------
    // GPRS bearer
    // ------------------------------------------------------------------

    /// Configure the GPRS bearer with the operator `apn`.
    pub fn setup_gprs(&mut self, apn: &str) -> bool {
        if self
            .send_and_check(
                commands::SAPBR_CONTYPE_GPRS,
                GPRS_CONFIG_TIMEOUT_MS,
                commands::RSP_OK,
                DEFAULT_CRLF_PAIRS,
            )
            .is_err()
        {
            return false;
        }
        self.send_and_check_with(
            commands::SAPBR_APN,
            apn,
            GPRS_CONFIG_TIMEOUT_MS,
            commands::RSP_OK,
            DEFAULT_CRLF_PAIRS,
        )
        .is_ok()
    }

    /// Open the GPRS bearer.
    pub fn connect_gprs(&mut self) -> bool {
        self.send_and_check(
            commands::SAPBR_OPEN,
            GPRS_BEARER_TIMEOUT_MS,
            commands::RSP_OK,
            DEFAULT_CRLF_PAIRS,
        )
        .is_ok()
    }

    /// Close the GPRS bearer.
    pub fn disconnect_gprs(&mut self) -> bool {
        self.send_and_check(
            commands::SAPBR_CLOSE,
            GPRS_BEARER_TIMEOUT_MS,
            commands::RSP_OK,
            DEFAULT_CRLF_PAIRS,
        )
        .is_ok()
    }

    // ------------------------------------------------------------------
    // Received data accessors
    // ------------------------------------------------------------------

    /// Body bytes received by the most recent successful GET or POST.
    ///
    /// The content persists until the next GET or POST call, which clears
    /// and refills it.
    pub fn data_received(&self) -> &[u8] {
        &self.recv
    }

    /// Length of [`data_received`](Self::data_received), never larger than
    /// the `RECV` capacity.
    pub fn data_size_received(&self) -> usize {
        self.recv.len()
    }

    /// Raw text of the most recent response frame.
    ///
    /// Contents are unspecified after a failed read.
    pub fn last_response(&self) -> &[u8] {
        &self.buffer
    }

    // ------------------------------------------------------------------
    // Command/response engine
    // ------------------------------------------------------------------

    /// Emit a bare AT command.
    ///
    /// Flushes the outbound side, drains whatever the previous exchange
    /// left on the inbound side, then writes the command terminated by
    /// CRLF and flushes again. No response is read; pair with
    /// [`read_frame`](Self::read_frame).
    pub fn send_command(&mut self, command: &str) -> Result<(), Error> {
        self.serial.flush().map_err(|_| Error::WriteError)?;
        self.read_to_forget(DRAIN_TIMEOUT_MS);
        self.serial
            .write(command.as_bytes())
            .map_err(|_| Error::WriteError)?;
        self.serial.write(b"\r\n").map_err(|_| Error::WriteError)?;
        self.serial.flush().map_err(|_| Error::WriteError)
    }

    /// Emit an AT command followed by a parameter wrapped in double quotes.
    pub fn send_command_with(&mut self, command: &str, parameter: &str) -> Result<(), Error> {
        self.serial.flush().map_err(|_| Error::WriteError)?;
        self.read_to_forget(DRAIN_TIMEOUT_MS);
        self.serial
            .write(command.as_bytes())
            .map_err(|_| Error::WriteError)?;
        self.serial.write(b"\"").map_err(|_| Error::WriteError)?;
        self.serial
            .write(parameter.as_bytes())
            .map_err(|_| Error::WriteError)?;
        self.serial.write(b"\"").map_err(|_| Error::WriteError)?;
        self.serial.write(b"\r\n").map_err(|_| Error::WriteError)?;
        self.serial.flush().map_err(|_| Error::WriteError)
    }

    /// Read one response frame into the scratch buffer.
    ///
    /// The frame ends after `pairs` CRLF pairs, or early when the scratch
    /// buffer fills up; a full buffer is reported as success and the
    /// caller must treat the frame as valid but possibly incomplete.
    /// `Err(Timeout)` means neither condition was met within `timeout_ms`;
    /// the buffer then holds partial data and must not be trusted.
    pub fn read_frame(&mut self, timeout_ms: u32, pairs: u8) -> Result<(), Error> {
        self.buffer.clear();

        let mut seen_cr = false;
        let mut pairs_seen: u8 = 0;
        let started = self.clock.now_ms();

        loop {
            if self.serial.available() > 0 {
                let byte = self.serial.read_byte().map_err(|_| Error::ReadError)?;
                let _ = self.buffer.push(byte);

                match byte {
                    b'\r' => seen_cr = true,
                    b'\n' if seen_cr => {
                        pairs_seen += 1;
                        if pairs_seen == pairs {
                            return Ok(());
                        }
                    }
                    _ => seen_cr = false,
                }

                if self.buffer.is_full() {
                    return Ok(());
                }
            }

            if self.clock.now_ms().wrapping_sub(started) > u64::from(timeout_ms) {
                return Err(Error::Timeout);
            }
        }
    }

    /// Read and discard inbound bytes for the whole of `timeout_ms`.
    ///
    /// Exits early only when a scratch buffer's worth of bytes has been
    /// discarded. Used to clear unsolicited traffic between exchanges.
    pub fn read_to_forget(&mut self, timeout_ms: u32) {
        self.buffer.clear();

        let started = self.clock.now_ms();
        loop {
            if self.serial.available() > 0 {
                if let Ok(byte) = self.serial.read_byte() {
                    let _ = self.buffer.push(byte);
                    if self.buffer.is_full() {
                        return;
                    }
                }
            }
            if self.clock.now_ms().wrapping_sub(started) > u64::from(timeout_ms) {
                return;
            }
        }
    }

    /// Emit `command` and require `expected` in the response frame.
    pub fn send_and_check(
        &mut self,
        command: &str,
        timeout_ms: u32,
        expected: &str,
        pairs: u8,
    ) -> Result<(), Error> {
        self.send_command(command)?;
        self.expect_answer(timeout_ms, expected, pairs)
    }

    /// Emit `command` with a quoted parameter and require `expected` in the
    /// response frame.
    pub fn send_and_check_with(
        &mut self,
        command: &str,
        parameter: &str,
        timeout_ms: u32,
        expected: &str,
        pairs: u8,
    ) -> Result<(), Error> {
        self.send_command_with(command, parameter)?;
        self.expect_answer(timeout_ms, expected, pairs)
    }

    /// Read one frame and require `expected` somewhere in it.
    pub(crate) fn expect_answer(
        &mut self,
        timeout_ms: u32,
        expected: &str,
        pairs: u8,
    ) -> Result<(), Error> {
        self.read_frame(timeout_ms, pairs)?;
        if scan::find(&self.buffer, expected.as_bytes()).is_some() {
            Ok(())
        } else {
            Err(Error::UnexpectedResponse)
        }
    }

    /// True when the buffered answer embeds an `ERROR` token past the echo.
    fn answer_contains_error(&self) -> bool {
        matches!(
            scan::find(&self.buffer, commands::RSP_ERROR.as_bytes()),
            Some(idx) if idx > 0
        )
    }
}
