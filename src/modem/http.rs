//! HTTP/S session state machine on top of the AT engine.
//!
//! A GET or POST runs one session through the module's HTTP application
//! layer: initiate (open the session, bind the bearer, set the URL and SSL
//! mode), configure (POST only: content type and payload upload), action
//! (fire the request and wait for the asynchronous completion
//! notification), body transfer (status 200 only), and terminate. Each
//! step is attempted exactly once; the first failing step aborts the
//! session with its own [`HttpError`] variant. Once the initiate step has
//! succeeded the session is always terminated, whatever happened in
//! between.

use core::fmt::Write as _;

use heapless::String;

use crate::modem::driver::Sim800l;
use crate::modem::error::Error;
use crate::modem::{DEFAULT_CRLF_PAIRS, DEFAULT_TIMEOUT_MS, DRAIN_TIMEOUT_MS, commands, scan};
use crate::transport::{Clock, SerialPort};

/// CRLF pairs terminating the `+HTTPREAD` announcement: the command echo
/// line plus the length line, with the body bytes following immediately.
const HTTP_READ_PAIRS: u8 = 2;

/// A failed step of an HTTP session.
///
/// [`code`](HttpError::code) maps each variant onto the driver's legacy
/// numeric code space, disjoint from the HTTP status range returned on
/// success.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum HttpError {
    /// The session could not be opened (701).
    InitFailed,
    /// A session parameter was rejected: bearer, URL, SSL mode or content
    /// type (702).
    SetupFailed,
    /// The GET/POST action was rejected, or its completion notification
    /// was malformed (703).
    ActionFailed,
    /// The response body could not be read back from the module (705).
    ReadFailed,
    /// The session could not be closed (706).
    TerminateFailed,
    /// The module refused the POST payload upload (707).
    UploadFailed,
    /// The server did not answer within the caller's read timeout (408).
    ServerTimeout,
}

impl HttpError {
    /// The numeric wire-level code of this failure.
    pub fn code(self) -> u16 {
        match self {
            HttpError::InitFailed => 701,
            HttpError::SetupFailed => 702,
            HttpError::ActionFailed => 703,
            HttpError::ReadFailed => 705,
            HttpError::TerminateFailed => 706,
            HttpError::UploadFailed => 707,
            HttpError::ServerTimeout => 408,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for HttpError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            HttpError::InitFailed => defmt::write!(f, "InitFailed"),
            HttpError::SetupFailed => defmt::write!(f, "SetupFailed"),
            HttpError::ActionFailed => defmt::write!(f, "ActionFailed"),
            HttpError::ReadFailed => defmt::write!(f, "ReadFailed"),
            HttpError::TerminateFailed => defmt::write!(f, "TerminateFailed"),
            HttpError::UploadFailed => defmt::write!(f, "UploadFailed"),
            HttpError::ServerTimeout => defmt::write!(f, "ServerTimeout"),
        }
    }
}

#[derive(Clone, Copy)]
enum Action {
    Get,
    Post,
}

impl Action {
    fn command(self) -> &'static str {
        match self {
            Action::Get => commands::HTTP_ACTION_GET,
            Action::Post => commands::HTTP_ACTION_POST,
        }
    }

    /// Marker opening the asynchronous completion notification.
    fn marker(self) -> &'static str {
        match self {
            Action::Get => commands::ACTION_GET_MARKER,
            Action::Post => commands::ACTION_POST_MARKER,
        }
    }
}

impl<S, C, const BUF: usize, const RECV: usize> Sim800l<S, C, BUF, RECV>
where
    S: SerialPort,
    C: Clock,
{
    /// Perform an HTTP/S GET on `url`.
    ///
    /// `server_read_timeout_ms` bounds the wait for the server's answer
    /// after the action has been accepted; it is distinct from the
    /// AT-handshake timeout applied to each protocol step. On success the
    /// HTTP status is returned and, for status 200, the body is available
    /// through [`data_received`](Self::data_received), truncated to the
    /// `RECV` capacity when the server sent more.
    pub fn do_get(&mut self, url: &str, server_read_timeout_ms: u32) -> Result<u16, HttpError> {
        self.recv.clear();
        self.initiate_http(url)?;

        let outcome = self.run_action(Action::Get, server_read_timeout_ms);
        let terminated = self.terminate_http();

        match outcome {
            Ok(status) => {
                terminated?;
                Ok(status)
            }
            Err(err) => Err(err),
        }
    }

    /// Perform an HTTP/S POST of `payload` to `url`.
    ///
    /// `content_type` is announced to the server;
    /// `client_write_timeout_ms` is the window the module grants for the
    /// payload upload, and `server_read_timeout_ms` bounds the wait for
    /// the server's answer as in [`do_get`](Self::do_get).
    pub fn do_post(
        &mut self,
        url: &str,
        content_type: &str,
        payload: &str,
        client_write_timeout_ms: u32,
        server_read_timeout_ms: u32,
    ) -> Result<u16, HttpError> {
        self.recv.clear();
        self.initiate_http(url)?;

        let outcome = self
            .upload_payload(content_type, payload, client_write_timeout_ms)
            .and_then(|()| self.run_action(Action::Post, server_read_timeout_ms));
        let terminated = self.terminate_http();

        match outcome {
            Ok(status) => {
                terminated?;
                Ok(status)
            }
            Err(err) => Err(err),
        }
    }

    /// Open the session, bind the bearer, set the URL and the SSL mode.
    fn initiate_http(&mut self, url: &str) -> Result<(), HttpError> {
        self.check_ok(commands::HTTP_INIT)
            .map_err(|_| HttpError::InitFailed)?;
        self.check_ok(commands::HTTP_PARA_CID)
            .map_err(|_| HttpError::SetupFailed)?;
        self.send_and_check_with(
            commands::HTTP_PARA_URL,
            url,
            DEFAULT_TIMEOUT_MS,
            commands::RSP_OK,
            DEFAULT_CRLF_PAIRS,
        )
        .map_err(|_| HttpError::SetupFailed)?;

        let ssl = scan::find(url.as_bytes(), commands::HTTPS_SCHEME.as_bytes()) == Some(0);
        let select = if ssl {
            commands::HTTP_SSL_ENABLE
        } else {
            commands::HTTP_SSL_DISABLE
        };
        self.check_ok(select).map_err(|_| HttpError::SetupFailed)
    }

    /// Close the session.
    fn terminate_http(&mut self) -> Result<(), HttpError> {
        self.check_ok(commands::HTTP_TERM)
            .map_err(|_| HttpError::TerminateFailed)
    }

    /// Announce the content type, then push the fixed-length payload after
    /// the module's `DOWNLOAD` prompt.
    fn upload_payload(
        &mut self,
        content_type: &str,
        payload: &str,
        client_write_timeout_ms: u32,
    ) -> Result<(), HttpError> {
        self.send_and_check_with(
            commands::HTTP_PARA_CONTENT,
            content_type,
            DEFAULT_TIMEOUT_MS,
            commands::RSP_OK,
            DEFAULT_CRLF_PAIRS,
        )
        .map_err(|_| HttpError::SetupFailed)?;

        let mut announce: String<48> = String::new();
        write!(
            announce,
            "AT+HTTPDATA={},{}",
            payload.len(),
            client_write_timeout_ms
        )
        .map_err(|_| HttpError::UploadFailed)?;
        self.send_and_check(
            &announce,
            DEFAULT_TIMEOUT_MS,
            commands::RSP_DOWNLOAD,
            DEFAULT_CRLF_PAIRS,
        )
        .map_err(|_| HttpError::UploadFailed)?;

        self.serial.flush().map_err(|_| HttpError::UploadFailed)?;
        self.read_to_forget(DRAIN_TIMEOUT_MS);
        self.serial
            .write(payload.as_bytes())
            .map_err(|_| HttpError::UploadFailed)?;
        self.serial.flush().map_err(|_| HttpError::UploadFailed)
    }

    /// Fire the action, wait for the completion notification, parse the
    /// status and transfer the body when the server answered 200.
    fn run_action(&mut self, action: Action, server_read_timeout_ms: u32) -> Result<u16, HttpError> {
        self.check_ok(action.command())
            .map_err(|_| HttpError::ActionFailed)?;

        // The completion notification arrives on the server's schedule,
        // bounded only by the caller's read timeout.
        self.read_frame(server_read_timeout_ms, DEFAULT_CRLF_PAIRS)
            .map_err(|_| HttpError::ServerTimeout)?;

        let marker = action.marker();
        let Some(idx) = scan::find(&self.buffer, marker.as_bytes()) else {
            return Err(HttpError::ActionFailed);
        };

        // `+HTTPACTION: <method>,<status>,<length>`: three status digits
        // directly after the marker, the length run one byte past the
        // comma that follows them.
        let status_at = idx + marker.len();
        let status = three_digit_status(&self.buffer, status_at);

        if status == 200 {
            let announced = decimal_run(&self.buffer, status_at + 4);
            self.read_http_body(announced)?;
        }

        Ok(status)
    }

    /// Transfer `announced` body bytes into the receive buffer.
    ///
    /// CR and LF bytes inside the body region are module framing, not
    /// payload, and do not count toward the transfer. Bytes announced
    /// beyond the `RECV` capacity are read and discarded so the closing
    /// `OK` is the next thing on the link.
    fn read_http_body(&mut self, announced: usize) -> Result<(), HttpError> {
        self.send_command(commands::HTTP_READ)
            .map_err(|_| HttpError::ReadFailed)?;
        self.expect_answer(DEFAULT_TIMEOUT_MS, commands::RSP_HTTP_READ, HTTP_READ_PAIRS)
            .map_err(|_| HttpError::ReadFailed)?;

        let wanted = announced.min(RECV);
        while self.recv.len() < wanted {
            let byte = self.next_body_byte()?;
            if byte != b'\r' && byte != b'\n' {
                let _ = self.recv.push(byte);
            }
        }

        let mut excess = announced - wanted;
        while excess > 0 {
            let byte = self.next_body_byte()?;
            if byte != b'\r' && byte != b'\n' {
                excess -= 1;
            }
        }

        self.expect_answer(DEFAULT_TIMEOUT_MS, commands::RSP_OK, DEFAULT_CRLF_PAIRS)
            .map_err(|_| HttpError::ReadFailed)
    }

    /// Wait for the next raw body byte, bounded by the default exchange
    /// timeout.
    fn next_body_byte(&mut self) -> Result<u8, HttpError> {
        let started = self.clock.now_ms();
        loop {
            if self.serial.available() > 0 {
                return self.serial.read_byte().map_err(|_| HttpError::ReadFailed);
            }
            if self.clock.now_ms().wrapping_sub(started) > u64::from(DEFAULT_TIMEOUT_MS) {
                return Err(HttpError::ReadFailed);
            }
        }
    }

    fn check_ok(&mut self, command: &str) -> Result<(), Error> {
        self.send_and_check(
            command,
            DEFAULT_TIMEOUT_MS,
            commands::RSP_OK,
            DEFAULT_CRLF_PAIRS,
        )
    }
}

/// Parse exactly three ASCII digits at `at` into a status code.
///
/// A missing or non-digit byte yields 0, never an error.
fn three_digit_status(buffer: &[u8], at: usize) -> u16 {
    let mut status: u16 = 0;
    for i in 0..3 {
        match buffer.get(at + i) {
            Some(d) if d.is_ascii_digit() => status = status * 10 + u16::from(d - b'0'),
            _ => return 0,
        }
    }
    status
}

/// Parse a decimal digit run starting at `at`, saturating on overflow.
///
/// An empty run yields 0.
fn decimal_run(buffer: &[u8], at: usize) -> usize {
    let mut value: usize = 0;
    let mut i = at;
    while let Some(&d) = buffer.get(i) {
        if !d.is_ascii_digit() {
            break;
        }
        value = value
            .saturating_mul(10)
            .saturating_add(usize::from(d - b'0'));
        i += 1;
    }
    value
}
