//! Scripted serial link and clock shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;

use libgsm::transport::{Clock, SerialPort};

/// One scripted exchange: the exact bytes the driver is expected to flush,
/// and the bytes the fake module feeds back once they match.
#[derive(Debug)]
struct Exchange {
    expect: Vec<u8>,
    reply: Vec<u8>,
}

/// A fake SIM800L behind a serial link.
///
/// Commands are matched at flush time against a queue of scripted
/// exchanges; a mismatch or an unscripted command fails the test
/// immediately. Replies include the command echo, exactly as the module
/// produces them.
#[derive(Debug, Default)]
pub struct MockSerial {
    script: VecDeque<Exchange>,
    rx: VecDeque<u8>,
    tx: Vec<u8>,
}

impl MockSerial {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script an exchange. `written` is the full wire form of the command
    /// (including its CRLF terminator, or a bare payload for raw writes).
    pub fn expect(&mut self, written: &str, reply: &str) -> &mut Self {
        self.script.push_back(Exchange {
            expect: written.as_bytes().to_vec(),
            reply: reply.as_bytes().to_vec(),
        });
        self
    }

    /// Preload inbound bytes without scripting a command.
    pub fn push_response(&mut self, bytes: &str) {
        self.rx.extend(bytes.as_bytes());
    }

    /// Inbound bytes the driver has not consumed.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Assert that the whole script was consumed.
    pub fn assert_done(&self) {
        assert!(
            self.script.is_empty(),
            "{} scripted exchange(s) never happened",
            self.script.len()
        );
        assert!(
            self.tx.is_empty(),
            "unflushed outbound bytes: {:?}",
            String::from_utf8_lossy(&self.tx)
        );
    }
}

impl SerialPort for MockSerial {
    type Error = ();

    fn available(&mut self) -> usize {
        self.rx.len()
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        self.rx.pop_front().ok_or(())
    }

    fn write(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        self.tx.extend_from_slice(buf);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        if self.tx.is_empty() {
            return Ok(());
        }
        let exchange = self.script.pop_front().unwrap_or_else(|| {
            panic!(
                "unscripted command: {:?}",
                String::from_utf8_lossy(&self.tx)
            )
        });
        assert_eq!(
            String::from_utf8_lossy(&self.tx),
            String::from_utf8_lossy(&exchange.expect),
            "command mismatch"
        );
        self.tx.clear();
        self.rx.extend(exchange.reply.iter());
        Ok(())
    }
}

/// A clock advancing one millisecond per query, so timeout loops make
/// progress without real sleeping.
#[derive(Debug, Default)]
pub struct MockClock {
    now: u64,
}

impl Clock for MockClock {
    fn now_ms(&mut self) -> u64 {
        self.now += 1;
        self.now
    }
}
