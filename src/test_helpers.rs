//! Scripted modem for unit tests.
use std::cell::RefCell;
use std::collections::VecDeque;
use std::string::String;
use std::vec::Vec;

use core::convert::Infallible;

use crate::client::Device;
use crate::command::clock::types::AlarmIndex;
use crate::command::sms::responses::Sms;
use crate::config::{ModemConfig, NoPin};
use crate::ingress::RxBuffer;

/// Records every command line written and answers each one by pushing the
/// next scripted reply into the receive buffer, as the receive interrupt
/// would. A line ends at `\r` or, for message bodies, at Ctrl-Z.
pub struct MockModem<'a, const N: usize> {
    rx: &'a RxBuffer<N>,
    replies: VecDeque<&'static [u8]>,
    current: Vec<u8>,
    pub written: Vec<String>,
}

impl<'a, const N: usize> MockModem<'a, N> {
    pub fn new(rx: &'a RxBuffer<N>, replies: &[&'static [u8]]) -> Self {
        Self {
            rx,
            replies: replies.iter().copied().collect(),
            current: Vec::new(),
            written: Vec::new(),
        }
    }

    fn end_of_line(&mut self, keep: Option<u8>) {
        let mut line = core::mem::take(&mut self.current);
        if line.first() == Some(&b'\n') {
            line.remove(0);
        }
        line.extend(keep);
        self.written.push(String::from_utf8_lossy(&line).into_owned());

        if let Some(reply) = self.replies.pop_front() {
            self.rx.push_slice(reply);
        }
    }
}

impl<const N: usize> embedded_io::ErrorType for MockModem<'_, N> {
    type Error = Infallible;
}

impl<const N: usize> embedded_io::Write for MockModem<'_, N> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        for &b in buf {
            match b {
                b'\r' => self.end_of_line(None),
                0x1A => self.end_of_line(Some(b)),
                _ => self.current.push(b),
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

pub struct TestConfig;

impl ModemConfig for TestConfig {
    type ResetPin = NoPin;

    fn reset_pin(&mut self) -> Option<&mut Self::ResetPin> {
        None
    }
}

pub type TestDevice<'a, const N: usize> = Device<'a, MockModem<'a, N>, TestConfig, N>;

pub fn device<'a, const N: usize>(
    rx: &'a RxBuffer<N>,
    replies: &[&'static [u8]],
) -> TestDevice<'a, N> {
    Device::new(MockModem::new(rx, replies), rx, TestConfig)
}

/// Marks text mode and SIM storage as selected.
pub fn ready_for_sms<const N: usize>(dev: &mut TestDevice<'_, N>) {
    dev.sms_setup.text_mode = true;
    dev.sms_setup.sim_storage = true;
}

pub fn arm<const N: usize>(dev: &mut TestDevice<'_, N>, index: u8) {
    dev.callbacks
        .arm(AlarmIndex::try_from(index).unwrap(), record_alarm);
}

thread_local! {
    static ALARMS: RefCell<Vec<u8>> = RefCell::new(Vec::new());
    static MESSAGES: RefCell<Vec<Sms>> = RefCell::new(Vec::new());
}

pub fn record_alarm(index: u8) {
    ALARMS.with(|a| a.borrow_mut().push(index));
}

pub fn take_alarms() -> Vec<u8> {
    ALARMS.with(|a| a.take())
}

pub fn record_sms(sms: Sms) {
    MESSAGES.with(|m| m.borrow_mut().push(sms));
}

pub fn take_sms() -> Vec<Sms> {
    MESSAGES.with(|m| m.take())
}

/// Command line as written to the modem, terminator included.
pub fn written<C: atat::AtatCmd>(cmd: &C) -> String {
    let mut buf = [0u8; crate::command::MAX_CMD_LEN];
    let len = cmd.write(&mut buf);
    String::from_utf8_lossy(&buf[..len]).into_owned()
}

/// Parses one information response line the way the engine hands it over.
pub fn parsed<C: atat::AtatCmd>(cmd: &C, line: &[u8]) -> Result<C::Response, atat::Error> {
    cmd.parse(Ok(line))
}
