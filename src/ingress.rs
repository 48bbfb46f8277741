//! Receive framer shared between the UART receive interrupt and the
//! foreground command engine.
//!
//! The interrupt side only ever calls [`RxBuffer::push_byte`]; the foreground
//! side pulls complete `\r\n` terminated lines out with
//! [`RxBuffer::next_line`]. Both sides go through a critical section, held for
//! a constant time on push and for at most one line copy on pull.

use core::cell::RefCell;
use core::ops::Deref;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::{Deque, Vec};

/// Longest line handed to the foreground, excluding the terminator. Longer
/// lines are truncated.
pub const MAX_LINE_LEN: usize = 256;

/// One line received from the modem, without its `\r\n` terminator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line(Vec<u8, MAX_LINE_LEN>);

impl Line {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let len = bytes.len().min(MAX_LINE_LEN);
        let mut inner = Vec::new();
        // Cannot fail, `len` is clamped to the capacity
        let _ = inner.extend_from_slice(&bytes[..len]);
        Self(inner)
    }

    /// The line with surrounding ASCII whitespace removed.
    pub fn trimmed(&self) -> &[u8] {
        trim(&self.0)
    }

    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.0).ok()
    }
}

impl Deref for Line {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub(crate) fn trim(mut bytes: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = bytes {
        if !first.is_ascii_whitespace() {
            break;
        }
        bytes = rest;
    }
    while let [rest @ .., last] = bytes {
        if !last.is_ascii_whitespace() {
            break;
        }
        bytes = rest;
    }
    bytes
}

/// What the engine pulls out of the framer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Frame {
    Line(Line),
    /// The `> ` data prompt, which the modem sends without a terminator.
    Prompt,
}

struct Ring<const N: usize> {
    bytes: Deque<u8, N>,
    /// Number of complete `\r\n` terminators currently buffered.
    terminators: usize,
    /// Sticky until taken by the consumer.
    overrun: bool,
    /// Oldest buffered line lost its head to an eviction and must be dropped
    /// once its terminator shows up.
    resync: bool,
}

impl<const N: usize> Ring<N> {
    const fn new() -> Self {
        Self {
            bytes: Deque::new(),
            terminators: 0,
            overrun: false,
            resync: false,
        }
    }

    fn push(&mut self, byte: u8) {
        if self.bytes.is_full() {
            self.evict();
        }

        if byte == b'\n' && self.bytes.back() == Some(&b'\r') {
            self.terminators += 1;
        }

        // Room was made above
        let _ = self.bytes.push_back(byte);
    }

    fn evict(&mut self) {
        self.overrun = true;
        match self.bytes.pop_front() {
            Some(b'\r') if self.bytes.front() == Some(&b'\n') => {
                // The whole terminator goes, the next line starts clean
                self.bytes.pop_front();
                self.terminators -= 1;
                self.resync = false;
            }
            Some(_) => self.resync = true,
            None => {}
        }
    }

    /// Removes everything up to and including the first terminator and
    /// returns the part before it.
    fn pop_line(&mut self) -> Option<Line> {
        if self.terminators == 0 {
            return None;
        }

        let mut line = Vec::<u8, MAX_LINE_LEN>::new();
        let mut prev = 0u8;
        while let Some(b) = self.bytes.pop_front() {
            if prev == b'\r' && b == b'\n' {
                break;
            }
            if prev == b'\r' {
                line.push(b'\r').ok();
            }
            if b != b'\r' {
                line.push(b).ok();
            }
            prev = b;
        }
        self.terminators -= 1;

        Some(Line(line))
    }

    fn pop_frame(&mut self, prompt: bool) -> Option<Frame> {
        if self.resync {
            self.pop_line()?;
            self.resync = false;
        }

        if prompt && self.bytes.front() == Some(&b'>') {
            self.bytes.pop_front();
            if self.bytes.front() == Some(&b' ') {
                self.bytes.pop_front();
            }
            return Some(Frame::Prompt);
        }

        self.pop_line().map(Frame::Line)
    }

    fn clear(&mut self) {
        self.bytes.clear();
        self.terminators = 0;
        self.resync = false;
    }
}

/// Bounded single-producer/single-consumer byte channel from the receive
/// interrupt to the [`Device`](crate::Device).
///
/// `RxBuffer::new` is `const`, so the buffer can be placed in a `static`
/// and reached from the interrupt handler:
///
/// ```ignore
/// static RX: RxBuffer<512> = RxBuffer::new();
///
/// #[interrupt]
/// fn USART1() {
///     RX.push_byte(read_data_register());
/// }
/// ```
pub struct RxBuffer<const N: usize> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Ring<N>>>,
}

impl<const N: usize> Default for RxBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RxBuffer<N> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Ring::new())),
        }
    }

    /// Appends one received byte. Safe to call from interrupt context, never
    /// blocks. When full, the oldest unread byte is evicted and an overrun is
    /// recorded.
    pub fn push_byte(&self, byte: u8) {
        self.inner.lock(|r| r.borrow_mut().push(byte));
    }

    /// Appends a run of received bytes, e.g. from a DMA half-transfer.
    pub fn push_slice(&self, bytes: &[u8]) {
        self.inner.lock(|r| {
            let mut ring = r.borrow_mut();
            bytes.iter().for_each(|&b| ring.push(b));
        });
    }

    /// Oldest complete line, if any. A line still being received is never
    /// returned.
    pub fn next_line(&self) -> Option<Line> {
        loop {
            match self.next_frame(false)? {
                Frame::Line(line) => return Some(line),
                Frame::Prompt => continue,
            }
        }
    }

    pub(crate) fn next_frame(&self, prompt: bool) -> Option<Frame> {
        self.inner.lock(|r| r.borrow_mut().pop_frame(prompt))
    }

    /// Returns and clears the overrun flag.
    pub fn take_overrun(&self) -> bool {
        self.inner
            .lock(|r| core::mem::replace(&mut r.borrow_mut().overrun, false))
    }

    /// Number of buffered, not yet consumed bytes.
    pub fn len(&self) -> usize {
        self.inner.lock(|r| r.borrow().bytes.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Drops everything buffered. The overrun flag is left untouched.
    pub fn clear(&self) {
        self.inner.lock(|r| r.borrow_mut().clear());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line<const N: usize>(rx: &RxBuffer<N>) -> Option<std::string::String> {
        rx.next_line()
            .map(|l| std::string::String::from_utf8(l.to_vec()).unwrap())
    }

    #[test]
    fn partial_line_is_not_exposed() {
        let rx = RxBuffer::<64>::new();
        rx.push_slice(b"+CPIN: RE");
        assert_eq!(line(&rx), None);

        rx.push_slice(b"ADY\r");
        assert_eq!(line(&rx), None);

        rx.push_byte(b'\n');
        assert_eq!(line(&rx).as_deref(), Some("+CPIN: READY"));
        assert!(rx.is_empty());
    }

    #[test]
    fn lines_come_out_in_order() {
        let rx = RxBuffer::<64>::new();
        rx.push_slice(b"\r\nfirst\r\nsecond\r\n\r\nOK\r\n");

        assert_eq!(line(&rx).as_deref(), Some(""));
        assert_eq!(line(&rx).as_deref(), Some("first"));
        assert_eq!(line(&rx).as_deref(), Some("second"));
        assert_eq!(line(&rx).as_deref(), Some(""));
        assert_eq!(line(&rx).as_deref(), Some("OK"));
        assert_eq!(line(&rx), None);
    }

    #[test]
    fn bare_carriage_return_stays_in_line() {
        let rx = RxBuffer::<64>::new();
        rx.push_slice(b"a\rb\r\n");
        assert_eq!(line(&rx).as_deref(), Some("a\rb"));
    }

    #[test]
    fn overrun_drops_only_the_damaged_line() {
        let rx = RxBuffer::<16>::new();
        // 12 bytes of an unterminated line, then 10 more bytes overflow it
        rx.push_slice(b"AAAAAAAAAAAA");
        rx.push_slice(b"AA\r\nOK\r\n");
        assert!(rx.take_overrun());
        assert!(!rx.take_overrun());

        // The damaged `AAA...` line is gone, the next one is intact
        assert_eq!(line(&rx).as_deref(), Some("OK"));
        assert_eq!(line(&rx), None);

        rx.push_slice(b"+CALV: 2\r\n");
        assert_eq!(line(&rx).as_deref(), Some("+CALV: 2"));
    }

    #[test]
    fn overrun_on_line_boundary_keeps_next_line() {
        let rx = RxBuffer::<8>::new();
        rx.push_slice(b"ab\r\ncd\r\n");
        // Evicts `a`, `b`, then the `\r\n` pair in one go
        rx.push_slice(b"ef\r");
        assert!(rx.take_overrun());
        assert_eq!(line(&rx).as_deref(), Some("cd"));
        rx.push_byte(b'\n');
        assert_eq!(line(&rx).as_deref(), Some("ef"));
    }

    #[test]
    fn sustained_overflow_does_not_panic() {
        let rx = RxBuffer::<16>::new();
        for i in 0..1000u32 {
            rx.push_byte(b'0' + (i % 10) as u8);
        }
        assert!(rx.take_overrun());
        assert_eq!(rx.len(), 16);
        assert_eq!(line(&rx), None);

        rx.push_slice(b"\r\nOK\r\n");
        // The first terminator closes the damaged line
        assert_eq!(line(&rx).as_deref(), Some("OK"));
    }

    #[test]
    fn long_line_is_truncated() {
        let rx = RxBuffer::<512>::new();
        for _ in 0..300 {
            rx.push_byte(b'x');
        }
        rx.push_slice(b"\r\n");
        let l = rx.next_line().unwrap();
        assert_eq!(l.len(), MAX_LINE_LEN);
    }

    #[test]
    fn prompt_only_when_asked_for() {
        let rx = RxBuffer::<64>::new();
        rx.push_slice(b"\r\n> ");

        assert_eq!(rx.next_frame(true), Some(Frame::Line(Line::default())));
        assert_eq!(rx.next_frame(false), None);
        assert_eq!(rx.next_frame(true), Some(Frame::Prompt));
        assert!(rx.is_empty());
    }
}
