use atat::AtatCmd;
use embassy_time::{block_for, Duration, Instant};
use embedded_hal::digital::OutputPin;
use embedded_io::Write;
use heapless::Vec;

use crate::command::control::types::{Echo, TerminationErrorMode};
use crate::command::control::{SetEcho, SetReportMobileTerminationError};
use crate::command::{
    is_response_to, response_name, Pattern, AT, ERROR_PATTERNS, MAX_CMD_LEN,
};
use crate::config::ModemConfig;
use crate::error::{Error, ModemError};
use crate::fmt::Bytes;
use crate::ingress::{trim, Frame, Line, RxBuffer};
use crate::module_timing::{autosense_interval, boot_time, reset_time};
use crate::urc_handler::Callbacks;

/// Most payload lines kept by [`Device::execute`].
/// Further lines are logged and dropped.
pub const MAX_PAYLOAD_LINES: usize = 8;

/// Most error patterns a single command may wait for.
pub const MAX_ERROR_PATTERNS: usize = 4;

const CTRL_Z: u8 = 0x1A;
const ESC: u8 = 0x1B;

/// Terminal line of every typed command.
const SUCCESS: Pattern = Pattern::Exact("OK");

/// State of the one command awaiting its terminal line.
struct PendingCommand {
    success: Pattern,
    errors: Vec<Pattern, MAX_ERROR_PATTERNS>,
    deadline: Instant,
    overrun: bool,
}

impl PendingCommand {
    fn new(success: Pattern, errors: &[Pattern], timeout: Duration) -> Result<Self, Error> {
        Ok(Self {
            success,
            errors: Vec::from_slice(errors).map_err(|_| Error::InvalidArgument)?,
            deadline: Instant::now().checked_add(timeout).unwrap_or(Instant::MAX),
            overrun: false,
        })
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

/// Outcome of feeding one line to the pending command.
enum Step {
    Continue,
    Done(Result<(), Error>),
}

/// Whether text mode and SIM storage have been selected since the last reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SmsSetup {
    pub(crate) text_mode: bool,
    pub(crate) sim_storage: bool,
}

impl SmsSetup {
    pub(crate) fn is_ready(&self) -> bool {
        self.text_mode && self.sim_storage
    }
}

/// Handle to one SIM800 modem.
///
/// Owns the write half of the serial link and borrows the [`RxBuffer`]
/// filled by the receive interrupt. Every operation blocks the caller until
/// the modem answered or the command's timeout elapsed, one command at a
/// time.
pub struct Device<'a, T: Write, C: ModemConfig, const N: usize> {
    pub(crate) transport: T,
    pub(crate) rx: &'a RxBuffer<N>,
    pub(crate) config: C,
    pending: Option<PendingCommand>,
    pub(crate) callbacks: Callbacks,
    pub(crate) sms_setup: SmsSetup,
}

impl<'a, T: Write, C: ModemConfig, const N: usize> Device<'a, T, C, N> {
    pub fn new(transport: T, rx: &'a RxBuffer<N>, config: C) -> Self {
        Self {
            transport,
            rx,
            config,
            pending: None,
            callbacks: Callbacks::new(),
            sms_setup: SmsSetup::default(),
        }
    }

    /// Gives back the transport and the configuration.
    pub fn release(self) -> (T, C) {
        (self.transport, self.config)
    }

    /// Waits for the modem to answer `AT` and applies echo and error
    /// reporting settings from the configuration.
    pub fn init(&mut self) -> Result<(), Error> {
        debug!("Initializing module");
        self.autosense()?;

        self.send(&SetEcho {
            enabled: if C::ECHO { Echo::Enable } else { Echo::Disable },
        })?;
        self.send(&SetReportMobileTerminationError {
            n: if C::VERBOSE_ERRORS {
                TerminationErrorMode::Enabled
            } else {
                TerminationErrorMode::Disabled
            },
        })?;

        Ok(())
    }

    fn autosense(&mut self) -> Result<(), Error> {
        let mut last = Error::Timeout;
        for attempt in 0..C::AUTOSENSE_ATTEMPTS {
            match self.send(&AT) {
                Ok(_) => return Ok(()),
                Err(e) => {
                    debug!("Autosense attempt {} failed: {:?}", attempt, e);
                    last = e;
                }
            }
            block_for(autosense_interval());
        }
        warn!("Modem did not answer AT");
        Err(last)
    }

    /// Reset the module by driving its `RST` pin low, then drop everything
    /// received so far.
    ///
    /// Text mode and message storage must be selected again afterwards.
    pub fn reset(&mut self) -> Result<(), Error> {
        warn!("Hard resetting SIM800 module");
        if let Some(pin) = self.config.reset_pin() {
            pin.set_low().map_err(|_| Error::IoPin)?;
            block_for(reset_time());
            pin.set_high().map_err(|_| Error::IoPin)?;
            block_for(boot_time());
        } else {
            warn!("No reset pin configured");
        }

        self.rx.clear();
        self.rx.take_overrun();
        self.sms_setup = SmsSetup::default();
        Ok(())
    }

    /// `true` while a command awaits its terminal line.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Handles lines received while no command is outstanding, dispatching
    /// notifications to the registered callbacks. Call it regularly, e.g.
    /// from the main loop after the receive interrupt fired.
    ///
    /// Returns the number of notifications handled, or `BufferOverrun` if
    /// received bytes were lost since the last call.
    pub fn poll(&mut self) -> Result<usize, Error> {
        let mut overrun = self.rx.take_overrun();
        let mut handled = 0;

        while let Some(line) = self.rx.next_line() {
            trace!("Idle line: {:?}", Bytes(&line));
            if line.trimmed().is_empty() {
                continue;
            }
            if self.classify_and_dispatch(&line) {
                handled += 1;
            } else {
                debug!("Ignoring unsolicited line: {:?}", Bytes(&line));
            }
        }
        self.deliver_deferred();

        overrun |= self.rx.take_overrun();
        if overrun {
            warn!("Receive buffer overrun while idle");
            return Err(Error::BufferOverrun);
        }
        Ok(handled)
    }

    /// Sends `command` and waits for a line matching `success` or one of
    /// `errors`, returning the payload lines in between.
    pub fn execute(
        &mut self,
        command: &str,
        success: Pattern,
        errors: &[Pattern],
        timeout: Duration,
    ) -> Result<Vec<Line, MAX_PAYLOAD_LINES>, Error> {
        let mut payload = Vec::new();
        let res = self.transact(
            command.as_bytes(),
            b"\r\n",
            None,
            success,
            errors,
            timeout,
            &mut |line: &Line| {
                collect(&mut payload, line);
                false
            },
        );
        self.deliver_deferred();
        res.map(|_| payload)
    }

    /// Sends a typed command and parses its response.
    ///
    /// The response is read from the payload line carrying the command's
    /// name, e.g. `+CCLK:` for `AT+CCLK?`. Other payload lines, like a late
    /// `Call Ready`, are logged and skipped.
    pub fn send<Cmd: AtatCmd>(&mut self, cmd: &Cmd) -> Result<Cmd::Response, Error> {
        let res = self.request(cmd, None);
        self.deliver_deferred();
        res
    }

    /// Sends a command answered with the `> ` prompt, then `data` closed
    /// with Ctrl-Z.
    pub(crate) fn send_data<Cmd: AtatCmd>(
        &mut self,
        cmd: &Cmd,
        data: &[u8],
    ) -> Result<Cmd::Response, Error> {
        let res = self.request(cmd, Some(data));
        self.deliver_deferred();
        res
    }

    fn request<Cmd: AtatCmd>(
        &mut self,
        cmd: &Cmd,
        data: Option<&[u8]>,
    ) -> Result<Cmd::Response, Error> {
        let mut buf = [0u8; MAX_CMD_LEN];
        let command = encode(cmd, &mut buf)?;
        let name = response_name(command);

        let mut response: Option<Line> = None;
        self.transact(
            command,
            &[],
            data,
            SUCCESS,
            ERROR_PATTERNS,
            timeout_of::<Cmd>(),
            &mut |line: &Line| {
                if response.is_none() && is_response_to(name, line) {
                    response = Some(line.clone());
                } else {
                    debug!("Skipping payload line: {:?}", Bytes(line));
                }
                false
            },
        )?;

        let line = response.as_ref().map_or(&[][..], |l| l.trimmed());
        cmd.parse(Ok(line)).map_err(|e| {
            warn!("Unparsable response: {:?}", Bytes(line));
            Error::from(e)
        })
    }

    /// Sends a typed command and hands each payload line to `on_payload`.
    /// `on_payload` returns `true` if the following line is a message body.
    pub(crate) fn send_streaming<Cmd: AtatCmd>(
        &mut self,
        cmd: &Cmd,
        on_payload: &mut dyn FnMut(&Line) -> bool,
    ) -> Result<(), Error> {
        let mut buf = [0u8; MAX_CMD_LEN];
        let command = encode(cmd, &mut buf)?;
        self.transact(
            command,
            &[],
            None,
            SUCCESS,
            ERROR_PATTERNS,
            timeout_of::<Cmd>(),
            on_payload,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn transact(
        &mut self,
        command: &[u8],
        terminator: &[u8],
        data: Option<&[u8]>,
        success: Pattern,
        errors: &[Pattern],
        timeout: Duration,
        on_payload: &mut dyn FnMut(&Line) -> bool,
    ) -> Result<(), Error> {
        if self.pending.is_some() {
            return Err(Error::Busy);
        }
        self.pending = Some(PendingCommand::new(success, errors, timeout)?);

        let res = self.run_pending(command, terminator, data, on_payload);
        self.pending = None;

        if let Err(e) = res {
            warn!("Command {:?} failed: {:?}", Bytes(trim(command)), e);
        }
        res
    }

    fn run_pending(
        &mut self,
        command: &[u8],
        terminator: &[u8],
        data: Option<&[u8]>,
        on_payload: &mut dyn FnMut(&Line) -> bool,
    ) -> Result<(), Error> {
        debug!("Sending command: {:?}", Bytes(trim(command)));
        self.write_all(command)?;
        self.write_all(terminator)?;

        if let Some(data) = data {
            if let Err(e) = self.wait_prompt(command) {
                // Leaves input mode if the prompt came late
                self.write_all(&[ESC]).ok();
                return Err(e);
            }
            trace!("Sending data: {:?}", Bytes(data));
            self.write_all(data)?;
            self.write_all(&[CTRL_Z])?;
        }

        self.wait_terminal(command, on_payload)
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Error> {
        if bytes.is_empty() {
            return Ok(());
        }
        self.transport.write_all(bytes).map_err(|_| Error::Write)?;
        self.transport.flush().map_err(|_| Error::Write)
    }

    fn wait_prompt(&mut self, command: &[u8]) -> Result<(), Error> {
        loop {
            // Checked before draining, lines that already arrived still count
            let expired = self.pending_expired();
            while let Some(frame) = self.rx.next_frame(true) {
                match frame {
                    Frame::Prompt => return Ok(()),
                    Frame::Line(line) => {
                        match self.step(&line, command, &mut false, &mut |_: &Line| false) {
                            Step::Continue => {}
                            Step::Done(Ok(())) => return Err(Error::MalformedResponse),
                            Step::Done(Err(e)) => return Err(e),
                        }
                    }
                }
            }
            if expired {
                return Err(Error::Timeout);
            }
            core::hint::spin_loop();
        }
    }

    fn wait_terminal(
        &mut self,
        command: &[u8],
        on_payload: &mut dyn FnMut(&Line) -> bool,
    ) -> Result<(), Error> {
        let mut raw_next = false;
        loop {
            let expired = self.pending_expired();
            while let Some(line) = self.rx.next_line() {
                if let Step::Done(res) = self.step(&line, command, &mut raw_next, on_payload) {
                    return res;
                }
            }
            if expired {
                return Err(Error::Timeout);
            }
            core::hint::spin_loop();
        }
    }

    fn pending_expired(&mut self) -> bool {
        let overrun = self.rx.take_overrun();
        match self.pending.as_mut() {
            Some(pending) => {
                if overrun {
                    warn!("Receive buffer overrun during command");
                    pending.overrun = true;
                }
                pending.is_expired()
            }
            None => true,
        }
    }

    /// Classifies one line received while a command is pending.
    fn step(
        &mut self,
        line: &Line,
        command: &[u8],
        raw_next: &mut bool,
        on_payload: &mut dyn FnMut(&Line) -> bool,
    ) -> Step {
        trace!("Received line: {:?}", Bytes(line));

        if core::mem::take(raw_next) {
            // A body line never announces another body
            on_payload(line);
            return Step::Continue;
        }

        let trimmed = line.trimmed();
        if trimmed.is_empty() || trimmed == trim(command) {
            return Step::Continue;
        }

        let Some(pending) = self.pending.as_ref() else {
            return Step::Done(Err(Error::Timeout));
        };
        if pending.success.matches(trimmed) {
            return Step::Done(if pending.overrun {
                Err(Error::BufferOverrun)
            } else {
                Ok(())
            });
        }
        if pending.errors.iter().any(|p| p.matches(trimmed)) {
            let reason = core::str::from_utf8(trimmed)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(ModemError::Generic);
            return Step::Done(Err(Error::ModemRejected(reason)));
        }

        if !self.classify_and_dispatch(line) {
            *raw_next = on_payload(line);
        }
        Step::Continue
    }
}

fn encode<'b, Cmd: AtatCmd>(cmd: &Cmd, buf: &'b mut [u8; MAX_CMD_LEN]) -> Result<&'b [u8], Error> {
    if Cmd::MAX_LEN > MAX_CMD_LEN {
        return Err(Error::InvalidArgument);
    }
    let len = cmd.write(buf);
    Ok(&buf[..len])
}

fn timeout_of<Cmd: AtatCmd>() -> Duration {
    Duration::from_millis(u64::from(Cmd::MAX_TIMEOUT_MS))
}

fn collect(payload: &mut Vec<Line, MAX_PAYLOAD_LINES>, line: &Line) {
    if payload.push(line.clone()).is_err() {
        warn!("Dropping payload line: {:?}", Bytes(line));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::clock::GetClock;
    use crate::command::device_lock::GetPinStatus;
    use crate::command::network_service::types::NetworkRegistrationStat;
    use crate::command::network_service::GetNetworkRegistrationStatus;
    use crate::command::sms::SendMessage;
    use crate::test_helpers::*;

    const OK: Pattern = Pattern::Exact("OK");

    #[test]
    fn success_with_payload() {
        let rx = RxBuffer::<512>::new();
        let mut dev = device(&rx, &[b"\r\n+CSQ: 17,0\r\n\r\nOK\r\n"]);

        let payload = dev
            .execute("AT+CSQ", OK, ERROR_PATTERNS, Duration::from_millis(100))
            .unwrap();
        assert_eq!(payload.len(), 1);
        assert_eq!(payload[0].as_str(), Some("+CSQ: 17,0"));
        assert!(!dev.is_busy());
        assert_eq!(dev.transport.written, ["AT+CSQ"]);
    }

    #[test]
    fn echo_and_blank_lines_are_discarded() {
        let rx = RxBuffer::<512>::new();
        let mut dev = device(&rx, &[b"AT+CPIN?\r\r\n\r\n+CPIN: READY\r\n\r\nOK\r\n"]);

        let status = dev.send(&GetPinStatus).unwrap();
        assert_eq!(
            status.code,
            crate::command::device_lock::types::PinStatusCode::Ready
        );
    }

    #[test]
    fn response_after_stray_line() {
        let rx = RxBuffer::<512>::new();
        let mut dev = device(
            &rx,
            &[
                b"\r\nCall Ready\r\n\r\n+CCLK: \"19/06/01,12:00:00+08\"\r\n\r\nOK\r\n",
                b"\r\nSMS Ready\r\n\r\n+CREG: 0,5\r\n\r\nOK\r\n",
            ],
        );

        let clock = dev.send(&GetClock).unwrap();
        assert_eq!(clock.timestamp(), Ok(1_559_383_200));

        let status = dev.send(&GetNetworkRegistrationStatus).unwrap();
        assert_eq!(status.stat, NetworkRegistrationStat::RegisteredRoaming);
    }

    #[test]
    fn missing_response_line() {
        let rx = RxBuffer::<512>::new();
        let mut dev = device(&rx, &[b"\r\nCall Ready\r\n\r\nOK\r\n"]);

        assert_eq!(dev.send(&GetClock), Err(Error::MalformedResponse));
        assert!(!dev.is_busy());
    }

    #[test]
    fn unbounded_timeout() {
        let rx = RxBuffer::<512>::new();
        let mut dev = device(&rx, &[b"\r\nOK\r\n"]);

        assert!(dev
            .execute("AT", OK, ERROR_PATTERNS, Duration::MAX)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn coded_error() {
        let rx = RxBuffer::<512>::new();
        let mut dev = device(&rx, &[b"\r\n+CME ERROR: 10\r\n"]);

        assert_eq!(
            dev.execute("AT+CPIN?", OK, ERROR_PATTERNS, Duration::from_millis(100)),
            Err(Error::ModemRejected(ModemError::Cme(Some(10))))
        );
        assert!(!dev.is_busy());
    }

    #[test]
    fn bare_error() {
        let rx = RxBuffer::<512>::new();
        let mut dev = device(&rx, &[b"\r\nERROR\r\n"]);

        assert_eq!(
            dev.send(&AT),
            Err(Error::ModemRejected(ModemError::Generic))
        );
        assert!(!dev.is_busy());
    }

    #[test]
    fn caller_supplied_patterns() {
        let rx = RxBuffer::<512>::new();
        let mut dev = device(&rx, &[b"\r\nNO CARRIER\r\n", b"\r\nCONNECT\r\n"]);
        let errors = [Pattern::Exact("NO CARRIER")];

        assert_eq!(
            dev.execute(
                "ATD123;",
                Pattern::Prefix("CONNECT"),
                &errors,
                Duration::from_millis(100)
            ),
            Err(Error::ModemRejected(ModemError::Generic))
        );
        assert!(dev
            .execute(
                "ATD123;",
                Pattern::Prefix("CONNECT"),
                &errors,
                Duration::from_millis(100)
            )
            .unwrap()
            .is_empty());
    }

    #[test]
    fn too_many_error_patterns() {
        let rx = RxBuffer::<512>::new();
        let mut dev = device(&rx, &[]);
        let errors = [Pattern::Exact("ERROR"); MAX_ERROR_PATTERNS + 1];

        assert_eq!(
            dev.execute("AT", OK, &errors, Duration::from_millis(10)),
            Err(Error::InvalidArgument)
        );
        assert!(dev.transport.written.is_empty());
    }

    #[test]
    fn timeout_without_reply() {
        let rx = RxBuffer::<512>::new();
        let mut dev = device(&rx, &[]);

        let start = Instant::now();
        assert_eq!(
            dev.execute("AT", OK, ERROR_PATTERNS, Duration::from_millis(50)),
            Err(Error::Timeout)
        );
        assert!(start.elapsed() >= Duration::from_millis(50));
        assert!(!dev.is_busy());

        // The engine is usable again afterwards
        rx.push_slice(b"\r\nOK\r\n");
        assert!(dev
            .execute("AT", OK, ERROR_PATTERNS, Duration::from_millis(50))
            .is_ok());
    }

    #[test]
    fn timeout_still_dispatches_notifications() {
        let rx = RxBuffer::<512>::new();
        let mut dev = device(&rx, &[b"\r\n+CALV: 2\r\n"]);
        arm(&mut dev, 2);

        assert_eq!(
            dev.execute("AT", OK, ERROR_PATTERNS, Duration::from_millis(20)),
            Err(Error::Timeout)
        );
        assert_eq!(take_alarms(), [2]);
    }

    #[test]
    fn overrun_during_command() {
        let rx = RxBuffer::<32>::new();
        let mut dev = device(
            &rx,
            &[b"\r\n+CSQ: 17,0 and a lot of trailing garbage\r\n\r\nOK\r\n"],
        );

        assert_eq!(
            dev.execute("AT+CSQ", OK, ERROR_PATTERNS, Duration::from_millis(50)),
            Err(Error::BufferOverrun)
        );
        assert!(!dev.is_busy());
        assert!(!rx.take_overrun());
    }

    #[test]
    fn prompt_exchange() {
        let rx = RxBuffer::<512>::new();
        let mut dev = device(&rx, &[b"\r\n> ", b"\r\n+CMGS: 7\r\n\r\nOK\r\n"]);
        let cmd = SendMessage::new("+4512345678", "Pump started").unwrap();
        let mr = dev.send_data(&cmd, b"Pump started").unwrap();
        assert_eq!(mr.mr, 7);
        assert_eq!(
            dev.transport.written,
            ["AT+CMGS=\"+4512345678\"", "Pump started\u{1a}"]
        );
    }

    #[test]
    fn error_instead_of_prompt() {
        let rx = RxBuffer::<512>::new();
        let mut dev = device(&rx, &[b"\r\n+CMS ERROR: 304\r\n"]);

        let cmd = SendMessage::new("123", "x").unwrap();
        assert_eq!(
            dev.send_data(&cmd, b"x"),
            Err(Error::ModemRejected(ModemError::Cms(Some(304))))
        );
        // Only the command line, no body
        assert_eq!(dev.transport.written, ["AT+CMGS=\"123\""]);
    }

    #[test]
    fn idle_lines_are_classified() {
        let rx = RxBuffer::<512>::new();
        let mut dev = device(&rx, &[]);
        arm(&mut dev, 1);
        arm(&mut dev, 4);

        rx.push_slice(b"\r\n+CALV: 1\r\n\r\n+CALV: 4\r\n\r\nOK\r\n");
        assert_eq!(dev.poll(), Ok(2));
        assert_eq!(take_alarms(), [1, 4]);
        assert!(rx.is_empty());
    }

    #[test]
    fn idle_overrun_is_reported() {
        let rx = RxBuffer::<16>::new();
        let mut dev = device(&rx, &[]);
        rx.push_slice(b"0123456789abcdefghij\r\n+CALV: 3\r\n");

        assert_eq!(dev.poll(), Err(Error::BufferOverrun));
        assert_eq!(dev.poll(), Ok(0));
    }

    #[test]
    fn reset_without_pin_clears_receive_buffer() {
        let rx = RxBuffer::<64>::new();
        let mut dev = device(&rx, &[]);
        dev.sms_setup.text_mode = true;
        rx.push_slice(b"stale\r\n");

        dev.reset().unwrap();
        assert!(rx.is_empty());
        assert_eq!(dev.sms_setup, SmsSetup::default());
    }

    #[test]
    fn init_sequence() {
        let rx = RxBuffer::<512>::new();
        let mut dev = device(&rx, &[b"", b"\r\nOK\r\n", b"ATE0\r\r\nOK\r\n", b"\r\nOK\r\n"]);

        dev.init().unwrap();
        assert_eq!(dev.transport.written, ["AT", "AT", "ATE0", "AT+CMEE=1"]);
    }
}
