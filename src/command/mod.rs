//! AT commands for the SIMCom SIM800 family
//!
//! Following the SIM800 Series AT Command Manual, grouped the way 3GPP TS
//! 27.005/27.007 group them.

pub mod clock;
pub mod control;
pub mod device_lock;
pub mod mobile_control;
pub mod network_service;
pub mod sms;

use atat::atat_derive::{AtatCmd, AtatResp, AtatUrc};

use crate::error::Error;
use crate::ingress::trim;

/// Longest command line the driver writes, terminator included.
pub const MAX_CMD_LEN: usize = 128;

/// A terminal line the engine waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pattern {
    /// The whole (trimmed) line equals the token.
    Exact(&'static str),
    /// The line starts with the token, e.g. a coded failure `+CME ERROR: 10`.
    Prefix(&'static str),
}

impl Pattern {
    pub fn matches(&self, line: &[u8]) -> bool {
        let line = trim(line);
        match self {
            Self::Exact(token) => line == token.as_bytes(),
            Self::Prefix(token) => line.starts_with(token.as_bytes()),
        }
    }
}

/// Error tokens every command can end with.
pub const ERROR_PATTERNS: &[Pattern] = &[
    Pattern::Exact("ERROR"),
    Pattern::Prefix("+CME ERROR:"),
    Pattern::Prefix("+CMS ERROR:"),
];

/// Name of the information response a command line is answered with, e.g.
/// `+CCLK` for `AT+CCLK?`. Empty for commands without one.
pub(crate) fn response_name(command: &[u8]) -> &[u8] {
    let name = trim(command);
    let name = name.strip_prefix(b"AT").unwrap_or(name);
    if !name.starts_with(b"+") {
        return &[];
    }
    let end = name
        .iter()
        .position(|b| matches!(b, b'=' | b'?'))
        .unwrap_or(name.len());
    &name[..end]
}

/// Whether `line` is the `<name>: ...` information response.
pub(crate) fn is_response_to(name: &[u8], line: &[u8]) -> bool {
    !name.is_empty()
        && trim(line)
            .strip_prefix(name)
            .is_some_and(|rest| rest.starts_with(b":"))
}

#[derive(Debug, Clone, PartialEq, Eq, AtatResp)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NoResponse;

/// Attention, answered with `OK` once the modem is up.
#[derive(Clone, AtatCmd)]
#[at_cmd("", NoResponse)]
pub struct AT;

/// Unsolicited result codes the driver dispatches.
#[derive(Debug, Clone, PartialEq, Eq, AtatUrc)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Urc {
    /// `+CMTI`: a new message was stored.
    #[at_urc("+CMTI")]
    NewMessageIndication(sms::urc::NewMessageIndication),
    /// `+CALV`: an RTC alarm fired.
    #[at_urc("+CALV")]
    AlarmTriggered(clock::urc::AlarmTriggered),
}

impl Urc {
    const PREFIXES: &'static [&'static [u8]] = &[b"+CMTI:", b"+CALV:"];

    /// `Ok(None)` when the line is not a notification at all,
    /// `Err(MalformedResponse)` when it has a notification prefix but its
    /// fields do not parse.
    pub fn classify(line: &[u8]) -> Result<Option<Self>, Error> {
        let line = trim(line);
        if !Self::PREFIXES.iter().any(|p| line.starts_with(p)) {
            return Ok(None);
        }
        <Self as atat::AtatUrc>::parse(line)
            .map(Some)
            .ok_or(Error::MalformedResponse)
    }
}
