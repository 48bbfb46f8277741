//! Responses for Short Messages Service Commands
use atat::atat_derive::AtatResp;
use atat::serde_at;
use heapless::String;
use serde::{Deserialize, Serialize};

use crate::command::clock::types::parse_timestamp;
use crate::error::Error;
use crate::ingress::trim;

pub const MAX_SENDER_LEN: usize = 21;
pub const MAX_TEXT_LEN: usize = 255;

/// Message send +CMGS
#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatResp)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MessageReference {
    #[at_arg(position = 0)]
    pub mr: u8,
}

/// `+CMGL: <index>,<stat>,<oa>,[<alpha>],[<scts>]`
#[derive(Debug, Clone, PartialEq, Eq, AtatResp)]
pub struct ListedMessageHeader {
    #[at_arg(position = 0)]
    pub index: u8,
    #[at_arg(position = 1)]
    pub stat: String<10>,
    #[at_arg(position = 2)]
    pub oa: String<32>,
    #[at_arg(position = 3)]
    pub alpha: String<16>,
    #[at_arg(position = 4)]
    pub scts: String<20>,
}

/// `+CMGR: <stat>,<oa>,[<alpha>],[<scts>]`
#[derive(Debug, Clone, PartialEq, Eq, AtatResp)]
pub struct ReadMessageHeader {
    #[at_arg(position = 0)]
    pub stat: String<10>,
    #[at_arg(position = 1)]
    pub oa: String<32>,
    #[at_arg(position = 2)]
    pub alpha: String<16>,
    #[at_arg(position = 3)]
    pub scts: String<20>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SmsHeader {
    /// Service centre time stamp, seconds since the Unix epoch (UTC)
    pub time: u64,
    /// Storage index on the SIM card
    pub index: u8,
    /// Originating address, truncated to [`MAX_SENDER_LEN`] characters
    pub sender: String<MAX_SENDER_LEN>,
}

/// A stored text message, as handed to the application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sms {
    pub header: SmsHeader,
    /// Body text, truncated to [`MAX_TEXT_LEN`] characters. Lines of a
    /// multi-line body are joined with `\n`.
    pub text: String<MAX_TEXT_LEN>,
}

const LIST_PREFIX: &str = "+CMGL:";
const READ_PREFIX: &str = "+CMGR:";

fn truncated<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Incremental parser for the text mode listings of +CMGL and +CMGR, where
/// each header line is followed by the message body on the next line(s).
pub(crate) struct SmsReader {
    prefix: &'static str,
    /// +CMGR does not repeat the index in its header
    index: u8,
    current: Option<Sms>,
    expect_body: bool,
    delivered: usize,
    malformed: bool,
}

impl SmsReader {
    /// Reader for `+CMGL: <index>,<stat>,<oa>,[<alpha>],[<scts>]`
    pub(crate) const fn list() -> Self {
        Self::new(LIST_PREFIX, 0)
    }

    /// Reader for `+CMGR: <stat>,<oa>,[<alpha>],[<scts>]`
    pub(crate) const fn read(index: u8) -> Self {
        Self::new(READ_PREFIX, index)
    }

    const fn new(prefix: &'static str, index: u8) -> Self {
        Self {
            prefix,
            index,
            current: None,
            expect_body: false,
            delivered: 0,
            malformed: false,
        }
    }

    pub(crate) fn is_header(&self, line: &[u8]) -> bool {
        trim(line).starts_with(self.prefix.as_bytes())
    }

    /// Feeds one payload line. Returns `true` when the next line is a message
    /// body and must not be classified.
    pub(crate) fn feed<F: FnMut(Sms)>(&mut self, line: &[u8], on_sms: &mut F) -> bool {
        if !self.expect_body && self.is_header(line) {
            self.flush(on_sms);
            match self.header(line) {
                Ok(header) => {
                    self.current = Some(Sms {
                        header,
                        text: String::new(),
                    });
                }
                Err(e) => {
                    warn!("Skipping message with malformed header: {:?}", e);
                    self.malformed = true;
                }
            }
            self.expect_body = true;
            return true;
        }

        self.expect_body = false;
        if let Some(sms) = self.current.as_mut() {
            Self::append(&mut sms.text, line);
        }
        false
    }

    /// Delivers the last message. Errors if any header could not be parsed,
    /// after every well formed message has been delivered.
    pub(crate) fn finish<F: FnMut(Sms)>(mut self, on_sms: &mut F) -> Result<usize, Error> {
        self.flush(on_sms);
        if self.malformed {
            Err(Error::MalformedResponse)
        } else {
            Ok(self.delivered)
        }
    }

    fn flush<F: FnMut(Sms)>(&mut self, on_sms: &mut F) {
        if let Some(sms) = self.current.take() {
            self.delivered += 1;
            on_sms(sms);
        }
    }

    fn header(&self, line: &[u8]) -> Result<SmsHeader, Error> {
        let line = trim(line);
        let (index, oa, scts) = if self.prefix == LIST_PREFIX {
            let h: ListedMessageHeader =
                serde_at::from_slice(line).map_err(|_| Error::MalformedResponse)?;
            (h.index, h.oa, h.scts)
        } else {
            let h: ReadMessageHeader =
                serde_at::from_slice(line).map_err(|_| Error::MalformedResponse)?;
            (self.index, h.oa, h.scts)
        };

        Ok(SmsHeader {
            time: parse_timestamp(&scts)?,
            index,
            sender: truncated(&oa),
        })
    }

    fn append(text: &mut String<MAX_TEXT_LEN>, line: &[u8]) {
        if text.is_empty() && line.is_empty() {
            return;
        }
        if !text.is_empty() && text.push('\n').is_err() {
            return;
        }
        match core::str::from_utf8(line) {
            Ok(s) => {
                for c in s.chars() {
                    if text.push(c).is_err() {
                        return;
                    }
                }
            }
            Err(_) => {
                for &b in line {
                    let c = if b.is_ascii() { b as char } else { '?' };
                    if text.push(c).is_err() {
                        return;
                    }
                }
            }
        }
    }
}
