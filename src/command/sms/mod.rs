//! ### Short Messages Service
//!
//! Text mode only (`AT+CMGF=1`), 3GPP TS 27.005.

mod impl_;
pub mod responses;
pub mod types;
pub mod urc;

use atat::atat_derive::AtatCmd;
use heapless::String;

use super::NoResponse;
use crate::error::Error;
use responses::MessageReference;
use types::{DeleteFlag, MessageFormat, MessageStatus, MessageStorage, NewMessageIndicationMode};

/// Longest destination address accepted by +CMGS
pub const MAX_DESTINATION_LEN: usize = 21;
/// Longest body of a single text mode message
pub const MAX_SEND_LEN: usize = 160;

/// Select SMS message format +CMGF
#[derive(Clone, AtatCmd)]
#[at_cmd("+CMGF", NoResponse)]
pub struct SetMessageFormat {
    #[at_arg(position = 0)]
    pub format: MessageFormat,
}

/// Preferred message storage +CPMS
#[derive(Clone, AtatCmd)]
#[at_cmd("+CPMS", NoResponse, timeout_ms = 5000)]
pub struct SetPreferredStorage {
    /// Read and delete
    #[at_arg(position = 0)]
    pub mem1: MessageStorage,
    /// Write and send
    #[at_arg(position = 1)]
    pub mem2: MessageStorage,
    /// Receive
    #[at_arg(position = 2)]
    pub mem3: MessageStorage,
}

impl SetPreferredStorage {
    pub const fn all(storage: MessageStorage) -> Self {
        Self {
            mem1: storage,
            mem2: storage,
            mem3: storage,
        }
    }
}

/// New message indication +CNMI
#[derive(Clone, AtatCmd)]
#[at_cmd("+CNMI", NoResponse)]
pub struct SetNewMessageIndication {
    #[at_arg(position = 0)]
    pub mode: u8,
    #[at_arg(position = 1)]
    pub mt: NewMessageIndicationMode,
    #[at_arg(position = 2)]
    pub bm: u8,
    #[at_arg(position = 3)]
    pub ds: u8,
    #[at_arg(position = 4)]
    pub bfr: u8,
}

impl SetNewMessageIndication {
    /// `<mode>=2` buffers indications while the link is busy, `<bm>`, `<ds>`
    /// and `<bfr>` are left at 0.
    pub const fn buffered(mt: NewMessageIndicationMode) -> Self {
        Self {
            mode: 2,
            mt,
            bm: 0,
            ds: 0,
            bfr: 0,
        }
    }
}

/// Delete message +CMGD
#[derive(Clone, AtatCmd)]
#[at_cmd("+CMGD", NoResponse, timeout_ms = 5000)]
pub struct DeleteMessage {
    #[at_arg(position = 0)]
    pub index: u8,
}

/// Delete all messages +CMGDA
#[derive(Clone, AtatCmd)]
#[at_cmd("+CMGDA", NoResponse, timeout_ms = 25000)]
pub struct DeleteAllMessages {
    #[at_arg(position = 0)]
    pub flag: DeleteFlag,
}

/// List messages +CMGL
///
/// Headers are interleaved with free text bodies, the listing is consumed
/// line by line with [`SmsReader`](responses::SmsReader).
#[derive(Clone, AtatCmd)]
#[at_cmd("+CMGL", NoResponse, timeout_ms = 20000)]
pub(crate) struct ListMessages {
    #[at_arg(position = 0)]
    pub status: MessageStatus,
}

/// Read message +CMGR
#[derive(Clone, AtatCmd)]
#[at_cmd("+CMGR", NoResponse, timeout_ms = 5000)]
pub(crate) struct ReadMessage {
    #[at_arg(position = 0)]
    pub index: u8,
}

/// Send message +CMGS
///
/// The command line is answered with the `> ` prompt, after which the body
/// is written and closed with Ctrl-Z.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CMGS", MessageReference, timeout_ms = 60000, termination = "\r")]
pub(crate) struct SendMessage {
    #[at_arg(position = 0)]
    pub destination: String<MAX_DESTINATION_LEN>,
}

impl SendMessage {
    /// Rejects destinations and bodies the modem would misinterpret.
    pub fn new(destination: &str, text: &str) -> Result<Self, Error> {
        let destination_ok = !destination.is_empty()
            && destination
                .bytes()
                .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'#' | b'*'));
        // Ctrl-Z ends the body, ESC aborts the send
        let text_ok = text.chars().count() <= MAX_SEND_LEN
            && !text.bytes().any(|b| b == 0x1A || b == 0x1B);

        if !(destination_ok && text_ok) {
            return Err(Error::InvalidArgument);
        }
        Ok(Self {
            destination: String::try_from(destination).map_err(|_| Error::InvalidArgument)?,
        })
    }
}
