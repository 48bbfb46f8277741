//! Argument and parameter types used by Short Messages Service Commands and Responses
use atat::atat_derive::AtatEnum;

/// Message format +CMGF
#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageFormat {
    Pdu = 0,
    Text = 1,
}

/// Memory used for reading, writing and receiving messages +CPMS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageStorage {
    /// SIM card message storage
    Sim,
    /// Phone message storage
    Phone,
}

impl MessageStorage {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sim => "SM",
            Self::Phone => "ME",
        }
    }
}

/// Status filter of +CMGL in text mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageStatus {
    ReceivedUnread,
    ReceivedRead,
    StoredUnsent,
    StoredSent,
    All,
}

impl MessageStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ReceivedUnread => "REC UNREAD",
            Self::ReceivedRead => "REC READ",
            Self::StoredUnsent => "STO UNSENT",
            Self::StoredSent => "STO SENT",
            Self::All => "ALL",
        }
    }
}

/// Which messages +CMGDA removes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeleteFlag {
    /// Every stored message, received and sent
    All,
    /// Received messages only, read or unread
    Inbox,
}

impl DeleteFlag {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "DEL ALL",
            Self::Inbox => "DEL INBOX",
        }
    }
}

/// `<mt>` of +CNMI
#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NewMessageIndicationMode {
    /// No SMS-DELIVER indications are routed to the TE
    Disabled = 0,
    /// Stored messages are indicated with `+CMTI: <mem>,<index>`
    StoredIndication = 1,
}
