//! Blocking driver for SIMCom SIM800L cellular modems.
//!
//! The receive interrupt feeds an [`RxBuffer`], the application drives a
//! [`Device`] from the foreground: one AT command at a time, with unsolicited
//! `+CMTI` (new SMS) and `+CALV` (alarm) notifications routed to callbacks.
#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

mod client;
pub mod command;
pub mod config;
pub mod error;
mod ingress;
mod module_timing;
mod modules;
mod urc_handler;

#[cfg(test)]
mod test_helpers;

pub use client::{Device, MAX_ERROR_PATTERNS, MAX_PAYLOAD_LINES};
pub use command::clock::types::ALARM_COUNT;
pub use command::sms::responses::{Sms, SmsHeader};
pub use command::{Pattern, ERROR_PATTERNS};
pub use config::{ModemConfig, NoPin, RetryPolicy};
pub use error::{Error, ModemError};
pub use ingress::{Line, RxBuffer, MAX_LINE_LEN};
pub use modules::{RegistrationStatus, SimStatus};
