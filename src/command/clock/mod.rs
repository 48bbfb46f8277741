//! ### Clock and Alarm
//!
//! The RTC is kept in local time with a quarter-hour zone offset, this crate
//! exchanges it as seconds since the Unix epoch.

pub mod responses;
pub mod types;
pub mod urc;

use atat::atat_derive::AtatCmd;
use heapless::String;

use super::NoResponse;
use responses::Clock;
use types::{AlarmIndex, AlarmTime, ClockTime, LocalTimestampMode};

/// Get local timestamp +CLTS
///
/// When enabled, the RTC is updated from network time zone and time
/// information. Takes effect after `AT&W` and a restart.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CLTS", NoResponse)]
pub struct SetLocalTimestamp {
    #[at_arg(position = 0)]
    pub mode: LocalTimestampMode,
}

/// Read clock +CCLK
#[derive(Clone, AtatCmd)]
#[at_cmd("+CCLK?", Clock)]
pub struct GetClock;

/// Set clock +CCLK
///
/// `yy/MM/dd,hh:mm:ss±zz`, this crate always writes UTC.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CCLK", NoResponse)]
pub struct SetClock {
    #[at_arg(position = 0)]
    pub time: String<20>,
}

impl SetClock {
    pub fn utc(time: &ClockTime) -> Self {
        Self {
            time: time.to_modem_string(),
        }
    }
}

/// Set alarm +CALA
///
/// An index that is already armed is rejected by the modem.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CALA", NoResponse)]
pub struct SetAlarm {
    /// `hh:mm:ss`
    #[at_arg(position = 0)]
    pub time: String<8>,
    #[at_arg(position = 1)]
    pub index: u8,
    /// Weekdays the alarm recurs on, `"0"` for every day
    #[at_arg(position = 2)]
    pub recurr: String<13>,
}

impl SetAlarm {
    /// Alarm recurring every day.
    pub fn daily(index: AlarmIndex, time: &AlarmTime) -> Self {
        let mut recurr = String::new();
        // Fits, capacity is larger than one character
        let _ = recurr.push('0');
        Self {
            time: time.to_modem_string(),
            index: index.get(),
            recurr,
        }
    }
}

/// Delete alarm +CALD
#[derive(Clone, AtatCmd)]
#[at_cmd("+CALD", NoResponse)]
pub struct DeleteAlarm {
    #[at_arg(position = 0)]
    pub index: u8,
}
