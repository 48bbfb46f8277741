use embedded_io::Write;

use crate::client::Device;
use crate::command::clock::types::{ClockTime, LocalTimestampMode};
use crate::command::clock::{GetClock, SetClock, SetLocalTimestamp};
use crate::command::control::StoreProfile;
use crate::command::mobile_control::types::Functionality;
use crate::command::mobile_control::SetModuleFunctionality;
use crate::config::ModemConfig;
use crate::error::Error;

impl<'a, T: Write, C: ModemConfig, const N: usize> Device<'a, T, C, N> {
    /// Lets the network update the RTC, and stores the setting in the
    /// user profile so it survives a restart.
    pub fn enable_time_update_from_network(&mut self) -> Result<(), Error> {
        self.send(&SetLocalTimestamp {
            mode: LocalTimestampMode::Enabled,
        })?;
        self.send(&StoreProfile)?;
        Ok(())
    }

    /// RTC time, in seconds since the Unix epoch (UTC).
    pub fn get_time(&mut self) -> Result<u64, Error> {
        self.send(&GetClock)?.timestamp()
    }

    /// Sets the RTC, in seconds since the Unix epoch (UTC). Only years 2000
    /// to 2099 can be represented.
    pub fn set_time(&mut self, timestamp: u64) -> Result<(), Error> {
        let time = ClockTime::try_from(timestamp)?;
        self.send(&SetClock::utc(&time))?;
        Ok(())
    }

    /// Forces a new network time update by cycling the radio.
    pub fn sync_time(&mut self) -> Result<(), Error> {
        self.send(&SetModuleFunctionality {
            fun: Functionality::Minimum,
        })?;
        self.send(&SetModuleFunctionality {
            fun: Functionality::Full,
        })?;
        Ok(())
    }
}
