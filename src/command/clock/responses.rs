//! Responses for Clock and Alarm Commands
use atat::atat_derive::AtatResp;
use heapless::String;

use super::types::parse_timestamp;
use crate::error::Error;

/// Real time clock +CCLK
#[derive(Debug, Clone, PartialEq, Eq, AtatResp)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Clock {
    /// `yy/MM/dd,hh:mm:ss±zz`, local time and zone offset in quarter hours
    #[at_arg(position = 0)]
    pub time: String<20>,
}

impl Clock {
    /// Seconds since the Unix epoch (UTC)
    pub fn timestamp(&self) -> Result<u64, Error> {
        parse_timestamp(&self.time)
    }
}
