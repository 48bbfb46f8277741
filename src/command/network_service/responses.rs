//! Responses for Network service Commands
use atat::atat_derive::AtatResp;
use heapless::String;

use super::types::NetworkRegistrationStat;

/// Network registration +CREG
#[derive(Debug, Clone, PartialEq, Eq, AtatResp)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NetworkRegistrationStatus {
    #[at_arg(position = 0)]
    pub n: u8,
    #[at_arg(position = 1)]
    pub stat: NetworkRegistrationStat,
    /// Location area code, hexadecimal
    #[at_arg(position = 2)]
    pub lac: Option<String<4>>,
    /// Cell ID, hexadecimal
    #[at_arg(position = 3)]
    pub ci: Option<String<4>>,
}

/// Signal quality report +CSQ
#[derive(Debug, Clone, PartialEq, Eq, AtatResp)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SignalQuality {
    /// `0..=31`, 99 when not known or not detectable
    #[at_arg(position = 0)]
    pub rssi: u8,
    /// `0..=7`, 99 when not known or not detectable
    #[at_arg(position = 1)]
    pub ber: u8,
}
