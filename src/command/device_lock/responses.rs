//! Responses for Device lock Commands
use atat::atat_derive::AtatResp;

use super::types::{PinStatusCode, SimInsertion};

/// Enter PIN +CPIN
#[derive(Debug, Clone, PartialEq, Eq, AtatResp)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinStatus {
    #[at_arg(position = 0)]
    pub code: PinStatusCode,
}

/// SIM inserted status reporting +CSMINS
#[derive(Debug, Clone, PartialEq, Eq, AtatResp)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SimInserted {
    #[at_arg(position = 0)]
    pub n: u8,
    #[at_arg(position = 1)]
    pub inserted: SimInsertion,
}
