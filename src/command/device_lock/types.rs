//! Argument and parameter types used by Device lock Commands
use atat::atat_derive::AtatEnum;

/// Reported by `+CPIN?`, serialized as the modem's upper case codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinStatusCode {
    /// • READY: MT is not pending for any password
    Ready,
    /// • SIM PIN: MT is waiting SIM PIN to be given
    SimPin,
    /// • SIM PUK: MT is waiting for SIM PUK to be given
    SimPuk,
    /// • PH_SIM PIN: MT is waiting phone to SIM card password to be given
    PhSimPin,
    /// • PH_SIM PUK: MT is waiting phone to SIM card unblocking password to be given
    PhSimPuk,
    /// • SIM PIN2: MT is waiting SIM PIN2 to be given
    SimPin2,
    /// • SIM PUK2: MT is waiting SIM PUK2 to be given
    SimPuk2,
    /// • PH-NET PIN: MT is waiting network personalization password to be given
    PhNetPin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SimInsertion {
    NotInserted = 0,
    Inserted = 1,
}
