//! Argument and parameter types used by Mobile equipment control Commands
use atat::atat_derive::AtatEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Functionality {
    /// Minimum functionality, RF circuits off
    Minimum = 0,
    /// Full functionality (default)
    Full = 1,
    /// Disable phone both transmit and receive RF circuits
    DisableRf = 4,
}
