//! Argument and parameter types used by V.25TER control commands
use atat::atat_derive::AtatEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Echo {
    Disable = 0,
    Enable = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TerminationErrorMode {
    /// `+CME ERROR: <err>` result code disabled, `ERROR` used instead
    Disabled = 0,
    /// `+CME ERROR: <err>` result code enabled, numeric `<err>` values
    Enabled = 1,
    /// `+CME ERROR: <err>` result code enabled, verbose `<err>` values
    Verbose = 2,
}
