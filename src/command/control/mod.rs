//! ### V.25TER control
pub mod types;

use atat::atat_derive::AtatCmd;

use super::NoResponse;
use types::{Echo, TerminationErrorMode};

/// Command echo mode E
///
/// Controls whether or not the module echoes characters received from the DTE
/// during command state.
#[derive(Clone, AtatCmd)]
#[at_cmd("E", NoResponse, value_sep = false)]
pub struct SetEcho {
    #[at_arg(position = 0)]
    pub enabled: Echo,
}

/// Report mobile equipment error +CMEE
///
/// When enabled, equipment related errors cause `+CME ERROR: <err>` final
/// result codes instead of the regular `ERROR`.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CMEE", NoResponse)]
pub struct SetReportMobileTerminationError {
    #[at_arg(position = 0)]
    pub n: TerminationErrorMode,
}

/// Store active profile &W
///
/// Persists settings such as `+CLTS` across power cycles.
#[derive(Clone, AtatCmd)]
#[at_cmd("&W", NoResponse)]
pub struct StoreProfile;
