//! ### Mobile equipment control and status
pub mod types;

use atat::atat_derive::AtatCmd;

use super::NoResponse;
use types::Functionality;

/// Set phone functionality +CFUN
///
/// Selects the level of functionality `<fun>` in the MT. Going through
/// minimum functionality and back forces a network re-attach, which makes the
/// network push a fresh time zone and time (NITZ).
#[derive(Clone, AtatCmd)]
#[at_cmd("+CFUN", NoResponse, timeout_ms = 10000)]
pub struct SetModuleFunctionality {
    #[at_arg(position = 0)]
    pub fun: Functionality,
}
