//! Unsolicited responses for Clock and Alarm Commands
use atat::atat_derive::AtatResp;

/// Alarm fired `+CALV: <n>`
///
/// The index is reported as received, it is validated against the alarm
/// table on dispatch.
#[derive(Debug, Clone, PartialEq, Eq, AtatResp)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmTriggered {
    #[at_arg(position = 0)]
    pub index: u8,
}
