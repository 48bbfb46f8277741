//! ### Network service
pub mod responses;
pub mod types;

use atat::atat_derive::AtatCmd;
use responses::{NetworkRegistrationStatus, SignalQuality};

/// Network registration +CREG
///
/// The read command returns the URC presentation value `<n>` and the
/// registration status `<stat>`; location information follows only when
/// `<n>=2`.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CREG?", NetworkRegistrationStatus)]
pub struct GetNetworkRegistrationStatus;

/// Signal quality report +CSQ
#[derive(Clone, AtatCmd)]
#[at_cmd("+CSQ", SignalQuality)]
pub struct GetSignalQuality;

#[cfg(test)]
mod tests {
    use super::types::NetworkRegistrationStat;
    use super::*;
    use crate::test_helpers::{parsed, written};
    use heapless::String;

    #[test]
    fn write_commands() {
        assert_eq!(written(&GetNetworkRegistrationStatus), "AT+CREG?\r\n");
        assert_eq!(written(&GetSignalQuality), "AT+CSQ\r\n");
    }

    #[test]
    fn parse_registration() {
        assert_eq!(
            parsed(&GetNetworkRegistrationStatus, b"+CREG: 0,5"),
            Ok(NetworkRegistrationStatus {
                n: 0,
                stat: NetworkRegistrationStat::RegisteredRoaming,
                lac: None,
                ci: None,
            })
        );
        assert_eq!(
            parsed(&GetNetworkRegistrationStatus, b"+CREG: 2,1,\"1A2B\",\"0C3D\""),
            Ok(NetworkRegistrationStatus {
                n: 2,
                stat: NetworkRegistrationStat::Registered,
                lac: Some(String::try_from("1A2B").unwrap()),
                ci: Some(String::try_from("0C3D").unwrap()),
            })
        );
        assert!(parsed(&GetNetworkRegistrationStatus, b"+CREG: 0").is_err());
    }

    #[test]
    fn parse_signal_quality() {
        assert_eq!(
            parsed(&GetSignalQuality, b"+CSQ: 17,0"),
            Ok(SignalQuality { rssi: 17, ber: 0 })
        );
    }
}
