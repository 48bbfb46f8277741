//! ### Device lock
mod impl_;
pub mod responses;
pub mod types;

use atat::atat_derive::AtatCmd;
use heapless::String;

use super::NoResponse;
use responses::{PinStatus, SimInserted};

/// Enter PIN +CPIN
///
/// Read command, reports whether some password is required or not.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CPIN?", PinStatus, timeout_ms = 5000)]
pub struct GetPinStatus;

/// Enter PIN +CPIN
///
/// Sends the password required to unlock the SIM. If no PIN request is
/// pending, the corresponding error code is returned. If a wrong PIN is given
/// three times, the PUK is required.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CPIN", NoResponse, timeout_ms = 5000)]
pub struct SetPin {
    /// Four digits
    #[at_arg(position = 0)]
    pub pin: String<4>,
}

/// SIM inserted status reporting +CSMINS
#[derive(Clone, AtatCmd)]
#[at_cmd("+CSMINS?", SimInserted)]
pub struct GetSimInserted;

#[cfg(test)]
mod tests {
    use super::types::{PinStatusCode, SimInsertion};
    use super::*;
    use crate::test_helpers::{parsed, written};

    #[test]
    fn write_commands() {
        assert_eq!(written(&GetPinStatus), "AT+CPIN?\r\n");
        assert_eq!(
            written(&SetPin {
                pin: String::try_from("0042").unwrap()
            }),
            "AT+CPIN=\"0042\"\r\n"
        );
        assert_eq!(written(&GetSimInserted), "AT+CSMINS?\r\n");
    }

    #[test]
    fn parse_pin_status() {
        assert_eq!(
            parsed(&GetPinStatus, b"+CPIN: READY"),
            Ok(PinStatus {
                code: PinStatusCode::Ready
            })
        );
        assert_eq!(
            parsed(&GetPinStatus, b"+CPIN: SIM PIN"),
            Ok(PinStatus {
                code: PinStatusCode::SimPin
            })
        );
        assert!(parsed(&GetPinStatus, b"+CPIN: NOT A CODE").is_err());
        assert!(parsed(&GetPinStatus, b"").is_err());
    }

    #[test]
    fn parse_sim_inserted() {
        assert_eq!(
            parsed(&GetSimInserted, b"+CSMINS: 0,1"),
            Ok(SimInserted {
                n: 0,
                inserted: SimInsertion::Inserted
            })
        );
        assert_eq!(
            parsed(&GetSimInserted, b"+CSMINS: 0,0"),
            Ok(SimInserted {
                n: 0,
                inserted: SimInsertion::NotInserted
            })
        );
    }
}
