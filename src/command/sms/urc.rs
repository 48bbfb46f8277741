//! Unsolicited responses for Short Messages Service Commands
use atat::atat_derive::AtatResp;
use heapless::String;

/// New message indication `+CMTI: <mem>,<index>`
#[derive(Debug, Clone, PartialEq, Eq, AtatResp)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NewMessageIndication {
    #[at_arg(position = 0)]
    pub mem: String<4>,
    #[at_arg(position = 1)]
    pub index: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use atat::serde_at::from_slice;

    #[test]
    fn parse_cmti() {
        assert_eq!(
            from_slice::<NewMessageIndication>(b"+CMTI: \"SM\",12"),
            Ok(NewMessageIndication {
                mem: String::try_from("SM").unwrap(),
                index: 12
            })
        );
        assert!(from_slice::<NewMessageIndication>(b"+CMTI: \"SM\"").is_err());
        assert!(from_slice::<NewMessageIndication>(b"+CMTI: \"SM\",300").is_err());
    }
}
