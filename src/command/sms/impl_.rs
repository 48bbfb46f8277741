//! Quoted string parameters of the text mode commands
use atat::AtatLen;
use serde::{Serialize, Serializer};

use super::types::{DeleteFlag, MessageStatus, MessageStorage};

macro_rules! quoted_param {
    ($ty:ty, $len:expr) => {
        impl Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl AtatLen for $ty {
            // Longest value plus surrounding quotes
            const LEN: usize = $len + 2;
        }
    };
}

quoted_param!(MessageStorage, 2);
quoted_param!(MessageStatus, 10);
quoted_param!(DeleteFlag, 9);
