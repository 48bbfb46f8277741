use core::fmt::Write as _;

use embedded_io::Write;
use heapless::String;

use crate::client::Device;
use crate::command::device_lock::types::{PinStatusCode, SimInsertion};
use crate::command::device_lock::{GetPinStatus, GetSimInserted, SetPin};
use crate::config::ModemConfig;
use crate::error::Error;

/// Lock state of the SIM card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SimStatus {
    Ready,
    PinLock,
    PukLock,
    /// Any other password is requested
    Error,
}

impl From<PinStatusCode> for SimStatus {
    fn from(code: PinStatusCode) -> Self {
        match code {
            PinStatusCode::Ready => Self::Ready,
            PinStatusCode::SimPin => Self::PinLock,
            PinStatusCode::SimPuk => Self::PukLock,
            _ => Self::Error,
        }
    }
}

impl<'a, T: Write, C: ModemConfig, const N: usize> Device<'a, T, C, N> {
    pub fn sim_card_present(&mut self) -> Result<bool, Error> {
        Ok(self.send(&GetSimInserted)?.inserted == SimInsertion::Inserted)
    }

    pub fn sim_status(&mut self) -> Result<SimStatus, Error> {
        Ok(self.send(&GetPinStatus)?.code.into())
    }

    /// Enters the SIM PIN, `0..=9999`.
    pub fn unlock_sim(&mut self, pin: u16) -> Result<(), Error> {
        if pin > 9999 {
            return Err(Error::InvalidArgument);
        }
        let mut digits = String::new();
        write!(digits, "{pin:04}").map_err(|_| Error::InvalidArgument)?;
        self.send(&SetPin { pin: digits })?;
        info!("SIM unlocked");
        Ok(())
    }
}
