use core::convert::Infallible;
use embassy_time::Duration;
use embedded_hal::digital::{ErrorType, OutputPin};

/// Placeholder for boards that do not wire the modem's `RST` line.
pub struct NoPin;

impl ErrorType for NoPin {
    type Error = Infallible;
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

pub trait ModemConfig {
    type ResetPin: OutputPin;

    /// Leave command echo (`ATE1`) enabled after [`init`](crate::Device::init).
    const ECHO: bool = false;
    /// Report failures as `+CME ERROR: <n>` instead of a bare `ERROR`.
    const VERBOSE_ERRORS: bool = true;
    /// How many times `AT` is tried while waiting for the modem to answer.
    const AUTOSENSE_ATTEMPTS: u8 = 10;

    fn reset_pin(&mut self) -> Option<&mut Self::ResetPin>;
}

/// Bounded retry for operations that wait on the network, e.g.
/// [`connect_to_network`](crate::Device::connect_to_network).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetryPolicy {
    /// Total number of tries, including the first one.
    pub attempts: u16,
    /// Blocking wait between two tries.
    pub interval: Duration,
}

impl RetryPolicy {
    pub const fn new(attempts: u16, interval: Duration) -> Self {
        Self { attempts, interval }
    }
}
