use embassy_time::block_for;
use embedded_io::Write;

use crate::client::Device;
use crate::command::network_service::responses::SignalQuality;
use crate::command::network_service::types::NetworkRegistrationStat;
use crate::command::network_service::{GetNetworkRegistrationStatus, GetSignalQuality};
use crate::config::{ModemConfig, RetryPolicy};
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistrationStatus {
    NotRegistered,
    /// Searching for an operator
    Registering,
    Registered,
    Roaming,
}

impl From<NetworkRegistrationStat> for RegistrationStatus {
    fn from(stat: NetworkRegistrationStat) -> Self {
        match stat {
            NetworkRegistrationStat::Registered => Self::Registered,
            NetworkRegistrationStat::RegisteredRoaming => Self::Roaming,
            NetworkRegistrationStat::NotRegisteredSearching => Self::Registering,
            NetworkRegistrationStat::NotRegistered
            | NetworkRegistrationStat::RegistrationDenied
            | NetworkRegistrationStat::Unknown => Self::NotRegistered,
        }
    }
}

impl RegistrationStatus {
    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Registered | Self::Roaming)
    }
}

impl<'a, T: Write, C: ModemConfig, const N: usize> Device<'a, T, C, N> {
    pub fn network_registration(&mut self) -> Result<RegistrationStatus, Error> {
        Ok(self.send(&GetNetworkRegistrationStatus)?.stat.into())
    }

    /// Polls the registration status until the modem is registered, at home
    /// or roaming, or `policy` is exhausted (`Timeout`).
    pub fn connect_to_network(&mut self, policy: RetryPolicy) -> Result<RegistrationStatus, Error> {
        for attempt in 0..policy.attempts {
            if attempt > 0 {
                block_for(policy.interval);
            }
            match self.network_registration() {
                Ok(status) if status.is_registered() => {
                    info!("Registered to network: {:?}", status);
                    return Ok(status);
                }
                Ok(status) => debug!("Not registered yet: {:?}", status),
                Err(e) => debug!("Registration query failed: {:?}", e),
            }
        }

        warn!("Network registration gave up after {} attempts", policy.attempts);
        Err(Error::Timeout)
    }

    pub fn signal_quality(&mut self) -> Result<SignalQuality, Error> {
        self.send(&GetSignalQuality)
    }
}
