use embedded_io::Write;

use crate::client::Device;
use crate::command::clock::types::{AlarmIndex, AlarmTime};
use crate::command::clock::{DeleteAlarm, SetAlarm};
use crate::config::ModemConfig;
use crate::error::Error;

impl<'a, T: Write, C: ModemConfig, const N: usize> Device<'a, T, C, N> {
    /// Arms alarm `index` (`1..=5`) to fire every day at the given time,
    /// each field in binary-coded decimal, and calls `cb` with the index when
    /// it fires.
    ///
    /// An alarm that is already armed must be deleted first, otherwise the
    /// modem rejects it.
    pub fn set_alarm(
        &mut self,
        index: u8,
        hour: u8,
        minute: u8,
        second: u8,
        cb: fn(u8),
    ) -> Result<(), Error> {
        let index = AlarmIndex::try_from(index)?;
        let time = AlarmTime::from_bcd(hour, minute, second)?;

        self.send(&SetAlarm::daily(index, &time))?;
        self.callbacks.arm(index, cb);
        Ok(())
    }

    /// Deletes alarm `index` (`1..=5`). Its callback is dropped even if the
    /// modem rejects the deletion.
    pub fn delete_alarm(&mut self, index: u8) -> Result<(), Error> {
        let index = AlarmIndex::try_from(index)?;

        self.callbacks.disarm(index);
        self.send(&DeleteAlarm { index: index.get() })?;
        Ok(())
    }

    /// Whether a callback is registered for alarm `index`.
    pub fn alarm_armed(&self, index: u8) -> bool {
        AlarmIndex::try_from(index).map_or(false, |i| self.callbacks.is_armed(i))
    }
}
