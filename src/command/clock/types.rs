//! Argument and parameter types used by Clock and Alarm Commands and Responses
use core::fmt::Write as _;

use atat::atat_derive::AtatEnum;
use chrono::{Datelike, NaiveDate, TimeZone, Timelike, Utc};
use heapless::String;

use crate::error::Error;

/// `<mode>` of +CLTS
#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LocalTimestampMode {
    Disabled = 0,
    /// Update the RTC from network time (NITZ)
    Enabled = 1,
}

/// Number of RTC alarms the modem provides.
pub const ALARM_COUNT: u8 = 5;

/// Alarm slot index, `1..=ALARM_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmIndex(u8);

impl AlarmIndex {
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Position in a zero based slot table.
    pub(crate) const fn slot(self) -> usize {
        self.0 as usize - 1
    }
}

impl TryFrom<u8> for AlarmIndex {
    type Error = Error;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        if (1..=ALARM_COUNT).contains(&index) {
            Ok(Self(index))
        } else {
            Err(Error::InvalidArgument)
        }
    }
}

/// Time of day an alarm fires, decoded from binary-coded decimal fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmTime {
    hour: u8,
    minute: u8,
    second: u8,
}

impl AlarmTime {
    /// `0x07, 0x30, 0x00` is 07:30:00.
    pub fn from_bcd(hour: u8, minute: u8, second: u8) -> Result<Self, Error> {
        Ok(Self {
            hour: from_bcd(hour, 23)?,
            minute: from_bcd(minute, 59)?,
            second: from_bcd(second, 59)?,
        })
    }

    pub const fn hour(&self) -> u8 {
        self.hour
    }

    pub const fn minute(&self) -> u8 {
        self.minute
    }

    pub const fn second(&self) -> u8 {
        self.second
    }

    /// `hh:mm:ss`
    pub fn to_modem_string(&self) -> String<8> {
        let mut s = String::new();
        // Fits, every field has two digits
        let _ = write!(s, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second);
        s
    }
}

fn from_bcd(bcd: u8, max: u8) -> Result<u8, Error> {
    let (tens, units) = (bcd >> 4, bcd & 0x0F);
    if tens > 9 || units > 9 {
        return Err(Error::InvalidArgument);
    }
    let value = tens * 10 + units;
    if value > max {
        return Err(Error::InvalidArgument);
    }
    Ok(value)
}

/// Parses the modem's `yy/MM/dd,hh:mm:ss±zz` clock format, where `zz` is the
/// offset from UTC in quarters of an hour, into seconds since the Unix epoch.
pub(crate) fn parse_timestamp(s: &str) -> Result<u64, Error> {
    let b = s.as_bytes();
    let layout_ok = b.len() == 20
        && b[2] == b'/'
        && b[5] == b'/'
        && b[8] == b','
        && b[11] == b':'
        && b[14] == b':'
        && matches!(b[17], b'+' | b'-');
    if !layout_ok {
        return Err(Error::MalformedResponse);
    }

    let field = |at: usize| -> Result<u32, Error> {
        let digits = &b[at..at + 2];
        if !digits.iter().all(u8::is_ascii_digit) {
            return Err(Error::MalformedResponse);
        }
        Ok(u32::from(digits[0] - b'0') * 10 + u32::from(digits[1] - b'0'))
    };

    let (year, month, day) = (field(0)?, field(3)?, field(6)?);
    let (hour, minute, second) = (field(9)?, field(12)?, field(15)?);
    let local = NaiveDate::from_ymd_opt(2000 + year as i32, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, second))
        .ok_or(Error::MalformedResponse)?;

    let mut offset = i64::from(field(18)?) * 15 * 60;
    if b[17] == b'-' {
        offset = -offset;
    }

    let secs = Utc.from_utc_datetime(&local).timestamp() - offset;
    u64::try_from(secs).map_err(|_| Error::MalformedResponse)
}

/// Wall clock fields of a Unix timestamp, restricted to the years the modem
/// clock can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockTime {
    pub year: u8,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl ClockTime {
    /// `yy/MM/dd,hh:mm:ss+00`
    pub fn to_modem_string(&self) -> String<20> {
        let mut s = String::new();
        // Fits, every field has two digits
        let _ = write!(
            s,
            "{:02}/{:02}/{:02},{:02}:{:02}:{:02}+00",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        );
        s
    }
}

impl TryFrom<u64> for ClockTime {
    type Error = Error;

    fn try_from(timestamp: u64) -> Result<Self, Self::Error> {
        let secs = i64::try_from(timestamp).map_err(|_| Error::InvalidArgument)?;
        let dt = Utc
            .timestamp_opt(secs, 0)
            .single()
            .ok_or(Error::InvalidArgument)?;
        if !(2000..2100).contains(&dt.year()) {
            return Err(Error::InvalidArgument);
        }

        Ok(Self {
            year: (dt.year() - 2000) as u8,
            month: dt.month() as u8,
            day: dt.day() as u8,
            hour: dt.hour() as u8,
            minute: dt.minute() as u8,
            second: dt.second() as u8,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alarm_index_range() {
        assert_eq!(AlarmIndex::try_from(0), Err(Error::InvalidArgument));
        assert_eq!(AlarmIndex::try_from(6), Err(Error::InvalidArgument));
        for i in 1..=5 {
            assert_eq!(AlarmIndex::try_from(i).map(AlarmIndex::get), Ok(i));
        }
    }

    #[test]
    fn bcd_fields() {
        let t = AlarmTime::from_bcd(0x23, 0x59, 0x09).unwrap();
        assert_eq!((t.hour(), t.minute(), t.second()), (23, 59, 9));
        assert_eq!(t.to_modem_string().as_str(), "23:59:09");

        assert!(AlarmTime::from_bcd(0x24, 0, 0).is_err());
        assert!(AlarmTime::from_bcd(0x1A, 0, 0).is_err());
        assert!(AlarmTime::from_bcd(0, 0x60, 0).is_err());
        assert!(AlarmTime::from_bcd(0, 0, 0xA0).is_err());
        // Binary 23 is 0x17, which reads as BCD 17
        assert_eq!(AlarmTime::from_bcd(23, 0, 0).unwrap().hour(), 17);
    }

    #[test]
    fn timestamps() {
        assert_eq!(parse_timestamp("19/06/01,12:00:00+00"), Ok(1_559_390_400));
        assert_eq!(parse_timestamp("19/06/01,12:00:00+08"), Ok(1_559_383_200));
        assert_eq!(parse_timestamp("19/06/01,12:00:00-04"), Ok(1_559_394_000));
        assert_eq!(parse_timestamp("19/13/01,12:00:00+00"), Err(Error::MalformedResponse));
        assert_eq!(parse_timestamp("19/06/01 12:00:00+00"), Err(Error::MalformedResponse));
        assert_eq!(parse_timestamp("19/06/01,12:00:00"), Err(Error::MalformedResponse));
    }

    #[test]
    fn clock_time_from_timestamp() {
        assert_eq!(
            ClockTime::try_from(1_559_390_400),
            Ok(ClockTime {
                year: 19,
                month: 6,
                day: 1,
                hour: 12,
                minute: 0,
                second: 0
            })
        );
        assert_eq!(
            ClockTime::try_from(1_559_390_405).unwrap().to_modem_string().as_str(),
            "19/06/01,12:00:05+00"
        );
        // 1999-12-31
        assert_eq!(ClockTime::try_from(946_684_799), Err(Error::InvalidArgument));
    }
}
