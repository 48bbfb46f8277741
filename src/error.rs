use core::str::FromStr;

/// Reason carried by a terminal error line from the modem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModemError {
    /// Bare `ERROR`, or a caller-supplied error pattern.
    Generic,
    /// `+CME ERROR: <n>`. `None` when the reason is verbose text.
    Cme(Option<u16>),
    /// `+CMS ERROR: <n>`. `None` when the reason is verbose text.
    Cms(Option<u16>),
}

impl FromStr for ModemError {
    // This error will always get mapped to `Error::MalformedResponse`
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(if let Some(code) = s.strip_prefix("+CME ERROR:") {
            Self::Cme(code.trim().parse().ok())
        } else if let Some(code) = s.strip_prefix("+CMS ERROR:") {
            Self::Cms(code.trim().parse().ok())
        } else {
            Self::Generic
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// No terminal line matched before the deadline.
    Timeout,
    /// The modem answered with an error token.
    ModemRejected(ModemError),
    /// A line expected to carry a parsable field did not.
    MalformedResponse,
    /// The receive ring buffer overflowed while a command was outstanding.
    BufferOverrun,
    /// Rejected locally, nothing was written to the transport.
    InvalidArgument,

    // General device errors
    Write,
    Busy,
    Uninitialized,
    IoPin,
}

impl From<ModemError> for Error {
    fn from(e: ModemError) -> Self {
        Self::ModemRejected(e)
    }
}

impl From<atat::Error> for Error {
    fn from(e: atat::Error) -> Self {
        match e {
            atat::Error::Timeout => Self::Timeout,
            atat::Error::Write => Self::Write,
            // Parsing is the only fallible step the engine leaves to atat
            _ => Self::MalformedResponse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atat_errors() {
        assert_eq!(Error::from(atat::Error::Parse), Error::MalformedResponse);
        assert_eq!(Error::from(atat::Error::Timeout), Error::Timeout);
    }

    #[test]
    fn generic_error() {
        assert_eq!("ERROR".parse::<ModemError>(), Ok(ModemError::Generic));
    }

    #[test]
    fn numeric_error() {
        assert_eq!(
            "+CME ERROR: 10".parse::<ModemError>(),
            Ok(ModemError::Cme(Some(10)))
        );
        assert_eq!(
            "+CMS ERROR: 321".parse::<ModemError>(),
            Ok(ModemError::Cms(Some(321)))
        );
    }

    #[test]
    fn verbose_error() {
        assert_eq!(
            "+CME ERROR: SIM not inserted".parse::<ModemError>(),
            Ok(ModemError::Cme(None))
        );
        assert_eq!(
            "+CMS ERROR: invalid memory index".parse::<ModemError>(),
            Ok(ModemError::Cms(None))
        );
    }
}
