use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// The two sensor chips on the Sense HAT environmental block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Chip {
    /// Humidity / temperature sensor.
    Hts221,
    /// Pressure / temperature sensor.
    Lps25h,
}

impl fmt::Display for Chip {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Chip::Hts221 => f.write_str("HTS221"),
            Chip::Lps25h => f.write_str("LPS25H"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// The bus device node is missing or cannot be opened. Retrying does not
    /// help; I2C has to be enabled on the host.
    #[error("I2C bus {path} is unavailable ({reason}); enable I2C on the host and expose the device")]
    BusUnavailable { path: String, reason: String },

    /// A single register transaction failed.
    #[error("{chip} register {register:#04x} failed while {operation}: {source}")]
    Transaction {
        chip: Chip,
        register: u8,
        operation: &'static str,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl Error {
    pub(crate) fn transaction<E>(chip: Chip, register: u8, operation: &'static str, source: E) -> Error
    where
        E: StdError + Send + Sync + 'static,
    {
        Error::Transaction {
            chip,
            register,
            operation,
            source: Box::new(source),
        }
    }

    pub fn is_bus_unavailable(&self) -> bool {
        matches!(self, Error::BusUnavailable { .. })
    }

    /// Chip that failed, if the error came from a transaction.
    pub fn chip(&self) -> Option<Chip> {
        match *self {
            Error::Transaction { chip, .. } => Some(chip),
            Error::BusUnavailable { .. } => None,
        }
    }

    /// Register that failed, if the error came from a transaction.
    pub fn register(&self) -> Option<u8> {
        match *self {
            Error::Transaction { register, .. } => Some(register),
            Error::BusUnavailable { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn transaction_message_names_chip_and_register() {
        let err = Error::transaction(
            Chip::Lps25h,
            0x28,
            "reading pressure",
            io::Error::new(io::ErrorKind::Other, "nack"),
        );
        assert_eq!(
            err.to_string(),
            "LPS25H register 0x28 failed while reading pressure: nack"
        );
        assert_eq!(err.chip(), Some(Chip::Lps25h));
        assert_eq!(err.register(), Some(0x28));
        assert!(err.source().is_some());
        assert!(!err.is_bus_unavailable());
    }

    #[test]
    fn bus_unavailable_points_at_host_setup() {
        let err = Error::BusUnavailable {
            path: "/dev/i2c-1".to_string(),
            reason: "no such device node".to_string(),
        };
        assert!(err.is_bus_unavailable());
        assert_eq!(err.chip(), None);
        assert!(err.to_string().contains("enable I2C on the host"));
    }
}
