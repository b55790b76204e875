use core::fmt;

use crate::command::Quantity;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// No I2C bus is bound to the driver.
    BusUnavailable,
    /// One or more PROM words could not be read. Bit `n - 1` of `failed` is set when word `Cn` failed.
    PromReadFailure { failed: u8 },
    /// The 24-bit ADC result for `quantity` could not be read.
    ConversionReadFailure { quantity: Quantity, source: E },
    /// A command write was not accepted by the bus.
    Bus(E),
}

impl<E> Error<E> {
    /// True when PROM word `Cn` is among the failed reads.
    pub fn prom_word_failed(&self, n: u8) -> bool {
        match self {
            Error::PromReadFailure { failed } => (1..=6).contains(&n) && failed & (1 << (n - 1)) != 0,
            _ => false,
        }
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BusUnavailable => f.write_str("no I2C bus bound to the sensor"),
            Error::PromReadFailure { failed } => {
                write!(f, "PROM calibration read failed (words {:#08b})", failed)
            }
            Error::ConversionReadFailure { quantity, source } => {
                write!(f, "{:?} conversion read failed: {:?}", quantity, source)
            }
            Error::Bus(e) => write!(f, "I2C write failed: {:?}", e),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for Error<E> {}
