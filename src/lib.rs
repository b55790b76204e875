//! Platform agnostic driver for the MEAS MS5525DSO differential/gauge/absolute
//! pressure sensor over I2C, built on [`embedded-hal`] 1.0.
//!
//! The sensor stores six factory calibration words in PROM. Together with a
//! per-part table of shift exponents they turn the raw 24-bit pressure (D1)
//! and temperature (D2) conversions into psi and °C using the first order
//! compensation formula from the datasheet.
//!
//! The driver does not configure the bus: set up the I2C peripheral (max
//! 400 kHz) before calling [`Ms5525dso::begin`].
//!
//! ```ignore
//! use ms5525dso::{Ms5525dso, OversamplingRatio, PartNumber};
//!
//! let mut sensor = Ms5525dso::new(PartNumber::pp001DS, i2c, delay);
//! sensor.begin()?;
//! sensor.set_oversampling(OversamplingRatio::Osr1024);
//! let measurement = sensor.read_pressure_and_temperature()?;
//! ```
//!
//! ## Features
//!
//! - `defmt`: log through `defmt` and derive `defmt::Format` on public types.
//! - `log`: log through the `log` facade.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal/1.0.0

#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("Features \"defmt\" and \"log\" are mutually exclusive and cannot be enabled together");

// must stay first so the logging macros are visible to the other modules
mod fmt;

mod calibration;
mod command;
mod config;
mod error;

pub use calibration::{
    CompensatedReading, OversamplingRatio, PartNumber, PromCoefficients, QCoefficients,
    RawConversion,
};
pub use command::Quantity;
pub use config::{Config, ALTERNATE_ADDRESS, DEFAULT_ADDRESS};
pub use error::Error;

use command::Command;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

/// Settle time after a reset command, in milliseconds.
const RESET_DELAY_MS: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// PROM not loaded, or the last load was incomplete.
    Uninitialized,
    /// All six PROM words were read by the last initialization.
    Ready,
}

/// Compensated pressure in psi and temperature in °C.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    pub pressure: f64,
    pub temperature: f64,
}

/// One MS5525DSO on an I2C bus.
///
/// The driver holds no lock; share it between threads only behind external
/// synchronization.
pub struct Ms5525dso<I2C, D> {
    i2c: Option<I2C>,
    delay: D,
    part: PartNumber,
    prom: PromCoefficients,
    oversampling_ratio: OversamplingRatio,
    address: u8,
    state: State,
}

impl<I2C, D> Ms5525dso<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Create a driver at [`DEFAULT_ADDRESS`] with OSR4096.
    /// Nothing is sent on the bus until [`Ms5525dso::begin`] or [`Ms5525dso::initialize`].
    pub fn new(part: PartNumber, i2c: I2C, delay: D) -> Self {
        Self::with_config(part, i2c, delay, Config::default())
    }

    pub fn with_config(part: PartNumber, i2c: I2C, delay: D, config: Config) -> Self {
        let mut sensor = Self::unbound(part, delay, config);
        sensor.i2c = Some(i2c);
        sensor
    }

    /// Create a driver with no bus bound. Every bus operation fails with
    /// [`Error::BusUnavailable`] until [`Ms5525dso::attach_bus`] is called.
    pub fn unbound(part: PartNumber, delay: D, config: Config) -> Self {
        Self {
            i2c: None,
            delay,
            part,
            prom: PromCoefficients::default(),
            oversampling_ratio: config.oversampling,
            address: config.address,
            state: State::Uninitialized,
        }
    }

    /// Bind a bus, returning the previously bound one if any.
    pub fn attach_bus(&mut self, i2c: I2C) -> Option<I2C> {
        self.i2c.replace(i2c)
    }

    /// Unbind the bus. Calibration data is kept.
    pub fn detach_bus(&mut self) -> Option<I2C> {
        self.i2c.take()
    }

    /// Release the bus and delay, consuming the driver.
    pub fn release(self) -> (Option<I2C>, D) {
        (self.i2c, self.delay)
    }

    pub fn part(&self) -> PartNumber {
        self.part
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Calibration words as last read. Only trustworthy when [`Ms5525dso::state`] is [`State::Ready`].
    pub fn prom(&self) -> &PromCoefficients {
        &self.prom
    }

    pub fn oversampling(&self) -> OversamplingRatio {
        self.oversampling_ratio
    }

    /// Select the oversampling ratio for subsequent acquisitions.
    ///
    /// Raw `u8` settings are never rejected: they are masked to the valid bits
    /// and capped at OSR4096 (see [`OversamplingRatio::from_bits`]).
    pub fn set_oversampling(&mut self, ratio: impl Into<OversamplingRatio>) {
        self.oversampling_ratio = ratio.into();
    }

    /// [`Ms5525dso::initialize`] at the configured address.
    pub fn begin(&mut self) -> Result<(), Error<I2C::Error>> {
        self.initialize(self.address)
    }

    /// Reset the sensor and load the six PROM calibration words.
    ///
    /// A failed PROM read does not stop the remaining reads. On
    /// [`Error::PromReadFailure`] the words that were read are updated and the
    /// failed ones keep their previous value.
    pub fn initialize(&mut self, address: u8) -> Result<(), Error<I2C::Error>> {
        if self.i2c.is_none() {
            return Err(Error::BusUnavailable);
        }
        self.address = address;
        self.state = State::Uninitialized;
        debug!("initializing {:?} at address {:#x}", self.part, address);

        self.reset()?;

        let mut failed = 0u8;
        for n in 1..=6u8 {
            match self.read_prom(n) {
                Ok(word) => {
                    if let Some(c) = self.prom.word_mut(n) {
                        *c = word;
                    }
                }
                Err(_) => {
                    warn!("failed to read PROM word C{}", n);
                    failed |= 1 << (n - 1);
                }
            }
        }

        if failed != 0 {
            return Err(Error::PromReadFailure { failed });
        }

        self.state = State::Ready;
        info!("calibration loaded from address {:#x}", address);
        Ok(())
    }

    /// Send the reset command and wait for the sensor to reload its PROM.
    pub fn reset(&mut self) -> Result<(), Error<I2C::Error>> {
        let address = self.address;
        self.bus()?
            .write(address, &[Command::Reset.value()])
            .map_err(Error::Bus)?;
        self.delay.delay_ms(RESET_DELAY_MS);
        Ok(())
    }

    /// Convert and read D1 then D2 at the current oversampling ratio.
    pub fn read_raw(&mut self) -> Result<RawConversion, Error<I2C::Error>> {
        let pressure = self.convert(Quantity::Pressure)?;
        let temperature = self.convert(Quantity::Temperature)?;
        trace!("D1 = {}, D2 = {}", pressure, temperature);
        Ok(RawConversion {
            pressure,
            temperature,
        })
    }

    /// Apply the loaded calibration to a raw conversion pair.
    pub fn compensate(&self, raw: RawConversion) -> CompensatedReading {
        self.prom.compensate(self.part.q_coefficients(), raw)
    }

    /// Pressure in psi and temperature in °C.
    ///
    /// If either conversion read fails nothing is computed and the error is returned.
    pub fn read_pressure_and_temperature(&mut self) -> Result<Measurement, Error<I2C::Error>> {
        let raw = self.read_raw()?;
        let reading = self.compensate(raw);
        Ok(Measurement {
            pressure: reading.pressure_psi(),
            temperature: reading.temperature_celsius(),
        })
    }

    /// Pressure in psi. Both conversions are still performed.
    pub fn read_pressure(&mut self) -> Result<f64, Error<I2C::Error>> {
        let raw = self.read_raw()?;
        Ok(self.compensate(raw).pressure_psi())
    }

    /// Write the calibration words to `sink`, one labelled line each. Debugging only.
    pub fn dump_coefficients<W: core::fmt::Write>(&self, sink: &mut W) -> core::fmt::Result {
        write!(sink, "{}", self.prom)
    }

    fn bus(&mut self) -> Result<&mut I2C, Error<I2C::Error>> {
        self.i2c.as_mut().ok_or(Error::BusUnavailable)
    }

    fn read_prom(&mut self, n: u8) -> Result<u16, Error<I2C::Error>> {
        let address = self.address;
        let i2c = self.bus()?;
        i2c.write(address, &[Command::ReadProm(n).value()])
            .map_err(Error::Bus)?;

        let mut buffer = [0u8; 2];
        i2c.read(address, &mut buffer)
            .map_err(|_| Error::PromReadFailure { failed: 1 << (n - 1) })?;
        Ok(u16::from_be_bytes(buffer))
    }

    // Start a conversion, wait it out, then fetch the 24 bit result.
    fn convert(&mut self, quantity: Quantity) -> Result<u32, Error<I2C::Error>> {
        let address = self.address;
        let ratio = self.oversampling_ratio;

        self.bus()?
            .write(address, &[Command::StartConversion(quantity, ratio).value()])
            .map_err(Error::Bus)?;

        self.delay.delay_ms(ratio.conversion_time_ms());

        let i2c = self.bus()?;
        i2c.write(address, &[Command::ReadAdc.value()])
            .map_err(Error::Bus)?;

        // ADC is 24bit but we are storing in u32.
        let mut buffer = [0u8; 4];
        i2c.read(address, &mut buffer[1..]).map_err(|source| {
            error!("{:?} conversion read failed", quantity);
            Error::ConversionReadFailure { quantity, source }
        })?;
        Ok(u32::from_be_bytes(buffer))
    }
}
