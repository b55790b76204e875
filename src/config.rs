use crate::calibration::OversamplingRatio;

/// Sensor address with the CSB pin HIGH.
pub const DEFAULT_ADDRESS: u8 = 0x76;

/// Sensor address with the CSB pin LOW.
pub const ALTERNATE_ADDRESS: u8 = 0x77;

/// Construction-time settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// 7-bit I2C address used by [`crate::Ms5525dso::begin`]
    pub address: u8,
    pub oversampling: OversamplingRatio,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            address: DEFAULT_ADDRESS,
            oversampling: OversamplingRatio::Osr4096,
        }
    }
}

impl Config {
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Accepts a typed ratio or a raw setting, which is normalized the same way as
    /// [`crate::Ms5525dso::set_oversampling`].
    pub fn with_oversampling(mut self, oversampling: impl Into<OversamplingRatio>) -> Self {
        self.oversampling = oversampling.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_csb_high_and_highest_resolution() {
        let config = Config::default();
        assert_eq!(config.address, 0x76);
        assert_eq!(config.oversampling, OversamplingRatio::Osr4096);
    }

    #[test]
    fn builder_normalizes_raw_oversampling() {
        let config = Config::default()
            .with_address(ALTERNATE_ADDRESS)
            .with_oversampling(5u8);
        assert_eq!(config.address, 0x77);
        assert_eq!(config.oversampling, OversamplingRatio::Osr1024);
    }
}
