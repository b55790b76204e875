use crate::calibration::OversamplingRatio;

/// Quantity selected by a conversion command. D1 is pressure, D2 is temperature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Quantity {
    Pressure = 0,
    Temperature = 1,
}

pub enum Command {
    Reset,
    ReadProm(u8), // word index, 1..=6 hold C1..C6
    StartConversion(Quantity, OversamplingRatio),
    ReadAdc, // 24 bit pressure / temperature
}

impl Command {
    pub fn value(&self) -> u8 {
        match self {
            Command::Reset => 0x1E,
            Command::ReadProm(index) => 0xA0 | ((index & 0x07) << 1),
            Command::StartConversion(quantity, ratio) => {
                0x40 | ((*quantity as u8 & 0x01) << 4) | ratio.bits()
            }
            Command::ReadAdc => 0x00,
        }
    }
}
