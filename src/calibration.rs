use core::fmt;

/// MS5525DSO part number. Selects the row of Q coefficients used for compensation.
///
/// Do not reorder or add variants without updating `Q_COEFFICIENTS` in step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(non_camel_case_types)]
pub enum PartNumber {
    pp001DS,
    pp002GS,
    pp002DS,
    pp005GS,
    pp005DS,
    pp015GS,
    pp015AS,
    pp015DS,
    pp030AS,
    pp030GS,
    pp030DS,
}

/// Per-part shift exponents, one row per [`PartNumber`] in declaration order.
static Q_COEFFICIENTS: [[u8; 6]; 11] = [
    [15, 17, 7, 5, 7, 21], // pp001DS
    [14, 16, 8, 6, 7, 22], // pp002GS
    [16, 18, 6, 4, 7, 22], // pp002DS
    [16, 17, 6, 5, 7, 21], // pp005GS
    [17, 19, 5, 3, 7, 22], // pp005DS
    [16, 17, 6, 5, 7, 22], // pp015GS
    [16, 17, 6, 5, 7, 22], // pp015AS
    [17, 19, 5, 3, 7, 22], // pp015DS
    [17, 18, 5, 4, 7, 22], // pp030AS
    [17, 18, 5, 4, 7, 22], // pp030GS
    [18, 21, 4, 1, 7, 22], // pp030DS
];

impl PartNumber {
    /// Every part number, in the same order as the coefficient table.
    pub const ALL: [PartNumber; 11] = [
        PartNumber::pp001DS,
        PartNumber::pp002GS,
        PartNumber::pp002DS,
        PartNumber::pp005GS,
        PartNumber::pp005DS,
        PartNumber::pp015GS,
        PartNumber::pp015AS,
        PartNumber::pp015DS,
        PartNumber::pp030AS,
        PartNumber::pp030GS,
        PartNumber::pp030DS,
    ];

    pub fn q_coefficients(self) -> QCoefficients {
        let [q1, q2, q3, q4, q5, q6] = Q_COEFFICIENTS[self as usize];
        QCoefficients {
            q1,
            q2,
            q3,
            q4,
            q5,
            q6,
        }
    }
}

/// Shift exponents for one part number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QCoefficients {
    /// Q1: applied to C1 (pressure sensitivity)
    pub q1: u8,
    /// Q2: applied to C2 (pressure offset)
    pub q2: u8,
    /// Q3: applied to C3 * dT
    pub q3: u8,
    /// Q4: applied to C4 * dT
    pub q4: u8,
    /// Q5: applied to C5 (reference temperature)
    pub q5: u8,
    /// Q6: applied to C6 * dT
    pub q6: u8,
}

/// Oversampling Ratio
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum OversamplingRatio {
    Osr256 = 0x00,
    Osr512 = 0x02,
    Osr1024 = 0x04,
    Osr2048 = 0x06,
    #[default]
    Osr4096 = 0x08,
}

impl OversamplingRatio {
    /// Normalizes a raw setting: the low bit and anything above bit 3 are masked off,
    /// and a masked value above the top encoding is capped at [`OversamplingRatio::Osr4096`].
    pub fn from_bits(bits: u8) -> Self {
        match (bits & 0x0E).min(0x08) {
            0x00 => OversamplingRatio::Osr256,
            0x02 => OversamplingRatio::Osr512,
            0x04 => OversamplingRatio::Osr1024,
            0x06 => OversamplingRatio::Osr2048,
            _ => OversamplingRatio::Osr4096,
        }
    }

    pub fn bits(&self) -> u8 {
        *self as u8
    }

    /// Worst-case conversion time in MILLISECONDS.
    pub fn conversion_time_ms(&self) -> u32 {
        // 0.54 / 1.06 / 2.08 / 4.13 / 8.22 ms max
        match *self {
            OversamplingRatio::Osr256 => 1,
            OversamplingRatio::Osr512 => 2,
            OversamplingRatio::Osr1024 => 3,
            OversamplingRatio::Osr2048 => 5,
            OversamplingRatio::Osr4096 => 10,
        }
    }
}

impl From<u8> for OversamplingRatio {
    fn from(bits: u8) -> Self {
        OversamplingRatio::from_bits(bits)
    }
}

/// Factory calibration data read from PROM words 1..=6
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PromCoefficients {
    /// C1: Pressure sensitivity | SENST1
    pub sens_t1: u16,
    /// C2: Pressure offset | OFFT1
    pub off_t1: u16,
    /// C3: Temperature coefficient of pressure sensitivity | TCS
    pub tcs: u16,
    /// C4: Temperature coefficient of pressure offset | TCO
    pub tco: u16,
    /// C5: Reference temperature | TREF
    pub t_ref: u16,
    /// C6: Temperature coefficient of the temperature | TEMPSENS
    pub temp_sens: u16,
}

impl PromCoefficients {
    pub fn new(words: [u16; 6]) -> PromCoefficients {
        PromCoefficients {
            sens_t1: words[0],
            off_t1: words[1],
            tcs: words[2],
            tco: words[3],
            t_ref: words[4],
            temp_sens: words[5],
        }
    }

    /// Mutable access to word `Cn`, `n` in 1..=6.
    pub(crate) fn word_mut(&mut self, n: u8) -> Option<&mut u16> {
        match n {
            1 => Some(&mut self.sens_t1),
            2 => Some(&mut self.off_t1),
            3 => Some(&mut self.tcs),
            4 => Some(&mut self.tco),
            5 => Some(&mut self.t_ref),
            6 => Some(&mut self.temp_sens),
            _ => None,
        }
    }

    /// First order compensation of a raw pressure/temperature pair.
    ///
    /// All intermediate values are 64-bit signed; right shifts are arithmetic.
    pub fn compensate(&self, q: QCoefficients, raw: RawConversion) -> CompensatedReading {
        let d1 = raw.pressure as i64;
        let d2 = raw.temperature as i64;

        // Difference between actual and reference temperature
        let d_t = d2 - ((self.t_ref as i64) << q.q5);

        // Offset at actual temperature
        let off = ((self.off_t1 as i64) << q.q2) + ((self.tco as i64 * d_t) >> q.q4);

        // Sensitivity at actual temperature
        let sens = ((self.sens_t1 as i64) << q.q1) + ((self.tcs as i64 * d_t) >> q.q3);

        let pressure = (((sens * d1) >> 21) - off) >> 15;
        let temperature = 2000 + ((d_t * self.temp_sens as i64) >> q.q6);

        CompensatedReading {
            d_t,
            pressure,
            temperature,
        }
    }
}

impl fmt::Display for PromCoefficients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C1 - Pressure Sensitivity                            : {}\r\n", self.sens_t1)?;
        write!(f, "C2 - Pressure Offset                                 : {}\r\n", self.off_t1)?;
        write!(f, "C3 - Temperature Coefficient of Pressure Sensitivity : {}\r\n", self.tcs)?;
        write!(f, "C4 - Temperature Coefficient of Pressure Offset      : {}\r\n", self.tco)?;
        write!(f, "C5 - Reference Temperature                           : {}\r\n", self.t_ref)?;
        write!(f, "C6 - Temperature Coefficient of Temperature          : {}\r\n", self.temp_sens)
    }
}

/// Raw 24-bit ADC results. D1 is pressure, D2 is temperature.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawConversion {
    pub pressure: u32,
    pub temperature: u32,
}

/// Integer output of [`PromCoefficients::compensate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CompensatedReading {
    /// dT, raw ADC counts
    pub d_t: i64,
    /// Pressure in units of 0.0001 psi
    pub pressure: i64,
    /// Temperature in units of 0.01 °C
    pub temperature: i64,
}

impl CompensatedReading {
    pub fn pressure_psi(&self) -> f64 {
        self.pressure as f64 * 0.0001
    }

    pub fn temperature_celsius(&self) -> f64 {
        self.temperature as f64 * 0.01
    }
}
