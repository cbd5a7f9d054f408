// src/common/types.rs

use core::fmt;
use core::str::FromStr;

// --- Sensor configuration ---

/// Oversampling setting for one of the temperature/pressure/humidity channels.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Oversampling {
    /// Channel skipped.
    None,
    #[default]
    X1,
    X2,
    X4,
    X8,
    X16,
}

impl Oversampling {
    /// Highest setting the sensor supports.
    pub const MAX: Oversampling = Oversampling::X16;

    /// Number of ADC conversion cycles this setting costs in one forced-mode cycle.
    pub const fn cycles(self) -> u32 {
        match self {
            Oversampling::None => 0,
            Oversampling::X1 => 1,
            Oversampling::X2 => 2,
            Oversampling::X4 => 4,
            Oversampling::X8 => 8,
            Oversampling::X16 => 16,
        }
    }
}

/// IIR filter coefficient.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Filter {
    #[default]
    Off,
    Size1,
    Size3,
    Size7,
    Size15,
    Size31,
    Size63,
    Size127,
}

/// Standby time between measurements in sequential/parallel modes.
/// `None` means the sensor only measures when triggered.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum OutputDataRate {
    #[default]
    None,
    Ms0_59,
    Ms62_5,
    Ms125,
    Ms250,
    Ms500,
    Ms1000,
    Ms10,
    Ms20,
}

/// Measurement configuration read from and written back to the driver.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct SensorConfig {
    pub os_hum: Oversampling,
    pub os_pres: Oversampling,
    pub os_temp: Oversampling,
    pub filter: Filter,
    pub odr: OutputDataRate,
}

impl SensorConfig {
    /// Returns a copy set up for forced-mode only operation: every channel at
    /// `oversampling`, filter off, no output data rate.
    pub fn forced_profile(self, oversampling: Oversampling) -> Self {
        SensorConfig {
            os_hum: oversampling,
            os_pres: oversampling,
            os_temp: oversampling,
            filter: Filter::Off,
            odr: OutputDataRate::None,
        }
    }
}

/// Heater plate profile used before a gas resistance reading.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct HeaterConfig {
    pub enable: bool,
    /// Target plate temperature in °C.
    pub temperature_c: u16,
    /// Hold duration in milliseconds.
    pub duration_ms: u16,
}

impl HeaterConfig {
    pub const fn new(temperature_c: u16, duration_ms: u16) -> Self {
        HeaterConfig { enable: true, temperature_c, duration_ms }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum OperatingMode {
    Sleep,
    /// One heat/measure cycle per trigger, then back to sleep.
    Forced,
    Parallel,
    Sequential,
}

/// Bus the board transport talks to the sensor over.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Interface {
    #[default]
    Spi,
    I2c,
}

impl FromStr for Interface {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("spi") {
            Ok(Interface::Spi)
        } else if s.eq_ignore_ascii_case("i2c") {
            Ok(Interface::I2c)
        } else {
            Err(())
        }
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interface::Spi => f.write_str("spi"),
            Interface::I2c => f.write_str("i2c"),
        }
    }
}

// --- Measurement data ---

/// Status byte attached to every field of measurement data.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct StatusFlags(pub u8);

impl StatusFlags {
    pub const NEW_DATA: u8 = 0x80;
    pub const GAS_VALID: u8 = 0x20;
    pub const HEAT_STABLE: u8 = 0x10;
    /// All three bits must be set for a usable forced-mode sample (`0b1011_0000`).
    pub const REQUIRED: u8 = Self::NEW_DATA | Self::GAS_VALID | Self::HEAT_STABLE;

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn has_new_data(self) -> bool {
        self.0 & Self::NEW_DATA != 0
    }

    #[inline]
    pub const fn is_gas_valid(self) -> bool {
        self.0 & Self::GAS_VALID != 0
    }

    #[inline]
    pub const fn is_heat_stable(self) -> bool {
        self.0 & Self::HEAT_STABLE != 0
    }

    #[inline]
    pub const fn is_complete(self) -> bool {
        self.0 & Self::REQUIRED == Self::REQUIRED
    }
}

impl fmt::Display for StatusFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x}", self.0)
    }
}

/// One field of compensated data as returned by the driver.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct FieldData {
    pub temperature: f32,
    pub pressure: f32,
    pub humidity: f32,
    pub gas_resistance: f32,
    pub status: StatusFlags,
}
