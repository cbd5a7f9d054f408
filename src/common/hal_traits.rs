// src/common/hal_traits.rs

use embedded_hal::delay::DelayNs;

use super::error::DriverCode;
use super::types::{FieldData, HeaterConfig, Interface, OperatingMode, SensorConfig};

/// Register-level BME69x driver, treated as an opaque capability.
///
/// Every fallible call reports the driver's own signed status code, which
/// the bridge forwards to the host without interpretation.
pub trait Bme69xDriver {
    /// Soft-resets the chip, checks the chip id and loads calibration data.
    fn init(&mut self) -> Result<(), DriverCode>;

    /// Reads the oversampling/filter/ODR configuration currently in the chip.
    fn get_config(&mut self) -> Result<SensorConfig, DriverCode>;

    fn set_config(&mut self, config: &SensorConfig) -> Result<(), DriverCode>;

    /// Programs the heater profile used by the given operating mode.
    fn set_heater_config(&mut self, mode: OperatingMode, heater: &HeaterConfig) -> Result<(), DriverCode>;

    /// Switches the operating mode. Selecting `Forced` triggers one cycle.
    fn set_operating_mode(&mut self, mode: OperatingMode) -> Result<(), DriverCode>;

    /// Duration of the TPH+gas conversion in microseconds for `config`,
    /// not counting the heater hold time.
    fn measurement_duration_us(&mut self, mode: OperatingMode, config: &SensorConfig) -> u32;

    /// Reads back compensated data. Returns the first field and the number
    /// of fields that carried data (zero when nothing was ready).
    fn get_data(&mut self, mode: OperatingMode) -> Result<(FieldData, u8), DriverCode>;
}

/// Board support: bus bring-up, a millisecond clock and the blocking delay
/// primitive used to wait out a measurement.
pub trait BoardTransport: DelayNs {
    /// Opens the bus the sensor is attached to.
    fn interface_init(&mut self, interface: Interface) -> Result<(), DriverCode>;

    /// Releases the bus. Called exactly once when a session ends, whether or
    /// not `interface_init` succeeded.
    fn deinit(&mut self);

    /// Milliseconds since the board was opened. Wraps at `u32::MAX`.
    fn now_millis(&self) -> u32;
}
