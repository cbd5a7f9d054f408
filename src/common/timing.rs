// src/common/timing.rs

use core::ops::RangeInclusive;
use core::time::Duration;

use super::types::{HeaterConfig, SensorConfig};

// === Heater Limits ===

/// Accepted heater plate temperatures for `MEASURE`, in °C.
pub const HEATER_TEMP_RANGE_C: RangeInclusive<i32> = 100..=400;
/// Accepted heater hold durations for `MEASURE`, in milliseconds.
pub const HEATER_DURATION_RANGE_MS: RangeInclusive<i32> = 1..=40_000;

/// Heater profile applied during start-up, before any `MEASURE` arrives.
pub const DEFAULT_HEATER: HeaterConfig = HeaterConfig::new(320, 140);

// === Forced-Mode Measurement Duration ===
// Per-cycle costs of the TPH conversion, in microseconds.

/// One oversampling conversion cycle.
pub const MEAS_CYCLE_US: u32 = 1963;
/// Switching between the temperature, pressure and humidity channels.
pub const TPH_SWITCHING_US: u32 = 477 * 4;
/// Gas measurement overhead.
pub const GAS_MEASUREMENT_US: u32 = 477 * 5;
/// Wake-up from sleep, paid once per forced-mode trigger.
pub const WAKE_UP_US: u32 = 1000;

/// Duration of one forced-mode TPH+gas conversion for `config`, excluding
/// the heater hold time.
pub const fn forced_measurement_duration_us(config: &SensorConfig) -> u32 {
    let cycles = config.os_temp.cycles() + config.os_pres.cycles() + config.os_hum.cycles();
    cycles * MEAS_CYCLE_US + TPH_SWITCHING_US + GAS_MEASUREMENT_US + WAKE_UP_US
}

/// Total time the host must wait after triggering a forced-mode measurement:
/// the driver-reported conversion time plus the heater hold time.
pub const fn total_wait_us(measurement_duration_us: u32, heater: &HeaterConfig) -> u32 {
    measurement_duration_us.saturating_add(heater.duration_ms as u32 * 1000)
}

/// Same as [`total_wait_us`], as a `Duration`.
pub fn total_wait(measurement_duration_us: u32, heater: &HeaterConfig) -> Duration {
    Duration::from_micros(total_wait_us(measurement_duration_us, heater) as u64)
}
