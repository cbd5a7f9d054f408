// src/synthetic.rs

//! Simulated sensor and board for running the bridge without hardware.
//!
//! Readings follow a simple model shaped by the heater temperature, so a
//! host can exercise the full protocol (including the real wait times)
//! on a development machine.

use std::thread;
use std::time::{Duration, Instant};

use embedded_hal::delay::DelayNs;
use log::debug;

use crate::common::{
    timing, BoardTransport, Bme69xDriver, DriverCode, FieldData, HeaterConfig, Interface,
    OperatingMode, SensorConfig, StatusFlags,
};

/// A BME69x stand-in that produces plausible forced-mode samples.
#[derive(Debug)]
pub struct SyntheticSensor {
    started: Instant,
    config: SensorConfig,
    heater: Option<HeaterConfig>,
    mode: OperatingMode,
    /// Set by a forced-mode trigger, cleared when data is read.
    pending: bool,
}

impl SyntheticSensor {
    pub fn new() -> Self {
        SyntheticSensor {
            started: Instant::now(),
            config: SensorConfig::default(),
            heater: None,
            mode: OperatingMode::Sleep,
            pending: false,
        }
    }

    /// Model output for a heater plate at `temp_c` after `elapsed_s` seconds.
    pub fn model(temp_c: u16, elapsed_s: u64) -> FieldData {
        let t = f32::from(temp_c);
        let base = 10_000.0 / t.max(1.0);
        FieldData {
            gas_resistance: base * (1.0 + 0.05 * (elapsed_s % 5) as f32),
            temperature: 25.0 + (t - 150.0) / 300.0,
            humidity: 40.0 + (t - 180.0) / 220.0,
            pressure: 101_325.0 - (t - 200.0) * 2.0,
            status: StatusFlags(StatusFlags::REQUIRED),
        }
    }
}

impl Default for SyntheticSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl Bme69xDriver for SyntheticSensor {
    fn init(&mut self) -> Result<(), DriverCode> {
        self.mode = OperatingMode::Sleep;
        self.pending = false;
        debug!("synthetic sensor initialised");
        Ok(())
    }

    fn get_config(&mut self) -> Result<SensorConfig, DriverCode> {
        Ok(self.config)
    }

    fn set_config(&mut self, config: &SensorConfig) -> Result<(), DriverCode> {
        self.config = *config;
        Ok(())
    }

    fn set_heater_config(&mut self, mode: OperatingMode, heater: &HeaterConfig) -> Result<(), DriverCode> {
        if mode != OperatingMode::Forced {
            return Err(DriverCode::W_DEFINE_OP_MODE);
        }
        self.heater = Some(*heater);
        Ok(())
    }

    fn set_operating_mode(&mut self, mode: OperatingMode) -> Result<(), DriverCode> {
        self.mode = mode;
        self.pending = mode == OperatingMode::Forced;
        Ok(())
    }

    fn measurement_duration_us(&mut self, _mode: OperatingMode, config: &SensorConfig) -> u32 {
        timing::forced_measurement_duration_us(config)
    }

    fn get_data(&mut self, _mode: OperatingMode) -> Result<(FieldData, u8), DriverCode> {
        if !self.pending {
            return Err(DriverCode::W_NO_NEW_DATA);
        }
        self.pending = false;
        // Forced mode drops back to sleep after one cycle
        self.mode = OperatingMode::Sleep;

        let heater = self.heater.unwrap_or(timing::DEFAULT_HEATER);
        let mut field = Self::model(heater.temperature_c, self.started.elapsed().as_secs());
        if !heater.enable {
            field.status = StatusFlags(StatusFlags::NEW_DATA);
        }
        Ok((field, 1))
    }
}

/// Host-side board: wall-clock delays and a millisecond clock.
#[derive(Debug)]
pub struct SyntheticBoard {
    opened: Instant,
    interface: Option<Interface>,
}

impl SyntheticBoard {
    pub fn new() -> Self {
        SyntheticBoard { opened: Instant::now(), interface: None }
    }

    pub fn interface(&self) -> Option<Interface> {
        self.interface
    }
}

impl Default for SyntheticBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayNs for SyntheticBoard {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_us(&mut self, us: u32) {
        thread::sleep(Duration::from_micros(u64::from(us)));
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

impl BoardTransport for SyntheticBoard {
    fn interface_init(&mut self, interface: Interface) -> Result<(), DriverCode> {
        self.interface = Some(interface);
        self.opened = Instant::now();
        debug!("synthetic board opened on {}", interface);
        Ok(())
    }

    fn deinit(&mut self) {
        if let Some(interface) = self.interface.take() {
            debug!("synthetic board closed ({})", interface);
        }
    }

    fn now_millis(&self) -> u32 {
        // truncation gives the wrap-around a u32 millisecond counter has
        self.opened.elapsed().as_millis() as u32
    }
}
