// src/bridge/mock.rs

//! Scripted driver/board pair shared by the bridge tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;

use crate::common::{
    timing, BoardTransport, Bme69xDriver, DriverCode, FieldData, HeaterConfig, Interface,
    OperatingMode, SensorConfig, StatusFlags,
};

#[derive(Debug)]
pub(crate) struct MockState {
    /// Every capability call, in order.
    pub calls: Vec<&'static str>,
    /// Calls that should fail, keyed by name, with the code to return.
    pub failures: HashMap<&'static str, DriverCode>,
    pub interface: Option<Interface>,
    pub chip_config: SensorConfig,
    pub heater: Option<(OperatingMode, HeaterConfig)>,
    pub mode: OperatingMode,
    pub n_fields: u8,
    pub field: FieldData,
    pub delays_us: Vec<u32>,
    pub now_ms: u32,
    pub deinit_count: u32,
}

impl Default for MockState {
    fn default() -> Self {
        MockState {
            calls: Vec::new(),
            failures: HashMap::new(),
            interface: None,
            chip_config: SensorConfig::default(),
            heater: None,
            mode: OperatingMode::Sleep,
            n_fields: 1,
            field: FieldData {
                temperature: 24.5,
                pressure: 100_812.5,
                humidity: 45.25,
                gas_resistance: 12_345.75,
                status: StatusFlags(StatusFlags::REQUIRED),
            },
            delays_us: Vec::new(),
            now_ms: 1_000,
            deinit_count: 0,
        }
    }
}

pub(crate) type SharedState = Rc<RefCell<MockState>>;

impl MockState {
    pub fn fail_on(state: &SharedState, call: &'static str, code: DriverCode) {
        state.borrow_mut().failures.insert(call, code);
    }

    /// Number of recorded calls named `call`.
    pub fn count(state: &SharedState, call: &str) -> usize {
        state.borrow().calls.iter().filter(|c| **c == call).count()
    }
}

pub(crate) struct MockDriver(SharedState);
pub(crate) struct MockBoard(SharedState);

pub(crate) fn mock_pair() -> (MockDriver, MockBoard, SharedState) {
    let state = Rc::new(RefCell::new(MockState::default()));
    (MockDriver(state.clone()), MockBoard(state.clone()), state)
}

fn record(state: &SharedState, call: &'static str) -> Result<(), DriverCode> {
    let mut s = state.borrow_mut();
    s.calls.push(call);
    match s.failures.get(call) {
        Some(code) => Err(*code),
        None => Ok(()),
    }
}

impl Bme69xDriver for MockDriver {
    fn init(&mut self) -> Result<(), DriverCode> {
        record(&self.0, "init")
    }

    fn get_config(&mut self) -> Result<SensorConfig, DriverCode> {
        record(&self.0, "get_config")?;
        Ok(self.0.borrow().chip_config)
    }

    fn set_config(&mut self, config: &SensorConfig) -> Result<(), DriverCode> {
        record(&self.0, "set_config")?;
        self.0.borrow_mut().chip_config = *config;
        Ok(())
    }

    fn set_heater_config(&mut self, mode: OperatingMode, heater: &HeaterConfig) -> Result<(), DriverCode> {
        record(&self.0, "set_heater_config")?;
        self.0.borrow_mut().heater = Some((mode, *heater));
        Ok(())
    }

    fn set_operating_mode(&mut self, mode: OperatingMode) -> Result<(), DriverCode> {
        record(&self.0, "set_operating_mode")?;
        self.0.borrow_mut().mode = mode;
        Ok(())
    }

    fn measurement_duration_us(&mut self, _mode: OperatingMode, config: &SensorConfig) -> u32 {
        self.0.borrow_mut().calls.push("measurement_duration_us");
        timing::forced_measurement_duration_us(config)
    }

    fn get_data(&mut self, _mode: OperatingMode) -> Result<(FieldData, u8), DriverCode> {
        record(&self.0, "get_data")?;
        let s = self.0.borrow();
        Ok((s.field, s.n_fields))
    }
}

impl DelayNs for MockBoard {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_us(ns / 1000);
    }

    fn delay_us(&mut self, us: u32) {
        let mut s = self.0.borrow_mut();
        s.calls.push("delay");
        s.delays_us.push(us);
        s.now_ms = s.now_ms.wrapping_add(us / 1000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay_us(ms.saturating_mul(1000));
    }
}

impl BoardTransport for MockBoard {
    fn interface_init(&mut self, interface: Interface) -> Result<(), DriverCode> {
        record(&self.0, "interface_init")?;
        self.0.borrow_mut().interface = Some(interface);
        Ok(())
    }

    fn deinit(&mut self) {
        let mut s = self.0.borrow_mut();
        s.calls.push("deinit");
        s.deinit_count += 1;
    }

    fn now_millis(&self) -> u32 {
        self.0.borrow().now_ms
    }
}
