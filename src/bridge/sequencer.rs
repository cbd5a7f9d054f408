// src/bridge/sequencer.rs

use log::debug;

use super::session::Bridge;
use crate::common::{
    error::MeasureError,
    hal_traits::{BoardTransport, Bme69xDriver},
    response::MeasurementSample,
    timing,
    types::{HeaterConfig, OperatingMode},
};

impl<D, B> Bridge<D, B>
where
    D: Bme69xDriver,
    B: BoardTransport,
{
    /// Runs one forced-mode measurement with the given heater profile.
    ///
    /// Arguments are checked in order (session ready, temperature, duration)
    /// before the sensor is touched. Driver failures are returned as-is and
    /// never retried. Blocks for the full conversion plus heater time.
    pub fn measure(&mut self, temp_c: i32, duration_ms: i32) -> Result<MeasurementSample, MeasureError> {
        if !self.session.initialized {
            return Err(MeasureError::NotReady);
        }
        if !timing::HEATER_TEMP_RANGE_C.contains(&temp_c) {
            return Err(MeasureError::TempRange(temp_c));
        }
        if !timing::HEATER_DURATION_RANGE_MS.contains(&duration_ms) {
            return Err(MeasureError::DurationRange(duration_ms));
        }

        // Both ranges fit in u16.
        self.session.heater = HeaterConfig {
            temperature_c: temp_c as u16,
            duration_ms: duration_ms as u16,
            ..self.session.heater
        };

        // 1. Heater profile
        self.driver
            .set_heater_config(OperatingMode::Forced, &self.session.heater)
            .map_err(MeasureError::SetHeater)?;

        // 2. Trigger
        self.driver
            .set_operating_mode(OperatingMode::Forced)
            .map_err(MeasureError::SetMode)?;

        // 3. Wait for conversion and heater hold; the data is not valid before.
        let meas_us = self
            .driver
            .measurement_duration_us(OperatingMode::Forced, &self.session.config);
        let wait_us = timing::total_wait_us(meas_us, &self.session.heater);
        debug!("waiting {} us ({} us conversion)", wait_us, meas_us);
        self.board.delay_us(wait_us);

        // 4. Read back
        let (field, n_fields) = self
            .driver
            .get_data(OperatingMode::Forced)
            .map_err(MeasureError::GetData)?;
        if n_fields == 0 {
            return Err(MeasureError::NoData);
        }
        if !field.status.is_complete() {
            return Err(MeasureError::Status(field.status.bits()));
        }

        Ok(MeasurementSample::from_field(self.board.now_millis(), &field))
    }
}
