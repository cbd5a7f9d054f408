// src/common/response/data.rs

use core::fmt;

use crate::common::types::{FieldData, StatusFlags};

/// One validated forced-mode sample, stamped with the board clock.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MeasurementSample {
    /// Board milliseconds at the time the sample was read back.
    pub timestamp_ms: u32,
    pub temperature_c: f32,
    pub pressure_pa: f32,
    pub humidity_pct: f32,
    pub gas_resistance_ohm: f32,
    pub status: StatusFlags,
}

impl MeasurementSample {
    pub fn from_field(timestamp_ms: u32, field: &FieldData) -> Self {
        MeasurementSample {
            timestamp_ms,
            temperature_c: field.temperature,
            pressure_pa: field.pressure,
            humidity_pct: field.humidity,
            gas_resistance_ohm: field.gas_resistance,
            status: field.status,
        }
    }

    #[inline]
    pub fn has_new_data(&self) -> bool {
        self.status.has_new_data()
    }

    #[inline]
    pub fn is_gas_valid(&self) -> bool {
        self.status.is_gas_valid()
    }

    #[inline]
    pub fn is_heat_stable(&self) -> bool {
        self.status.is_heat_stable()
    }
}

/// Payload of a `DATA` line (everything after the keyword).
impl fmt::Display for MeasurementSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.2} {:.2} {:.2} {:.2} {}",
            self.timestamp_ms,
            f64::from(self.temperature_c),
            f64::from(self.pressure_pa),
            f64::from(self.humidity_pct),
            f64::from(self.gas_resistance_ohm),
            self.status,
        )
    }
}
