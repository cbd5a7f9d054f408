// src/common/error.rs

use core::fmt;

use super::response::ErrorCode;

/// Signed status code returned by the sensor driver or the board transport.
///
/// Codes are passed through to the protocol untouched; the named constants
/// only exist for logging and tests.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct DriverCode(pub i8);

impl DriverCode {
    pub const OK: DriverCode = DriverCode(0);
    pub const E_NULL_PTR: DriverCode = DriverCode(-1);
    pub const E_COM_FAIL: DriverCode = DriverCode(-2);
    pub const E_DEV_NOT_FOUND: DriverCode = DriverCode(-3);
    pub const E_INVALID_LENGTH: DriverCode = DriverCode(-4);
    pub const E_SELF_TEST: DriverCode = DriverCode(-5);
    pub const W_DEFINE_OP_MODE: DriverCode = DriverCode(1);
    pub const W_NO_NEW_DATA: DriverCode = DriverCode(2);

    #[inline]
    pub const fn value(self) -> i32 {
        self.0 as i32
    }
}

impl fmt::Display for DriverCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Step of the start-up sequence that failed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum InitStage {
    InterfaceInit,
    DriverInit,
    GetConfig,
    SetConfig,
    SetHeater,
}

impl fmt::Display for InitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InitStage::InterfaceInit => "interface_init",
            InitStage::DriverInit => "init",
            InitStage::GetConfig => "get_config",
            InitStage::SetConfig => "set_config",
            InitStage::SetHeater => "set_heater_config",
        };
        f.write_str(name)
    }
}

/// Fatal start-up failure. Reported as `ERR INIT <code>`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
#[error("sensor start-up failed at {stage} with driver code {code}")]
pub struct InitError {
    pub stage: InitStage,
    pub code: DriverCode,
}

/// Failure of a single `MEASURE` request. Never fatal to the session.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum MeasureError {
    #[error("sensor is not initialised")]
    NotReady,

    #[error("heater temperature {0} °C out of range")]
    TempRange(i32),

    #[error("heater duration {0} ms out of range")]
    DurationRange(i32),

    #[error("set_heater_config failed with driver code {0}")]
    SetHeater(DriverCode),

    #[error("set_operating_mode failed with driver code {0}")]
    SetMode(DriverCode),

    #[error("get_data failed with driver code {0}")]
    GetData(DriverCode),

    #[error("driver returned no data fields")]
    NoData,

    #[error("incomplete sample status {0:#04x}")]
    Status(u8),
}

impl MeasureError {
    /// Protocol error code this failure is reported under.
    pub const fn code(&self) -> ErrorCode {
        match self {
            MeasureError::NotReady => ErrorCode::NotReady,
            MeasureError::TempRange(_) => ErrorCode::TempRange,
            MeasureError::DurationRange(_) => ErrorCode::DurationRange,
            MeasureError::SetHeater(_) => ErrorCode::SetHeatr,
            MeasureError::SetMode(_) => ErrorCode::SetMode,
            MeasureError::GetData(_) => ErrorCode::GetData,
            MeasureError::NoData => ErrorCode::NoData,
            MeasureError::Status(_) => ErrorCode::Status,
        }
    }

    /// Detail integer printed after the code, if any.
    pub const fn detail(&self) -> Option<i32> {
        match *self {
            MeasureError::NotReady | MeasureError::NoData => None,
            MeasureError::TempRange(t) => Some(t),
            MeasureError::DurationRange(d) => Some(d),
            MeasureError::SetHeater(c) | MeasureError::SetMode(c) | MeasureError::GetData(c) => {
                Some(c.value())
            }
            MeasureError::Status(s) => Some(s as i32),
        }
    }
}

/// A command line that named a known command but carried bad arguments.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum CommandParseError {
    #[error("MEASURE expects two integer arguments")]
    MeasureArgs,
}

/// Errors that end a bridge session.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError<E = ()>
where
    E: fmt::Debug,
{
    /// Reading commands or writing responses failed.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// Start-up sequence failed; `ERR INIT` has already been written.
    #[error(transparent)]
    Init(#[from] InitError),
}
