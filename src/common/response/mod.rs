// src/common/response/mod.rs

mod data;
mod error;
pub mod parse;

pub use data::MeasurementSample;
pub use error::ResponseParseError;
pub use parse::parse_response;

use arrayvec::ArrayString;
use core::fmt::{self, Write};
use core::str::FromStr;

use super::error::{InitError, MeasureError, CommandParseError};

/// Capacity of a formatted response line, newline included.
/// Large enough for a DATA line with four `%.2f` values at `f32::MAX`.
pub const LINE_CAPACITY: usize = 256;

/// Protocol error codes, as printed after `ERR`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ErrorCode {
    Init,
    NotReady,
    TempRange,
    DurationRange,
    SetHeatr,
    SetMode,
    GetData,
    NoData,
    Status,
    MeasureArgs,
    UnknownCmd,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 11] = [
        ErrorCode::Init,
        ErrorCode::NotReady,
        ErrorCode::TempRange,
        ErrorCode::DurationRange,
        ErrorCode::SetHeatr,
        ErrorCode::SetMode,
        ErrorCode::GetData,
        ErrorCode::NoData,
        ErrorCode::Status,
        ErrorCode::MeasureArgs,
        ErrorCode::UnknownCmd,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Init => "INIT",
            ErrorCode::NotReady => "NOT_READY",
            ErrorCode::TempRange => "TEMP_RANGE",
            ErrorCode::DurationRange => "DURATION_RANGE",
            ErrorCode::SetHeatr => "SET_HEATR",
            ErrorCode::SetMode => "SET_MODE",
            ErrorCode::GetData => "GET_DATA",
            ErrorCode::NoData => "NO_DATA",
            ErrorCode::Status => "STATUS",
            ErrorCode::MeasureArgs => "MEASURE_ARGS",
            ErrorCode::UnknownCmd => "UNKNOWN_CMD",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = ResponseParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == s)
            .ok_or(ResponseParseError::UnknownErrorCode)
    }
}

/// A single response line written by the bridge.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Response {
    /// Start-up finished, commands are accepted.
    Ready,
    Pong,
    /// Session is ending.
    Bye,
    Data(MeasurementSample),
    Error { code: ErrorCode, detail: Option<i32> },
}

impl Response {
    pub const fn error(code: ErrorCode) -> Self {
        Response::Error { code, detail: None }
    }

    pub const fn error_with_detail(code: ErrorCode, detail: i32) -> Self {
        Response::Error { code, detail: Some(detail) }
    }

    pub const fn is_error(&self) -> bool {
        matches!(self, Response::Error { .. })
    }

    /// Formats the response as one complete, newline-terminated line.
    ///
    /// The whole line is built before anything reaches the output, so a
    /// writer never sees a partial response.
    pub fn format_into(&self) -> Result<ArrayString<LINE_CAPACITY>, fmt::Error> {
        let mut line = ArrayString::<LINE_CAPACITY>::new();
        writeln!(line, "{}", self)?;
        Ok(line)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Ready => f.write_str("READY"),
            Response::Pong => f.write_str("PONG"),
            Response::Bye => f.write_str("BYE"),
            Response::Data(sample) => write!(f, "DATA {}", sample),
            Response::Error { code, detail: None } => write!(f, "ERR {}", code),
            Response::Error { code, detail: Some(detail) } => write!(f, "ERR {} {}", code, detail),
        }
    }
}

// --- Conversions from failures ---

impl From<MeasureError> for Response {
    fn from(e: MeasureError) -> Self {
        Response::Error { code: e.code(), detail: e.detail() }
    }
}

impl From<InitError> for Response {
    fn from(e: InitError) -> Self {
        Response::error_with_detail(ErrorCode::Init, e.code.value())
    }
}

impl From<CommandParseError> for Response {
    fn from(e: CommandParseError) -> Self {
        match e {
            CommandParseError::MeasureArgs => Response::error(ErrorCode::MeasureArgs),
        }
    }
}

impl From<Result<MeasurementSample, MeasureError>> for Response {
    fn from(result: Result<MeasurementSample, MeasureError>) -> Self {
        match result {
            Ok(sample) => Response::Data(sample),
            Err(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::{DriverCode, InitStage};
    use crate::common::types::StatusFlags;

    fn sample() -> MeasurementSample {
        MeasurementSample {
            timestamp_ms: 123_456,
            temperature_c: 25.13,
            pressure_pa: 101_325.0,
            humidity_pct: 40.5,
            gas_resistance_ohm: 31_250.75,
            status: StatusFlags(0xB0),
        }
    }

    #[test]
    fn test_simple_lines() {
        assert_eq!(Response::Ready.format_into().unwrap().as_str(), "READY\n");
        assert_eq!(Response::Pong.format_into().unwrap().as_str(), "PONG\n");
        assert_eq!(Response::Bye.format_into().unwrap().as_str(), "BYE\n");
    }

    #[test]
    fn test_error_lines() {
        assert_eq!(
            Response::error(ErrorCode::MeasureArgs).format_into().unwrap().as_str(),
            "ERR MEASURE_ARGS\n"
        );
        assert_eq!(
            Response::error_with_detail(ErrorCode::TempRange, 401).format_into().unwrap().as_str(),
            "ERR TEMP_RANGE 401\n"
        );
        assert_eq!(
            Response::error_with_detail(ErrorCode::SetMode, -2).format_into().unwrap().as_str(),
            "ERR SET_MODE -2\n"
        );
    }

    #[test]
    fn test_data_line() {
        let line = Response::Data(sample()).format_into().unwrap();
        assert_eq!(line.as_str(), "DATA 123456 25.13 101325.00 40.50 31250.75 0xb0\n");
    }

    #[test]
    fn test_data_line_fits_extreme_values() {
        let mut extreme = sample();
        extreme.timestamp_ms = u32::MAX;
        extreme.temperature_c = -f32::MAX;
        extreme.pressure_pa = f32::MAX;
        extreme.humidity_pct = -f32::MAX;
        extreme.gas_resistance_ohm = f32::MAX;
        let line = Response::Data(extreme).format_into().unwrap();
        assert!(line.ends_with(" 0xb0\n"));
        assert!(line.starts_with("DATA 4294967295 -3402823"));
    }

    #[test]
    fn test_status_is_two_hex_digits() {
        let mut s = sample();
        s.status = StatusFlags(0x05);
        let line = Response::Data(s).format_into().unwrap();
        assert!(line.ends_with(" 0x05\n"));
    }

    #[test]
    fn test_from_failures() {
        assert_eq!(
            Response::from(MeasureError::Status(0xA0)),
            Response::error_with_detail(ErrorCode::Status, 0xA0)
        );
        assert_eq!(Response::from(MeasureError::NoData), Response::error(ErrorCode::NoData));
        let init = InitError { stage: InitStage::DriverInit, code: DriverCode::E_DEV_NOT_FOUND };
        assert_eq!(Response::from(init), Response::error_with_detail(ErrorCode::Init, -3));
        assert_eq!(
            Response::from(CommandParseError::MeasureArgs),
            Response::error(ErrorCode::MeasureArgs)
        );
        assert_eq!(Response::from(Ok(sample())), Response::Data(sample()));
    }

    #[test]
    fn test_error_code_round_trip_names() {
        for code in ErrorCode::ALL {
            assert_eq!(code.as_str().parse::<ErrorCode>(), Ok(code));
        }
        assert_eq!("BOGUS".parse::<ErrorCode>(), Err(ResponseParseError::UnknownErrorCode));
    }

    #[test]
    fn test_write_into_heapless() {
        use core::fmt::Write as _;
        let mut buf: heapless::String<32> = heapless::String::new();
        write!(buf, "{}", Response::error(ErrorCode::UnknownCmd)).unwrap();
        assert_eq!(buf.as_str(), "ERR UNKNOWN_CMD");
    }
}
