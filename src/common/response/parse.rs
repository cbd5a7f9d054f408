// src/common/response/parse.rs

use super::data::MeasurementSample;
use super::error::ResponseParseError;
use super::{ErrorCode, Response};

use crate::common::types::StatusFlags;

use core::str::FromStr;

// --- Internal Helpers ---

fn parse_status(field: &str) -> Result<StatusFlags, ResponseParseError> {
    let digits = field
        .strip_prefix("0x")
        .or_else(|| field.strip_prefix("0X"))
        .ok_or(ResponseParseError::InvalidStatus)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ResponseParseError::InvalidStatus);
    }
    u8::from_str_radix(digits, 16)
        .map(StatusFlags)
        .map_err(|_| ResponseParseError::InvalidStatus)
}

fn parse_data<'a>(
    mut parts: impl Iterator<Item = &'a str>,
) -> Result<MeasurementSample, ResponseParseError> {
    let mut fields = [""; 6];
    for slot in fields.iter_mut() {
        *slot = parts.next().ok_or(ResponseParseError::WrongFieldCount)?;
    }
    if parts.next().is_some() {
        return Err(ResponseParseError::WrongFieldCount);
    }

    Ok(MeasurementSample {
        timestamp_ms: u32::from_str(fields[0])?,
        temperature_c: f32::from_str(fields[1])?,
        pressure_pa: f32::from_str(fields[2])?,
        humidity_pct: f32::from_str(fields[3])?,
        gas_resistance_ohm: f32::from_str(fields[4])?,
        status: parse_status(fields[5])?,
    })
}

fn parse_error<'a>(mut parts: impl Iterator<Item = &'a str>) -> Result<Response, ResponseParseError> {
    let code: ErrorCode = parts.next().ok_or(ResponseParseError::WrongFieldCount)?.parse()?;
    let detail = parts.next().map(i32::from_str).transpose()?;
    if parts.next().is_some() {
        return Err(ResponseParseError::WrongFieldCount);
    }
    Ok(Response::Error { code, detail })
}

// --- Public Parsing Functions ---

/// Decodes one line written by the bridge. Leading/trailing whitespace,
/// including the line terminator, is ignored.
pub fn parse_response(line: &str) -> Result<Response, ResponseParseError> {
    let mut parts = line.split_whitespace();
    let keyword = parts.next().ok_or(ResponseParseError::EmptyInput)?;

    let response = match keyword {
        "READY" => Response::Ready,
        "PONG" => Response::Pong,
        "BYE" => Response::Bye,
        "DATA" => return parse_data(parts).map(Response::Data),
        "ERR" => return parse_error(parts),
        _ => return Err(ResponseParseError::UnknownResponse),
    };

    if parts.next().is_some() {
        return Err(ResponseParseError::WrongFieldCount);
    }
    Ok(response)
}
