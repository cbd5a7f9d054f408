//! Bridge command definitions and the line parser.
//!
//! Commands are single whitespace-separated lines:
//! `MEASURE <temp_c> <duration_ms>`, `PING`, `EXIT`.

use arrayvec::ArrayString;
use core::fmt::{self, Write};

use super::error::CommandParseError;

/// Capacity of a formatted command line, newline included.
pub const COMMAND_CAPACITY: usize = 48;

/// Represents a bridge command.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    /// Apply a heater profile, run one forced-mode cycle and report the sample.
    Measure { temp_c: i32, duration_ms: i32 },

    /// Liveness check, answered regardless of sensor state.
    Ping,

    /// End the session.
    Exit,

    /// A token that is not a known command.
    Unknown,
}

impl Command {
    pub const MEASURE: &'static str = "MEASURE";
    pub const PING: &'static str = "PING";
    pub const EXIT: &'static str = "EXIT";

    /// Formats the command as a newline-terminated line ready to send.
    pub fn format_into(&self) -> Result<ArrayString<COMMAND_CAPACITY>, fmt::Error> {
        let mut line = ArrayString::<COMMAND_CAPACITY>::new();
        writeln!(line, "{}", self)?;
        Ok(line)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Measure { temp_c, duration_ms } => {
                write!(f, "{} {} {}", Self::MEASURE, temp_c, duration_ms)
            }
            Command::Ping => f.write_str(Self::PING),
            Command::Exit => f.write_str(Self::EXIT),
            Command::Unknown => f.write_str("UNKNOWN"),
        }
    }
}

/// True if the raw line asks to end the session.
///
/// This is checked on the raw text before tokenising, so `EXIT` wins even
/// when glued to stray characters (`EXITNOW`).
#[inline]
pub fn is_exit_line(line: &str) -> bool {
    line.starts_with(Command::EXIT)
}

/// Parses one input line.
///
/// Returns `Ok(None)` when the line holds no token at all; such lines get
/// no response. At most one command token and two integer arguments are
/// looked at; anything after them is ignored.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandParseError> {
    let mut tokens = line.split_whitespace();
    let token = match tokens.next() {
        Some(token) => token,
        None => return Ok(None),
    };

    let command = match token {
        Command::MEASURE => {
            let mut next_int = || tokens.next().and_then(|t| t.parse::<i32>().ok());
            match (next_int(), next_int()) {
                (Some(temp_c), Some(duration_ms)) => Command::Measure { temp_c, duration_ms },
                _ => return Err(CommandParseError::MeasureArgs),
            }
        }
        Command::PING => Command::Ping,
        Command::EXIT => Command::Exit,
        _ => Command::Unknown,
    };

    Ok(Some(command))
}
