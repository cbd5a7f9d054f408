// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod command;
pub mod error;
pub mod hal_traits;
pub mod response;
pub mod timing;
pub mod types;

// --- Re-export key types/traits/functions for easier access ---

// From command.rs
pub use command::{is_exit_line, parse_command, Command};

// From error.rs
pub use error::{BridgeError, CommandParseError, DriverCode, InitError, InitStage, MeasureError};

// From hal_traits.rs
pub use hal_traits::{BoardTransport, Bme69xDriver};

// From response/mod.rs (and its sub-modules via its own `pub use`)
pub use response::{parse_response, ErrorCode, MeasurementSample, Response, ResponseParseError};

// From types.rs
pub use types::{
    FieldData, Filter, HeaterConfig, Interface, OperatingMode, OutputDataRate, Oversampling,
    SensorConfig, StatusFlags,
};

// timing.rs constants are reached through `common::timing::*`
