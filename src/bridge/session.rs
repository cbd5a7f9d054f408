// src/bridge/session.rs

use log::{debug, info, warn};

use crate::common::{
    command::{is_exit_line, parse_command, Command},
    error::{InitError, InitStage},
    hal_traits::{BoardTransport, Bme69xDriver},
    response::{ErrorCode, Response},
    timing,
    types::{HeaterConfig, Interface, OperatingMode, Oversampling, SensorConfig},
};

/// Start-up parameters for a bridge session.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BridgeSettings {
    /// Bus opened by `interface_init`.
    pub interface: Interface,
    /// Heater profile applied during start-up.
    pub default_heater: HeaterConfig,
    /// Oversampling applied to all three TPH channels.
    pub oversampling: Oversampling,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        BridgeSettings {
            interface: Interface::Spi,
            default_heater: timing::DEFAULT_HEATER,
            oversampling: Oversampling::MAX,
        }
    }
}

/// Sensor state owned by the bridge for the lifetime of the process.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DeviceSession {
    pub(super) initialized: bool,
    /// Written once during start-up.
    pub(super) config: SensorConfig,
    /// Rewritten by every accepted `MEASURE`.
    pub(super) heater: HeaterConfig,
}

impl DeviceSession {
    fn new(heater: HeaterConfig) -> Self {
        DeviceSession { initialized: false, config: SensorConfig::default(), heater }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    pub fn heater(&self) -> &HeaterConfig {
        &self.heater
    }
}

/// Whether the command loop keeps reading after a line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// The session controller: owns the driver, the board and the device
/// session, and answers one command line at a time.
///
/// The board is released with `deinit` when the bridge is dropped, on every
/// path out of a session including a failed start-up.
pub struct Bridge<D, B>
where
    D: Bme69xDriver,
    B: BoardTransport,
{
    pub(super) driver: D,
    pub(super) board: B,
    pub(super) settings: BridgeSettings,
    pub(super) session: DeviceSession,
}

impl<D, B> Bridge<D, B>
where
    D: Bme69xDriver,
    B: BoardTransport,
{
    pub fn new(driver: D, board: B, settings: BridgeSettings) -> Self {
        Bridge {
            driver,
            board,
            session: DeviceSession::new(settings.default_heater),
            settings,
        }
    }

    pub fn session(&self) -> &DeviceSession {
        &self.session
    }

    pub fn settings(&self) -> &BridgeSettings {
        &self.settings
    }

    /// Runs the one-time bring-up. Each step only runs if the previous one
    /// succeeded; the first failing step's code is returned.
    pub fn initialise(&mut self) -> Result<(), InitError> {
        let fail = |stage| move |code| InitError { stage, code };

        self.board
            .interface_init(self.settings.interface)
            .map_err(fail(InitStage::InterfaceInit))?;
        debug!("{} interface opened", self.settings.interface);

        self.driver.init().map_err(fail(InitStage::DriverInit))?;

        let current = self.driver.get_config().map_err(fail(InitStage::GetConfig))?;
        let config = current.forced_profile(self.settings.oversampling);
        self.driver.set_config(&config).map_err(fail(InitStage::SetConfig))?;
        self.session.config = config;
        debug!("sensor configured: {:?}", config);

        let heater = self.settings.default_heater;
        self.driver
            .set_heater_config(OperatingMode::Forced, &heater)
            .map_err(fail(InitStage::SetHeater))?;
        self.session.heater = heater;

        self.session.initialized = true;
        info!(
            "sensor ready, default heater {} °C for {} ms",
            heater.temperature_c, heater.duration_ms
        );
        Ok(())
    }

    /// Handles one raw input line.
    ///
    /// Returns the response to write, if any, and whether to keep reading.
    /// Lines without a token produce no response.
    pub fn handle_line(&mut self, line: &str) -> (Option<Response>, Flow) {
        if is_exit_line(line) {
            return (Some(Response::Bye), Flow::Exit);
        }

        match parse_command(line) {
            Ok(None) => (None, Flow::Continue),
            Ok(Some(command)) => {
                let (response, flow) = self.dispatch(command);
                (Some(response), flow)
            }
            Err(e) => {
                warn!("rejected {:?}: {}", line.trim_end(), e);
                (Some(e.into()), Flow::Continue)
            }
        }
    }

    /// Executes a parsed command and produces exactly one response.
    pub fn dispatch(&mut self, command: Command) -> (Response, Flow) {
        debug!("command: {}", command);
        match command {
            Command::Ping => (Response::Pong, Flow::Continue),
            Command::Exit => (Response::Bye, Flow::Exit),
            Command::Measure { temp_c, duration_ms } => {
                let response = Response::from(self.measure(temp_c, duration_ms));
                if response.is_error() {
                    warn!("MEASURE {} {} -> {}", temp_c, duration_ms, response);
                }
                (response, Flow::Continue)
            }
            Command::Unknown => (Response::error(ErrorCode::UnknownCmd), Flow::Continue),
        }
    }
}

impl<D, B> Drop for Bridge<D, B>
where
    D: Bme69xDriver,
    B: BoardTransport,
{
    fn drop(&mut self) {
        self.board.deinit();
        debug!("board released");
    }
}
