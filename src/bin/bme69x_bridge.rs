//! BME69x command bridge.
//!
//! Reads one command per line on stdin and answers with one line on stdout.
//! Without attached hardware the bridge runs against the synthetic sensor.
//!
//! ## Usage
//!
//! ```bash
//! # Default: SPI interface
//! cargo run --bin bme69x_bridge
//!
//! # Select the bus and turn on logging (stderr only)
//! RUST_LOG=debug cargo run --bin bme69x_bridge -- --interface i2c
//! ```
//!
//! ## Commands
//!
//! - `MEASURE <temp_c> <duration_ms>` - heat to temp_c (100..=400) for duration_ms (1..=40000), then sample
//! - `PING` - answered with `PONG`
//! - `EXIT` - answered with `BYE`, then the process exits

use std::io;
use std::process::ExitCode;

use bme69x_bridge::bridge::{Bridge, BridgeSettings, SessionEnd};
use bme69x_bridge::common::{BridgeError, Interface};
use bme69x_bridge::synthetic::{SyntheticBoard, SyntheticSensor};

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  bme69x_bridge [--interface <spi|i2c>]");
    eprintln!();
    eprintln!("Commands on stdin: MEASURE <temp_c> <duration_ms> | PING | EXIT");
    eprintln!("Set RUST_LOG=info|debug for diagnostics on stderr.");
}

fn parse_args(args: &[String]) -> Result<BridgeSettings, String> {
    let mut settings = BridgeSettings::default();
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--interface" => {
                let value = iter.next().ok_or("--interface needs a value")?;
                settings.interface = value
                    .parse::<Interface>()
                    .map_err(|_| format!("unknown interface '{}'", value))?;
            }
            other => return Err(format!("unknown argument '{}'", other)),
        }
    }
    Ok(settings)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return ExitCode::SUCCESS;
    }

    let settings = match parse_args(&args) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            return ExitCode::from(2);
        }
    };
    log::info!("starting bridge on {} (synthetic sensor)", settings.interface);

    let bridge = Bridge::new(SyntheticSensor::new(), SyntheticBoard::new(), settings);
    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();

    match bridge.run(stdin, stdout) {
        Ok(SessionEnd::Exit) | Ok(SessionEnd::EndOfInput) => ExitCode::SUCCESS,
        Err(BridgeError::Init(e)) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
        Err(BridgeError::Io(e)) => {
            log::error!("session ended on I/O error: {}", e);
            ExitCode::FAILURE
        }
    }
}
