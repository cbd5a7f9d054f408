// src/bridge/mod.rs

// Session controller and the measurement sequencer it delegates to
pub mod session;
mod sequencer;

// Line I/O loop over any BufRead/Write pair
#[cfg(feature = "std")]
pub mod io_loop;

#[cfg(all(test, feature = "std"))]
pub(crate) mod mock;

pub use session::{Bridge, BridgeSettings, DeviceSession, Flow};

#[cfg(feature = "std")]
pub use io_loop::{write_response, SessionEnd};
