// src/lib.rs

#![cfg_attr(not(feature = "std"), no_std)]

pub mod bridge;
pub mod common;

#[cfg(feature = "std")]
pub mod client;
#[cfg(feature = "std")]
pub mod synthetic;

// Re-export key types for convenience
pub use bridge::{Bridge, BridgeSettings};
pub use common::{Command, Response};
