//! Core module containing the main functionality of the relay
//!
//! This module provides:
//! - Protocol layer (NMEA coordinate codec, sentence framing, GGA/RMC parsing)
//! - Transport layer (blocking serial line, UDP telemetry publisher)
//! - Acquisition worker (serial frames in, fix datagrams out)
//! - Receiver simulator (PTY-backed NMEA sentence generator)

pub mod acquisition;
pub mod protocol;
#[cfg(unix)]
pub mod simulator;
pub mod transport;
