//! # GNSS Relay Core Library
//!
//! Acquires positioning telemetry from a GNSS receiver attached to a serial
//! line, decodes NMEA GGA/RMC sentences into fix records, and relays each fix
//! as a UDP datagram to a remote collector.
//!
//! A companion [`ProtocolSimulator`] emits the same protocol on the master
//! side of a PTY pair, so the whole pipeline can be developed and tested
//! without a physical receiver.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gnss_relay::{AcquisitionConfig, AcquisitionWorker};
//!
//! fn main() -> Result<(), gnss_relay::TransportError> {
//!     let config = AcquisitionConfig::new("127.0.0.1", 9000, "/dev/ttySTM2");
//!     let mut worker = AcquisitionWorker::new(&config)?;
//!     worker.start();
//!
//!     std::thread::sleep(std::time::Duration::from_secs(10));
//!
//!     worker.stop();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod core;

// Re-exports for convenience
pub use crate::config::{AcquisitionConfig, MotionConfig, SimulatorConfig};
pub use crate::core::acquisition::{AcquisitionStats, AcquisitionWorker};
pub use crate::core::protocol::nmea::FixRecord;
#[cfg(unix)]
pub use crate::core::simulator::{ProtocolSimulator, SimulatorError};
pub use crate::core::transport::{
    SerialLink, SerialLinkConfig, TelemetryPublisher, TransportError,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
