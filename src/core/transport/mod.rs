//! Transport layer for the acquisition pipeline
//!
//! Two independent endpoints:
//! - [`SerialLink`]: blocking serial line to the receiver, yields
//!   newline-delimited frames
//! - [`TelemetryPublisher`]: connectionless UDP socket bound to a fixed
//!   collector destination

mod serial;
mod udp;

pub use serial::{SerialLink, SerialLinkConfig};
pub use udp::TelemetryPublisher;

use thiserror::Error;

/// Transport error types
///
/// Everything here is fatal at construction time except [`Io`], which a
/// [`SerialLink::read_frame`] call returns on a hard read failure, the one
/// loop-fatal condition in the acquisition design.
///
/// [`Io`]: TransportError::Io
#[derive(Error, Debug)]
pub enum TransportError {
    /// Serial device could not be opened
    #[error("failed to open serial device {device}: {reason}")]
    Open {
        /// Device path that was attempted
        device: String,
        /// Underlying failure description
        reason: String,
    },

    /// Line discipline could not be applied
    #[error("failed to configure serial device: {0}")]
    Config(String),

    /// Telemetry socket could not be created or bound to its destination
    #[error("failed to set up telemetry socket: {0}")]
    Socket(#[source] std::io::Error),

    /// Link already closed
    #[error("serial link is closed")]
    Closed,

    /// Hard I/O error while reading
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
