//! Serial line to the GNSS receiver

use super::TransportError;
use serde::{Deserialize, Serialize};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::Read;
use std::time::Duration;

/// Inter-byte timeout. The receiver streams continuously; hitting this means
/// the current frame is complete with whatever was buffered.
const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Serial line configuration
///
/// The receiver always talks 8N1 without flow control; only the device path
/// and the baud rate (9600 or 115200 depending on deployment) vary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialLinkConfig {
    /// Device path (e.g. /dev/ttySTM2, /dev/ttyUSB0)
    pub device: String,
    /// Baud rate
    pub baud_rate: u32,
}

impl SerialLinkConfig {
    /// Create a new serial line configuration
    pub fn new(device: &str, baud_rate: u32) -> Self {
        Self {
            device: device.to_string(),
            baud_rate,
        }
    }
}

impl Default for SerialLinkConfig {
    fn default() -> Self {
        Self::new("/dev/ttyUSB0", 9600)
    }
}

/// Blocking serial line that yields newline-delimited frames
pub struct SerialLink {
    config: SerialLinkConfig,
    port: Option<Box<dyn SerialPort>>,
}

impl SerialLink {
    /// Open and configure the device: 8 data bits, no parity, 1 stop bit, no
    /// flow control, raw reads with a 100 ms inter-byte timeout.
    ///
    /// Open and configuration failures are both fatal here; the link never
    /// exists half-configured.
    pub fn open(config: SerialLinkConfig) -> Result<Self, TransportError> {
        let port = serialport::new(&config.device, config.baud_rate)
            .data_bits(DataBits::Eight)
            .stop_bits(StopBits::One)
            .parity(Parity::None)
            .flow_control(FlowControl::None)
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|e| match e.kind() {
                serialport::ErrorKind::NoDevice | serialport::ErrorKind::Io(_) => {
                    TransportError::Open {
                        device: config.device.clone(),
                        reason: e.to_string(),
                    }
                }
                _ => TransportError::Config(e.to_string()),
            })?;

        tracing::info!(
            "opened serial device {} @ {} baud (8N1)",
            config.device,
            config.baud_rate
        );

        Ok(Self {
            config,
            port: Some(port),
        })
    }

    /// Read one frame: bytes up to a line feed (excluded), with carriage
    /// returns discarded.
    ///
    /// A timeout or zero-length read completes the frame with whatever was
    /// buffered, possibly nothing. Any other read error propagates; the
    /// acquisition loop treats it as fatal to that task.
    pub fn read_frame(&mut self) -> Result<String, TransportError> {
        let port = self.port.as_mut().ok_or(TransportError::Closed)?;

        let mut frame = String::new();
        let mut byte = [0u8; 1];

        loop {
            match port.read(&mut byte) {
                Ok(0) => break,
                Ok(_) => match byte[0] {
                    b'\n' => break,
                    b'\r' => {}
                    b => frame.push(b as char),
                },
                Err(ref e) if e.kind() == std::io::ErrorKind::TimedOut => break,
                Err(e) => return Err(TransportError::Io(e)),
            }
        }

        Ok(frame)
    }

    /// Device path this link was opened on
    pub fn device(&self) -> &str {
        &self.config.device
    }

    /// Release the underlying handle; safe to call multiple times
    pub fn close(&mut self) {
        if self.port.take().is_some() {
            tracing::debug!("closed serial device {}", self.config.device);
        }
    }
}

impl Drop for SerialLink {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_missing_device_fails() {
        let result = SerialLink::open(SerialLinkConfig::new("/dev/does-not-exist", 9600));
        assert!(matches!(
            result,
            Err(TransportError::Open { .. } | TransportError::Config(_))
        ));
    }

    #[test]
    fn read_after_close_reports_closed() {
        // Exercised against a PTY so no hardware is needed
        #[cfg(unix)]
        {
            let sim = crate::core::simulator::ProtocolSimulator::new(
                crate::config::SimulatorConfig::new(0.0, 0.0),
            )
            .expect("pty");
            let mut link =
                SerialLink::open(SerialLinkConfig::new(sim.slave_path(), 9600)).expect("open");
            link.close();
            link.close();
            assert!(matches!(link.read_frame(), Err(TransportError::Closed)));
        }
    }
}
