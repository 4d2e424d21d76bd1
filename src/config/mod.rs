//! Configuration module
//!
//! Construction parameters for the acquisition worker and the receiver
//! simulator. There is no CLI surface; callers build these structs directly.

use crate::core::transport::SerialLinkConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Acquisition worker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquisitionConfig {
    /// Collector IP address
    pub destination_ip: String,
    /// Collector UDP port
    pub destination_port: u16,
    /// Serial line to the receiver
    pub serial: SerialLinkConfig,
    /// Delay between acquisition loop iterations, in milliseconds
    pub pacing_ms: u64,
}

impl AcquisitionConfig {
    /// Create a configuration with the default 9600 baud, 1 s pacing profile
    pub fn new(destination_ip: &str, destination_port: u16, device: &str) -> Self {
        Self {
            destination_ip: destination_ip.to_string(),
            destination_port,
            serial: SerialLinkConfig::new(device, 9600),
            pacing_ms: 1000,
        }
    }

    /// Set the serial baud rate (9600 or 115200 depending on deployment)
    #[must_use]
    pub fn baud_rate(mut self, baud: u32) -> Self {
        self.serial.baud_rate = baud;
        self
    }

    /// Set the pacing delay between loop iterations
    #[must_use]
    pub fn pacing_ms(mut self, ms: u64) -> Self {
        self.pacing_ms = ms;
        self
    }

    /// Pacing delay as a [`Duration`]
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }
}

/// Circular trajectory parameters for the simulator
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Circle radius in meters
    pub radius_m: f64,
    /// Time for one full revolution, in seconds
    pub period_secs: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            radius_m: 20.0,
            period_secs: 120.0,
        }
    }
}

/// Receiver simulator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Base latitude in decimal degrees
    pub latitude_deg: f64,
    /// Base longitude in decimal degrees
    pub longitude_deg: f64,
    /// Reported altitude in meters
    pub altitude_m: f64,
    /// Sentence emission frequency in Hz
    pub frequency_hz: f64,
    /// Speed over ground reported in RMC sentences, in knots
    pub speed_knots: f64,
    /// Optional circular trajectory; `None` keeps the position pinned
    pub motion: Option<MotionConfig>,
}

impl SimulatorConfig {
    /// Create a stationary simulator at the given position
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            altitude_m: 10.0,
            frequency_hz: 1.0,
            speed_knots: 0.0,
            motion: None,
        }
    }

    /// Set the reported altitude
    #[must_use]
    pub fn altitude_m(mut self, altitude_m: f64) -> Self {
        self.altitude_m = altitude_m;
        self
    }

    /// Set the sentence emission frequency
    #[must_use]
    pub fn frequency_hz(mut self, frequency_hz: f64) -> Self {
        self.frequency_hz = frequency_hz;
        self
    }

    /// Set the reported speed over ground
    #[must_use]
    pub fn speed_knots(mut self, speed_knots: f64) -> Self {
        self.speed_knots = speed_knots;
        self
    }

    /// Enable a circular trajectory around the base position
    #[must_use]
    pub fn circular_motion(mut self, radius_m: f64, period_secs: f64) -> Self {
        self.motion = Some(MotionConfig {
            radius_m,
            period_secs,
        });
        self
    }

    /// Tick period derived from the frequency; falls back to 1 s for a
    /// non-positive frequency
    pub fn update_period(&self) -> Duration {
        if self.frequency_hz > 0.0 {
            Duration::from_millis((1000.0 / self.frequency_hz).round() as u64)
        } else {
            Duration::from_secs(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquisition_defaults() {
        let config = AcquisitionConfig::new("127.0.0.1", 9000, "/dev/ttySTM2");
        assert_eq!(config.serial.baud_rate, 9600);
        assert_eq!(config.pacing(), Duration::from_secs(1));

        let config = config.baud_rate(115200).pacing_ms(250);
        assert_eq!(config.serial.baud_rate, 115200);
        assert_eq!(config.pacing(), Duration::from_millis(250));
    }

    #[test]
    fn simulator_update_period() {
        assert_eq!(
            SimulatorConfig::new(0.0, 0.0).update_period(),
            Duration::from_secs(1)
        );
        assert_eq!(
            SimulatorConfig::new(0.0, 0.0).frequency_hz(4.0).update_period(),
            Duration::from_millis(250)
        );
        assert_eq!(
            SimulatorConfig::new(0.0, 0.0).frequency_hz(0.0).update_period(),
            Duration::from_secs(1)
        );
    }
}
