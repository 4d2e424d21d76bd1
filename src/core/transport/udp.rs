//! UDP telemetry publisher

use super::TransportError;
use crate::core::protocol::nmea::FixRecord;
use std::net::UdpSocket;

/// Connectionless publisher bound to a fixed collector destination
///
/// The destination is resolved once at construction; each fix goes out as a
/// single CSV datagram. There is no acknowledgement or retransmission.
pub struct TelemetryPublisher {
    socket: UdpSocket,
    destination: String,
}

impl TelemetryPublisher {
    /// Create the socket and pin it to the collector address.
    ///
    /// Failure here is fatal: the publisher cannot exist without a socket.
    pub fn open(address: &str, port: u16) -> Result<Self, TransportError> {
        let socket = UdpSocket::bind("0.0.0.0:0").map_err(TransportError::Socket)?;
        let destination = format!("{}:{}", address, port);
        socket
            .connect(&destination)
            .map_err(TransportError::Socket)?;

        tracing::info!("publishing telemetry to {}", destination);

        Ok(Self {
            socket,
            destination,
        })
    }

    /// Serialize the fix and transmit it as one datagram.
    ///
    /// Transmission failure is reported to the caller and logged, never fatal
    /// to the pipeline.
    pub fn publish(&self, record: &FixRecord) -> bool {
        let line = record.to_csv();
        match self.socket.send(line.as_bytes()) {
            Ok(sent) => {
                tracing::trace!("sent {} bytes to {}", sent, self.destination);
                true
            }
            Err(e) => {
                tracing::warn!("failed to publish fix to {}: {}", self.destination, e);
                false
            }
        }
    }

    /// Destination this publisher transmits to
    pub fn destination(&self) -> &str {
        &self.destination
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::protocol::nmea::apply_sentence;
    use std::time::Duration;

    #[test]
    fn publishes_csv_datagram() {
        let collector = UdpSocket::bind("127.0.0.1:0").expect("bind");
        collector
            .set_read_timeout(Some(Duration::from_secs(5)))
            .expect("timeout");
        let port = collector.local_addr().expect("addr").port();

        let publisher = TelemetryPublisher::open("127.0.0.1", port).expect("open");

        let mut record = FixRecord::default();
        apply_sentence(
            &mut record,
            "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47",
        );
        assert!(publisher.publish(&record));

        let mut buf = [0u8; 256];
        let n = collector.recv(&mut buf).expect("recv");
        let line = std::str::from_utf8(&buf[..n]).expect("utf8");
        assert_eq!(line, record.to_csv());
        assert_eq!(line.split(',').count(), 7);
    }
}
