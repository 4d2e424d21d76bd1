//! Acquisition worker: serial frames in, fix datagrams out
//!
//! One dedicated background thread reads frames from the serial line, applies
//! them to a single [`FixRecord`], and publishes the updated record after
//! every successful parse. The fix record is owned exclusively by the thread;
//! start/stop coordination happens through one atomic flag.

use crate::config::AcquisitionConfig;
use crate::core::protocol::nmea::{self, FixRecord};
use crate::core::transport::{SerialLink, TelemetryPublisher, TransportError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Acquisition loop counters
#[derive(Debug, Clone, Default)]
pub struct AcquisitionStats {
    /// Non-empty frames read from the serial line
    pub frames_read: u64,
    /// Empty reads (nothing buffered within the timeout)
    pub frames_empty: u64,
    /// Frames that updated the fix record
    pub fixes_parsed: u64,
    /// Fix datagrams transmitted
    pub fixes_published: u64,
    /// Failed publishes and read errors
    pub errors: u64,
}

/// Serial acquisition and relay worker
///
/// Lifecycle is Idle → Running → Idle and restartable. `start` and `stop`
/// are both idempotent; `stop` joins the background thread before returning,
/// so no read or publish can happen afterwards.
pub struct AcquisitionWorker {
    pacing: Duration,
    running: Arc<AtomicBool>,
    stats: Arc<Mutex<AcquisitionStats>>,
    // Handed to the thread on start, handed back through the join on stop
    io: Option<(SerialLink, TelemetryPublisher)>,
    handle: Option<thread::JoinHandle<(SerialLink, TelemetryPublisher)>>,
}

impl AcquisitionWorker {
    /// Open the serial device and the telemetry socket.
    ///
    /// Either failure is fatal: the worker cannot exist half-constructed.
    pub fn new(config: &AcquisitionConfig) -> Result<Self, TransportError> {
        let link = SerialLink::open(config.serial.clone())?;
        let publisher =
            TelemetryPublisher::open(&config.destination_ip, config.destination_port)?;

        Ok(Self {
            pacing: config.pacing(),
            running: Arc::new(AtomicBool::new(false)),
            stats: Arc::new(Mutex::new(AcquisitionStats::default())),
            io: Some((link, publisher)),
            handle: None,
        })
    }

    /// Spawn the acquisition loop. A second call while running is a no-op.
    pub fn start(&mut self) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }

        let Some((mut link, publisher)) = self.io.take() else {
            // Cannot happen through the public API: stop() always restores
            // the handles before clearing the flag.
            self.running.store(false, Ordering::SeqCst);
            return;
        };

        tracing::info!("starting acquisition loop on {}", link.device());

        let running = self.running.clone();
        let stats = self.stats.clone();
        let pacing = self.pacing;

        self.handle = Some(thread::spawn(move || {
            let mut fix = FixRecord::default();

            while running.load(Ordering::SeqCst) {
                match link.read_frame() {
                    Ok(frame) if frame.is_empty() => {
                        tracing::trace!("nothing to read");
                        stats.lock().frames_empty += 1;
                    }
                    Ok(frame) => {
                        tracing::debug!("received frame: {}", frame);
                        stats.lock().frames_read += 1;

                        if nmea::apply_sentence(&mut fix, &frame) {
                            stats.lock().fixes_parsed += 1;
                            if publisher.publish(&fix) {
                                stats.lock().fixes_published += 1;
                            } else {
                                stats.lock().errors += 1;
                            }
                        }
                    }
                    Err(e) => {
                        // The one loop-fatal condition. The handles still go
                        // back through the join, so a later stop() completes.
                        tracing::error!("serial read failed, stopping acquisition: {}", e);
                        stats.lock().errors += 1;
                        break;
                    }
                }

                thread::sleep(pacing);
            }

            (link, publisher)
        }));
    }

    /// Stop the loop and wait for the background thread to exit.
    ///
    /// Idempotent. Returns only once no further read or publish can occur;
    /// a loop already blocked in a read may delay this by up to the pacing
    /// interval plus the inter-byte timeout.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);

        if let Some(handle) = self.handle.take() {
            if let Ok(io) = handle.join() {
                self.io = Some(io);
            }
            tracing::info!("acquisition loop stopped");
        }
    }

    /// Whether the background loop has been started and not yet stopped
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Snapshot of the loop counters
    pub fn stats(&self) -> AcquisitionStats {
        self.stats.lock().clone()
    }
}

impl Drop for AcquisitionWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;
    use crate::config::SimulatorConfig;
    use crate::core::simulator::ProtocolSimulator;
    use std::net::UdpSocket;

    fn idle_worker(port: u16, device: &str) -> AcquisitionWorker {
        let config = AcquisitionConfig::new("127.0.0.1", port, device).pacing_ms(10);
        AcquisitionWorker::new(&config).expect("worker")
    }

    #[test]
    fn start_stop_without_frames_publishes_nothing() {
        let collector = UdpSocket::bind("127.0.0.1:0").expect("bind");
        collector
            .set_read_timeout(Some(Duration::from_millis(300)))
            .expect("timeout");
        let port = collector.local_addr().expect("addr").port();

        // A simulator that is never started: the PTY stays silent
        let sim = ProtocolSimulator::new(SimulatorConfig::new(0.0, 0.0)).expect("pty");
        let mut worker = idle_worker(port, sim.slave_path());

        worker.start();
        worker.stop();
        assert!(!worker.is_running());

        let mut buf = [0u8; 64];
        assert!(collector.recv(&mut buf).is_err());
        assert_eq!(worker.stats().fixes_published, 0);
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let collector = UdpSocket::bind("127.0.0.1:0").expect("bind");
        let port = collector.local_addr().expect("addr").port();

        let sim = ProtocolSimulator::new(SimulatorConfig::new(0.0, 0.0)).expect("pty");
        let mut worker = idle_worker(port, sim.slave_path());

        worker.start();
        worker.start();
        assert!(worker.is_running());

        worker.stop();
        worker.stop();
        assert!(!worker.is_running());

        // Restartable after a clean stop
        worker.start();
        assert!(worker.is_running());
        worker.stop();
    }
}
