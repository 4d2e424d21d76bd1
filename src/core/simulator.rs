//! GNSS receiver simulator
//!
//! Allocates a PTY pair and emits RMC + GGA sentence bursts on the master
//! side at a configurable frequency, so an [`AcquisitionWorker`] can open the
//! slave path exactly as it would a real receiver. Optionally moves the
//! reported position around a circle to model a moving payload.
//!
//! [`AcquisitionWorker`]: crate::core::acquisition::AcquisitionWorker

use crate::config::{MotionConfig, SimulatorConfig};
use crate::core::protocol::{coordinate, framing};
use chrono::Utc;
use std::ffi::CStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use thiserror::Error;

/// Meters per degree of latitude (spherical approximation)
const METERS_PER_DEGREE: f64 = 111_320.0;

/// Simulator construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulatorError {
    /// The PTY pair could not be allocated
    #[error("failed to create PTY pair")]
    PtyCreation,

    /// The slave line discipline could not be applied
    #[error("failed to configure PTY line discipline")]
    PtyConfig,
}

/// Simulated position state, owned exclusively by the generator thread
struct SimulatedTrack {
    base_latitude: f64,
    base_longitude: f64,
    motion: Option<MotionConfig>,
    started: Instant,
    latitude_deg: f64,
    longitude_deg: f64,
}

impl SimulatedTrack {
    fn new(config: &SimulatorConfig) -> Self {
        Self {
            base_latitude: config.latitude_deg,
            base_longitude: config.longitude_deg,
            motion: config.motion,
            started: Instant::now(),
            latitude_deg: config.latitude_deg,
            longitude_deg: config.longitude_deg,
        }
    }

    /// Recompute the displayed position for the current wall-clock time.
    /// Parametrizing by elapsed time rather than tick count keeps pacing
    /// jitter from accumulating drift.
    fn advance(&mut self) {
        let elapsed = self.started.elapsed().as_secs_f64();
        self.position_at(elapsed);
    }

    fn position_at(&mut self, elapsed_secs: f64) {
        let Some(motion) = self.motion else { return };

        let angle = std::f64::consts::TAU * (elapsed_secs / motion.period_secs).fract();

        // One degree of latitude is ~111320 m; longitude shrinks with the
        // cosine of the latitude.
        let delta_lat = motion.radius_m * angle.sin() / METERS_PER_DEGREE;
        let delta_lon = motion.radius_m * angle.cos()
            / (METERS_PER_DEGREE * self.base_latitude.to_radians().cos());

        self.latitude_deg = self.base_latitude + delta_lat;
        self.longitude_deg = self.base_longitude + delta_lon;
    }
}

/// PTY-backed NMEA sentence generator
///
/// Lifecycle mirrors [`AcquisitionWorker`]: Idle → Running → Idle,
/// restartable, with idempotent `start`/`stop` and join-on-stop semantics.
///
/// [`AcquisitionWorker`]: crate::core::acquisition::AcquisitionWorker
pub struct ProtocolSimulator {
    config: SimulatorConfig,
    master_fd: i32,
    slave_path: String,
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ProtocolSimulator {
    /// Allocate the PTY pair and configure the slave side with the line
    /// discipline of a real receiver (raw 8N1).
    pub fn new(config: SimulatorConfig) -> Result<Self, SimulatorError> {
        let (master_fd, slave_path) = create_pty()?;
        tracing::info!("simulated receiver available at {}", slave_path);

        Ok(Self {
            config,
            master_fd,
            slave_path,
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        })
    }

    /// Path an acquisition worker should open as its serial device
    pub fn slave_path(&self) -> &str {
        &self.slave_path
    }

    /// Spawn the periodic generator. A second call while running is a no-op.
    pub fn start(&mut self) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }

        tracing::info!(
            "starting sentence generator at {:.1} Hz",
            self.config.frequency_hz
        );

        let running = self.running.clone();
        let config = self.config.clone();
        let fd = self.master_fd;

        self.handle = Some(thread::spawn(move || {
            let mut track = SimulatedTrack::new(&config);
            let period = config.update_period();

            while running.load(Ordering::SeqCst) {
                track.advance();

                let burst = format!(
                    "{}{}",
                    framing::wrap(&rmc_body(
                        track.latitude_deg,
                        track.longitude_deg,
                        config.speed_knots,
                    )),
                    framing::wrap(&gga_body(
                        track.latitude_deg,
                        track.longitude_deg,
                        config.altitude_m,
                        8,
                        0.9,
                    )),
                );

                tracing::debug!("emitting burst:\n{}", burst.trim_end());
                write_master(fd, burst.as_bytes());

                thread::sleep(period);
            }
        }));
    }

    /// Stop the generator and wait for its thread to exit. Idempotent.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);

        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
            tracing::info!("sentence generator stopped");
        }
    }

    /// Whether the generator thread has been started and not yet stopped
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for ProtocolSimulator {
    fn drop(&mut self) {
        self.stop();
        if self.master_fd >= 0 {
            unsafe {
                libc::close(self.master_fd);
            }
            self.master_fd = -1;
        }
    }
}

/// Allocate a PTY pair, apply the receiver's line discipline to the slave,
/// and return the master fd plus the slave path. The slave fd is closed; the
/// consumer reopens it by path.
fn create_pty() -> Result<(i32, String), SimulatorError> {
    unsafe {
        let mut master_fd: libc::c_int = 0;
        let mut slave_fd: libc::c_int = 0;
        let mut name_buf = [0 as libc::c_char; 256];

        if libc::openpty(
            &mut master_fd,
            &mut slave_fd,
            name_buf.as_mut_ptr(),
            std::ptr::null_mut(),
            std::ptr::null_mut(),
        ) != 0
        {
            return Err(SimulatorError::PtyCreation);
        }

        let slave_path = CStr::from_ptr(name_buf.as_ptr())
            .to_string_lossy()
            .into_owned();

        let mut tio: libc::termios = std::mem::zeroed();
        if libc::tcgetattr(slave_fd, &mut tio) != 0 {
            libc::close(master_fd);
            libc::close(slave_fd);
            return Err(SimulatorError::PtyConfig);
        }

        // Raw 8N1 at 9600, matching the real module
        libc::cfmakeraw(&mut tio);
        libc::cfsetispeed(&mut tio, libc::B9600);
        libc::cfsetospeed(&mut tio, libc::B9600);
        tio.c_cflag &= !(libc::CSIZE | libc::PARENB | libc::CSTOPB);
        tio.c_cflag |= libc::CS8 | libc::CLOCAL | libc::CREAD;

        if libc::tcsetattr(slave_fd, libc::TCSANOW, &tio) != 0 {
            libc::close(master_fd);
            libc::close(slave_fd);
            return Err(SimulatorError::PtyConfig);
        }

        libc::close(slave_fd);

        Ok((master_fd, slave_path))
    }
}

/// Write a burst to the master side. Short writes and errors are logged and
/// dropped; the generator keeps its cadence either way.
fn write_master(fd: i32, data: &[u8]) {
    let written = unsafe { libc::write(fd, data.as_ptr().cast(), data.len()) };
    if written < 0 {
        tracing::warn!(
            "write to PTY master failed: {}",
            std::io::Error::last_os_error()
        );
    } else if (written as usize) < data.len() {
        tracing::warn!("short write to PTY master: {} of {} bytes", written, data.len());
    }
}

/// Body of a minimum-navigation (RMC) sentence for the given position
fn rmc_body(latitude_deg: f64, longitude_deg: f64, speed_knots: f64) -> String {
    let now = Utc::now();
    let (lat, lat_hemi) = coordinate::encode(latitude_deg, true);
    let (lon, lon_hemi) = coordinate::encode(longitude_deg, false);

    format!(
        "GPRMC,{}.00,A,{},{},{},{},{:.2},0.00,{},,,A",
        now.format("%H%M%S"),
        lat,
        lat_hemi,
        lon,
        lon_hemi,
        speed_knots,
        now.format("%d%m%y"),
    )
}

/// Body of a fix-data (GGA) sentence for the given position
fn gga_body(
    latitude_deg: f64,
    longitude_deg: f64,
    altitude_m: f64,
    satellites: u32,
    hdop: f64,
) -> String {
    let now = Utc::now();
    let (lat, lat_hemi) = coordinate::encode(latitude_deg, true);
    let (lon, lon_hemi) = coordinate::encode(longitude_deg, false);

    format!(
        "GPGGA,{}.00,{},{},{},{},1,{:02},{:.1},{:.1},M,0.0,M,,",
        now.format("%H%M%S"),
        lat,
        lat_hemi,
        lon,
        lon_hemi,
        satellites,
        hdop,
        altitude_m,
    )
}
