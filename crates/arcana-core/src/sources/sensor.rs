//! Sensor entropy: bounded motion bursts plus an optional location fix, folded
//! together with astronomical values and clocks into the cosmic hash.
//!
//! Collection never fails. Missing hardware, denied permission and timeouts
//! all degrade to "less data", down to empty sample lists and no location.
//!
//! The hardware handles sit behind an async mutex: one collection owns every
//! stream at a time, and each stream is stopped by a [`StreamGuard`] before the
//! lock is released, including when the collecting future is dropped.

use std::sync::LazyLock;
use std::time::{Duration, Instant};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::timeout;

use crate::astro;
use crate::conditioning::sha256_hex;
use crate::config::EngineConfig;
use crate::source::{Location, LocationProvider, MotionSensor, StreamGuard};

static PROCESS_ANCHOR: LazyLock<Instant> = LazyLock::new(Instant::now);

/// Nanoseconds on a monotonic clock anchored at first use in this process.
pub fn monotonic_nanos() -> u64 {
    PROCESS_ANCHOR.elapsed().as_nanos() as u64
}

// ---------------------------------------------------------------------------
// Snapshot types
// ---------------------------------------------------------------------------

/// The sensor sub-record stored in an entropy snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorRecord {
    pub gyro: Vec<f64>,
    pub accel: Vec<f64>,
    pub location: Option<Location>,
    pub moon_phase: f64,
    pub solar_declination: f64,
    pub julian_day: f64,
}

/// Everything one collection produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorSnapshot {
    pub record: SensorRecord,
    /// Wall-clock seconds since the Unix epoch.
    pub timestamp: f64,
    pub monotonic_ns: u64,
    pub canonical: String,
    /// Hex SHA-256 of `canonical`.
    pub digest: String,
}

impl SensorSnapshot {
    /// Assemble a snapshot from raw readings taken at `timestamp`.
    pub fn from_readings(
        gyro: Vec<f64>,
        accel: Vec<f64>,
        location: Option<Location>,
        timestamp: f64,
        monotonic_ns: u64,
    ) -> Self {
        let record = SensorRecord {
            gyro,
            accel,
            location,
            moon_phase: astro::moon_phase(timestamp),
            solar_declination: astro::solar_declination(timestamp),
            julian_day: astro::julian_day(timestamp),
        };
        let canonical = canonical_string(&record, timestamp, monotonic_ns);
        let digest = sha256_hex(canonical.as_bytes());
        Self {
            record,
            timestamp,
            monotonic_ns,
            canonical,
            digest,
        }
    }
}

fn join_floats(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Fixed-order concatenation hashed into the cosmic digest:
/// gyro, accel, location triple if present, moon phase, solar declination,
/// Julian day, wall-clock seconds, monotonic nanoseconds.
///
/// Segments are appended without separators between them; values inside a
/// segment are comma-joined.
pub fn canonical_string(record: &SensorRecord, timestamp: f64, monotonic_ns: u64) -> String {
    let mut out = String::new();
    out.push_str(&join_floats(&record.gyro));
    out.push_str(&join_floats(&record.accel));
    if let Some(loc) = record.location {
        out.push_str(&format!(
            "{},{},{}",
            loc.latitude, loc.longitude, loc.altitude
        ));
    }
    out.push_str(&format!(
        "{},{},{}",
        record.moon_phase, record.solar_declination, record.julian_day
    ));
    out.push_str(&timestamp.to_string());
    out.push_str(&monotonic_ns.to_string());
    out
}

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

/// The sensor handles a collection needs exclusive access to.
pub struct SensorHardware {
    pub gyroscope: Box<dyn MotionSensor>,
    pub accelerometer: Box<dyn MotionSensor>,
    pub location: Box<dyn LocationProvider>,
}

/// Sampling rate and time bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorSettings {
    pub sample_interval: Duration,
    /// Scalars per motion stream.
    pub target_samples: usize,
    pub motion_timeout: Duration,
    pub location_timeout: Duration,
}

impl Default for SensorSettings {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl SensorSettings {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            sample_interval: config.sample_interval(),
            target_samples: config.motion_target_samples,
            motion_timeout: config.motion_timeout(),
            location_timeout: config.location_timeout(),
        }
    }

    /// Longest any single acquisition may take.
    pub fn total_budget(&self) -> Duration {
        self.motion_timeout.max(self.location_timeout)
    }
}

pub struct SensorEntropySource {
    hardware: Mutex<SensorHardware>,
    settings: SensorSettings,
}

impl SensorEntropySource {
    pub fn new(hardware: SensorHardware, settings: SensorSettings) -> Self {
        Self {
            hardware: Mutex::new(hardware),
            settings,
        }
    }

    pub fn settings(&self) -> &SensorSettings {
        &self.settings
    }

    /// Collect motion bursts and a location fix concurrently, each bounded by
    /// its own timer and by `budget`, then build the snapshot.
    pub async fn collect(&self, budget: Duration) -> SensorSnapshot {
        let hardware = self.hardware.lock().await;
        let motion_bound = self.settings.motion_timeout.min(budget);
        let location_bound = self.settings.location_timeout.min(budget);

        let (gyro, accel, location) = tokio::join!(
            collect_motion(
                hardware.gyroscope.as_ref(),
                self.settings.sample_interval,
                self.settings.target_samples,
                motion_bound,
            ),
            collect_motion(
                hardware.accelerometer.as_ref(),
                self.settings.sample_interval,
                self.settings.target_samples,
                motion_bound,
            ),
            request_location(hardware.location.as_ref(), location_bound),
        );
        drop(hardware);

        debug!(
            "sensor snapshot: {} gyro values, {} accel values, location {}",
            gyro.len(),
            accel.len(),
            if location.is_some() { "present" } else { "absent" }
        );
        SensorSnapshot::from_readings(
            gyro,
            accel,
            location,
            astro::now_unix_secs(),
            monotonic_nanos(),
        )
    }
}

/// Read whole triplets until `target` scalars arrive, the stream ends, or
/// `bound` elapses. The stream is stopped on every exit path.
async fn collect_motion(
    sensor: &dyn MotionSensor,
    interval: Duration,
    target: usize,
    bound: Duration,
) -> Vec<f64> {
    if !sensor.is_available() {
        debug!("{} unavailable, skipping", sensor.name());
        return Vec::new();
    }

    let _guard = StreamGuard::new(sensor);
    let mut rx = match sensor.start(interval) {
        Ok(rx) => rx,
        Err(e) => {
            warn!("{} failed to start: {e}", sensor.name());
            return Vec::new();
        }
    };

    let mut samples = Vec::with_capacity(target);
    let gather = async {
        while samples.len() < target {
            match rx.recv().await {
                Some(triplet) => samples.extend_from_slice(&triplet),
                None => break,
            }
        }
    };
    if timeout(bound, gather).await.is_err() {
        warn!(
            "{} timed out after {:?} with {} values",
            sensor.name(),
            bound,
            samples.len()
        );
    }
    samples
}

async fn request_location(provider: &dyn LocationProvider, bound: Duration) -> Option<Location> {
    if !provider.is_authorized() {
        debug!("{}: location not authorized", provider.name());
        return None;
    }
    match timeout(bound, provider.request_fix()).await {
        Ok(Ok(fix)) => Some(fix),
        Ok(Err(e)) => {
            warn!("{}: location fix failed: {e}", provider.name());
            None
        }
        Err(_) => {
            warn!("{}: location fix timed out after {bound:?}", provider.name());
            None
        }
    }
}
