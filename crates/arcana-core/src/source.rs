//! Sensor provider traits and the scoped stream guard.
//!
//! The core never talks to hardware directly. A platform supplies a
//! [`MotionSensor`] per motion stream (gyroscope, accelerometer) and one
//! [`LocationProvider`]. The core only needs "start", "stop", and "give me one
//! fix or fail".

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::Result;

/// Physical quantity a sensor reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    /// 3-axis rotation rate.
    Gyroscope,
    /// 3-axis acceleration.
    Accelerometer,
    /// Latitude / longitude / altitude fix.
    Location,
}

impl std::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gyroscope => write!(f, "gyroscope"),
            Self::Accelerometer => write!(f, "accelerometer"),
            Self::Location => write!(f, "location"),
        }
    }
}

/// Metadata about a sensor provider.
#[derive(Debug, Clone)]
pub struct SensorInfo {
    /// Unique identifier (e.g. `"jitter_gyroscope"`).
    pub name: &'static str,
    /// One-line human-readable description.
    pub description: &'static str,
    pub kind: SensorKind,
}

/// A single location fix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

/// A streaming 3-axis motion sensor.
///
/// `start` begins delivering samples on the returned channel at roughly the
/// requested interval; `stop` ends the stream and must be idempotent. Callers
/// hold a [`StreamGuard`] so `stop` runs on every exit path.
pub trait MotionSensor: Send + Sync {
    fn info(&self) -> &SensorInfo;

    /// Whether the hardware exists on this machine.
    fn is_available(&self) -> bool;

    fn start(&self, interval: Duration) -> Result<mpsc::Receiver<[f64; 3]>>;

    fn stop(&self);

    fn name(&self) -> &'static str {
        self.info().name
    }
}

/// One-shot location provider with platform permission semantics.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    fn info(&self) -> &SensorInfo;

    /// Whether the platform currently grants location access.
    fn is_authorized(&self) -> bool;

    async fn request_fix(&self) -> Result<Location>;

    fn name(&self) -> &'static str {
        self.info().name
    }
}

/// Stops a motion stream when dropped: on completion, on timeout, and when the
/// owning future is cancelled.
pub struct StreamGuard<'a> {
    sensor: &'a dyn MotionSensor,
}

impl<'a> StreamGuard<'a> {
    pub fn new(sensor: &'a dyn MotionSensor) -> Self {
        Self { sensor }
    }
}

impl Drop for StreamGuard<'_> {
    fn drop(&mut self) {
        log::trace!("stopping {} stream", self.sensor.name());
        self.sensor.stop();
    }
}
