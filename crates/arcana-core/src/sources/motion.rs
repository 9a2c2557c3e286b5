//! Host motion providers.
//!
//! Desktop and server hosts have no gyroscope or accelerometer. [`JitterMotion`]
//! fills the stream with phase noise between `Instant` and `SystemTime`, scaled
//! to look like small rotation rates. [`NoMotion`] reports the hardware as
//! missing, so collection yields an empty stream.

use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{EntropyError, Result};
use crate::source::{MotionSensor, SensorInfo, SensorKind};

const CHANNEL_CAPACITY: usize = 64;

static JITTER_GYRO_INFO: SensorInfo = SensorInfo {
    name: "jitter_gyroscope",
    description: "Clock phase noise shaped as 3-axis rotation rates",
    kind: SensorKind::Gyroscope,
};

static JITTER_ACCEL_INFO: SensorInfo = SensorInfo {
    name: "jitter_accelerometer",
    description: "Clock phase noise shaped as 3-axis accelerations",
    kind: SensorKind::Accelerometer,
};

static NO_GYRO_INFO: SensorInfo = SensorInfo {
    name: "no_gyroscope",
    description: "Gyroscope not present",
    kind: SensorKind::Gyroscope,
};

static NO_ACCEL_INFO: SensorInfo = SensorInfo {
    name: "no_accelerometer",
    description: "Accelerometer not present",
    kind: SensorKind::Accelerometer,
};

// ---------------------------------------------------------------------------
// JitterMotion
// ---------------------------------------------------------------------------

/// Streams clock-jitter triplets at the requested interval.
pub struct JitterMotion {
    info: &'static SensorInfo,
    scale: f64,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl JitterMotion {
    /// Rotation rates in rad/s, roughly ±0.5.
    pub fn gyroscope() -> Self {
        Self {
            info: &JITTER_GYRO_INFO,
            scale: 1.0,
            task: Mutex::new(None),
        }
    }

    /// Accelerations in g, roughly ±0.05.
    pub fn accelerometer() -> Self {
        Self {
            info: &JITTER_ACCEL_INFO,
            scale: 0.1,
            task: Mutex::new(None),
        }
    }

    /// Whether a stream task is currently running.
    pub fn is_streaming(&self) -> bool {
        let task = self.task.lock().unwrap_or_else(|e| e.into_inner());
        task.as_ref().is_some_and(|h| !h.is_finished())
    }
}

/// One centred jitter reading in `[-0.5, 0.5)`.
fn jitter_axis() -> f64 {
    let mono = Instant::now();
    let wall = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();
    let mono_delta_ns = mono.elapsed().as_nanos() as u64;
    let wall_ns = wall.as_nanos() as u64;
    let mixed = (mono_delta_ns ^ wall_ns) & 0xffff;
    mixed as f64 / 65_536.0 - 0.5
}

fn jitter_triplet(scale: f64) -> [f64; 3] {
    [
        jitter_axis() * scale,
        jitter_axis() * scale,
        jitter_axis() * scale,
    ]
}

impl MotionSensor for JitterMotion {
    fn info(&self) -> &SensorInfo {
        self.info
    }

    fn is_available(&self) -> bool {
        true
    }

    fn start(&self, interval: Duration) -> Result<mpsc::Receiver<[f64; 3]>> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| {
            EntropyError::SensorUnavailable(format!("{}: no async runtime", self.info.name))
        })?;
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let scale = self.scale;
        let handle = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if tx.send(jitter_triplet(scale)).await.is_err() {
                    break;
                }
            }
        });

        let mut task = self.task.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = task.replace(handle) {
            previous.abort();
        }
        Ok(rx)
    }

    /// Cancels the sampling task. Cancellation lands at the task's next
    /// await, so the task may still be winding down when this returns; the
    /// receiver sees the channel close once it is gone.
    fn stop(&self) {
        let mut task = self.task.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = task.take() {
            handle.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// NoMotion
// ---------------------------------------------------------------------------

/// Absent motion hardware.
pub struct NoMotion {
    info: &'static SensorInfo,
}

impl NoMotion {
    pub fn gyroscope() -> Self {
        Self {
            info: &NO_GYRO_INFO,
        }
    }

    pub fn accelerometer() -> Self {
        Self {
            info: &NO_ACCEL_INFO,
        }
    }
}

impl MotionSensor for NoMotion {
    fn info(&self) -> &SensorInfo {
        self.info
    }

    fn is_available(&self) -> bool {
        false
    }

    fn start(&self, _interval: Duration) -> Result<mpsc::Receiver<[f64; 3]>> {
        Err(EntropyError::SensorUnavailable(format!(
            "{} not present",
            self.info.kind
        )))
    }

    fn stop(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jitter_axis_range() {
        for _ in 0..1000 {
            let v = jitter_axis();
            assert!((-0.5..0.5).contains(&v));
        }
    }

    #[test]
    fn test_jitter_info() {
        assert_eq!(JitterMotion::gyroscope().name(), "jitter_gyroscope");
        assert_eq!(
            JitterMotion::accelerometer().info().kind,
            SensorKind::Accelerometer
        );
        assert!(JitterMotion::gyroscope().is_available());
    }

    #[test]
    fn test_start_without_runtime_fails() {
        let gyro = JitterMotion::gyroscope();
        assert!(matches!(
            gyro.start(Duration::from_millis(10)),
            Err(EntropyError::SensorUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_jitter_streams_until_stopped() {
        let gyro = JitterMotion::gyroscope();
        let mut rx = gyro.start(Duration::from_millis(1)).unwrap();
        for _ in 0..3 {
            let sample = rx.recv().await.unwrap();
            assert!(sample.iter().all(|v| v.abs() <= 0.5));
        }
        assert!(gyro.is_streaming());

        gyro.stop();
        // Drain anything buffered; the channel closes once the task is gone.
        while rx.recv().await.is_some() {}
        assert!(!gyro.is_streaming());
        gyro.stop();
    }

    #[tokio::test]
    async fn test_dropped_receiver_ends_task() {
        let accel = JitterMotion::accelerometer();
        let rx = accel.start(Duration::from_millis(1)).unwrap();
        drop(rx);
        tokio::time::timeout(Duration::from_secs(2), async {
            while accel.is_streaming() {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .unwrap();
        accel.stop();
    }

    #[test]
    fn test_no_motion() {
        let accel = NoMotion::accelerometer();
        assert!(!accel.is_available());
        assert!(accel.start(Duration::from_millis(10)).is_err());
        accel.stop();
    }
}
