//! Entropy sources: remote quantum numbers and local sensor snapshots, plus
//! the host providers that stand in for phone hardware.

pub mod location;
pub mod motion;
pub mod quantum;
pub mod sensor;

pub use location::{NoLocation, StaticLocation};
pub use motion::{JitterMotion, NoMotion};
pub use quantum::{QuantumDraw, QuantumEntropySource, MAX_QUANTUM_VALUES};
pub use sensor::{SensorEntropySource, SensorHardware, SensorRecord, SensorSettings, SensorSnapshot};

use crate::config::{EngineConfig, MotionBackend};
use crate::source::{LocationProvider, MotionSensor};

/// Build the host sensor set described by `config`.
pub fn host_hardware(config: &EngineConfig) -> SensorHardware {
    let (gyroscope, accelerometer): (Box<dyn MotionSensor>, Box<dyn MotionSensor>) = match config.motion {
        MotionBackend::Jitter => (
            Box::new(JitterMotion::gyroscope()),
            Box::new(JitterMotion::accelerometer()),
        ),
        MotionBackend::None => (
            Box::new(NoMotion::gyroscope()),
            Box::new(NoMotion::accelerometer()),
        ),
    };
    let location: Box<dyn LocationProvider> = match config.location {
        Some(fix) => Box::new(StaticLocation::new(fix)),
        None => Box::new(NoLocation),
    };
    SensorHardware {
        gyroscope,
        accelerometer,
        location,
    }
}
