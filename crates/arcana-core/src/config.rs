//! Engine configuration: endpoint, time bounds, and host sensor selection.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::source::Location;

/// ANU quantum random number service.
pub const DEFAULT_QRNG_URL: &str = "https://qrng.anu.edu.au/API/jsonI.php";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Which host motion provider backs the gyroscope and accelerometer streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionBackend {
    /// Clock-jitter synthesised samples.
    #[default]
    Jitter,
    /// No motion hardware; streams yield nothing.
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub qrng_url: String,
    pub qrng_timeout_ms: u64,
    pub sample_interval_ms: u64,
    /// Scalars per motion stream (three per sample).
    pub motion_target_samples: usize,
    pub motion_timeout_ms: u64,
    pub location_timeout_ms: u64,
    pub location: Option<Location>,
    pub motion: MotionBackend,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            qrng_url: DEFAULT_QRNG_URL.to_string(),
            qrng_timeout_ms: 15_000,
            sample_interval_ms: 10,
            motion_target_samples: 30,
            motion_timeout_ms: 2_000,
            location_timeout_ms: 3_000,
            location: None,
            motion: MotionBackend::Jitter,
        }
    }
}

impl EngineConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }

    pub fn qrng_timeout(&self) -> Duration {
        Duration::from_millis(self.qrng_timeout_ms)
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms.max(1))
    }

    pub fn motion_timeout(&self) -> Duration {
        Duration::from_millis(self.motion_timeout_ms)
    }

    pub fn location_timeout(&self) -> Duration {
        Duration::from_millis(self.location_timeout_ms)
    }
}
