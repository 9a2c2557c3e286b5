//! Entropy orchestration: quantum first, sensor snapshot as fallback.
//!
//! ```text
//! quantum ──ok──────────────────────────────▶ mode = quantum
//!    │
//!    └─remote failure─▶ sensor collect ─────▶ mode = cosmic-fallback
//! cosmic ─────────────▶ sensor collect ─────▶ mode = cosmic
//! ```
//!
//! Only an invalid request (deck size outside the service's range) escapes to
//! the caller. Sensor collection cannot fail.

use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, warn};
use serde::Serialize;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::snapshot::{EntropyMode, ObtainedEntropy, RandomMode};
use crate::sources::{
    QuantumEntropySource, SensorEntropySource, SensorSettings, host_hardware,
};

/// Outcome counters since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntropyStats {
    pub quantum: u64,
    pub cosmic: u64,
    pub fallbacks: u64,
}

pub struct EntropyOrchestrator {
    quantum: QuantumEntropySource,
    sensor: SensorEntropySource,
    quantum_count: AtomicU64,
    cosmic_count: AtomicU64,
    fallback_count: AtomicU64,
}

impl EntropyOrchestrator {
    pub fn new(quantum: QuantumEntropySource, sensor: SensorEntropySource) -> Self {
        Self {
            quantum,
            sensor,
            quantum_count: AtomicU64::new(0),
            cosmic_count: AtomicU64::new(0),
            fallback_count: AtomicU64::new(0),
        }
    }

    /// Remote endpoint and host sensors as described by `config`.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            QuantumEntropySource::new(config.qrng_url.clone(), config.qrng_timeout()),
            SensorEntropySource::new(host_hardware(config), SensorSettings::from_config(config)),
        )
    }

    /// Obtain shuffle material for a deck of `deck_size` cards.
    pub async fn obtain(&self, mode: RandomMode, deck_size: usize) -> Result<ObtainedEntropy> {
        match mode {
            RandomMode::Quantum => match self.quantum.fetch(deck_size).await {
                Ok(draw) => {
                    self.quantum_count.fetch_add(1, Ordering::Relaxed);
                    Ok(ObtainedEntropy::quantum(draw))
                }
                Err(err) if err.is_recoverable() => {
                    warn!("quantum entropy failed, falling back to sensors: {err}");
                    self.fallback_count.fetch_add(1, Ordering::Relaxed);
                    Ok(self.sensor_entropy(EntropyMode::CosmicFallback).await)
                }
                Err(err) => Err(err),
            },
            RandomMode::Cosmic => {
                self.cosmic_count.fetch_add(1, Ordering::Relaxed);
                Ok(self.sensor_entropy(EntropyMode::Cosmic).await)
            }
        }
    }

    async fn sensor_entropy(&self, mode: EntropyMode) -> ObtainedEntropy {
        let budget = self.sensor.settings().total_budget();
        let snapshot = self.sensor.collect(budget).await;
        debug!("{mode} entropy digest {}", snapshot.digest);
        ObtainedEntropy::sensor(mode, &snapshot)
    }

    pub fn stats(&self) -> EntropyStats {
        EntropyStats {
            quantum: self.quantum_count.load(Ordering::Relaxed),
            cosmic: self.cosmic_count.load(Ordering::Relaxed),
            fallbacks: self.fallback_count.load(Ordering::Relaxed),
        }
    }

    pub fn quantum_source(&self) -> &QuantumEntropySource {
        &self.quantum
    }
}
