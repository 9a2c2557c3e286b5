//! Entropy provenance records.

use serde::{Deserialize, Serialize};

use crate::astro::{format_iso8601, now_unix_secs};
use crate::conditioning::join_numbers;
use crate::error::EntropyError;
use crate::sources::{QuantumDraw, SensorRecord, SensorSnapshot};

/// Randomness source a caller asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RandomMode {
    #[default]
    Quantum,
    Cosmic,
}

impl std::fmt::Display for RandomMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Quantum => write!(f, "quantum"),
            Self::Cosmic => write!(f, "cosmic"),
        }
    }
}

impl std::str::FromStr for RandomMode {
    type Err = EntropyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quantum" | "qrng" => Ok(Self::Quantum),
            "cosmic" | "sensor" | "sensors" => Ok(Self::Cosmic),
            other => Err(EntropyError::InvalidParameter(format!(
                "unknown mode '{other}' (expected quantum or cosmic)"
            ))),
        }
    }
}

/// Randomness source that actually produced a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntropyMode {
    Quantum,
    Cosmic,
    /// Quantum was requested but the remote service failed.
    CosmicFallback,
}

impl EntropyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quantum => "quantum",
            Self::Cosmic => "cosmic",
            Self::CosmicFallback => "cosmic-fallback",
        }
    }

    /// Whether the ordering came from the remote number list.
    pub fn uses_numbers(&self) -> bool {
        matches!(self, Self::Quantum)
    }
}

impl std::fmt::Display for EntropyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable record of the randomness behind one reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntropySnapshot {
    pub mode: EntropyMode,
    /// Comma-joined numbers (quantum) or the canonical sensor string (cosmic).
    pub raw: Option<String>,
    /// Hex SHA-256 of `raw`.
    pub digest: String,
    /// ISO-8601 UTC.
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor: Option<SensorRecord>,
}

impl EntropySnapshot {
    pub fn from_quantum(draw: &QuantumDraw) -> Self {
        Self {
            mode: EntropyMode::Quantum,
            raw: Some(join_numbers(&draw.numbers)),
            digest: draw.seal.clone(),
            created_at: format_iso8601(now_unix_secs()),
            sensor: None,
        }
    }

    /// `mode` is [`EntropyMode::Cosmic`] or [`EntropyMode::CosmicFallback`].
    pub fn from_sensor(mode: EntropyMode, snapshot: &SensorSnapshot) -> Self {
        Self {
            mode,
            raw: Some(snapshot.canonical.clone()),
            digest: snapshot.digest.clone(),
            created_at: format_iso8601(snapshot.timestamp),
            sensor: Some(snapshot.record.clone()),
        }
    }
}

/// What the shuffle consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntropyMaterial {
    Numbers(Vec<u16>),
    Digest(String),
}

/// Shuffle input paired with its provenance record.
#[derive(Debug, Clone, PartialEq)]
pub struct ObtainedEntropy {
    pub material: EntropyMaterial,
    pub snapshot: EntropySnapshot,
}

impl ObtainedEntropy {
    pub fn quantum(draw: QuantumDraw) -> Self {
        let snapshot = EntropySnapshot::from_quantum(&draw);
        Self {
            material: EntropyMaterial::Numbers(draw.numbers),
            snapshot,
        }
    }

    pub fn sensor(mode: EntropyMode, snapshot: &SensorSnapshot) -> Self {
        Self {
            material: EntropyMaterial::Digest(snapshot.digest.clone()),
            snapshot: EntropySnapshot::from_sensor(mode, snapshot),
        }
    }
}
