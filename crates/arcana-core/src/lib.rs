//! # arcana-core
//!
//! **Tarot card orderings you can audit.**
//!
//! `arcana-core` shuffles a 78-card (or 22-card Major Arcana) deck with a
//! deterministic Fisher–Yates driven by recorded entropy: unsigned 16-bit
//! numbers from a remote quantum random number service, or a SHA-256 digest
//! of a local sensor snapshot (motion bursts, location, moon phase, solar
//! declination, Julian day, clocks). Every reading keeps its entropy record,
//! so anyone can re-derive the card order later.
//!
//! ## Quick Start
//!
//! ```no_run
//! use arcana_core::{EngineConfig, ReadingAssembler, ReadingConfiguration, verify_reading};
//!
//! # async fn demo() -> arcana_core::Result<()> {
//! let assembler = ReadingAssembler::from_config(&EngineConfig::default());
//! let reading = assembler.assemble(&ReadingConfiguration::default()).await?;
//! for drawn in &reading.cards {
//!     println!("{}: {}", drawn.position, drawn.card.name_fr);
//! }
//! assert!(verify_reading(&reading)?.is_valid());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! Sources → Orchestrator (quantum, or sensor fallback) → Shuffle → Assembler → Reading
//!
//! Entropy modes recorded on each reading:
//! - **quantum**: numbers from the QRNG; the seal is SHA-256 of the comma-joined values.
//! - **cosmic**: sensor snapshot requested directly.
//! - **cosmic-fallback**: quantum was requested, the remote failed, sensors were used.
//!
//! Sensor hardware is reached through the [`MotionSensor`] and
//! [`LocationProvider`] traits. Host builds ship clock-jitter motion and a
//! configurable static location.

pub mod astro;
pub mod catalog;
pub mod conditioning;
pub mod config;
pub mod error;
pub mod history;
pub mod orchestrator;
pub mod reading;
pub mod shuffle;
pub mod snapshot;
pub mod source;
pub mod sources;
pub mod spread;
pub mod verify;

pub use catalog::{
    Arcana, Card, DeckType, FULL_DECK_SIZE, Language, MAJOR_ARCANA_SIZE, Orientation, Suit,
    card_by_id, catalog, deck, major_arcana,
};
pub use conditioning::{sha256_hex, verification_seal};
pub use config::{ConfigError, DEFAULT_QRNG_URL, EngineConfig, MotionBackend};
pub use error::{EntropyError, RemoteFailure, Result};
pub use history::{HistoryEntry, HistoryError, ReadingHistory};
pub use orchestrator::{EntropyOrchestrator, EntropyStats};
pub use reading::{DrawnCard, Reading, ReadingAssembler, ReadingConfiguration, ReadingSession};
pub use shuffle::{shuffle_by_digest, shuffle_by_numbers};
pub use snapshot::{EntropyMaterial, EntropyMode, EntropySnapshot, ObtainedEntropy, RandomMode};
pub use source::{Location, LocationProvider, MotionSensor, SensorInfo, SensorKind, StreamGuard};
pub use sources::{
    JitterMotion, MAX_QUANTUM_VALUES, NoLocation, NoMotion, QuantumDraw, QuantumEntropySource,
    SensorEntropySource, SensorHardware, SensorRecord, SensorSettings, SensorSnapshot,
    StaticLocation,
};
pub use spread::{SpreadDescriptor, SpreadType};
pub use verify::{VerificationReport, verify_reading};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
