//! Reading assembly.
//!
//! Pipeline for one reading:
//! 1. Select the deck subset and check it can fill the spread
//! 2. Obtain entropy sized to the deck (quantum, or sensor fallback)
//! 3. Shuffle by numbers or by digest, depending on what was obtained
//! 4. Draw orientations if reversals are allowed
//! 5. Keep the spread's prefix and pair each card with its position label
//!
//! Orientation comes from an ordinary RNG, not from the recorded entropy. The
//! entropy snapshot therefore audits the card order only; see
//! [`crate::verify`].

use std::collections::HashSet;
use std::sync::Arc;

use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::astro::{format_iso8601, now_unix_secs};
use crate::catalog::{Card, DeckType, Language, Orientation, deck};
use crate::config::EngineConfig;
use crate::error::{EntropyError, Result};
use crate::orchestrator::EntropyOrchestrator;
use crate::shuffle::{shuffle_by_digest, shuffle_by_numbers};
use crate::snapshot::{EntropyMaterial, EntropySnapshot, ObtainedEntropy, RandomMode};
use crate::spread::{SpreadDescriptor, SpreadType};

/// Per-request settings, recorded in the reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingConfiguration {
    pub spread: SpreadType,
    pub allow_reversed: bool,
    pub deck: DeckType,
    pub mode: RandomMode,
    pub language: Language,
}

impl Default for ReadingConfiguration {
    fn default() -> Self {
        Self {
            spread: SpreadType::PastPresentFuture,
            allow_reversed: true,
            deck: DeckType::Full,
            mode: RandomMode::Quantum,
            language: Language::Fr,
        }
    }
}

/// A card placed at a spread position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawnCard {
    pub position: String,
    pub card: Card,
}

/// An immutable, finished reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub id: Uuid,
    /// ISO-8601 UTC.
    pub created_at: String,
    pub configuration: ReadingConfiguration,
    pub cards: Vec<DrawnCard>,
    pub entropy: EntropySnapshot,
}

impl Reading {
    pub fn card_ids(&self) -> Vec<u8> {
        self.cards.iter().map(|d| d.card.id).collect()
    }
}

pub struct ReadingAssembler {
    orchestrator: EntropyOrchestrator,
}

impl ReadingAssembler {
    pub fn new(orchestrator: EntropyOrchestrator) -> Self {
        Self { orchestrator }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(EntropyOrchestrator::from_config(config))
    }

    pub fn orchestrator(&self) -> &EntropyOrchestrator {
        &self.orchestrator
    }

    /// Assemble a reading, drawing orientations from the thread RNG.
    pub async fn assemble(&self, config: &ReadingConfiguration) -> Result<Reading> {
        let (cards, descriptor) = prepare(config)?;
        let entropy = self.orchestrator.obtain(config.mode, cards.len()).await?;
        build_reading(config, &cards, &descriptor, entropy, &mut rand::rng())
    }

    /// Same as [`assemble`](Self::assemble) with a caller-supplied orientation RNG.
    pub async fn assemble_with_rng<R: Rng + Send>(
        &self,
        config: &ReadingConfiguration,
        rng: &mut R,
    ) -> Result<Reading> {
        let (cards, descriptor) = prepare(config)?;
        let entropy = self.orchestrator.obtain(config.mode, cards.len()).await?;
        build_reading(config, &cards, &descriptor, entropy, rng)
    }
}

/// Deck and spread for `config`, checked against each other.
fn prepare(config: &ReadingConfiguration) -> Result<(Vec<Card>, SpreadDescriptor)> {
    let cards = deck(config.deck);
    let descriptor = config.spread.descriptor(config.language);
    if descriptor.positions.len() != descriptor.card_count {
        return Err(EntropyError::AssemblyInconsistency(format!(
            "spread {} has {} labels for {} cards",
            config.spread,
            descriptor.positions.len(),
            descriptor.card_count
        )));
    }
    if descriptor.card_count > cards.len() {
        return Err(EntropyError::AssemblyInconsistency(format!(
            "spread {} needs {} cards but the {} deck has {}",
            config.spread,
            descriptor.card_count,
            config.deck,
            cards.len()
        )));
    }
    Ok((cards, descriptor))
}

/// Shuffle, orient, truncate and wrap. Pure apart from the id, the clock and
/// `rng`.
pub fn build_reading<R: Rng>(
    config: &ReadingConfiguration,
    cards: &[Card],
    descriptor: &SpreadDescriptor,
    entropy: ObtainedEntropy,
    rng: &mut R,
) -> Result<Reading> {
    let shuffled = match &entropy.material {
        EntropyMaterial::Numbers(numbers) => shuffle_by_numbers(cards, numbers)?,
        EntropyMaterial::Digest(digest) => shuffle_by_digest(cards, digest)?,
    };

    let drawn: Vec<DrawnCard> = shuffled
        .iter()
        .zip(descriptor.positions.iter())
        .map(|(card, position)| {
            let orientation = if config.allow_reversed && rng.random_bool(0.5) {
                Orientation::Reversed
            } else {
                Orientation::Upright
            };
            DrawnCard {
                position: (*position).to_string(),
                card: card.with_orientation(orientation),
            }
        })
        .collect();

    check_invariants(&drawn, cards, descriptor)?;

    let reading = Reading {
        id: Uuid::new_v4(),
        created_at: format_iso8601(now_unix_secs()),
        configuration: *config,
        cards: drawn,
        entropy: entropy.snapshot,
    };
    info!(
        "reading {} assembled: {} cards, {} entropy",
        reading.id,
        reading.cards.len(),
        reading.entropy.mode
    );
    Ok(reading)
}

fn check_invariants(drawn: &[DrawnCard], cards: &[Card], descriptor: &SpreadDescriptor) -> Result<()> {
    if drawn.len() != descriptor.card_count {
        return Err(EntropyError::AssemblyInconsistency(format!(
            "drew {} cards for a {}-card spread",
            drawn.len(),
            descriptor.card_count
        )));
    }
    let allowed: HashSet<u8> = cards.iter().map(|c| c.id).collect();
    let mut seen = HashSet::with_capacity(drawn.len());
    for d in drawn {
        if !allowed.contains(&d.card.id) {
            return Err(EntropyError::AssemblyInconsistency(format!(
                "card {} is not in the selected deck",
                d.card.id
            )));
        }
        if !seen.insert(d.card.id) {
            return Err(EntropyError::AssemblyInconsistency(format!(
                "card {} drawn twice",
                d.card.id
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Caller-owned "current reading" slot. Generating replaces the previous
/// reading; it is never mutated in place.
pub struct ReadingSession {
    assembler: Arc<ReadingAssembler>,
    current: Option<Reading>,
}

impl ReadingSession {
    pub fn new(assembler: Arc<ReadingAssembler>) -> Self {
        Self {
            assembler,
            current: None,
        }
    }

    /// Assemble a new reading and make it current. On error the previous
    /// reading stays current.
    pub async fn generate(&mut self, config: &ReadingConfiguration) -> Result<&Reading> {
        let reading = self.assembler.assemble(config).await?;
        Ok(self.current.insert(reading))
    }

    pub fn current(&self) -> Option<&Reading> {
        self.current.as_ref()
    }

    pub fn reset(&mut self) {
        self.current = None;
    }
}
