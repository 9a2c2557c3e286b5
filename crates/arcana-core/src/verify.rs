//! Independent re-verification of a recorded reading.
//!
//! A reading carries the raw entropy and its digest. Re-running the shuffle
//! from that record must reproduce the drawn card order exactly. Orientation
//! is not covered: it is drawn outside the audited entropy.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{card_by_id, deck};
use crate::conditioning::{parse_numbers, sha256_hex};
use crate::error::{EntropyError, Result};
use crate::reading::Reading;
use crate::shuffle::{shuffle_by_digest, shuffle_by_numbers};
use crate::snapshot::EntropyMode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub reading_id: Uuid,
    pub mode: EntropyMode,
    /// SHA-256 of the raw entropy equals the recorded digest.
    pub digest_matches: bool,
    /// Re-derived prefix equals the drawn cards.
    pub order_matches: bool,
    /// Every drawn card resolves to its catalog entry with the same names.
    pub cards_match_catalog: bool,
    pub expected_ids: Vec<u8>,
    pub actual_ids: Vec<u8>,
}

impl VerificationReport {
    pub fn is_valid(&self) -> bool {
        self.digest_matches && self.order_matches && self.cards_match_catalog
    }
}

impl std::fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "reading {} ({}): digest {}, order {}, cards {}",
            self.reading_id,
            self.mode,
            if self.digest_matches { "ok" } else { "MISMATCH" },
            if self.order_matches { "ok" } else { "MISMATCH" },
            if self.cards_match_catalog { "ok" } else { "MISMATCH" }
        )
    }
}

/// Recompute the digest and the card order from `reading.entropy`.
///
/// Fails only when the record cannot be interpreted at all (no raw entropy,
/// unparseable numbers, malformed digest).
pub fn verify_reading(reading: &Reading) -> Result<VerificationReport> {
    let entropy = &reading.entropy;
    let raw = entropy.raw.as_deref().ok_or_else(|| {
        EntropyError::InvalidParameter("reading carries no raw entropy".into())
    })?;
    let digest_matches = sha256_hex(raw.as_bytes()) == entropy.digest.to_ascii_lowercase();

    let cards = deck(reading.configuration.deck);
    let reordered = if entropy.mode.uses_numbers() {
        shuffle_by_numbers(&cards, &parse_numbers(raw)?)?
    } else {
        shuffle_by_digest(&cards, &entropy.digest)?
    };

    let actual_ids = reading.card_ids();
    let expected_ids: Vec<u8> = reordered
        .iter()
        .take(actual_ids.len().max(reading.configuration.spread.card_count()))
        .map(|c| c.id)
        .collect();
    let order_matches = expected_ids == actual_ids;
    let cards_match_catalog = reading.cards.iter().all(|drawn| {
        card_by_id(drawn.card.id).is_some_and(|known| {
            known.name_fr == drawn.card.name_fr
                && known.name_en == drawn.card.name_en
                && known.arcana == drawn.card.arcana
        })
    });

    Ok(VerificationReport {
        reading_id: reading.id,
        mode: entropy.mode,
        digest_matches,
        order_matches,
        cards_match_catalog,
        expected_ids,
        actual_ids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DeckType;
    use crate::reading::{ReadingConfiguration, build_reading};
    use crate::snapshot::ObtainedEntropy;
    use crate::sources::{QuantumDraw, SensorSnapshot};
    use crate::spread::SpreadType;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn reading_from(entropy: ObtainedEntropy, config: ReadingConfiguration) -> Reading {
        let cards = deck(config.deck);
        let descriptor = config.spread.descriptor(config.language);
        build_reading(
            &config,
            &cards,
            &descriptor,
            entropy,
            &mut StdRng::seed_from_u64(5),
        )
        .unwrap()
    }

    fn quantum_reading() -> Reading {
        let numbers: Vec<u16> = (0..78).map(|i| (i * 40_503 % 65_521) as u16).collect();
        reading_from(
            ObtainedEntropy::quantum(QuantumDraw {
                seal: crate::conditioning::verification_seal(&numbers),
                numbers,
            }),
            ReadingConfiguration {
                spread: SpreadType::CelticCross,
                ..Default::default()
            },
        )
    }

    fn cosmic_reading() -> Reading {
        let snap = SensorSnapshot::from_readings(vec![0.3, 0.1, -0.2], vec![], None, 1.75e9, 11);
        reading_from(
            ObtainedEntropy::sensor(EntropyMode::Cosmic, &snap),
            ReadingConfiguration {
                deck: DeckType::MajorOnly,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_untouched_readings_verify() {
        for reading in [quantum_reading(), cosmic_reading()] {
            let report = verify_reading(&reading).unwrap();
            assert!(report.is_valid(), "{report}");
            assert_eq!(report.expected_ids, reading.card_ids());
        }
    }

    #[test]
    fn test_swapped_cards_fail_order_check() {
        let mut reading = quantum_reading();
        reading.cards.swap(0, 1);
        let report = verify_reading(&reading).unwrap();
        assert!(report.digest_matches);
        assert!(!report.order_matches);
        assert!(!report.is_valid());
    }

    #[test]
    fn test_tampered_raw_fails_digest_check() {
        let mut reading = quantum_reading();
        let raw = reading.entropy.raw.take().unwrap();
        reading.entropy.raw = Some(raw.replacen('0', "1", 1));
        let report = verify_reading(&reading).unwrap();
        assert!(!report.digest_matches);
    }

    #[test]
    fn test_tampered_digest_fails_cosmic() {
        let mut reading = cosmic_reading();
        reading.entropy.digest = crate::conditioning::sha256_hex(b"other");
        let report = verify_reading(&reading).unwrap();
        assert!(!report.digest_matches);
        assert!(!report.order_matches);
    }

    #[test]
    fn test_relabelled_card_fails_catalog_check() {
        let mut reading = cosmic_reading();
        reading.cards[0].card.name_en = "The Lucky Draw".into();
        let report = verify_reading(&reading).unwrap();
        assert!(report.order_matches);
        assert!(!report.cards_match_catalog);
        assert!(!report.is_valid());
        assert!(report.to_string().contains("cards MISMATCH"));
    }

    #[test]
    fn test_unknown_card_id_fails_catalog_check() {
        let mut reading = quantum_reading();
        reading.cards[2].card.id = 200;
        let report = verify_reading(&reading).unwrap();
        assert!(!report.cards_match_catalog);
        assert!(!report.order_matches);
    }

    #[test]
    fn test_orientation_is_not_audited() {
        let mut reading = quantum_reading();
        for d in &mut reading.cards {
            d.card = d.card.with_orientation(crate::catalog::Orientation::Reversed);
        }
        assert!(verify_reading(&reading).unwrap().is_valid());
    }

    #[test]
    fn test_missing_raw_is_an_error() {
        let mut reading = cosmic_reading();
        reading.entropy.raw = None;
        assert!(matches!(
            verify_reading(&reading),
            Err(EntropyError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_report_survives_json() {
        let reading = cosmic_reading();
        let json = serde_json::to_string(&reading).unwrap();
        let back: Reading = serde_json::from_str(&json).unwrap();
        assert!(verify_reading(&back).unwrap().is_valid());
    }
}
