//! Deterministic Fisher–Yates permutations driven by recorded entropy.
//!
//! Both variants walk positions `0..len-1` and swap position `i` with
//! `i + value % (len - i)`, taking values cyclically from the entropy. Identical
//! inputs always give identical orderings, which is what lets a reading be
//! re-derived from its entropy snapshot.
//!
//! Known weakness: `value % (len - i)` is biased whenever `len - i` does not
//! divide 2^16 (numbers) or 2^8 (digest bytes). The reduction is kept as is so
//! that recorded readings stay reproducible; see `arcana_tests::modulo_bias_profile`
//! for the size of the effect.

use crate::conditioning::decode_digest;
use crate::error::{EntropyError, Result};

/// Fisher–Yates with swap offsets from `values`, reused cyclically.
fn fisher_yates<T: Clone>(deck: &[T], values: &[u64]) -> Vec<T> {
    let mut shuffled = deck.to_vec();
    let len = shuffled.len();
    if len < 2 {
        return shuffled;
    }
    for i in 0..len - 1 {
        let value = values[i % values.len()];
        let offset = (value % (len - i) as u64) as usize;
        shuffled.swap(i, i + offset);
    }
    shuffled
}

/// Shuffle using unsigned 16-bit values (quantum path). `numbers[i % n]` is
/// consumed at step `i`; wraparound is expected when fewer values than steps.
pub fn shuffle_by_numbers<T: Clone>(deck: &[T], numbers: &[u16]) -> Result<Vec<T>> {
    if numbers.is_empty() {
        return Err(EntropyError::InvalidParameter(
            "shuffle needs at least one entropy value".into(),
        ));
    }
    let values: Vec<u64> = numbers.iter().map(|&n| n as u64).collect();
    Ok(fisher_yates(deck, &values))
}

/// Shuffle using the bytes of a hex digest (sensor path). A 256-bit digest
/// gives 32 bytes, reused cyclically for longer decks.
pub fn shuffle_by_digest<T: Clone>(deck: &[T], hex_digest: &str) -> Result<Vec<T>> {
    let bytes = decode_digest(hex_digest)?;
    let values: Vec<u64> = bytes.iter().map(|&b| b as u64).collect();
    Ok(fisher_yates(deck, &values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DeckType, deck};
    use crate::conditioning::sha256_hex;
    use proptest::collection::vec;
    use proptest::prelude::*;

    fn sorted(mut v: Vec<u8>) -> Vec<u8> {
        v.sort_unstable();
        v
    }

    fn counting_digest() -> String {
        (0u8..32).map(|b| format!("{b:02x}")).collect()
    }

    // -----------------------------------------------------------------------
    // Golden traces
    // -----------------------------------------------------------------------

    #[test]
    fn test_digest_golden_four_cards() {
        // step0: swap(0, 0 + 0%4) no-op
        // step1: swap(1, 1 + 1%3) -> A C B D
        // step2: swap(2, 2 + 2%2) no-op
        let out = shuffle_by_digest(&['A', 'B', 'C', 'D'], &counting_digest()).unwrap();
        assert_eq!(out, vec!['A', 'C', 'B', 'D']);
    }

    #[test]
    fn test_numbers_golden_five_cards() {
        // step0: 7%5=2 -> C B A D E
        // step1: 2%4=2 -> C D A B E
        // step2: 7%3=1 -> C D B A E
        // step3: 2%2=0 -> unchanged
        let out = shuffle_by_numbers(&['A', 'B', 'C', 'D', 'E'], &[7, 2]).unwrap();
        assert_eq!(out, vec!['C', 'D', 'B', 'A', 'E']);
    }

    #[test]
    fn test_numbers_zero_values_is_identity() {
        let deck: Vec<u8> = (0..22).collect();
        assert_eq!(shuffle_by_numbers(&deck, &[0]).unwrap(), deck);
    }

    // -----------------------------------------------------------------------
    // Permutation and determinism properties
    // -----------------------------------------------------------------------

    proptest! {
        #[test]
        fn test_numbers_is_permutation_for_any_deck(
            deck_len in 0usize..=78,
            numbers in vec(any::<u16>(), 1..200),
        ) {
            let ids: Vec<u8> = (0..deck_len as u8).collect();
            let out = shuffle_by_numbers(&ids, &numbers).unwrap();
            prop_assert_eq!(&out, &shuffle_by_numbers(&ids, &numbers).unwrap());
            prop_assert_eq!(sorted(out), ids);
        }

        #[test]
        fn test_digest_is_permutation_for_any_deck(
            deck_len in 0usize..=78,
            bytes in vec(any::<u8>(), 1..64),
        ) {
            let ids: Vec<u8> = (0..deck_len as u8).collect();
            let digest = hex::encode(&bytes);
            let out = shuffle_by_digest(&ids, &digest).unwrap();
            prop_assert_eq!(&out, &shuffle_by_digest(&ids, &digest).unwrap());
            prop_assert_eq!(sorted(out), ids);
        }
    }

    #[test]
    fn test_digest_wraps_past_32_bytes() {
        // 34 cards: step 32 reuses byte 0 of the digest.
        let ids: Vec<u8> = (0..34).collect();
        let digest = sha256_hex(b"wrap");
        let out = shuffle_by_digest(&ids, &digest).unwrap();
        assert_eq!(sorted(out.clone()), ids);

        let mut bytes = hex::decode(&digest).unwrap();
        let first = bytes[0];
        bytes.push(first);
        assert_eq!(shuffle_by_digest(&ids, &hex::encode(&bytes)).unwrap(), out);
    }

    #[test]
    fn test_deterministic_for_identical_inputs() {
        let cards = deck(DeckType::Full);
        let digest = sha256_hex(b"moon");
        assert_eq!(
            shuffle_by_digest(&cards, &digest).unwrap(),
            shuffle_by_digest(&cards, &digest).unwrap()
        );
        let numbers = [513u16, 9, 60000, 17];
        assert_eq!(
            shuffle_by_numbers(&cards, &numbers).unwrap(),
            shuffle_by_numbers(&cards, &numbers).unwrap()
        );
    }

    #[test]
    fn test_does_not_mutate_input() {
        let cards = deck(DeckType::MajorOnly);
        let before: Vec<u8> = cards.iter().map(|c| c.id).collect();
        let _ = shuffle_by_numbers(&cards, &[12345]).unwrap();
        let after: Vec<u8> = cards.iter().map(|c| c.id).collect();
        assert_eq!(before, after);
    }

    // -----------------------------------------------------------------------
    // Edge cases
    // -----------------------------------------------------------------------

    #[test]
    fn test_empty_entropy_rejected() {
        assert!(matches!(
            shuffle_by_numbers(&[1, 2, 3], &[]),
            Err(EntropyError::InvalidParameter(_))
        ));
        assert!(shuffle_by_digest(&[1, 2, 3], "").is_err());
        assert!(shuffle_by_digest(&[1, 2, 3], "not hex").is_err());
    }

    #[test]
    fn test_tiny_decks() {
        let empty: [u8; 0] = [];
        assert!(shuffle_by_numbers(&empty, &[5]).unwrap().is_empty());
        assert_eq!(shuffle_by_digest(&[9u8], "ff").unwrap(), vec![9]);
    }
}
