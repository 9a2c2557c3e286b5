use std::time::Instant;

use rand::{Rng, RngCore};

use arcana_core::{DeckType, Result, sha256_hex, shuffle_by_digest, shuffle_by_numbers};
use arcana_tests::{TestResult, calculate_quality_score, modulo_bias_check, run_all_tests};

pub fn run(trials: usize, deck_type: DeckType, source: &str) -> super::CliResult {
    let deck_len = deck_type.size();
    println!(
        "🔬 Shuffling a {deck_len}-card deck {trials} times from {source} entropy...\n"
    );

    let t0 = Instant::now();
    let perms = permutations(trials, deck_len, source, &mut rand::rng())?;
    let results = run_all_tests(&perms, deck_len);
    let elapsed = t0.elapsed().as_secs_f64();

    print_results(&results);
    let score = calculate_quality_score(&results);
    let passed = results.iter().filter(|r| r.passed).count();
    println!(
        "\n  Score: {score:.0}/100 ({passed}/{} passed) [{elapsed:.1}s]",
        results.len()
    );

    println!("\n  Analytic modulo bias:");
    let bits = [8, 16];
    let checks: Vec<TestResult> = bits
        .iter()
        .map(|&b| modulo_bias_check(deck_len, b))
        .collect();
    print_results(&checks);
    if source == "digest" {
        println!("\n  The digest shuffle reduces single bytes, so the 8-bit row applies.");
    } else {
        println!("\n  The numbers shuffle reduces 16-bit values, so the 16-bit row applies.");
    }
    Ok(())
}

/// `trials` shuffles of the ids `0..deck_len`, each from fresh entropy.
///
/// `digest` hashes 32 random bytes and drives the byte shuffle; `numbers`
/// draws one 16-bit value per card.
pub fn permutations<R: Rng>(
    trials: usize,
    deck_len: usize,
    source: &str,
    rng: &mut R,
) -> Result<Vec<Vec<u8>>> {
    let ids: Vec<u8> = (0..deck_len as u8).collect();
    (0..trials)
        .map(|_| match source {
            "numbers" => {
                let numbers: Vec<u16> = (0..deck_len).map(|_| rng.random()).collect();
                shuffle_by_numbers(&ids, &numbers)
            }
            _ => {
                let mut seed = [0u8; 32];
                rng.fill_bytes(&mut seed);
                shuffle_by_digest(&ids, &sha256_hex(&seed))
            }
        })
        .collect()
}

fn print_results(results: &[TestResult]) {
    println!(
        "  {:<28} {:>5} {:>10} {:>12}  Details",
        "Test", "Grade", "p-value", "Statistic"
    );
    println!("  {}", "-".repeat(90));
    for r in results {
        let p = r
            .p_value
            .map(|p| format!("{p:.4}"))
            .unwrap_or_else(|| "-".to_string());
        let status = if r.passed { "✓" } else { "✗" };
        println!(
            "{status} {:<28} {:>5} {:>10} {:>12.3}  {}",
            r.name, r.grade, p, r.statistic, r.details
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_permutations_are_complete() {
        let mut rng = StdRng::seed_from_u64(3);
        for source in ["digest", "numbers"] {
            let perms = permutations(50, 22, source, &mut rng).unwrap();
            assert_eq!(perms.len(), 50);
            for p in &perms {
                let mut sorted = p.clone();
                sorted.sort_unstable();
                assert_eq!(sorted, (0..22).collect::<Vec<u8>>());
            }
        }
    }

    #[test]
    fn test_permutations_vary() {
        let mut rng = StdRng::seed_from_u64(9);
        let perms = permutations(20, 78, "digest", &mut rng).unwrap();
        assert!(perms.windows(2).any(|w| w[0] != w[1]));
    }
}
