//! Shuffle fairness battery.
//!
//! Statistical tests over many permutations of a deck (each permutation a
//! `Vec<u8>` of card ids `0..deck_len`), plus an analytic profile of the
//! modulo reduction the shuffle uses. Each test returns a [`TestResult`] with
//! a p-value (where applicable), a pass/fail determination, and a letter grade
//! (A through F).

use statrs::distribution::{ChiSquared, ContinuousCDF, Discrete, Poisson};

// ═══════════════════════════════════════════════════════════════════════════════
// Core types
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of a single fairness test.
#[derive(Debug, Clone)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub p_value: Option<f64>,
    pub statistic: f64,
    pub details: String,
    pub grade: char,
}

impl TestResult {
    /// Assign a letter grade based on p-value.
    ///
    /// - A: p >= 0.1
    /// - B: p >= 0.01
    /// - C: p >= 0.001
    /// - D: p >= 0.0001
    /// - F: otherwise or None
    pub fn grade_from_p(p: Option<f64>) -> char {
        match p {
            Some(p) if p >= 0.1 => 'A',
            Some(p) if p >= 0.01 => 'B',
            Some(p) if p >= 0.001 => 'C',
            Some(p) if p >= 0.0001 => 'D',
            _ => 'F',
        }
    }

    /// Determine pass/fail from p-value against a threshold (default 0.01).
    pub fn pass_from_p(p: Option<f64>, threshold: f64) -> bool {
        match p {
            Some(p) => p >= threshold,
            None => false,
        }
    }

    fn from_chi2(name: &str, chi2: f64, df: f64, details: String) -> TestResult {
        let p = ChiSquared::new(df).ok().map(|dist| dist.sf(chi2));
        TestResult {
            name: name.to_string(),
            passed: TestResult::pass_from_p(p, 0.01),
            p_value: p,
            statistic: chi2,
            details,
            grade: TestResult::grade_from_p(p),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════════════

/// Return a failing `TestResult` when there are too few permutations.
fn insufficient(name: &str, needed: usize, got: usize) -> TestResult {
    TestResult {
        name: name.to_string(),
        passed: false,
        p_value: None,
        statistic: 0.0,
        details: format!("Insufficient data: need {needed} permutations, got {got}"),
        grade: 'F',
    }
}

/// Return a failing `TestResult` when a permutation has the wrong shape.
fn malformed(name: &str, deck_len: usize) -> TestResult {
    TestResult {
        name: name.to_string(),
        passed: false,
        p_value: None,
        statistic: 0.0,
        details: format!("Every permutation must hold {deck_len} ids below {deck_len}"),
        grade: 'F',
    }
}

fn well_formed(perms: &[Vec<u8>], deck_len: usize) -> bool {
    perms
        .iter()
        .all(|p| p.len() == deck_len && p.iter().all(|&id| (id as usize) < deck_len))
}

fn chi2_uniform(counts: &[u64], expected: f64) -> f64 {
    counts
        .iter()
        .map(|&c| {
            let diff = c as f64 - expected;
            diff * diff / expected
        })
        .sum()
}

// ═══════════════════════════════════════════════════════════════════════════════
// 1. POSITION TESTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Chi-squared on which card lands at `position` (k bins, k−1 df).
pub fn position_frequency(perms: &[Vec<u8>], deck_len: usize, position: usize) -> TestResult {
    let name = format!("Position {position} Frequency");
    if deck_len < 2 || position >= deck_len {
        return malformed(&name, deck_len);
    }
    let needed = deck_len * 5;
    if perms.len() < needed {
        return insufficient(&name, needed, perms.len());
    }
    if !well_formed(perms, deck_len) {
        return malformed(&name, deck_len);
    }
    let mut counts = vec![0u64; deck_len];
    for perm in perms {
        counts[perm[position] as usize] += 1;
    }
    let expected = perms.len() as f64 / deck_len as f64;
    let chi2 = chi2_uniform(&counts, expected);
    let (min, max) = counts
        .iter()
        .fold((u64::MAX, 0u64), |(lo, hi), &c| (lo.min(c), hi.max(c)));
    TestResult::from_chi2(
        &name,
        chi2,
        (deck_len - 1) as f64,
        format!(
            "n={}, expected_per_card={expected:.1}, min={min}, max={max}",
            perms.len()
        ),
    )
}

/// Test 1: which card is drawn first.
pub fn first_position_frequency(perms: &[Vec<u8>], deck_len: usize) -> TestResult {
    let mut result = position_frequency(perms, deck_len, 0);
    result.name = "First Position Frequency".to_string();
    result
}

/// Test 2: which card ends up last, the position the shuffle never revisits.
pub fn last_position_frequency(perms: &[Vec<u8>], deck_len: usize) -> TestResult {
    let mut result = position_frequency(perms, deck_len, deck_len.saturating_sub(1));
    result.name = "Last Position Frequency".to_string();
    result
}

/// Test 3: chi-squared over the full card × position matrix. Row and column
/// sums are fixed, so there are (k−1)² degrees of freedom.
pub fn position_uniformity(perms: &[Vec<u8>], deck_len: usize) -> TestResult {
    let name = "Position Uniformity";
    if deck_len < 2 {
        return malformed(name, deck_len);
    }
    let needed = deck_len * 5;
    if perms.len() < needed {
        return insufficient(name, needed, perms.len());
    }
    if !well_formed(perms, deck_len) {
        return malformed(name, deck_len);
    }
    let mut matrix = vec![0u64; deck_len * deck_len];
    for perm in perms {
        for (pos, &id) in perm.iter().enumerate() {
            matrix[pos * deck_len + id as usize] += 1;
        }
    }
    let expected = perms.len() as f64 / deck_len as f64;
    let chi2 = chi2_uniform(&matrix, expected);
    let df = ((deck_len - 1) * (deck_len - 1)) as f64;
    TestResult::from_chi2(
        name,
        chi2,
        df,
        format!("n={}, cells={}, expected_per_cell={expected:.1}", perms.len(), matrix.len()),
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// 2. STRUCTURE TESTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Test 4: fixed points (cards left in their original slot). For a uniform
/// permutation the count is close to Poisson(1). Goodness of fit over the bins
/// 0, 1, 2, 3+.
pub fn fixed_point_rate(perms: &[Vec<u8>], deck_len: usize) -> TestResult {
    let name = "Fixed Point Rate";
    let needed = 100;
    if perms.len() < needed {
        return insufficient(name, needed, perms.len());
    }
    if deck_len < 4 || !well_formed(perms, deck_len) {
        return malformed(name, deck_len);
    }
    let mut bins = [0u64; 4];
    let mut total_fixed = 0u64;
    for perm in perms {
        let fixed = perm
            .iter()
            .enumerate()
            .filter(|&(i, &id)| i == id as usize)
            .count();
        total_fixed += fixed as u64;
        bins[fixed.min(3)] += 1;
    }
    let poisson = match Poisson::new(1.0) {
        Ok(p) => p,
        Err(_) => return malformed(name, deck_len),
    };
    let p0 = poisson.pmf(0);
    let p1 = poisson.pmf(1);
    let p2 = poisson.pmf(2);
    let probs = [p0, p1, p2, 1.0 - p0 - p1 - p2];
    let n = perms.len() as f64;
    let chi2: f64 = bins
        .iter()
        .zip(probs.iter())
        .map(|(&obs, &prob)| {
            let expected = n * prob;
            let diff = obs as f64 - expected;
            diff * diff / expected
        })
        .sum();
    let mean = total_fixed as f64 / n;
    TestResult::from_chi2(
        name,
        chi2,
        3.0,
        format!("mean={mean:.3}, bins(0,1,2,3+)={bins:?}"),
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// 3. ANALYTIC MODULO BIAS
// ═══════════════════════════════════════════════════════════════════════════════

/// Bias of `value mod remaining` for one shuffle step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepBias {
    pub step: usize,
    pub remaining: usize,
    /// Likeliest offset probability over least likely (1.0 = unbiased).
    pub max_ratio: f64,
    /// Total variation distance from the uniform offset distribution.
    pub total_variation: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BiasProfile {
    pub deck_len: usize,
    pub value_bits: u32,
    pub steps: Vec<StepBias>,
}

impl BiasProfile {
    /// Step with the largest total variation distance.
    pub fn worst(&self) -> Option<&StepBias> {
        self.steps
            .iter()
            .max_by(|a, b| a.total_variation.total_cmp(&b.total_variation))
    }

    pub fn is_unbiased(&self) -> bool {
        self.steps.iter().all(|s| s.total_variation == 0.0)
    }
}

/// Exact per-step bias of reducing a uniform `value_bits`-bit value modulo
/// `deck_len - i` at every Fisher–Yates step `i`.
///
/// With `R = 2^value_bits`, `q = R / m` and `r = R % m`, offsets below `r`
/// have probability `(q + 1) / R` and the rest `q / R`.
pub fn modulo_bias_profile(deck_len: usize, value_bits: u32) -> BiasProfile {
    let range = 1u128 << value_bits.min(64);
    let steps = (0..deck_len.saturating_sub(1))
        .map(|step| {
            let m = (deck_len - step) as u128;
            let q = range / m;
            let r = range % m;
            let max_ratio = if r == 0 {
                1.0
            } else if q == 0 {
                f64::INFINITY
            } else {
                (q + 1) as f64 / q as f64
            };
            let heavy = (q + 1) as f64 / range as f64 - 1.0 / m as f64;
            let total_variation = if r == 0 { 0.0 } else { r as f64 * heavy };
            StepBias {
                step,
                remaining: m as usize,
                max_ratio,
                total_variation,
            }
        })
        .collect();
    BiasProfile {
        deck_len,
        value_bits,
        steps,
    }
}

/// Test 5: the analytic bias as a pass/fail result. Passes when no step's
/// likeliest offset is more than 1% above its least likely one.
pub fn modulo_bias_check(deck_len: usize, value_bits: u32) -> TestResult {
    let name = format!("Modulo Bias ({value_bits}-bit)");
    let profile = modulo_bias_profile(deck_len, value_bits);
    let Some(worst) = profile.worst() else {
        return malformed(&name, deck_len);
    };
    let passed = profile.steps.iter().all(|s| s.max_ratio <= 1.01);
    TestResult {
        name,
        passed,
        p_value: None,
        statistic: worst.max_ratio,
        details: format!(
            "worst step {} (mod {}): ratio={:.4}, tv={:.5}",
            worst.step, worst.remaining, worst.max_ratio, worst.total_variation
        ),
        grade: if passed { 'A' } else { 'F' },
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Test battery
// ═══════════════════════════════════════════════════════════════════════════════

/// Run the sampled fairness tests on a set of permutations.
pub fn run_all_tests(perms: &[Vec<u8>], deck_len: usize) -> Vec<TestResult> {
    let tests: Vec<fn(&[Vec<u8>], usize) -> TestResult> = vec![
        // Position (3)
        first_position_frequency,
        last_position_frequency,
        position_uniformity,
        // Structure (1)
        fixed_point_rate,
    ];
    tests.iter().map(|test_fn| test_fn(perms, deck_len)).collect()
}

/// Calculate overall quality score (0-100) from test results.
///
/// Each grade maps to a score: A=100, B=75, C=50, D=25, F=0.
/// Returns the average across all tests.
pub fn calculate_quality_score(results: &[TestResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let total: f64 = results
        .iter()
        .map(|r| match r.grade {
            'A' => 100.0,
            'B' => 75.0,
            'C' => 50.0,
            'D' => 25.0,
            _ => 0.0,
        })
        .sum();
    total / results.len() as f64
}
