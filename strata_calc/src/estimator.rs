//! Stratified-proportional standard error under the worst-case proportion.
//!
//! For strata h = 1..H with population weights W_h = N_h / N:
//!
//! ```text
//! Var_h    = W_h² · p(1 − p) / n_h          p = 0.5
//! SE_h     = √Var_h
//! SE_total = √(Σ_h Var_h)
//! MOE      = 1.96 · SE_total
//! ```
//!
//! N_h / N is used as given; Σ N_h ≠ N is neither corrected nor rejected.

use crate::error::{CalcError, CalcResult, InvalidInputReason};
use serde::Serialize;
use strata::consts::{WORST_CASE_PROPORTION, Z_95};
use strata::design::{Design, StratumPopulations};
use strata::grid::{GridError, StratumGrid};
use tracing::debug;

/// Output of [`compute_stratified_error`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StratifiedError {
    /// SE_h, same order as the input sequences.
    pub se_per_stratum: Vec<f64>,
    /// Aggregate standard error.
    pub se_total: f64,
    /// 95% margin of error.
    pub moe_total: f64,
}

impl StratifiedError {
    /// SE_total², i.e. Σ_h SE_h².
    pub fn variance_total(&self) -> f64 {
        self.se_total * self.se_total
    }

    /// Margin of error in percentage points.
    pub fn moe_percent(&self) -> f64 {
        self.moe_total * 100.0
    }

    /// Number of strata.
    pub fn strata(&self) -> usize {
        self.se_per_stratum.len()
    }
}

fn validate(population: u64, samples: &[u64], stratum_populations: &[f64]) -> CalcResult<()> {
    let reject = |reason| Err(CalcError::InvalidInput(reason));

    if samples.len() != stratum_populations.len() {
        return reject(InvalidInputReason::LengthMismatch {
            samples: samples.len(),
            populations: stratum_populations.len(),
        });
    }
    if population == 0 {
        return reject(InvalidInputReason::EmptyPopulation);
    }
    // Counts are unsigned, so Σ n_h = 0 exactly when every n_h is zero
    // (or there are no strata at all). Single-stratum rule: `[0]` reports
    // ZeroSampleStratum { index: 0 }, not NoSamples, so the one empty
    // stratum is named; `[0, 0]` and `[]` stay NoSamples.
    if samples.len() != 1 && samples.iter().all(|&n| n == 0) {
        return reject(InvalidInputReason::NoSamples);
    }
    if let Some(index) = samples.iter().position(|&n| n == 0) {
        return reject(InvalidInputReason::ZeroSampleStratum { index });
    }
    Ok(())
}

/// Compute per-stratum and aggregate standard errors for a proportion.
///
/// # Arguments
/// - `population`: total population N.
/// - `samples`: n_h per stratum.
/// - `stratum_populations`: N_h per stratum, same order and length as `samples`.
///
/// # Errors
/// `CalcError::InvalidInput` with
/// - `NoSamples` when Σ n_h = 0 over zero or several strata,
/// - `ZeroSampleStratum` for the first stratum with n_h = 0 otherwise
///   (a single-stratum design with n_1 = 0 lands here),
/// - `EmptyPopulation` when N = 0,
/// - `LengthMismatch` when the sequences differ in length.
pub fn compute_stratified_error(
    population: u64,
    samples: &[u64],
    stratum_populations: &[f64],
) -> CalcResult<StratifiedError> {
    validate(population, samples, stratum_populations)?;

    let pq = WORST_CASE_PROPORTION * (1.0 - WORST_CASE_PROPORTION);
    let total = population as f64;

    let variances: Vec<f64> = samples
        .iter()
        .zip(stratum_populations)
        .map(|(&n_h, &big_n_h)| {
            let weight = big_n_h / total;
            weight * weight * (pq / n_h as f64)
        })
        .collect();

    let se_total = variances.iter().sum::<f64>().sqrt();
    let result = StratifiedError {
        se_per_stratum: variances.iter().map(|v| v.sqrt()).collect(),
        se_total,
        moe_total: Z_95 * se_total,
    };

    debug!(
        strata = result.strata(),
        population,
        se_total = result.se_total,
        moe_total = result.moe_total,
        "stratified error computed"
    );
    Ok(result)
}

/// N_h = N / H for each of `strata` strata.
///
/// Feeds [`compute_stratified_error`] when no per-stratum populations are known.
pub fn equal_split(population: u64, strata: usize) -> Vec<f64> {
    if strata == 0 {
        return Vec::new();
    }
    vec![population as f64 / strata as f64; strata]
}

/// Result of estimating a whole [`Design`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesignEstimate {
    /// SE_h laid out on the design's region × type axes.
    pub se_grid: StratumGrid<f64>,
    /// Flat result.
    pub error: StratifiedError,
}

/// Flatten a design, run the calculator and re-shape SE_h onto its grid.
pub fn estimate_design(design: &Design) -> CalcResult<DesignEstimate> {
    let samples = design.samples();
    let stratum_populations = match design.populations() {
        StratumPopulations::Explicit(grid) => grid.as_flat().iter().map(|&v| v as f64).collect(),
        StratumPopulations::EqualSplit => equal_split(design.population(), samples.len()),
    };

    let error = compute_stratified_error(
        design.population(),
        samples.as_flat(),
        &stratum_populations,
    )?;

    let se_grid = samples
        .reshape(error.se_per_stratum.clone())
        .map_err(|GridError::ShapeMismatch { expected, actual, .. }| {
            CalcError::InvalidInput(InvalidInputReason::LengthMismatch {
                samples: expected,
                populations: actual,
            })
        })?;

    Ok(DesignEstimate { se_grid, error })
}

// ─── Tests ──────────────────────────────────────────────────────────
