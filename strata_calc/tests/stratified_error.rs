//! Calculator property and scenario tests.
//!
//! Properties hold for every valid input: MOE = 1.96·SE, variance
//! additivity across strata, scale invariance in (N, N_h), and rejection
//! (never NaN/∞) of zero-sample input.

use proptest::prelude::*;
use strata_calc::{CalcError, InvalidInputReason, compute_stratified_error, equal_split};

/// Relative tolerance for floating-point comparisons.
fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-12 + 1e-9 * a.abs().max(b.abs())
}

/// Valid designs: N, n_h ≥ 1, N_h ≥ 0 (sum not tied to N).
fn valid_input() -> impl Strategy<Value = (u64, Vec<u64>, Vec<f64>)> {
    (1usize..24).prop_flat_map(|strata| {
        (
            1u64..5_000_000,
            prop::collection::vec(1u64..50_000, strata),
            prop::collection::vec(0u64..2_000_000, strata),
        )
            .prop_map(|(n, samples, pops)| {
                (n, samples, pops.into_iter().map(|p| p as f64).collect())
            })
    })
}

proptest! {
    #[test]
    fn moe_is_z_times_se((population, samples, pops) in valid_input()) {
        let r = compute_stratified_error(population, &samples, &pops).unwrap();
        prop_assert!(r.se_total >= 0.0 && r.se_total.is_finite());
        prop_assert!(close(r.moe_total, 1.96 * r.se_total));
    }

    #[test]
    fn variances_add_up((population, samples, pops) in valid_input()) {
        let r = compute_stratified_error(population, &samples, &pops).unwrap();
        prop_assert_eq!(r.se_per_stratum.len(), samples.len());
        let sum_sq: f64 = r.se_per_stratum.iter().map(|se| se * se).sum();
        prop_assert!(close(r.variance_total(), sum_sq));
        prop_assert!(r.se_per_stratum.iter().all(|se| *se >= 0.0 && se.is_finite()));
    }

    #[test]
    fn scale_invariant((population, samples, pops) in valid_input(), k in 1u64..1000) {
        let base = compute_stratified_error(population, &samples, &pops).unwrap();
        let scaled_pops: Vec<f64> = pops.iter().map(|p| p * k as f64).collect();
        let scaled = compute_stratified_error(population * k, &samples, &scaled_pops).unwrap();
        prop_assert!(close(base.se_total, scaled.se_total));
        for (a, b) in base.se_per_stratum.iter().zip(&scaled.se_per_stratum) {
            prop_assert!(close(*a, *b));
        }
    }

    #[test]
    fn zero_stratum_always_rejected(
        (population, mut samples, pops) in valid_input(),
        pick in any::<prop::sample::Index>(),
    ) {
        let index = pick.index(samples.len());
        samples[index] = 0;
        let err = compute_stratified_error(population, &samples, &pops).unwrap_err();
        match err {
            CalcError::InvalidInput(InvalidInputReason::ZeroSampleStratum { index: found }) => {
                prop_assert_eq!(found, index);
            }
            CalcError::InvalidInput(InvalidInputReason::NoSamples) => {
                prop_assert!(samples.len() > 1 && samples.iter().all(|&n| n == 0));
            }
            other => {
                prop_assert!(false, "unexpected {:?}", other);
            }
        }
    }

    #[test]
    fn all_zero_is_no_samples(strata in 2usize..32, population in 1u64..1_000_000) {
        let samples = vec![0; strata];
        let err = compute_stratified_error(population, &samples, &equal_split(population, strata))
            .unwrap_err();
        prop_assert_eq!(err.reason(), InvalidInputReason::NoSamples);
    }
}

#[test]
fn two_strata_of_five_thousand() {
    let r = compute_stratified_error(10_000, &[100, 100], &[5000.0, 5000.0]).unwrap();
    assert!(close(r.se_per_stratum[0], 0.000625_f64.sqrt()));
    assert!(close(r.se_per_stratum[1], 0.025));
    assert!(close(r.se_total, 0.00125_f64.sqrt()));
    assert!((r.se_total - 0.035355).abs() < 5e-7);
    assert!((r.moe_total - 0.069296).abs() < 5e-7);
}

#[test]
fn single_empty_stratum() {
    let err = compute_stratified_error(1000, &[0], &[1000.0]).unwrap_err();
    assert_eq!(
        err,
        CalcError::InvalidInput(InvalidInputReason::ZeroSampleStratum { index: 0 })
    );
}

#[test]
fn two_empty_strata() {
    let err = compute_stratified_error(1000, &[0, 0], &[500.0, 500.0]).unwrap_err();
    assert_eq!(err.reason(), InvalidInputReason::NoSamples);
    assert_eq!(err.to_string(), "invalid input: no samples");
}

#[test]
fn equal_split_is_the_same_core() {
    let explicit = compute_stratified_error(9000, &[30, 60, 90], &[3000.0; 3]).unwrap();
    let split = compute_stratified_error(9000, &[30, 60, 90], &equal_split(9000, 3)).unwrap();
    assert_eq!(explicit, split);
}
