//! Design-level estimation tests.
//!
//! Designs loaded from disk are flattened region-major, estimated, and the
//! per-stratum errors re-shaped onto the same grid.

use std::fs;
use strata::prelude::*;
use strata_calc::{InvalidInputReason, Report, compute_stratified_error, estimate_design};
use tempfile::TempDir;

fn load(content: &str) -> Design {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("design.toml");
    fs::write(&path, content).unwrap();
    DesignFile::load(&path).unwrap().into_design().unwrap()
}

#[test]
fn grid_matches_flat_result() {
    let design = load(
        r#"
population = 12000
regions = ["Seoul", "Busan", "Daegu"]
types = ["Household", "Business"]
samples = [[300, 100], [200, 80], [150, 70]]
populations = [[5000, 1500], [2500, 1000], [1500, 500]]
"#,
    );
    let estimate = estimate_design(&design).unwrap();

    let flat = compute_stratified_error(
        12000,
        &[300, 100, 200, 80, 150, 70],
        &[5000.0, 1500.0, 2500.0, 1000.0, 1500.0, 500.0],
    )
    .unwrap();
    assert_eq!(estimate.error, flat);
    assert_eq!(estimate.se_grid.shape(), (3, 2));
    assert_eq!(estimate.se_grid.get(1, 1), Some(&flat.se_per_stratum[3]));
    assert_eq!(estimate.se_grid.types()[1], "Business");
}

#[test]
fn equal_split_design_uses_n_over_h() {
    let design = load(
        r#"
population = 10000
regions = ["North", "South"]
types = ["Only"]
samples = [[100], [100]]
equal_split = true
"#,
    );
    assert_eq!(design.populations(), &StratumPopulations::EqualSplit);
    let estimate = estimate_design(&design).unwrap();
    assert!((estimate.error.se_total - 0.00125_f64.sqrt()).abs() < 1e-12);
}

#[test]
fn zero_sample_cell_is_reported_with_flat_index() {
    let design = load(
        r#"
population = 1000
regions = ["A", "B"]
types = ["X", "Y"]
samples = [[10, 10], [0, 10]]
populations = [[250, 250], [250, 250]]
"#,
    );
    let err = estimate_design(&design).unwrap_err();
    assert_eq!(
        err.reason(),
        InvalidInputReason::ZeroSampleStratum { index: 2 }
    );
    let id = design.samples().stratum_id(2).unwrap();
    assert_eq!((id.region.as_str(), id.kind.as_str()), ("B", "X"));
}

#[test]
fn report_keeps_mismatched_sums() {
    let design = load(
        r#"
population = 1000
regions = ["A"]
types = ["X", "Y"]
samples = [[10, 10]]
populations = [[1000, 1000]]
"#,
    );
    let report = Report::new(&design, &estimate_design(&design).unwrap());
    assert_eq!(report.population_sum, 2000);
    assert_eq!(report.population, 1000);
    assert!(!report.population_matches);
}
