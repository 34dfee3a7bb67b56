//! Workspace-wide constants.
//!
//! Single source of truth for the statistical constants and the defaults
//! used when a fresh sampling form is created.

/// Proportion assumed for every stratum. p(1 - p) peaks at 0.5, so the
/// resulting error is the worst case over all possible proportions.
pub const WORST_CASE_PROPORTION: f64 = 0.5;

/// Two-sided 95% normal quantile.
pub const Z_95: f64 = 1.96;

/// Default total population N for a fresh form.
pub const DEFAULT_POPULATION: u64 = 10_000;

/// Default number of regions for a fresh form.
pub const DEFAULT_REGIONS: usize = 3;

/// Default number of types for a fresh form.
pub const DEFAULT_TYPES: usize = 2;

/// Upper bound on either grid dimension accepted from a form or design file.
pub const MAX_GRID_DIM: usize = 256;

/// Default decimals for standard errors.
pub const DEFAULT_SE_DECIMALS: usize = 6;

/// Default decimals for the margin of error.
pub const DEFAULT_MOE_DECIMALS: usize = 6;

/// Default decimals for the margin of error expressed in percentage points.
pub const DEFAULT_PERCENT_DECIMALS: usize = 2;

/// Largest precision a display setting may request.
pub const MAX_DECIMALS: usize = 12;

/// Default name for region `index` (zero-based).
pub fn default_region_name(index: usize) -> String {
    format!("Region {}", index + 1)
}

/// Default name for type `index` (zero-based).
pub fn default_type_name(index: usize) -> String {
    format!("Type {}", index + 1)
}
