//! Result presentation.
//!
//! Formatting only: rounding happens here, never in the estimator.

use crate::estimator::DesignEstimate;
use serde::Serialize;
use std::fmt::Write as _;
use strata::config::DisplayConfig;
use strata::design::{Design, StratumPopulations};
use strata::grid::StratumGrid;
use tracing::warn;

/// Everything shown to the user after a successful calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Total population N.
    pub population: u64,
    /// Σ n_h.
    pub total_sample: u64,
    /// Σ N_h as entered.
    pub population_sum: u64,
    /// Whether Σ N_h equals N.
    pub population_matches: bool,
    /// Whether N_h was generated as N / H.
    pub equal_split: bool,
    /// Entered n_h.
    pub samples: StratumGrid<u64>,
    /// Entered N_h (absent for equal-split designs).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stratum_populations: Option<StratumGrid<u64>>,
    /// SE_h per stratum.
    pub se_per_stratum: StratumGrid<f64>,
    /// Aggregate standard error.
    pub se_total: f64,
    /// 95% margin of error.
    pub moe_total: f64,
    /// Margin of error in percentage points.
    pub moe_percent: f64,
}

impl Report {
    /// Combine a design with its estimate.
    pub fn new(design: &Design, estimate: &DesignEstimate) -> Self {
        let (stratum_populations, equal_split) = match design.populations() {
            StratumPopulations::Explicit(grid) => (Some(grid.clone()), false),
            StratumPopulations::EqualSplit => (None, true),
        };

        if !design.population_matches() {
            warn!(
                population = design.population(),
                population_sum = design.population_sum(),
                "stratum populations do not sum to N; weights used as entered"
            );
        }

        Self {
            population: design.population(),
            total_sample: design.total_sample(),
            population_sum: design.population_sum(),
            population_matches: design.population_matches(),
            equal_split,
            samples: design.samples().clone(),
            stratum_populations,
            se_per_stratum: estimate.se_grid.clone(),
            se_total: estimate.error.se_total,
            moe_total: estimate.error.moe_total,
            moe_percent: estimate.error.moe_percent(),
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Plain-text rendering with the configured precision.
    pub fn render_text(&self, display: &DisplayConfig) -> String {
        let mut out = String::new();

        out.push_str(&render_table("Sample sizes (n_h)", &self.samples, |v| {
            v.to_string()
        }));
        match &self.stratum_populations {
            Some(grid) => {
                out.push_str(&render_table("Stratum populations (N_h)", grid, |v| {
                    v.to_string()
                }))
            }
            None => out.push_str("Stratum populations (N_h): equal split of N\n\n"),
        }
        out.push_str(&render_table(
            "Standard error per stratum (SE_h)",
            &self.se_per_stratum,
            |v| format!("{:.*}", display.se_decimals, v),
        ));

        let _ = writeln!(out, "Total sample size n          = {}", self.total_sample);
        let _ = writeln!(out, "Sum of stratum populations   = {}", self.population_sum);
        let _ = writeln!(out, "Total population N           = {}", self.population);
        if !self.population_matches {
            out.push_str("  (note: stratum populations do not sum to N)\n");
        }
        let _ = writeln!(
            out,
            "Standard error (SE_total)    = {:.*}",
            display.se_decimals, self.se_total
        );
        let _ = writeln!(
            out,
            "95% margin of error (MOE)    = ±{:.*} (±{:.*}%p)",
            display.moe_decimals, self.moe_total, display.percent_decimals, self.moe_percent
        );
        out
    }
}

/// Render a grid as an aligned table: one row per region, one column per type.
pub fn render_table<T>(title: &str, grid: &StratumGrid<T>, fmt: impl Fn(&T) -> String) -> String {
    let cells: Vec<Vec<String>> = grid.rows().map(|row| row.iter().map(&fmt).collect()).collect();

    let label_width = grid
        .regions()
        .iter()
        .map(|r| r.chars().count())
        .max()
        .unwrap_or(0);
    let widths: Vec<usize> = grid
        .types()
        .iter()
        .enumerate()
        .map(|(col, name)| {
            cells
                .iter()
                .map(|row| row[col].chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let _ = writeln!(out, "{title}");
    let _ = write!(out, "{:label_width$}", "");
    for (name, &width) in grid.types().iter().zip(&widths) {
        let _ = write!(out, "  {name:>width$}");
    }
    out.push('\n');
    for (region, row) in grid.regions().iter().zip(&cells) {
        let _ = write!(out, "{region:<label_width$}");
        for (cell, &width) in row.iter().zip(&widths) {
            let _ = write!(out, "  {cell:>width$}");
        }
        out.push('\n');
    }
    out.push('\n');
    out
}
