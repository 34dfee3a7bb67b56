//! Sampling design schema and validation.
//!
//! A design is read from a TOML document, validated once, and is immutable
//! afterwards. Stratum population sizes are either given explicitly or
//! generated by splitting N equally across all strata.
//!
//! # TOML Example
//!
//! ```toml
//! population = 10000
//! regions = ["North", "South"]
//! types = ["Urban", "Rural"]
//! samples = [[100, 100], [100, 100]]
//! populations = [[2500, 2500], [2500, 2500]]
//! ```
//!
//! Replace `populations` with `equal_split = true` to assume N / H per stratum.

use crate::consts::{
    DEFAULT_POPULATION, DEFAULT_REGIONS, DEFAULT_TYPES, MAX_GRID_DIM, default_region_name,
    default_type_name,
};
use crate::grid::{GridError, StratumGrid};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Grid axis, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Region axis (rows).
    Region,
    /// Type axis (columns).
    Type,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Region => "region",
            Self::Type => "type",
        })
    }
}

/// Design validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DesignError {
    /// Total population N is zero.
    #[error("total population must be at least 1")]
    EmptyPopulation,

    /// An axis has no entries.
    #[error("at least one {0} is required")]
    EmptyAxis(Axis),

    /// An axis exceeds `MAX_GRID_DIM`.
    #[error("{axis} count {count} exceeds maximum {max}")]
    AxisTooLong {
        /// Offending axis.
        axis: Axis,
        /// Entries given.
        count: usize,
        /// Allowed maximum.
        max: usize,
    },

    /// A blank axis label.
    #[error("{axis} name #{position} is empty", position = .index + 1)]
    EmptyName {
        /// Offending axis.
        axis: Axis,
        /// Zero-based position.
        index: usize,
    },

    /// The same label appears twice on one axis.
    #[error("duplicate {axis} name `{name}`")]
    DuplicateName {
        /// Offending axis.
        axis: Axis,
        /// Repeated label.
        name: String,
    },

    /// A matrix does not match the axes.
    #[error("{matrix} matrix: {source}")]
    Shape {
        /// `samples` or `populations`.
        matrix: &'static str,
        /// Shape detail.
        source: GridError,
    },

    /// A matrix's counts add up past `u64::MAX`.
    #[error("{matrix} matrix: counts add up past the 64-bit limit")]
    CountOverflow {
        /// `samples` or `populations`.
        matrix: &'static str,
    },

    /// Neither or both of `populations` and `equal_split` given.
    #[error("specify exactly one of `populations` or `equal_split = true`")]
    PopulationSource,
}

/// Where stratum population sizes come from.
#[derive(Debug, Clone, PartialEq)]
pub enum StratumPopulations {
    /// User-entered N_h per stratum.
    Explicit(StratumGrid<u64>),
    /// N / H per stratum, generated at estimation time.
    EqualSplit,
}

/// A validated stratified sampling design.
#[derive(Debug, Clone, PartialEq)]
pub struct Design {
    population: u64,
    samples: StratumGrid<u64>,
    populations: StratumPopulations,
}

fn check_axis(axis: Axis, names: &[String]) -> Result<(), DesignError> {
    if names.is_empty() {
        return Err(DesignError::EmptyAxis(axis));
    }
    if names.len() > MAX_GRID_DIM {
        return Err(DesignError::AxisTooLong {
            axis,
            count: names.len(),
            max: MAX_GRID_DIM,
        });
    }
    let mut seen = HashSet::with_capacity(names.len());
    for (index, name) in names.iter().enumerate() {
        let name = name.trim();
        if name.is_empty() {
            return Err(DesignError::EmptyName { axis, index });
        }
        if !seen.insert(name) {
            return Err(DesignError::DuplicateName {
                axis,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

fn checked_total(matrix: &'static str, grid: &StratumGrid<u64>) -> Result<u64, DesignError> {
    grid.as_flat()
        .iter()
        .try_fold(0u64, |acc, &v| acc.checked_add(v))
        .ok_or(DesignError::CountOverflow { matrix })
}

impl Design {
    /// Validate and assemble a design.
    ///
    /// Explicit population grids must share the sample grid's axes, and
    /// every matrix total must fit in a `u64`.
    pub fn new(
        population: u64,
        samples: StratumGrid<u64>,
        populations: StratumPopulations,
    ) -> Result<Self, DesignError> {
        if population == 0 {
            return Err(DesignError::EmptyPopulation);
        }
        check_axis(Axis::Region, samples.regions())?;
        check_axis(Axis::Type, samples.types())?;

        checked_total("samples", &samples)?;
        if let StratumPopulations::Explicit(grid) = &populations {
            checked_total("populations", grid)?;
            if grid.regions() != samples.regions() || grid.types() != samples.types() {
                let (regions, types) = samples.shape();
                return Err(DesignError::Shape {
                    matrix: "populations",
                    source: GridError::ShapeMismatch {
                        regions,
                        types,
                        expected: samples.len(),
                        actual: grid.len(),
                    },
                });
            }
        }

        Ok(Self {
            population,
            samples,
            populations,
        })
    }

    /// Total population N.
    pub fn population(&self) -> u64 {
        self.population
    }

    /// Sample sizes n_h.
    pub fn samples(&self) -> &StratumGrid<u64> {
        &self.samples
    }

    /// Stratum population source.
    pub fn populations(&self) -> &StratumPopulations {
        &self.populations
    }

    /// Number of strata H.
    pub fn strata(&self) -> usize {
        self.samples.len()
    }

    /// Σ n_h. Fits in a `u64`; `new` rejects larger totals.
    pub fn total_sample(&self) -> u64 {
        self.samples.as_flat().iter().sum()
    }

    /// Σ N_h. Equal-split designs sum to N by construction.
    pub fn population_sum(&self) -> u64 {
        match &self.populations {
            StratumPopulations::Explicit(grid) => grid.as_flat().iter().sum(),
            StratumPopulations::EqualSplit => self.population,
        }
    }

    /// Whether Σ N_h equals N. Informational only.
    pub fn population_matches(&self) -> bool {
        self.population_sum() == self.population
    }
}

/// On-disk representation of a [`Design`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesignFile {
    /// Total population N.
    pub population: u64,
    /// Region names (rows).
    pub regions: Vec<String>,
    /// Type names (columns).
    pub types: Vec<String>,
    /// `samples[region][type]` = n_h.
    pub samples: Vec<Vec<u64>>,
    /// `populations[region][type]` = N_h.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub populations: Option<Vec<Vec<u64>>>,
    /// Assume N_h = N / H for every stratum.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub equal_split: bool,
}

impl DesignFile {
    /// Validate into an immutable [`Design`].
    pub fn into_design(self) -> Result<Design, DesignError> {
        let regions: Vec<String> = self.regions.iter().map(|s| s.trim().to_string()).collect();
        let types: Vec<String> = self.types.iter().map(|s| s.trim().to_string()).collect();
        check_axis(Axis::Region, &regions)?;
        check_axis(Axis::Type, &types)?;

        let samples = StratumGrid::from_rows(regions.clone(), types.clone(), &self.samples)
            .map_err(|source| DesignError::Shape {
                matrix: "samples",
                source,
            })?;

        let populations = match (self.populations, self.equal_split) {
            (Some(rows), false) => StratumPopulations::Explicit(
                StratumGrid::from_rows(regions, types, &rows).map_err(|source| {
                    DesignError::Shape {
                        matrix: "populations",
                        source,
                    }
                })?,
            ),
            (None, true) => StratumPopulations::EqualSplit,
            _ => return Err(DesignError::PopulationSource),
        };

        let design = Design::new(self.population, samples, populations)?;
        debug!(
            strata = design.strata(),
            population = design.population(),
            "design validated"
        );
        Ok(design)
    }

    /// A filled-in starting point: default axes, 100 samples per stratum and
    /// N split as evenly as integer counts allow.
    pub fn template() -> Self {
        let regions: Vec<String> = (0..DEFAULT_REGIONS).map(default_region_name).collect();
        let types: Vec<String> = (0..DEFAULT_TYPES).map(default_type_name).collect();
        let strata = (DEFAULT_REGIONS * DEFAULT_TYPES) as u64;
        let base = DEFAULT_POPULATION / strata;
        let remainder = DEFAULT_POPULATION % strata;

        let populations = (0..DEFAULT_REGIONS)
            .map(|r| {
                (0..DEFAULT_TYPES)
                    .map(|t| {
                        let flat = (r * DEFAULT_TYPES + t) as u64;
                        base + u64::from(flat < remainder)
                    })
                    .collect()
            })
            .collect();

        Self {
            population: DEFAULT_POPULATION,
            regions,
            types,
            samples: vec![vec![100; DEFAULT_TYPES]; DEFAULT_REGIONS],
            populations: Some(populations),
            equal_split: false,
        }
    }
}

impl From<&Design> for DesignFile {
    fn from(design: &Design) -> Self {
        let samples = design.samples();
        let (populations, equal_split) = match design.populations() {
            StratumPopulations::Explicit(grid) => {
                (Some(grid.rows().map(<[u64]>::to_vec).collect()), false)
            }
            StratumPopulations::EqualSplit => (None, true),
        };
        Self {
            population: design.population(),
            regions: samples.regions().to_vec(),
            types: samples.types().to_vec(),
            samples: samples.rows().map(<[u64]>::to_vec).collect(),
            populations,
            equal_split,
        }
    }
}
