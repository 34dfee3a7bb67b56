//! Caller-side form state.
//!
//! Mirrors the data-entry page: total population and grid dimensions first,
//! then a detail stage with axis names and the n_h / N_h matrices. The
//! calculator itself holds no state; "reset" reinitializes this struct.
//!
//! Values entered at a position survive a dimension change as long as the
//! position still exists, the same way keyed form widgets keep their value.

use strata::consts::{
    DEFAULT_POPULATION, DEFAULT_REGIONS, DEFAULT_TYPES, MAX_GRID_DIM, default_region_name,
    default_type_name,
};
use strata::design::{Axis, Design, DesignError, DesignFile};
use thiserror::Error;
use tracing::{debug, info};

/// Form editing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// Names and matrices are only editable after `open_detail`.
    #[error("detail input has not been generated yet")]
    DetailClosed,

    /// Total population must be at least 1.
    #[error("total population must be at least 1")]
    ZeroPopulation,

    /// Requested dimension outside `1..=MAX_GRID_DIM`.
    #[error("{axis} count must be between 1 and {max}, got {value}")]
    Dimension {
        /// Offending axis.
        axis: Axis,
        /// Requested count.
        value: usize,
        /// Allowed maximum.
        max: usize,
    },

    /// Index past the end of an axis.
    #[error("{axis} #{position} does not exist (have {count})", position = .index + 1)]
    OutOfRange {
        /// Offending axis.
        axis: Axis,
        /// Zero-based index requested.
        index: usize,
        /// Entries on that axis.
        count: usize,
    },

    /// The assembled design failed validation.
    #[error(transparent)]
    Design(#[from] DesignError),
}

/// Entered form values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    population: u64,
    regions: usize,
    types: usize,
    detail: bool,
    region_names: Vec<String>,
    type_names: Vec<String>,
    samples: Vec<Vec<u64>>,
    populations: Vec<Vec<u64>>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            population: DEFAULT_POPULATION,
            regions: DEFAULT_REGIONS,
            types: DEFAULT_TYPES,
            detail: false,
            region_names: Vec::new(),
            type_names: Vec::new(),
            samples: Vec::new(),
            populations: Vec::new(),
        }
    }
}

fn check_dimension(axis: Axis, value: usize) -> Result<(), FormError> {
    if value == 0 || value > MAX_GRID_DIM {
        return Err(FormError::Dimension {
            axis,
            value,
            max: MAX_GRID_DIM,
        });
    }
    Ok(())
}

fn resize_names(names: &mut Vec<String>, len: usize, default: fn(usize) -> String) {
    names.truncate(len);
    let start = names.len();
    names.extend((start..len).map(default));
}

fn resize_matrix(matrix: &mut Vec<Vec<u64>>, rows: usize, cols: usize) {
    matrix.resize_with(rows, Vec::new);
    for row in matrix.iter_mut() {
        row.resize(cols, 0);
    }
}

impl FormState {
    /// Fresh form with default N and dimensions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard everything entered so far.
    pub fn reset(&mut self) {
        *self = Self::default();
        info!("form reset");
    }

    /// Total population N.
    pub fn population(&self) -> u64 {
        self.population
    }

    /// `(regions, types)` as currently requested.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.regions, self.types)
    }

    /// Whether the detail stage is open.
    pub fn is_detail_open(&self) -> bool {
        self.detail
    }

    /// Region names (empty before `open_detail`).
    pub fn region_names(&self) -> &[String] {
        &self.region_names
    }

    /// Type names (empty before `open_detail`).
    pub fn type_names(&self) -> &[String] {
        &self.type_names
    }

    /// n_h rows.
    pub fn samples(&self) -> &[Vec<u64>] {
        &self.samples
    }

    /// N_h rows.
    pub fn populations(&self) -> &[Vec<u64>] {
        &self.populations
    }

    /// Set N.
    pub fn set_population(&mut self, population: u64) -> Result<(), FormError> {
        if population == 0 {
            return Err(FormError::ZeroPopulation);
        }
        self.population = population;
        Ok(())
    }

    /// Change grid dimensions. An open detail stage is re-laid-out at once.
    pub fn set_dimensions(&mut self, regions: usize, types: usize) -> Result<(), FormError> {
        check_dimension(Axis::Region, regions)?;
        check_dimension(Axis::Type, types)?;
        self.regions = regions;
        self.types = types;
        if self.detail {
            self.layout();
        }
        Ok(())
    }

    /// Generate the detail stage: default names and zero matrices for any
    /// position not entered before.
    pub fn open_detail(&mut self) {
        self.detail = true;
        self.layout();
        debug!(regions = self.regions, types = self.types, "detail input generated");
    }

    fn layout(&mut self) {
        resize_names(&mut self.region_names, self.regions, default_region_name);
        resize_names(&mut self.type_names, self.types, default_type_name);
        resize_matrix(&mut self.samples, self.regions, self.types);
        resize_matrix(&mut self.populations, self.regions, self.types);
    }

    fn check_cell(&self, region: usize, kind: usize) -> Result<(), FormError> {
        if !self.detail {
            return Err(FormError::DetailClosed);
        }
        if region >= self.regions {
            return Err(FormError::OutOfRange {
                axis: Axis::Region,
                index: region,
                count: self.regions,
            });
        }
        if kind >= self.types {
            return Err(FormError::OutOfRange {
                axis: Axis::Type,
                index: kind,
                count: self.types,
            });
        }
        Ok(())
    }

    /// Rename region `index`.
    pub fn set_region_name(&mut self, index: usize, name: &str) -> Result<(), FormError> {
        self.check_cell(index, 0)?;
        self.region_names[index] = name.trim().to_string();
        Ok(())
    }

    /// Rename type `index`.
    pub fn set_type_name(&mut self, index: usize, name: &str) -> Result<(), FormError> {
        self.check_cell(0, index)?;
        self.type_names[index] = name.trim().to_string();
        Ok(())
    }

    /// Enter n_h for `(region, kind)`.
    pub fn set_sample(&mut self, region: usize, kind: usize, n: u64) -> Result<(), FormError> {
        self.check_cell(region, kind)?;
        self.samples[region][kind] = n;
        Ok(())
    }

    /// Enter N_h for `(region, kind)`.
    pub fn set_stratum_population(
        &mut self,
        region: usize,
        kind: usize,
        population: u64,
    ) -> Result<(), FormError> {
        self.check_cell(region, kind)?;
        self.populations[region][kind] = population;
        Ok(())
    }

    /// Snapshot the form into an immutable design.
    pub fn to_design(&self) -> Result<Design, FormError> {
        if !self.detail {
            return Err(FormError::DetailClosed);
        }
        let file = DesignFile {
            population: self.population,
            regions: self.region_names.clone(),
            types: self.type_names.clone(),
            samples: self.samples.clone(),
            populations: Some(self.populations.clone()),
            equal_split: false,
        };
        Ok(file.into_design()?)
    }

    /// Replace the form contents with a loaded design.
    ///
    /// Equal-split designs are entered with N / H rounded down per stratum.
    pub fn load_design(&mut self, design: &Design) {
        let file = DesignFile::from(design);
        let strata = design.strata() as u64;
        let (rows, cols) = design.samples().shape();
        self.population = file.population;
        self.regions = rows;
        self.types = cols;
        self.detail = true;
        self.region_names = file.regions;
        self.type_names = file.types;
        self.samples = file.samples;
        self.populations = file
            .populations
            .unwrap_or_else(|| vec![vec![file.population / strata; cols]; rows]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fresh_page() {
        let form = FormState::new();
        assert_eq!(form.population(), DEFAULT_POPULATION);
        assert_eq!(form.dimensions(), (DEFAULT_REGIONS, DEFAULT_TYPES));
        assert!(!form.is_detail_open());
        assert!(form.region_names().is_empty());
    }

    #[test]
    fn editing_requires_detail() {
        let mut form = FormState::new();
        assert_eq!(form.set_sample(0, 0, 10), Err(FormError::DetailClosed));
        assert!(matches!(form.to_design(), Err(FormError::DetailClosed)));
    }

    #[test]
    fn open_detail_generates_defaults() {
        let mut form = FormState::new();
        form.open_detail();
        assert_eq!(form.region_names(), ["Region 1", "Region 2", "Region 3"]);
        assert_eq!(form.type_names(), ["Type 1", "Type 2"]);
        assert_eq!(form.samples(), vec![vec![0, 0]; 3].as_slice());
    }

    #[test]
    fn resize_keeps_entered_cells() {
        let mut form = FormState::new();
        form.open_detail();
        form.set_region_name(0, "Seoul").unwrap();
        form.set_sample(0, 1, 42).unwrap();
        form.set_sample(2, 0, 7).unwrap();

        form.set_dimensions(2, 3).unwrap();
        assert_eq!(form.region_names(), ["Seoul", "Region 2"]);
        assert_eq!(form.samples()[0], vec![0, 42, 0]);
        assert_eq!(form.samples().len(), 2);

        form.set_dimensions(3, 3).unwrap();
        // Row 3 was dropped above, so it comes back empty.
        assert_eq!(form.samples()[2], vec![0, 0, 0]);
    }

    #[test]
    fn bounds_checked() {
        let mut form = FormState::new();
        form.open_detail();
        assert!(matches!(
            form.set_sample(3, 0, 1),
            Err(FormError::OutOfRange { axis: Axis::Region, index: 3, count: 3 })
        ));
        assert!(matches!(
            form.set_type_name(2, "x"),
            Err(FormError::OutOfRange { axis: Axis::Type, .. })
        ));
        assert!(form.set_dimensions(0, 2).is_err());
        assert_eq!(form.set_population(0), Err(FormError::ZeroPopulation));
    }

    #[test]
    fn reset_clears_everything() {
        let mut form = FormState::new();
        form.set_population(500).unwrap();
        form.set_dimensions(1, 1).unwrap();
        form.open_detail();
        form.set_sample(0, 0, 5).unwrap();

        form.reset();
        assert_eq!(form, FormState::new());
    }

    #[test]
    fn to_design_snapshots_matrices() {
        let mut form = FormState::new();
        form.set_dimensions(1, 2).unwrap();
        form.open_detail();
        form.set_sample(0, 0, 100).unwrap();
        form.set_sample(0, 1, 100).unwrap();
        form.set_stratum_population(0, 0, 5000).unwrap();
        form.set_stratum_population(0, 1, 5000).unwrap();

        let design = form.to_design().unwrap();
        assert_eq!(design.total_sample(), 200);
        assert!(design.population_matches());

        // Later edits do not reach the snapshot.
        form.set_sample(0, 0, 1).unwrap();
        assert_eq!(design.total_sample(), 200);
    }

    #[test]
    fn duplicate_names_surface_as_design_error() {
        let mut form = FormState::new();
        form.open_detail();
        form.set_type_name(1, "Type 1").unwrap();
        assert!(matches!(
            form.to_design(),
            Err(FormError::Design(DesignError::DuplicateName { .. }))
        ));
    }

    #[test]
    fn overflowing_sample_total_is_a_design_error() {
        let mut form = FormState::new();
        form.set_dimensions(1, 2).unwrap();
        form.open_detail();
        form.set_sample(0, 0, u64::MAX).unwrap();
        form.set_sample(0, 1, 1).unwrap();
        assert_eq!(
            form.to_design(),
            Err(FormError::Design(DesignError::CountOverflow { matrix: "samples" }))
        );
    }

    #[test]
    fn load_design_round_trips() {
        let mut form = FormState::new();
        form.set_dimensions(2, 1).unwrap();
        form.open_detail();
        form.set_sample(0, 0, 10).unwrap();
        form.set_sample(1, 0, 20).unwrap();
        form.set_stratum_population(0, 0, 6000).unwrap();
        form.set_stratum_population(1, 0, 4000).unwrap();
        let design = form.to_design().unwrap();

        let mut other = FormState::new();
        other.load_design(&design);
        assert_eq!(other, form);
    }
}
