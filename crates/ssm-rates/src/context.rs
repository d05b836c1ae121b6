//! Read-only step state passed to every rate strategy.

use ndarray::{Array1, Array2, ArrayView1};

use ssm_core::{SpeciesId, Step};
use ssm_species::SpeciesSet;

use crate::Community;

/// Environmental forcing of one step, resolved once by the engine before any
/// rate strategy runs.
///
/// The tolerance mask is derived here, from the same `(temp_min, temp_max,
/// T)` triple, and every thermal strategy reads it from here, so encounter
/// and growth-energy masks cannot disagree.
#[derive(Clone, Debug, PartialEq)]
pub struct StepForcing {
    temperature: Option<Array1<f64>>,
    tolerated:   Vec<bool>,
}

impl StepForcing {
    /// No temperature forcing: every species counts as tolerated.
    pub fn unforced(species_count: usize) -> Self {
        Self { temperature: None, tolerated: vec![true; species_count] }
    }

    /// Resolve a temperature-by-species row into temperatures and mask.
    pub fn from_temperature(row: ArrayView1<'_, f64>, species: &SpeciesSet) -> Self {
        let tolerated = species
            .thermal_responses()
            .iter()
            .zip(row.iter())
            .map(|(r, &t)| r.tolerates(t))
            .collect();
        Self { temperature: Some(row.to_owned()), tolerated }
    }

    pub fn temperature(&self) -> Option<&Array1<f64>> {
        self.temperature.as_ref()
    }

    #[inline]
    pub fn tolerates(&self, species: SpeciesId) -> bool {
        self.tolerated[species.index()]
    }

    /// The 0/1 tolerance mask as numbers, one per species.
    pub fn mask(&self) -> Array1<f64> {
        self.tolerated.iter().map(|&t| if t { 1.0 } else { 0.0 }).collect()
    }
}

/// A read-only snapshot of one projection step passed to every
/// [`EncounterRate`][crate::EncounterRate],
/// [`GrowthEnergy`][crate::GrowthEnergy] and
/// [`ResourceDynamics`][crate::ResourceDynamics] call.
///
/// All borrows live for the duration of one step's rate phase; the engine
/// mutates state only after every rate has been computed.
pub struct RateContext<'a> {
    pub step: Step,
    /// Model time label of `step`; forcing rows are located from it.
    pub time: i64,
    pub dt:   f64,
    pub community: &'a Community,
    /// `(species × size)` abundance density at the start of the step.
    pub abundance: &'a Array2<f64>,
    /// Resource density on `w_full` at the start of the step.
    pub resource: &'a Array1<f64>,
    pub forcing: &'a StepForcing,
}
