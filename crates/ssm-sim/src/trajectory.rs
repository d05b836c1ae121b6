//! `Trajectory` — the snapshot time series of one run.

use ndarray::{Array1, Array2};

use ssm_core::Step;
use ssm_rates::Community;

use crate::SimulationState;

/// Abundance and resource spectra at every snapshot step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trajectory {
    pub steps:     Vec<Step>,
    pub times:     Vec<i64>,
    pub abundance: Vec<Array2<f64>>,
    pub resource:  Vec<Array1<f64>>,
}

impl Trajectory {
    pub fn push(&mut self, state: &SimulationState) {
        self.steps.push(state.step);
        self.times.push(state.time);
        self.abundance.push(state.abundance.clone());
        self.resource.push(state.resource.clone());
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// `(snapshot × species)` total biomass, `Σ N · w · dw`.
    pub fn biomass(&self, community: &Community) -> Array2<f64> {
        let grid = community.grid();
        let weight = &grid.w * &grid.dw;
        let mut out = Array2::<f64>::zeros((self.len(), community.species_count()));
        for (mut row, n) in out.rows_mut().into_iter().zip(&self.abundance) {
            row.assign(&n.dot(&weight));
        }
        out
    }

    /// Final abundance spectrum, if any snapshot was taken.
    pub fn last_abundance(&self) -> Option<&Array2<f64>> {
        self.abundance.last()
    }
}
