//! Time-evolving projection state and the per-step rate record.

use ndarray::{Array1, Array2, Axis};

use ssm_core::Step;
use ssm_rates::Community;

/// Everything the engine mutates.  Owned by one [`Projection`][crate::Projection]
/// and only ever exposed by shared reference.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationState {
    pub step: Step,
    /// Model time label of `step`.
    pub time: i64,
    /// `(species × size)` abundance density.
    pub abundance: Array2<f64>,
    /// Resource density on `w_full`.
    pub resource: Array1<f64>,
    /// Fishing mortality at size of the last completed step, summed over gears.
    pub fishing_mortality: Array2<f64>,
    /// Feeding level of the last completed step.
    pub feeding_level: Array2<f64>,
}

impl SimulationState {
    pub(crate) fn initial(first_time: i64, abundance: Array2<f64>, resource: Array1<f64>) -> Self {
        let shape = abundance.dim();
        Self {
            step: Step::ZERO,
            time: first_time,
            abundance,
            resource,
            fishing_mortality: Array2::zeros(shape),
            feeding_level: Array2::zeros(shape),
        }
    }

    /// Biomass per species: `Σ N · w · dw`.
    pub fn biomass(&self, community: &Community) -> Array1<f64> {
        let grid = community.grid();
        (&self.abundance * &(&grid.w * &grid.dw)).sum_axis(Axis(1))
    }

    /// Abundance per species: `Σ N · dw`.
    pub fn numbers(&self, community: &Community) -> Array1<f64> {
        (&self.abundance * &community.grid().dw).sum_axis(Axis(1))
    }
}

/// Every rate the engine derived during one step.
///
/// `(species × size)` arrays unless noted.
#[derive(Clone, Debug, PartialEq)]
pub struct StepRates {
    pub encounter:           Array2<f64>,
    pub feeding_level:       Array2<f64>,
    /// Net energy from the bound growth-energy strategy; may be negative.
    pub net_energy:          Array2<f64>,
    pub e_repro:             Array2<f64>,
    /// Somatic growth rate, g / year.
    pub growth:              Array2<f64>,
    pub starvation:          Array2<f64>,
    pub predation_mortality: Array2<f64>,
    pub fishing_mortality:   Array2<f64>,
    /// Catch per species, `Σ F · N · w · dw` over the abundance the step
    /// started from.
    pub catch:               Array1<f64>,
    /// Background + predation + fishing + starvation.
    pub total_mortality:     Array2<f64>,
    /// Predation mortality on the resource, on `w_full`.
    pub resource_mortality:  Array1<f64>,
    /// Density-independent recruitment per species.
    pub rdi:                 Array1<f64>,
    /// Recruitment after the Beverton–Holt limit, per species.
    pub rdd:                 Array1<f64>,
}
