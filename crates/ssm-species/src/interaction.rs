//! Predator × prey interaction strengths.

use ndarray::{Array2, ArrayView1};

use ssm_core::SpeciesId;

use crate::{SpeciesError, SpeciesResult};

/// Square, non-negative `species × species` matrix.  Row = predator,
/// column = prey, both in species-set order.  Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct InteractionMatrix {
    theta: Array2<f64>,
}

impl InteractionMatrix {
    /// Validate and wrap `theta` for a species set of `species_count`.
    pub fn new(theta: Array2<f64>, species_count: usize) -> SpeciesResult<Self> {
        let (rows, cols) = theta.dim();
        if rows != species_count {
            return Err(SpeciesError::DimensionMismatch {
                what:     "interaction matrix rows",
                expected: species_count,
                got:      rows,
            });
        }
        if cols != species_count {
            return Err(SpeciesError::DimensionMismatch {
                what:     "interaction matrix columns",
                expected: species_count,
                got:      cols,
            });
        }
        if let Some(v) = theta.iter().find(|v| !(**v >= 0.0 && v.is_finite())) {
            return Err(SpeciesError::Config(format!(
                "interaction matrix entries must be finite and non-negative, found {v}"
            )));
        }
        Ok(Self { theta })
    }

    /// Every predator interacts with every prey at strength `value`.
    pub fn uniform(species_count: usize, value: f64) -> SpeciesResult<Self> {
        Self::new(Array2::from_elem((species_count, species_count), value), species_count)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.theta.nrows()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.theta.is_empty()
    }

    #[inline]
    pub fn get(&self, predator: SpeciesId, prey: SpeciesId) -> f64 {
        self.theta[[predator.index(), prey.index()]]
    }

    /// Interaction strengths of `predator` on every prey species.
    pub fn prey_of(&self, predator: SpeciesId) -> ArrayView1<'_, f64> {
        self.theta.row(predator.index())
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.theta
    }
}
