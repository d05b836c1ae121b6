//! Fluent builder for constructing `SpeciesSet` + `InteractionMatrix` in one step.
//!
//! # Usage
//!
//! ```rust
//! use ssm_species::{SpeciesParams, SpeciesSetBuilder};
//!
//! let (species, interaction) = SpeciesSetBuilder::new()
//!     .species(SpeciesParams::new("skipjack", 30_000.0, 1_500.0, 17.0, 33.0))
//!     .species(SpeciesParams::new("bigeye", 200_000.0, 30_000.0, 6.0, 30.0))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(species.len(), 2);
//! assert_eq!(interaction.len(), 2);
//! ```

use ndarray::Array2;

use crate::{InteractionMatrix, SpeciesParams, SpeciesResult, SpeciesSet};

/// Fluent builder for [`SpeciesSet`] + [`InteractionMatrix`].
///
/// If no interaction matrix is supplied every predator eats every prey at
/// full strength.
#[derive(Default)]
pub struct SpeciesSetBuilder {
    params:      Vec<SpeciesParams>,
    interaction: Option<Array2<f64>>,
}

impl SpeciesSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one species.  Order of calls defines species order.
    pub fn species(mut self, params: SpeciesParams) -> Self {
        self.params.push(params);
        self
    }

    /// Append many species.
    pub fn extend(mut self, params: impl IntoIterator<Item = SpeciesParams>) -> Self {
        self.params.extend(params);
        self
    }

    /// Supply the predator × prey matrix (validated against the species
    /// count in [`build`](Self::build)).
    pub fn interaction(mut self, theta: Array2<f64>) -> Self {
        self.interaction = Some(theta);
        self
    }

    /// Validate everything and derive the thermal constants.
    pub fn build(self) -> SpeciesResult<(SpeciesSet, InteractionMatrix)> {
        let species = SpeciesSet::new(self.params)?;
        let interaction = match self.interaction {
            Some(theta) => InteractionMatrix::new(theta, species.len())?,
            None => InteractionMatrix::uniform(species.len(), 1.0)?,
        };
        Ok((species, interaction))
    }
}
