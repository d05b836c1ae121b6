//! `SpeciesSet` — the validated, ordered collection of species.

use ssm_core::SpeciesId;

use crate::{SpeciesError, SpeciesParams, SpeciesResult, ThermalResponse};

/// Validated species parameters with their precomputed thermal responses.
///
/// Species order defines the row order of every `(species × size)` array,
/// the interaction matrix, and the columns of a temperature forcing table.
#[derive(Clone, Debug)]
pub struct SpeciesSet {
    params:  Vec<SpeciesParams>,
    thermal: Vec<ThermalResponse>,
}

impl SpeciesSet {
    /// Validate every record and derive thermal constants.
    ///
    /// Fails on the first species whose parameters are out of range, whose
    /// thermal band is degenerate, or whose name duplicates an earlier one.
    pub fn new(params: Vec<SpeciesParams>) -> SpeciesResult<Self> {
        if params.is_empty() {
            return Err(SpeciesError::Config("species set is empty".to_string()));
        }
        if params.len() > u16::MAX as usize {
            return Err(SpeciesError::Config(format!("too many species: {}", params.len())));
        }

        let mut thermal = Vec::with_capacity(params.len());
        for (i, sp) in params.iter().enumerate() {
            if params[..i].iter().any(|other| other.name == sp.name) {
                return Err(SpeciesError::Config(format!("duplicate species name {:?}", sp.name)));
            }
            sp.validate()?;
            let response = ThermalResponse::new(&sp.name, sp.temp_min, sp.temp_max)?;
            log::debug!(
                "species {:?}: encounter_scale={:.4e} metab_range={:.4e}",
                sp.name,
                response.constants.encounter_scale,
                response.constants.metab_range,
            );
            thermal.push(response);
        }

        Ok(Self { params, thermal })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterator over all `SpeciesId`s in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = SpeciesId> + '_ {
        (0..self.params.len() as u16).map(SpeciesId)
    }

    #[inline]
    pub fn get(&self, id: SpeciesId) -> &SpeciesParams {
        &self.params[id.index()]
    }

    #[inline]
    pub fn thermal(&self, id: SpeciesId) -> &ThermalResponse {
        &self.thermal[id.index()]
    }

    pub fn params(&self) -> &[SpeciesParams] {
        &self.params
    }

    pub fn thermal_responses(&self) -> &[ThermalResponse] {
        &self.thermal
    }

    pub fn id_of(&self, name: &str) -> Option<SpeciesId> {
        self.params.iter().position(|p| p.name == name).map(|i| SpeciesId(i as u16))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.name.as_str())
    }
}
