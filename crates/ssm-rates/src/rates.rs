//! `RateSet` — the strategies bound into one scenario.

use std::fmt;
use std::sync::Arc;

use crate::{
    DefaultEncounter, DefaultGrowthEnergy, EncounterRate, GrowthEnergy, RateResult, ResourceDynamics,
    ResourceParams, SemichemostatResource,
};

/// One binding for each rate capability slot, shared cheaply between runs.
#[derive(Clone)]
pub struct RateSet {
    pub encounter: Arc<dyn EncounterRate>,
    pub energy:    Arc<dyn GrowthEnergy>,
    pub resource:  Arc<dyn ResourceDynamics>,
}

impl RateSet {
    pub fn new(
        encounter: Arc<dyn EncounterRate>,
        energy:    Arc<dyn GrowthEnergy>,
        resource:  Arc<dyn ResourceDynamics>,
    ) -> Self {
        Self { encounter, energy, resource }
    }

    /// Default kernels with a semichemostat resource.
    pub fn unforced(resource: ResourceParams) -> RateResult<Self> {
        Ok(Self::new(
            Arc::new(DefaultEncounter),
            Arc::new(DefaultGrowthEnergy),
            Arc::new(SemichemostatResource::new(resource)?),
        ))
    }

    /// `true` if any bound strategy reads temperature forcing.
    pub fn needs_temperature(&self) -> bool {
        self.encounter.needs_temperature() || self.energy.needs_temperature()
    }
}

impl fmt::Debug for RateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateSet")
            .field("encounter", &self.encounter.name())
            .field("energy", &self.energy.name())
            .field("resource", &self.resource.name())
            .finish()
    }
}
