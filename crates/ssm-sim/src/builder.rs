//! Fluent builder for a [`ModelConfiguration`].

use std::sync::Arc;

use ndarray::{Array1, Array2};

use ssm_core::ProjectionConfig;
use ssm_forcing::{EffortSchedule, ForcingSeries, TimeIndexOffset};
use ssm_rates::{
    Community, DefaultEncounter, EncounterRate, ForcedResource, GrowthEnergy, RateSet, ResourceDynamics, ResourceParams,
    ThermalEncounter, ThermalGrowthEnergy,
};

use crate::{ModelConfiguration, SimError, SimResult};

/// Fluent builder for [`ModelConfiguration`].
///
/// # Required inputs
///
/// - `Arc<Community>` — the shared species, interactions and grid
/// - [`ProjectionConfig`] — horizon, `dt`, first time label, output interval
/// - [`initial_abundance`][Self::initial_abundance]
///
/// # Optional inputs (have defaults)
///
/// | Method                      | Default                                     |
/// |-----------------------------|---------------------------------------------|
/// | `.rates(r)`                 | `RateSet::unforced(ResourceParams::default())` |
/// | `.thermal()`                | off                                         |
/// | `.temperature_forcing(s)`   | none                                        |
/// | `.plankton_forcing(s)`      | none (resource slot from `rates`)           |
/// | `.effort(e)`                | no fishing                                  |
/// | `.time_offset(t)`           | `TimeIndexOffset::from_origin(first_time)`  |
/// | `.initial_resource(r)`      | the resource strategy's initial resource    |
///
/// # Example
///
/// ```rust,ignore
/// let config = ProjectionBuilder::new(community.clone(), projection)
///     .label("ipsl ssp585 fished")
///     .thermal()
///     .temperature_forcing(temperature)
///     .plankton_forcing(plankton)
///     .effort(effort)
///     .initial_abundance(n0)
///     .build()?;
/// Projection::new(config).run(&mut NoopObserver)?;
/// ```
pub struct ProjectionBuilder {
    community:         Arc<Community>,
    projection:        ProjectionConfig,
    label:             String,
    rates:             Option<RateSet>,
    encounter:         Option<Arc<dyn EncounterRate>>,
    energy:            Option<Arc<dyn GrowthEnergy>>,
    resource:          Option<Arc<dyn ResourceDynamics>>,
    temperature:       Option<Arc<ForcingSeries>>,
    plankton:          Option<Arc<ForcingSeries>>,
    effort:            Option<Arc<EffortSchedule>>,
    t_idx:             Option<TimeIndexOffset>,
    initial_abundance: Option<Array2<f64>>,
    initial_resource:  Option<Array1<f64>>,
}

impl ProjectionBuilder {
    pub fn new(community: Arc<Community>, projection: ProjectionConfig) -> Self {
        Self {
            community,
            projection,
            label:             String::new(),
            rates:             None,
            encounter:         None,
            energy:            None,
            resource:          None,
            temperature:       None,
            plankton:          None,
            effort:            None,
            t_idx:             None,
            initial_abundance: None,
            initial_resource:  None,
        }
    }

    /// Name of the scenario in logs and batch results.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Base bindings for all three slots.  Individual slot methods override it.
    pub fn rates(mut self, rates: RateSet) -> Self {
        self.rates = Some(rates);
        self
    }

    pub fn encounter(mut self, encounter: Arc<dyn EncounterRate>) -> Self {
        self.encounter = Some(encounter);
        self
    }

    pub fn energy(mut self, energy: Arc<dyn GrowthEnergy>) -> Self {
        self.energy = Some(energy);
        self
    }

    pub fn resource(mut self, resource: Arc<dyn ResourceDynamics>) -> Self {
        self.resource = Some(resource);
        self
    }

    /// Bind the temperature-scaled encounter and growth-energy overrides.
    pub fn thermal(self) -> Self {
        self.encounter(Arc::new(ThermalEncounter::new(DefaultEncounter))).energy(Arc::new(ThermalGrowthEnergy))
    }

    /// Temperature table, one column per species.
    pub fn temperature_forcing(mut self, temperature: Arc<ForcingSeries>) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Plankton density table on `w_full`.  Binds [`ForcedResource`] to the
    /// resource slot, read through the same `t_idx` as temperature.
    pub fn plankton_forcing(mut self, plankton: Arc<ForcingSeries>) -> Self {
        self.plankton = Some(plankton);
        self
    }

    pub fn effort(mut self, effort: Arc<EffortSchedule>) -> Self {
        self.effort = Some(effort);
        self
    }

    pub fn time_offset(mut self, t_idx: TimeIndexOffset) -> Self {
        self.t_idx = Some(t_idx);
        self
    }

    /// `(species × size)` abundance density at step 0.
    pub fn initial_abundance(mut self, abundance: Array2<f64>) -> Self {
        self.initial_abundance = Some(abundance);
        self
    }

    /// Resource density on `w_full` at step 0.
    pub fn initial_resource(mut self, resource: Array1<f64>) -> Self {
        self.initial_resource = Some(resource);
        self
    }

    /// Validate every input against the community and the horizon.
    pub fn build(self) -> SimResult<ModelConfiguration> {
        let community = self.community;
        let projection = self.projection;
        let (n_sp, n_w) = community.shape();
        let n_full = community.grid().len_full();

        // ── Horizon ───────────────────────────────────────────────────────
        if projection.total_steps == 0 {
            return Err(SimError::Config("total_steps must be positive".to_string()));
        }
        if !(projection.dt > 0.0 && projection.dt.is_finite()) {
            return Err(SimError::Config(format!("dt must be positive, got {}", projection.dt)));
        }
        let t_idx = self.t_idx.unwrap_or_else(|| TimeIndexOffset::from_origin(projection.first_time));

        // ── Rate bindings ─────────────────────────────────────────────────
        let base = match self.rates {
            Some(r) => r,
            None => RateSet::unforced(ResourceParams::default())?,
        };
        let resource = match (self.plankton, self.resource) {
            (Some(_), Some(_)) => {
                return Err(SimError::Config(
                    "both plankton forcing and a custom resource strategy were supplied".to_string(),
                ));
            }
            (Some(plankton), None) => Arc::new(ForcedResource::new(plankton, t_idx)) as Arc<dyn ResourceDynamics>,
            (None, Some(custom)) => custom,
            (None, None) => base.resource,
        };
        let rates = RateSet::new(
            self.encounter.unwrap_or(base.encounter),
            self.energy.unwrap_or(base.energy),
            resource,
        );
        rates.resource.validate(&community, &projection)?;

        // ── Temperature ───────────────────────────────────────────────────
        match &self.temperature {
            Some(temperature) => {
                temperature.require_columns(n_sp)?;
                temperature.validate_horizon(projection.first_time, projection.total_steps, t_idx)?;
                if !rates.needs_temperature() {
                    log::warn!(
                        "{:?}: temperature forcing attached but no bound strategy reads it",
                        self.label
                    );
                }
            }
            None if rates.needs_temperature() => {
                let strategy = if rates.encounter.needs_temperature() {
                    rates.encounter.name()
                } else {
                    rates.energy.name()
                };
                return Err(SimError::MissingForcing { strategy, forcing: "temperature" });
            }
            None => {}
        }

        // ── Effort ────────────────────────────────────────────────────────
        let mut gear_columns = Vec::new();
        if let Some(effort) = &self.effort {
            effort.validate_horizon(projection.total_steps)?;
            for sp in community.species().params() {
                let col = effort.gear_id(&sp.gear).ok_or_else(|| SimError::UnknownGear {
                    species: sp.name.clone(),
                    gear:    sp.gear.clone(),
                })?;
                gear_columns.push(col.index());
            }
            if effort.is_zero(projection.total_steps as usize) {
                log::warn!("{:?}: effort is zero for every step", self.label);
            }
        }

        // ── Initial state ─────────────────────────────────────────────────
        let initial_abundance = self
            .initial_abundance
            .ok_or_else(|| SimError::Config("initial abundance is required".to_string()))?;
        if initial_abundance.dim() != (n_sp, n_w) {
            return Err(SimError::DimensionMismatch {
                what:     "initial abundance",
                expected: (n_sp, n_w),
                got:      initial_abundance.dim(),
            });
        }
        if initial_abundance.iter().any(|v| !(*v >= 0.0 && v.is_finite())) {
            return Err(SimError::Config("initial abundance must be finite and non-negative".to_string()));
        }

        let initial_resource = match self.initial_resource {
            Some(r) => r,
            None => rates.resource.initial_resource(&community)?,
        };
        if initial_resource.len() != n_full {
            return Err(SimError::DimensionMismatch {
                what:     "initial resource",
                expected: (n_full, 1),
                got:      (initial_resource.len(), 1),
            });
        }
        if initial_resource.iter().any(|v| !(*v >= 0.0 && v.is_finite())) {
            return Err(SimError::Config("initial resource must be finite and non-negative".to_string()));
        }

        log::debug!(
            "{:?}: built configuration, {:?}, {t_idx}, {} steps from time {}",
            self.label,
            rates,
            projection.total_steps,
            projection.first_time,
        );

        Ok(ModelConfiguration {
            label: self.label,
            community,
            rates,
            temperature: self.temperature,
            effort: self.effort,
            gear_columns,
            t_idx,
            projection,
            initial_abundance,
            initial_resource,
        })
    }
}
