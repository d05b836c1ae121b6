//! Temperature-forced overrides of the encounter and growth-energy slots.
//!
//! Both read the step's temperature row and tolerance mask from
//! [`StepForcing`][crate::StepForcing].  Species outside their tolerance
//! band get a multiplier of exactly 0.

use ndarray::{Array1, Array2};

use ssm_species::{arrhenius, thermal_performance};

use crate::{
    DefaultEncounter, EncounterRate, GrowthEnergy, RateContext, RateError, RateResult, kernels, sweep,
};

fn temperature<'c>(ctx: &'c RateContext<'_>, strategy: &'static str) -> RateResult<&'c Array1<f64>> {
    let temps = ctx
        .forcing
        .temperature()
        .ok_or(RateError::MissingForcing { strategy, forcing: "temperature" })?;
    if temps.len() != ctx.community.species_count() {
        return Err(RateError::Shape {
            what:     "temperature row",
            expected: (ctx.community.species_count(), 1),
            got:      (temps.len(), 1),
        });
    }
    Ok(temps)
}

/// Per-species encounter multipliers
/// `max(0, T (T − temp_min)(temp_max − T) / encounter_scale)`, 0 when masked.
pub fn encounter_multipliers(ctx: &RateContext<'_>) -> RateResult<Array1<f64>> {
    let temps = temperature(ctx, "thermal encounter")?;
    Ok(ctx
        .community
        .species()
        .ids()
        .map(|sp| {
            if !ctx.forcing.tolerates(sp) {
                return 0.0;
            }
            let r = ctx.community.species().thermal(sp);
            let t = temps[sp.index()];
            (thermal_performance(t, r.temp_min, r.temp_max) / r.constants.encounter_scale).max(0.0)
        })
        .collect())
}

/// Per-species metabolic multipliers `(A(T) − metab_min) / metab_range`,
/// 0 when masked.
pub fn metabolic_multipliers(ctx: &RateContext<'_>) -> RateResult<Array1<f64>> {
    let temps = temperature(ctx, "thermal growth energy")?;
    Ok(ctx
        .community
        .species()
        .ids()
        .map(|sp| {
            if !ctx.forcing.tolerates(sp) {
                return 0.0;
            }
            let c = ctx.community.species().thermal(sp).constants;
            (arrhenius(temps[sp.index()]) - c.metab_min) / c.metab_range
        })
        .collect())
}

/// Base encounter kernel scaled row-wise by the thermal-performance cubic.
#[derive(Clone, Debug, Default)]
pub struct ThermalEncounter<E = DefaultEncounter> {
    pub base: E,
}

impl<E: EncounterRate> ThermalEncounter<E> {
    pub fn new(base: E) -> Self {
        Self { base }
    }
}

impl<E: EncounterRate> EncounterRate for ThermalEncounter<E> {
    fn name(&self) -> &'static str {
        "thermal encounter"
    }

    fn encounter(&self, ctx: &RateContext<'_>) -> RateResult<Array2<f64>> {
        let scale = encounter_multipliers(ctx)?;
        let mut e = self.base.encounter(ctx)?;
        sweep::scale_rows(&mut e, scale.view())?;
        Ok(e)
    }

    fn needs_temperature(&self) -> bool {
        true
    }
}

/// Net energy with Arrhenius-scaled metabolism, masked to the tolerance band:
/// `(alpha · (1 − f) · E − ks · w^p · temp_effect) · mask`.
#[derive(Copy, Clone, Debug, Default)]
pub struct ThermalGrowthEnergy;

impl GrowthEnergy for ThermalGrowthEnergy {
    fn name(&self) -> &'static str {
        "thermal growth energy"
    }

    fn net_energy(
        &self,
        ctx:           &RateContext<'_>,
        encounter:     &Array2<f64>,
        feeding_level: &Array2<f64>,
    ) -> RateResult<Array2<f64>> {
        let temp_effect = metabolic_multipliers(ctx)?;
        let mut cost = ctx.community.metab().clone();
        sweep::scale_rows(&mut cost, temp_effect.view())?;

        let mut e = kernels::assimilated(ctx.community, encounter, feeding_level)?;
        e -= &cost;
        sweep::scale_rows(&mut e, ctx.forcing.mask().view())?;
        Ok(e)
    }

    fn needs_temperature(&self) -> bool {
        true
    }
}
