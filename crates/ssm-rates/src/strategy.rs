//! The three rate capability slots and their unforced implementations.

use ndarray::{Array1, Array2};

use ssm_core::ProjectionConfig;

use crate::{Community, RateContext, RateResult, kernels};

/// Pluggable encounter rate.
///
/// Implementations must be `Send + Sync`: one instance is shared by every
/// run of a batch, and runs may execute on different threads.  Any state
/// that varies during a run lives in the engine, not in the strategy.
pub trait EncounterRate: Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// `(species × size)` encounter rate for the step described by `ctx`.
    fn encounter(&self, ctx: &RateContext<'_>) -> RateResult<Array2<f64>>;

    /// `true` if the strategy reads `ctx.forcing.temperature()`.
    fn needs_temperature(&self) -> bool {
        false
    }
}

/// Pluggable net growth/reproduction energy.
///
/// The result may be negative; the engine turns a deficit into starvation
/// mortality.
pub trait GrowthEnergy: Send + Sync {
    fn name(&self) -> &'static str;

    fn net_energy(
        &self,
        ctx:           &RateContext<'_>,
        encounter:     &Array2<f64>,
        feeding_level: &Array2<f64>,
    ) -> RateResult<Array2<f64>>;

    fn needs_temperature(&self) -> bool {
        false
    }
}

/// Pluggable background resource dynamics.
pub trait ResourceDynamics: Send + Sync {
    fn name(&self) -> &'static str;

    /// Resource density on `w_full` after the step described by `ctx`.
    ///
    /// `mortality` is the predation mortality the consumers imposed on the
    /// resource during the step.
    fn next_resource(&self, ctx: &RateContext<'_>, mortality: &Array1<f64>) -> RateResult<Array1<f64>>;

    /// Resource density to start from when the caller supplies none.
    fn initial_resource(&self, community: &Community) -> RateResult<Array1<f64>>;

    /// Build-time check that every step of `config` can be served.
    ///
    /// Default: always succeeds.
    fn validate(&self, _community: &Community, _config: &ProjectionConfig) -> RateResult<()> {
        Ok(())
    }
}

// ── Unforced defaults ─────────────────────────────────────────────────────────

/// [`kernels::encounter`] with no environmental scaling.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultEncounter;

impl EncounterRate for DefaultEncounter {
    fn name(&self) -> &'static str {
        "default encounter"
    }

    fn encounter(&self, ctx: &RateContext<'_>) -> RateResult<Array2<f64>> {
        kernels::encounter(ctx.community, ctx.abundance, ctx.resource)
    }
}

/// [`kernels::net_energy`] with no environmental scaling.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultGrowthEnergy;

impl GrowthEnergy for DefaultGrowthEnergy {
    fn name(&self) -> &'static str {
        "default growth energy"
    }

    fn net_energy(
        &self,
        ctx:           &RateContext<'_>,
        encounter:     &Array2<f64>,
        feeding_level: &Array2<f64>,
    ) -> RateResult<Array2<f64>> {
        kernels::net_energy(ctx.community, encounter, feeding_level)
    }
}
