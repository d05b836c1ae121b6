//! Background resource dynamics: the self-renewing semichemostat and the
//! prescribed plankton lookup that replaces it under forcing.

use std::sync::Arc;

use ndarray::Array1;

use ssm_core::{ProjectionConfig, SizeGrid};
use ssm_forcing::{ForcingSeries, TimeIndexOffset};

use crate::{Community, RateContext, RateError, RateResult, ResourceDynamics, kernels};

// ── Semichemostat ─────────────────────────────────────────────────────────────

/// Parameters of the semichemostat resource spectrum.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceParams {
    /// Carrying-capacity coefficient.
    pub kappa:       f64,
    /// Carrying-capacity exponent (`cc = kappa · w^-lambda`).
    pub lambda:      f64,
    /// Regeneration-rate coefficient.
    pub r_pp:        f64,
    /// Regeneration-rate exponent (`r = r_pp · w^(n - 1)`).
    pub n:           f64,
    /// Bins at or above this size have zero carrying capacity.
    pub w_pp_cutoff: f64,
}

impl Default for ResourceParams {
    fn default() -> Self {
        Self {
            kappa:       1e11,
            lambda:      2.05,
            r_pp:        10.0,
            n:           2.0 / 3.0,
            w_pp_cutoff: 10.0,
        }
    }
}

impl ResourceParams {
    pub fn validate(&self) -> RateResult<()> {
        let positive = [
            ("kappa", self.kappa),
            ("r_pp", self.r_pp),
            ("w_pp_cutoff", self.w_pp_cutoff),
        ];
        for (what, v) in positive {
            if !(v > 0.0 && v.is_finite()) {
                return Err(RateError::Config(format!("resource {what} must be positive, got {v}")));
            }
        }
        if !self.lambda.is_finite() || !self.n.is_finite() {
            return Err(RateError::Config("resource exponents must be finite".to_string()));
        }
        Ok(())
    }

    /// Carrying capacity on `w_full`.
    pub fn capacity(&self, grid: &SizeGrid) -> Array1<f64> {
        grid.w_full.mapv(|w| if w < self.w_pp_cutoff { self.kappa * w.powf(-self.lambda) } else { 0.0 })
    }

    /// Regeneration rate on `w_full`.
    pub fn regeneration(&self, grid: &SizeGrid) -> Array1<f64> {
        grid.w_full.mapv(|w| self.r_pp * w.powf(self.n - 1.0))
    }
}

/// Self-renewing resource relaxing towards its carrying capacity:
///
/// ```text
/// c  = r · cc / (r + m)
/// n' = c − (c − n) · exp(−(r + m) · dt)
/// ```
#[derive(Clone, Debug)]
pub struct SemichemostatResource {
    params: ResourceParams,
}

impl SemichemostatResource {
    pub fn new(params: ResourceParams) -> RateResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &ResourceParams {
        &self.params
    }
}

impl ResourceDynamics for SemichemostatResource {
    fn name(&self) -> &'static str {
        "semichemostat resource"
    }

    fn next_resource(&self, ctx: &RateContext<'_>, mortality: &Array1<f64>) -> RateResult<Array1<f64>> {
        let grid = ctx.community.grid();
        kernels::check_resource(ctx.community, ctx.resource)?;
        kernels::check_resource(ctx.community, mortality)?;

        let cc = self.params.capacity(grid);
        let r = self.params.regeneration(grid);
        Ok(Array1::from_shape_fn(grid.len_full(), |k| {
            let loss = r[k] + mortality[k];
            let c = r[k] * cc[k] / loss;
            c - (c - ctx.resource[k]) * (-loss * ctx.dt).exp()
        }))
    }

    fn initial_resource(&self, community: &Community) -> RateResult<Array1<f64>> {
        Ok(self.params.capacity(community.grid()))
    }
}

// ── Forced ────────────────────────────────────────────────────────────────────

/// Prescribed resource: the next density is the plankton row for the step's
/// time, whatever the current resource state or consumer mortality.
#[derive(Clone, Debug)]
pub struct ForcedResource {
    plankton: Arc<ForcingSeries>,
    t_idx:    TimeIndexOffset,
}

impl ForcedResource {
    /// `plankton` must already be a density table on `w_full` (see
    /// [`ForcingSeries::plankton_from_log10`]).
    pub fn new(plankton: Arc<ForcingSeries>, t_idx: TimeIndexOffset) -> Self {
        Self { plankton, t_idx }
    }

    pub fn plankton(&self) -> &ForcingSeries {
        &self.plankton
    }

    pub fn t_idx(&self) -> TimeIndexOffset {
        self.t_idx
    }
}

impl ResourceDynamics for ForcedResource {
    fn name(&self) -> &'static str {
        "forced resource"
    }

    fn next_resource(&self, ctx: &RateContext<'_>, _mortality: &Array1<f64>) -> RateResult<Array1<f64>> {
        Ok(self.plankton.row_at(ctx.time, self.t_idx)?.to_owned())
    }

    /// The first row of the plankton table.
    fn initial_resource(&self, community: &Community) -> RateResult<Array1<f64>> {
        self.plankton.require_columns(community.grid().len_full())?;
        Ok(self.plankton.first_row().to_owned())
    }

    fn validate(&self, community: &Community, config: &ProjectionConfig) -> RateResult<()> {
        self.plankton.require_columns(community.grid().len_full())?;
        self.plankton.validate_horizon(config.first_time, config.total_steps, self.t_idx)?;
        Ok(())
    }
}
