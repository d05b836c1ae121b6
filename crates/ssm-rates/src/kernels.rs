//! Default (unforced) size-spectrum kernels.
//!
//! Prey of a predator of size `w` are weighted by the lognormal kernel
//!
//! ```text
//! phi(w, w') = exp(-ln(w / (beta · w'))² / (2 sigma²))      for w' <= w
//! ```
//!
//! and zero for prey larger than the predator.  All food sums run over the
//! full resource grid `w_full`; fish prey occupy its upper `w.len()` bins.

use ndarray::{Array1, Array2, ArrayView1};

use ssm_core::{SizeGrid, SpeciesId};

use crate::{Community, RateResult, sweep};

/// `(w × w_full)` feeding kernel of one species.
pub fn predation_kernel(grid: &SizeGrid, beta: f64, sigma: f64) -> Array2<f64> {
    let two_var = 2.0 * sigma * sigma;
    Array2::from_shape_fn((grid.len(), grid.len_full()), |(i, k)| {
        let ratio = grid.w[i] / grid.w_full[k];
        if ratio < 1.0 {
            0.0
        } else {
            (-(ratio / beta).ln().powi(2) / two_var).exp()
        }
    })
}

/// Biomass density of the food available to `predator` on `w_full`:
/// `(ir · R + Σ_j theta[predator, j] · N_j) · w_full · dw_full`.
fn food_biomass(
    community: &Community,
    predator:  SpeciesId,
    abundance: &Array2<f64>,
    resource:  ArrayView1<'_, f64>,
) -> Array1<f64> {
    let grid = community.grid();
    let ir = community.species().get(predator).interaction_resource;
    let mut food = resource.mapv(|r| ir * r);
    let theta = community.interaction().prey_of(predator);
    for (j, &t) in theta.iter().enumerate() {
        if t == 0.0 {
            continue;
        }
        let mut fish = food.slice_mut(ndarray::s![grid.offset..]);
        fish.scaled_add(t, &abundance.row(j));
    }
    food * &grid.w_full * &grid.dw_full
}

/// Default encounter rate `E = gamma · w^q · Σ phi · food · w' · dw'`.
pub fn encounter(
    community: &Community,
    abundance: &Array2<f64>,
    resource:  &Array1<f64>,
) -> RateResult<Array2<f64>> {
    sweep::require_shape("abundance", abundance, community.shape())?;
    check_resource(community, resource)?;

    let mut out = Array2::<f64>::zeros(community.shape());
    for sp in community.species().ids() {
        let food = food_biomass(community, sp, abundance, resource.view());
        let available = community.pred_kernel(sp).dot(&food);
        let mut row = out.row_mut(sp.index());
        row.assign(&(&available * &community.search_vol().row(sp.index())));
    }
    Ok(out)
}

/// Feeding level `f = E / (E + h · w^n)`, in `[0, 1)`.
pub fn feeding_level(community: &Community, encounter: &Array2<f64>) -> RateResult<Array2<f64>> {
    sweep::require_shape("encounter", encounter, community.shape())?;
    let mut f = encounter.clone();
    f.zip_mut_with(community.intake_max(), |e, &imax| {
        let denom = *e + imax;
        *e = if denom > 0.0 { *e / denom } else { 0.0 };
    });
    Ok(f)
}

/// Unforced net energy `alpha · (1 − f) · E − ks · w^p`.
pub fn net_energy(
    community:     &Community,
    encounter:     &Array2<f64>,
    feeding_level: &Array2<f64>,
) -> RateResult<Array2<f64>> {
    let mut e = assimilated(community, encounter, feeding_level)?;
    e -= community.metab();
    Ok(e)
}

/// `alpha · (1 − f) · E`, the assimilated intake.
pub fn assimilated(
    community:     &Community,
    encounter:     &Array2<f64>,
    feeding_level: &Array2<f64>,
) -> RateResult<Array2<f64>> {
    sweep::require_shape("encounter", encounter, community.shape())?;
    sweep::require_shape("feeding level", feeding_level, community.shape())?;
    let mut intake = encounter * &feeding_level.mapv(|f| 1.0 - f);
    let alpha: Array1<f64> = community.species().params().iter().map(|p| p.alpha).collect();
    sweep::scale_rows(&mut intake, alpha.view())?;
    Ok(intake)
}

/// `(species × w_full)` rate at which each predator species removes prey of
/// each size, per unit prey density.
pub fn predation_rate(
    community:     &Community,
    abundance:     &Array2<f64>,
    feeding_level: &Array2<f64>,
) -> RateResult<Array2<f64>> {
    sweep::require_shape("abundance", abundance, community.shape())?;
    sweep::require_shape("feeding level", feeding_level, community.shape())?;
    let grid = community.grid();
    let mut out = Array2::<f64>::zeros((community.species_count(), grid.len_full()));
    for sp in community.species().ids() {
        let i = sp.index();
        let hunger = feeding_level.row(i).mapv(|f| 1.0 - f);
        let effort = hunger * &community.search_vol().row(i) * &abundance.row(i) * &grid.dw;
        out.row_mut(i).assign(&community.pred_kernel(sp).t().dot(&effort));
    }
    Ok(out)
}

/// Predation mortality on fish: `mu_p[j, w] = Σ_i theta[i, j] · pred_rate[i, offset + w]`.
pub fn predation_mortality(community: &Community, pred_rate: &Array2<f64>) -> RateResult<Array2<f64>> {
    let grid = community.grid();
    sweep::require_shape("predation rate", pred_rate, (community.species_count(), grid.len_full()))?;
    let on_fish = pred_rate.slice(ndarray::s![.., grid.offset..]);
    Ok(community.interaction().as_array().t().dot(&on_fish))
}

/// Predation mortality on the resource: `Σ_i ir_i · pred_rate[i, ·]`.
pub fn resource_mortality(community: &Community, pred_rate: &Array2<f64>) -> RateResult<Array1<f64>> {
    sweep::require_shape(
        "predation rate",
        pred_rate,
        (community.species_count(), community.grid().len_full()),
    )?;
    Ok(community.resource_availability().dot(pred_rate))
}

pub(crate) fn check_resource(community: &Community, resource: &Array1<f64>) -> RateResult<()> {
    sweep::require_shape_1d("resource", resource, community.grid().len_full())
}
