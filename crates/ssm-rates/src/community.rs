//! `Community` — the immutable, shared base of every scenario run.

use ndarray::{Array1, Array2};

use ssm_core::{SizeGrid, SpeciesId};
use ssm_species::{InteractionMatrix, SpeciesSet};

use crate::{RateError, RateResult};

/// Species, interactions and size grid, plus every size-dependent physiology
/// array that does not change during a projection.
///
/// All `(species × size)` arrays have one row per species (species order)
/// and one column per consumer bin.  Build once and share behind an `Arc`;
/// scenario overlays only reference it.
#[derive(Clone, Debug)]
pub struct Community {
    species:     SpeciesSet,
    interaction: InteractionMatrix,
    grid:        SizeGrid,

    search_vol:  Array2<f64>,
    intake_max:  Array2<f64>,
    metab:       Array2<f64>,
    psi:         Array2<f64>,
    selectivity: Array2<f64>,
    /// Per species: `(w × w_full)` lognormal feeding kernel.
    pred_kernel: Vec<Array2<f64>>,
    recruit_bin: Vec<usize>,
}

impl Community {
    pub fn new(species: SpeciesSet, interaction: InteractionMatrix, grid: SizeGrid) -> RateResult<Self> {
        if interaction.len() != species.len() {
            return Err(RateError::Config(format!(
                "interaction matrix is {0}x{0} but there are {1} species",
                interaction.len(),
                species.len()
            )));
        }

        let n_sp = species.len();
        let n_w = grid.len();
        let mut search_vol = Array2::<f64>::zeros((n_sp, n_w));
        let mut intake_max = Array2::<f64>::zeros((n_sp, n_w));
        let mut metab = Array2::<f64>::zeros((n_sp, n_w));
        let mut psi = Array2::<f64>::zeros((n_sp, n_w));
        let mut selectivity = Array2::<f64>::zeros((n_sp, n_w));
        let mut pred_kernel = Vec::with_capacity(n_sp);
        let mut recruit_bin = Vec::with_capacity(n_sp);

        for (i, sp) in species.params().iter().enumerate() {
            let bin = grid.bin_of(sp.w_min).ok_or_else(|| {
                RateError::Config(format!(
                    "species {:?}: w_min {} is below the smallest grid size {}",
                    sp.name, sp.w_min, grid.w[0]
                ))
            })?;
            if bin + 1 >= n_w {
                return Err(RateError::Config(format!(
                    "species {:?}: w_min {} falls in the last grid bin",
                    sp.name, sp.w_min
                )));
            }
            recruit_bin.push(bin);

            for (j, &w) in grid.w.iter().enumerate() {
                search_vol[[i, j]] = sp.gamma * w.powf(sp.q);
                intake_max[[i, j]] = sp.h * w.powf(sp.n);
                metab[[i, j]] = sp.ks * w.powf(sp.p);
                psi[[i, j]] = if w >= sp.w_max {
                    1.0
                } else {
                    (w / sp.w_max).powf(1.0 - sp.n) / (1.0 + (w / sp.w_mat).powi(-10))
                };
            }
            selectivity.row_mut(i).assign(&sp.selectivity_at_size(&grid)?);
            pred_kernel.push(crate::kernels::predation_kernel(&grid, sp.beta, sp.sigma));
        }

        log::debug!(
            "community: {n_sp} species, {n_w} consumer bins, {} resource bins",
            grid.len_full()
        );

        Ok(Self {
            species,
            interaction,
            grid,
            search_vol,
            intake_max,
            metab,
            psi,
            selectivity,
            pred_kernel,
            recruit_bin,
        })
    }

    pub fn species(&self) -> &SpeciesSet {
        &self.species
    }

    pub fn interaction(&self) -> &InteractionMatrix {
        &self.interaction
    }

    pub fn grid(&self) -> &SizeGrid {
        &self.grid
    }

    #[inline]
    pub fn species_count(&self) -> usize {
        self.species.len()
    }

    /// `(species × size)` shape of abundance and rate arrays.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.species.len(), self.grid.len())
    }

    /// `gamma · w^q`.
    pub fn search_vol(&self) -> &Array2<f64> {
        &self.search_vol
    }

    /// `h · w^n`.
    pub fn intake_max(&self) -> &Array2<f64> {
        &self.intake_max
    }

    /// `ks · w^p`, standard metabolic cost at size.
    pub fn metab(&self) -> &Array2<f64> {
        &self.metab
    }

    /// Share of positive net energy invested in reproduction.
    pub fn psi(&self) -> &Array2<f64> {
        &self.psi
    }

    /// Gear selectivity at size, in `[0, 1]`.
    pub fn selectivity(&self) -> &Array2<f64> {
        &self.selectivity
    }

    pub fn pred_kernel(&self, species: SpeciesId) -> &Array2<f64> {
        &self.pred_kernel[species.index()]
    }

    /// Consumer bin that recruits of `species` enter.
    #[inline]
    pub fn recruit_bin(&self, species: SpeciesId) -> usize {
        self.recruit_bin[species.index()]
    }

    /// Resource availability per species.
    pub fn resource_availability(&self) -> Array1<f64> {
        Array1::from_iter(self.species.params().iter().map(|p| p.interaction_resource))
    }
}
