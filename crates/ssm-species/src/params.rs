//! Per-species physiological, thermal, and fishing parameters.

use crate::{SpeciesError, SpeciesResult};

/// Fishing selectivity curve of a species' gear.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selectivity {
    /// 0 below `knife_edge_size`, 1 at and above it.
    KnifeEdge { knife_edge_size: f64 },
    /// 0 up to the last bin below `knife_edge_size1`, linear ramp to 1 at the
    /// last bin below `knife_edge_size2`, 1 beyond.
    KnifeEdgePhased {
        knife_edge_size1: f64,
        knife_edge_size2: f64,
    },
}

/// One species' parameter record.
///
/// Sizes are in grams, temperatures in °C, rates per year.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeciesParams {
    pub name: String,

    // ── Sizes ─────────────────────────────────────────────────────────────
    /// Asymptotic size.
    pub w_max: f64,
    /// Maturity size.
    pub w_mat: f64,
    /// Egg (recruit) size.
    pub w_min: f64,

    // ── Feeding ───────────────────────────────────────────────────────────
    /// Preferred predator/prey mass ratio.
    pub beta: f64,
    /// Width of the lognormal feeding kernel (in ln mass-ratio units).
    pub sigma: f64,
    /// Search volume coefficient.  The default pairs with a resource
    /// carrying capacity of order `1e11 · w^-2.05`.
    pub gamma: f64,
    /// Search volume exponent.
    pub q: f64,
    /// Maximum intake coefficient.
    pub h: f64,
    /// Maximum intake exponent.
    pub n: f64,
    /// Assimilation efficiency.
    pub alpha: f64,
    /// Availability of the background resource to this species.
    pub interaction_resource: f64,

    // ── Metabolism & mortality ────────────────────────────────────────────
    /// Standard metabolism coefficient.
    pub ks: f64,
    /// Standard metabolism exponent.
    pub p: f64,
    /// Background (size-independent) mortality.
    pub z0: f64,

    // ── Reproduction ──────────────────────────────────────────────────────
    /// Reproductive efficiency.
    pub erepro: f64,
    /// Beverton–Holt maximum recruitment.  `f64::INFINITY` disables density
    /// dependence.
    pub r_max: f64,

    // ── Thermal tolerance ─────────────────────────────────────────────────
    pub temp_min: f64,
    pub temp_max: f64,

    // ── Fishing ───────────────────────────────────────────────────────────
    /// Gear name; must match a column of the effort schedule.
    pub gear: String,
    pub catchability: f64,
    pub selectivity: Selectivity,
}

impl SpeciesParams {
    /// A species with default physiology on the given sizes and thermal band.
    ///
    /// Gear defaults to `"Longline"` with knife-edge selectivity at `w_mat`.
    pub fn new(name: impl Into<String>, w_max: f64, w_mat: f64, temp_min: f64, temp_max: f64) -> Self {
        Self {
            name: name.into(),
            w_max,
            w_mat,
            w_min: 0.001,
            beta: 100.0,
            sigma: 2.0,
            gamma: 1.5e-10,
            q: 0.8,
            h: 40.0,
            n: 0.75,
            alpha: 0.6,
            interaction_resource: 1.0,
            ks: 4.0,
            p: 0.75,
            z0: 0.6 * w_max.powf(-0.25),
            erepro: 1.0,
            r_max: f64::INFINITY,
            temp_min,
            temp_max,
            gear: "Longline".to_string(),
            catchability: 1.0,
            selectivity: Selectivity::KnifeEdge { knife_edge_size: w_mat },
        }
    }

    /// Check parameter ranges that the rate kernels rely on.
    ///
    /// Thermal bounds are validated separately by
    /// [`ThermalConstants::compute`][crate::ThermalConstants::compute].
    pub fn validate(&self) -> SpeciesResult<()> {
        let bad = |what: &str, v: f64| {
            Err(SpeciesError::Config(format!("species {:?}: {what} = {v} is out of range", self.name)))
        };
        if !(self.w_min > 0.0 && self.w_min < self.w_mat && self.w_mat < self.w_max) {
            return Err(SpeciesError::Config(format!(
                "species {:?}: sizes must satisfy 0 < w_min < w_mat < w_max (got {}, {}, {})",
                self.name, self.w_min, self.w_mat, self.w_max
            )));
        }
        for (what, v) in [("beta", self.beta), ("sigma", self.sigma), ("h", self.h)] {
            if !(v > 0.0 && v.is_finite()) {
                return bad(what, v);
            }
        }
        for (what, v) in [
            ("gamma", self.gamma),
            ("ks", self.ks),
            ("z0", self.z0),
            ("erepro", self.erepro),
            ("alpha", self.alpha),
            ("interaction_resource", self.interaction_resource),
            ("catchability", self.catchability),
        ] {
            if !(v >= 0.0 && v.is_finite()) {
                return bad(what, v);
            }
        }
        if self.alpha > 1.0 {
            return bad("alpha", self.alpha);
        }
        if !(self.r_max > 0.0) {
            return bad("r_max", self.r_max);
        }
        match self.selectivity {
            Selectivity::KnifeEdge { knife_edge_size } if !(knife_edge_size > 0.0) => {
                bad("knife_edge_size", knife_edge_size)
            }
            Selectivity::KnifeEdgePhased { knife_edge_size1, knife_edge_size2 }
                if !(knife_edge_size1 > 0.0 && knife_edge_size2 >= knife_edge_size1) =>
            {
                Err(SpeciesError::Config(format!(
                    "species {:?}: knife_edge_size2 ({knife_edge_size2}) must be >= knife_edge_size1 ({knife_edge_size1}) > 0",
                    self.name
                )))
            }
            _ => Ok(()),
        }
    }
}
