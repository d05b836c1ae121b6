//! Thermal and metabolic scaling of physiological rates.
//!
//! Two temperature responses are used, both bounded by a species' thermal
//! tolerance band `(temp_min, temp_max)`:
//!
//! * **Encounter** — the thermal-performance cubic
//!   `f(T) = T · (T − temp_min) · (temp_max − T)`, zero at both bounds with a
//!   single interior maximum, divided by `encounter_scale` (its maximum on the
//!   band) so the multiplier lies in `[0, 1]`.
//! * **Metabolism** — the Arrhenius form
//!   `A(T) = exp(25.22 − 0.63 / (8.62e-5 · (273 + T)))`, rescaled to
//!   `(A(T) − A(temp_min)) / (A(temp_max) − A(temp_min))`.
//!
//! Outside the band both multipliers are exactly 0.  The band is open: a
//! temperature equal to either bound is outside.

use crate::{SpeciesError, SpeciesResult};

pub const ARRHENIUS_LN_PREFACTOR: f64 = 25.22;
/// Activation energy, eV.
pub const ACTIVATION_ENERGY: f64 = 0.63;
/// Boltzmann constant, eV / K.
pub const BOLTZMANN: f64 = 8.62e-5;
pub const KELVIN_OFFSET: f64 = 273.0;
/// Temperature resolution at which the encounter cubic is sampled, °C.
pub const SAMPLING_RESOLUTION: f64 = 0.1;

/// Arrhenius temperature dependence of metabolic cost.
#[inline]
pub fn arrhenius(temp: f64) -> f64 {
    (ARRHENIUS_LN_PREFACTOR - ACTIVATION_ENERGY / (BOLTZMANN * (KELVIN_OFFSET + temp))).exp()
}

/// The unscaled thermal-performance cubic.
#[inline]
pub fn thermal_performance(temp: f64, temp_min: f64, temp_max: f64) -> f64 {
    temp * (temp - temp_min) * (temp_max - temp)
}

// ── ThermalConstants ──────────────────────────────────────────────────────────

/// Normalisation constants derived once per species.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThermalConstants {
    /// Maximum of the thermal-performance cubic on the tolerance band.
    pub encounter_scale: f64,
    pub metab_min: f64,
    pub metab_max: f64,
    pub metab_range: f64,
}

impl ThermalConstants {
    /// Derive the constants for one species' tolerance band.
    ///
    /// The cubic is sampled every [`SAMPLING_RESOLUTION`] degrees from
    /// `temp_min`; its analytic interior critical points are added to the
    /// sample set so that `f(T) / encounter_scale <= 1` holds for every `T`.
    pub fn compute(species: &str, temp_min: f64, temp_max: f64) -> SpeciesResult<Self> {
        if !(temp_max > temp_min) || !temp_min.is_finite() || !temp_max.is_finite() {
            return Err(SpeciesError::DegenerateThermalRange {
                species: species.to_string(),
                temp_min,
                temp_max,
            });
        }
        if KELVIN_OFFSET + temp_min <= 0.0 {
            return Err(SpeciesError::Config(format!(
                "species {species:?}: temp_min {temp_min} is below absolute zero"
            )));
        }

        let samples = ((temp_max - temp_min) / SAMPLING_RESOLUTION + 1e-9).floor() as u64;
        let sampled_max = (0..=samples)
            .map(|k| thermal_performance(temp_min + k as f64 * SAMPLING_RESOLUTION, temp_min, temp_max))
            .fold(f64::NEG_INFINITY, f64::max);

        let encounter_scale = critical_points(temp_min, temp_max)
            .into_iter()
            .flatten()
            .filter(|t| (temp_min..=temp_max).contains(t))
            .map(|t| thermal_performance(t, temp_min, temp_max))
            .fold(sampled_max, f64::max);

        if !(encounter_scale > 0.0 && encounter_scale.is_finite()) {
            return Err(SpeciesError::NonPositiveEncounterScale {
                species: species.to_string(),
                scale: encounter_scale,
                temp_min,
                temp_max,
            });
        }

        let metab_min = arrhenius(temp_min);
        let metab_max = arrhenius(temp_max);
        let metab_range = metab_max - metab_min;
        if !(metab_range > 0.0 && metab_range.is_finite()) {
            return Err(SpeciesError::Config(format!(
                "species {species:?}: metabolic range {metab_range} on [{temp_min}, {temp_max}] is not positive"
            )));
        }

        Ok(Self { encounter_scale, metab_min, metab_max, metab_range })
    }
}

/// Roots of `f'(T) = −3T² + 2(a + b)T − ab`.
fn critical_points(a: f64, b: f64) -> [Option<f64>; 2] {
    let sum = a + b;
    let disc = sum * sum - 3.0 * a * b;
    if disc < 0.0 {
        return [None, None];
    }
    let root = disc.sqrt();
    [Some((sum - root) / 3.0), Some((sum + root) / 3.0)]
}

// ── ThermalResponse ───────────────────────────────────────────────────────────

/// A species' tolerance band together with its derived constants.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThermalResponse {
    pub temp_min: f64,
    pub temp_max: f64,
    pub constants: ThermalConstants,
}

impl ThermalResponse {
    pub fn new(species: &str, temp_min: f64, temp_max: f64) -> SpeciesResult<Self> {
        let constants = ThermalConstants::compute(species, temp_min, temp_max)?;
        Ok(Self { temp_min, temp_max, constants })
    }

    /// `true` strictly inside the band.  NaN is never tolerated.
    #[inline]
    pub fn tolerates(&self, temp: f64) -> bool {
        temp > self.temp_min && temp < self.temp_max
    }

    /// Encounter multiplier in `[0, 1]`.
    ///
    /// Inside the band the cubic is negative for `T < 0` (with a negative
    /// `temp_min`); those values are zeroed as well.
    #[inline]
    pub fn encounter_multiplier(&self, temp: f64) -> f64 {
        if !self.tolerates(temp) {
            return 0.0;
        }
        let scaled = thermal_performance(temp, self.temp_min, self.temp_max)
            / self.constants.encounter_scale;
        scaled.max(0.0)
    }

    /// Metabolic multiplier: `(A(T) − metab_min) / metab_range` inside the
    /// band, 0 outside.  Monotonic in `T`, in `(0, 1)` inside the band.
    #[inline]
    pub fn metabolic_multiplier(&self, temp: f64) -> f64 {
        if !self.tolerates(temp) {
            return 0.0;
        }
        (arrhenius(temp) - self.constants.metab_min) / self.constants.metab_range
    }

    /// Temperature at which the encounter multiplier peaks.
    pub fn optimum(&self) -> f64 {
        critical_points(self.temp_min, self.temp_max)
            .into_iter()
            .flatten()
            .filter(|t| (self.temp_min..=self.temp_max).contains(t))
            .max_by(|x, y| {
                thermal_performance(*x, self.temp_min, self.temp_max)
                    .total_cmp(&thermal_performance(*y, self.temp_min, self.temp_max))
            })
            .unwrap_or(0.5 * (self.temp_min + self.temp_max))
    }
}
