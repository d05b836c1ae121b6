//! Log-spaced body-size grid shared by every species and the resource.
//!
//! # Layout
//!
//! ```text
//! w_full: [ resource-only bins ........ | consumer bins (== w) ]
//!          0                     offset   offset + no_w - 1
//! ```
//!
//! Bins are spaced evenly in log10 with spacing `Δ`; the width of a bin is
//! `dw = w · (10^Δ − 1)`, so `density · dw` is the abundance in the bin.

use ndarray::Array1;

use crate::{CoreError, CoreResult};

/// The discrete size bins of a model.  Immutable once built.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SizeGrid {
    /// Consumer (fish) bin sizes, grams.
    pub w: Array1<f64>,
    /// Consumer bin widths.
    pub dw: Array1<f64>,
    /// Resource + consumer bin sizes.
    pub w_full: Array1<f64>,
    /// Widths of `w_full` bins.
    pub dw_full: Array1<f64>,
    /// Index in `w_full` of `w[0]`.
    pub offset: usize,
    /// log10 spacing between neighbouring bins.
    pub log_step: f64,
}

impl SizeGrid {
    /// Build a grid of `no_w` consumer bins from `min_w` to `max_w`, extended
    /// downward with resource-only bins to (at least) `min_w_pp`.
    pub fn new(min_w: f64, max_w: f64, no_w: usize, min_w_pp: f64) -> CoreResult<Self> {
        if no_w < 2 {
            return Err(CoreError::Config(format!("size grid needs at least 2 bins, got {no_w}")));
        }
        if !(min_w > 0.0 && max_w > min_w && min_w.is_finite() && max_w.is_finite()) {
            return Err(CoreError::Config(format!(
                "size grid bounds must satisfy 0 < min_w < max_w (got {min_w}, {max_w})"
            )));
        }
        if !(min_w_pp > 0.0 && min_w_pp <= min_w) {
            return Err(CoreError::Config(format!(
                "resource grid start {min_w_pp} must lie in (0, min_w = {min_w}]"
            )));
        }

        let lo = min_w.log10();
        let log_step = (max_w.log10() - lo) / (no_w - 1) as f64;
        let w = Array1::from_iter((0..no_w).map(|i| 10f64.powf(lo + i as f64 * log_step)));

        // Resource-only bins continue the same spacing below min_w.
        let offset = ((lo - min_w_pp.log10()) / log_step + 1e-9).floor() as usize;
        let w_full = Array1::from_iter(
            (0..offset + no_w).map(|i| 10f64.powf(lo + (i as f64 - offset as f64) * log_step)),
        );

        let width = 10f64.powf(log_step) - 1.0;
        let dw = w.mapv(|x| x * width);
        let dw_full = w_full.mapv(|x| x * width);

        Ok(Self { w, dw, w_full, dw_full, offset, log_step })
    }

    /// Number of consumer bins.
    #[inline]
    pub fn len(&self) -> usize {
        self.w.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w.is_empty()
    }

    /// Number of resource-grid bins.
    #[inline]
    pub fn len_full(&self) -> usize {
        self.w_full.len()
    }

    /// Largest consumer bin index `i` with `w[i] < size`, or `None` when
    /// every bin is at least `size`.
    pub fn last_bin_below(&self, size: f64) -> Option<usize> {
        self.w.iter().rposition(|&x| x < size)
    }

    /// Consumer bin that an individual of `size` falls into: the largest `i`
    /// with `w[i] <= size` (with a relative tolerance for rounding).
    pub fn bin_of(&self, size: f64) -> Option<usize> {
        self.w.iter().rposition(|&x| x <= size * (1.0 + 1e-9))
    }
}
