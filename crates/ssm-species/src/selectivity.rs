//! Size selectivity curves mapping body size to capture probability.

use ndarray::Array1;

use ssm_core::SizeGrid;

use crate::{Selectivity, SpeciesError, SpeciesParams, SpeciesResult};

/// 0 below `knife_edge_size`, 1 at and above it.
pub fn knife_edge(w: &Array1<f64>, knife_edge_size: f64) -> Array1<f64> {
    w.mapv(|x| if x >= knife_edge_size { 1.0 } else { 0.0 })
}

/// Two-size ramp selectivity.
///
/// With `i1` the last bin strictly below `knife_edge_size1` and `i2` the last
/// bin strictly below `knife_edge_size2`: bins up to `i1` are 0, bins
/// `i1..=i2` ramp linearly from 0 to 1, bins after `i2` are 1.  If either
/// size lies at or below the smallest grid size the ramp is undefined and a
/// [`SpeciesError::EmptySelectivityRange`] is returned.
pub fn knife_edge_phased(
    grid:             &SizeGrid,
    species:          &str,
    knife_edge_size1: f64,
    knife_edge_size2: f64,
) -> SpeciesResult<Array1<f64>> {
    let empty = |size| SpeciesError::EmptySelectivityRange { species: species.to_string(), size };
    let lo = grid.last_bin_below(knife_edge_size1).ok_or_else(|| empty(knife_edge_size1))?;
    let hi = grid.last_bin_below(knife_edge_size2).ok_or_else(|| empty(knife_edge_size2))?;
    if hi < lo {
        return Err(SpeciesError::Config(format!(
            "species {species:?}: knife_edge_size2 {knife_edge_size2} lies below knife_edge_size1 {knife_edge_size1}"
        )));
    }

    let span = (hi - lo) as f64;
    Ok(Array1::from_iter((0..grid.len()).map(|i| {
        if i <= lo {
            0.0
        } else if i <= hi {
            (i - lo) as f64 / span
        } else {
            1.0
        }
    })))
}

impl SpeciesParams {
    /// Evaluate this species' selectivity curve on the consumer grid.
    pub fn selectivity_at_size(&self, grid: &SizeGrid) -> SpeciesResult<Array1<f64>> {
        match self.selectivity {
            Selectivity::KnifeEdge { knife_edge_size } => Ok(knife_edge(&grid.w, knife_edge_size)),
            Selectivity::KnifeEdgePhased { knife_edge_size1, knife_edge_size2 } => {
                knife_edge_phased(grid, &self.name, knife_edge_size1, knife_edge_size2)
            }
        }
    }
}
