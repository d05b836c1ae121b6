//! Shape-checked per-species broadcasts over `(species × size)` arrays.

use ndarray::{Array1, Array2, ArrayView1, Axis};

use crate::{RateError, RateResult};

/// Multiply row `i` of `values` by `factors[i]`.
pub fn scale_rows(values: &mut Array2<f64>, factors: ArrayView1<'_, f64>) -> RateResult<()> {
    if factors.len() != values.nrows() {
        return Err(RateError::Shape {
            what:     "per-species factors",
            expected: (values.nrows(), 1),
            got:      (factors.len(), 1),
        });
    }
    *values *= &factors.insert_axis(Axis(1));
    Ok(())
}

/// Check that `values` is `(species × size)` shaped.
pub fn require_shape(what: &'static str, values: &Array2<f64>, expected: (usize, usize)) -> RateResult<()> {
    if values.dim() != expected {
        return Err(RateError::Shape { what, expected, got: values.dim() });
    }
    Ok(())
}

/// Check that a size vector has `expected` bins.
pub fn require_shape_1d(what: &'static str, values: &Array1<f64>, expected: usize) -> RateResult<()> {
    if values.len() != expected {
        return Err(RateError::Shape { what, expected: (expected, 1), got: (values.len(), 1) });
    }
    Ok(())
}
