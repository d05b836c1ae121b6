//! `ForcingSeries` — an immutable `(time × column)` forcing table.

use ndarray::{Array1, Array2, ArrayView1, Axis, s};

use crate::{ForcingError, ForcingResult, TimeIndexOffset};

/// A `(time × column)` numeric table read one row per projection step.
///
/// Columns are species for temperature tables and `w_full` size bins for
/// plankton tables.  Built once per (climate model, scenario) pair and read
/// only during projection; share it across runs behind an `Arc`.
#[derive(Clone, Debug, PartialEq)]
pub struct ForcingSeries {
    name:   String,
    values: Array2<f64>,
}

impl ForcingSeries {
    /// Wrap `values` after checking it is non-empty and entirely finite.
    pub fn new(name: impl Into<String>, values: Array2<f64>) -> ForcingResult<Self> {
        let name = name.into();
        if values.nrows() == 0 || values.ncols() == 0 {
            return Err(ForcingError::Empty { what: name });
        }
        if let Some(((row, col), &value)) = values.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(ForcingError::InvalidValue { what: name, row, col, value });
        }
        Ok(Self { name, values })
    }

    /// A table of `rows` identical copies of `row`.
    pub fn constant(name: impl Into<String>, rows: usize, row: &[f64]) -> ForcingResult<Self> {
        let values = Array2::from_shape_fn((rows, row.len()), |(_, j)| row[j]);
        Self::new(name, values)
    }

    /// Build a plankton density table from log10 biomass per size bin.
    ///
    /// Each value becomes `10^v / dw_full[col]`, i.e. a density that yields
    /// the supplied biomass-per-bin when multiplied by the bin width.
    pub fn plankton_from_log10(
        name:          impl Into<String>,
        log10_biomass: Array2<f64>,
        dw_full:       &Array1<f64>,
    ) -> ForcingResult<Self> {
        let name = name.into();
        if log10_biomass.ncols() != dw_full.len() {
            return Err(ForcingError::Shape {
                what:     name,
                expected: dw_full.len(),
                got:      log10_biomass.ncols(),
            });
        }
        let mut density = log10_biomass.mapv(|v| 10f64.powf(v));
        for mut row in density.rows_mut() {
            row /= dw_full;
        }
        Self::new(name, density)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.values.nrows()
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.values.ncols()
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn first_row(&self) -> ArrayView1<'_, f64> {
        self.values.row(0)
    }

    /// Check the column count against what the consumer expects.
    pub fn require_columns(&self, expected: usize) -> ForcingResult<()> {
        if self.cols() != expected {
            return Err(ForcingError::Shape {
                what: self.name.clone(),
                expected,
                got: self.cols(),
            });
        }
        Ok(())
    }

    /// Prepend `steps` copies of the first row.
    ///
    /// Used to give every forcing input the same pre-extended time axis: the
    /// first real value is held constant through the spin-up period.
    pub fn with_spin_up(self, steps: usize) -> Self {
        if steps == 0 {
            return self;
        }
        let (rows, cols) = self.values.dim();
        let mut values = Array2::<f64>::zeros((rows + steps, cols));
        for mut row in values.slice_mut(s![..steps, ..]).rows_mut() {
            row.assign(&self.values.row(0));
        }
        values.slice_mut(s![steps.., ..]).assign(&self.values);
        Self { name: self.name, values }
    }

    /// Row of the table for model time `time`, located with `t_idx`.
    pub fn row_at(&self, time: i64, t_idx: TimeIndexOffset) -> ForcingResult<ArrayView1<'_, f64>> {
        let row = t_idx.row_number(time);
        if row < 1 || row > self.rows() as i64 {
            return Err(ForcingError::RowOutOfRange {
                what: self.name.clone(),
                time,
                row,
                rows: self.rows(),
            });
        }
        Ok(self.values.index_axis(Axis(0), (row - 1) as usize))
    }

    /// Check that every step of a horizon has a row.
    ///
    /// `steps` steps starting at time `first_time` read rows
    /// `first_time + t_idx ..= first_time + steps - 1 + t_idx`.
    pub fn validate_horizon(&self, first_time: i64, steps: u64, t_idx: TimeIndexOffset) -> ForcingResult<()> {
        if steps == 0 {
            return Ok(());
        }
        let first_row = t_idx.row_number(first_time);
        let last_row = t_idx.row_number(first_time + steps as i64 - 1);
        if first_row < 1 || last_row > self.rows() as i64 {
            return Err(ForcingError::HorizonOutOfRange {
                what: self.name.clone(),
                first_row,
                last_row,
                rows: self.rows(),
            });
        }
        Ok(())
    }
}
