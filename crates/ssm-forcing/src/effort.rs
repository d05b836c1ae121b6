//! `EffortSchedule` — fishing effort per step and gear.

use ndarray::{Array2, ArrayView1};

use ssm_core::{GearId, Step};

use crate::{ForcingError, ForcingResult};

/// Non-negative `(step × gear)` effort table.  Row `k` is the effort applied
/// during step `k`.
#[derive(Clone, Debug, PartialEq)]
pub struct EffortSchedule {
    gears:  Vec<String>,
    effort: Array2<f64>,
}

impl EffortSchedule {
    pub fn new(gears: Vec<String>, effort: Array2<f64>) -> ForcingResult<Self> {
        if effort.ncols() != gears.len() {
            return Err(ForcingError::Shape {
                what:     "effort schedule".to_string(),
                expected: gears.len(),
                got:      effort.ncols(),
            });
        }
        if gears.is_empty() || effort.nrows() == 0 {
            return Err(ForcingError::Empty { what: "effort schedule".to_string() });
        }
        for (i, g) in gears.iter().enumerate() {
            if gears[..i].contains(g) {
                return Err(ForcingError::Parse(format!("duplicate gear {g:?} in effort schedule")));
            }
        }
        if let Some(((row, col), &value)) =
            effort.indexed_iter().find(|(_, v)| !(**v >= 0.0 && v.is_finite()))
        {
            return Err(ForcingError::InvalidValue {
                what: "effort schedule".to_string(),
                row,
                col,
                value,
            });
        }
        Ok(Self { gears, effort })
    }

    /// The same effort for every gear at every step.
    pub fn constant(gears: &[&str], steps: usize, value: f64) -> ForcingResult<Self> {
        Self::new(
            gears.iter().map(|g| g.to_string()).collect(),
            Array2::from_elem((steps, gears.len()), value),
        )
    }

    /// No fishing.
    pub fn zero(gears: &[&str], steps: usize) -> ForcingResult<Self> {
        Self::constant(gears, steps, 0.0)
    }

    pub fn gears(&self) -> &[String] {
        &self.gears
    }

    pub fn gear_id(&self, name: &str) -> Option<GearId> {
        self.gears.iter().position(|g| g == name).map(|i| GearId(i as u16))
    }

    #[inline]
    pub fn steps(&self) -> usize {
        self.effort.nrows()
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.effort
    }

    /// Effort of every gear during `step`.
    pub fn effort_at(&self, step: Step) -> ForcingResult<ArrayView1<'_, f64>> {
        if step.index() >= self.steps() {
            return Err(ForcingError::RowOutOfRange {
                what: "effort schedule".to_string(),
                time: step.0 as i64,
                row:  step.0 as i64 + 1,
                rows: self.steps(),
            });
        }
        Ok(self.effort.row(step.index()))
    }

    /// Check the schedule covers `steps` steps.
    pub fn validate_horizon(&self, steps: u64) -> ForcingResult<()> {
        if steps as usize > self.steps() {
            return Err(ForcingError::HorizonOutOfRange {
                what:      "effort schedule".to_string(),
                first_row: 1,
                last_row:  steps as i64,
                rows:      self.steps(),
            });
        }
        Ok(())
    }

    /// `true` if no gear fishes during the first `steps` steps.
    pub fn is_zero(&self, steps: usize) -> bool {
        self.effort.rows().into_iter().take(steps).all(|r| r.iter().all(|&e| e == 0.0))
    }
}
