//! Projection time model.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Step` counter.  The
//! mapping to the model's own time label (e.g. a calendar year) is held in
//! `ProjectionClock`:
//!
//!   time = first_time + step
//!
//! Each step integrates `dt` model-time units and consumes exactly one row of
//! every forcing table, so forcing is piecewise constant per step.  Using an
//! integer step as the canonical index keeps forcing lookups exact.

use std::fmt;

// ── Step ──────────────────────────────────────────────────────────────────────

/// An absolute projection step counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step(pub u64);

impl Step {
    pub const ZERO: Step = Step(0);

    /// Return the step `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Step {
        Step(self.0 + n)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::ops::Add<u64> for Step {
    type Output = Step;
    #[inline]
    fn add(self, rhs: u64) -> Step {
        Step(self.0 + rhs)
    }
}

impl std::ops::Sub for Step {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Step) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

// ── ProjectionClock ───────────────────────────────────────────────────────────

/// Converts between step counts and model time labels.
///
/// The time label is a step index offset by `first_time`: it moves by one
/// per step whatever `dt` is, and one step reads one forcing row.  It is not
/// `first_time + elapsed()`; with yearly forcing rows the two agree only
/// when `dt == 1.0`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectionClock {
    /// Time label of step 0 (e.g. 1350, or 1 for a unitless axis).
    pub first_time: i64,
    /// Length of one step in model time units (years).
    pub dt: f64,
    /// The current step, advanced by `ProjectionClock::advance()`.
    pub current_step: Step,
}

impl ProjectionClock {
    pub fn new(first_time: i64, dt: f64) -> Self {
        Self {
            first_time,
            dt,
            current_step: Step::ZERO,
        }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.current_step = Step(self.current_step.0 + 1);
    }

    /// Time label of `step`: `first_time + step`.
    #[inline]
    pub fn time_of(&self, step: Step) -> i64 {
        self.first_time + step.0 as i64
    }

    /// Time label of the current step.
    #[inline]
    pub fn current_time(&self) -> i64 {
        self.time_of(self.current_step)
    }

    /// Elapsed model time since step 0.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.current_step.0 as f64 * self.dt
    }
}

impl fmt::Display for ProjectionClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (t={})", self.current_step, self.current_time())
    }
}

// ── ProjectionConfig ──────────────────────────────────────────────────────────

/// Top-level projection configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectionConfig {
    /// Time label of step 0.  Forcing rows are located from this label via a
    /// time-index offset.
    pub first_time: i64,

    /// Total steps to simulate.  The last state produced is at
    /// `step == total_steps`.
    pub total_steps: u64,

    /// Step length in model time units, used by the rate integration only.
    /// Each step still reads exactly one forcing row, so yearly tables need
    /// `dt = 1.0` for the time labels to be calendar years.  Default: 1.0.
    pub dt: f64,

    /// Report a snapshot every N steps.  0 disables snapshots.
    pub output_interval_steps: u64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            first_time:            1,
            total_steps:           100,
            dt:                    1.0,
            output_interval_steps: 1,
        }
    }
}

impl ProjectionConfig {
    /// The step at which the projection ends (exclusive upper bound for the
    /// steps that consume forcing).
    #[inline]
    pub fn end_step(&self) -> Step {
        Step(self.total_steps)
    }

    /// Time label of the last step that consumes forcing.
    #[inline]
    pub fn last_forced_time(&self) -> i64 {
        self.first_time + self.total_steps as i64 - 1
    }

    /// Construct a `ProjectionClock` pre-configured for this run.
    pub fn make_clock(&self) -> ProjectionClock {
        ProjectionClock::new(self.first_time, self.dt)
    }

    /// `true` when `step` is a snapshot step.
    #[inline]
    pub fn is_snapshot(&self, step: Step) -> bool {
        self.output_interval_steps > 0 && step.0.is_multiple_of(self.output_interval_steps)
    }
}
