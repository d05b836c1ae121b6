//! Projection observer trait for progress reporting and data collection.

use ssm_core::Step;

use crate::{SimulationState, StepRates, Trajectory};

/// Callbacks invoked by [`Projection::run`][crate::Projection::run] at key
/// points in the step loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl ProjectionObserver for ProgressPrinter {
///     fn on_step_end(&mut self, step: Step, state: &SimulationState, _rates: &StepRates) {
///         if step.0 % self.interval == 0 {
///             println!("{step}: total abundance {}", state.abundance.sum());
///         }
///     }
/// }
/// ```
pub trait ProjectionObserver {
    /// Called before any processing of `step`, whose time label is `time`.
    fn on_step_start(&mut self, _step: Step, _time: i64) {}

    /// Called after `step` completed.  `state` is already the state at
    /// `step + 1`; `rates` are the rates that produced it.
    fn on_step_end(&mut self, _step: Step, _state: &SimulationState, _rates: &StepRates) {}

    /// Called for the initial state and after every step whose resulting
    /// step number is a multiple of `output_interval_steps`.
    fn on_snapshot(&mut self, _state: &SimulationState) {}

    /// Called once after the final step completes.
    fn on_projection_end(&mut self, _final_state: &SimulationState) {}
}

/// A [`ProjectionObserver`] that does nothing.
pub struct NoopObserver;

impl ProjectionObserver for NoopObserver {}

/// Collects every snapshot into a [`Trajectory`].
#[derive(Debug, Default)]
pub struct Recorder {
    trajectory: Trajectory,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn into_trajectory(self) -> Trajectory {
        self.trajectory
    }
}

impl ProjectionObserver for Recorder {
    fn on_snapshot(&mut self, state: &SimulationState) {
        self.trajectory.push(state);
    }
}
