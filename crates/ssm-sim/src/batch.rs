//! Independent execution of many scenario configurations.
//!
//! Configurations share only immutable data (`Arc<Community>`, forcing
//! tables), so each run gets its own [`Projection`] and nothing is locked.
//! With the `parallel` feature runs are dispatched on Rayon's thread pool;
//! results always come back in input order.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{ModelConfiguration, Projection, Recorder, SimResult, Trajectory};

/// Outcome of one batch member.
#[derive(Debug)]
pub struct BatchRun {
    pub label:  String,
    pub result: SimResult<Trajectory>,
}

fn run_one(config: &ModelConfiguration) -> BatchRun {
    let label = config.label.clone();
    let mut recorder = Recorder::new();
    let result = Projection::new(config.clone())
        .run(&mut recorder)
        .map(|()| recorder.into_trajectory());
    if let Err(e) = &result {
        log::error!("{label:?}: {e}");
    }
    BatchRun { label, result }
}

/// Run every configuration to completion, recording snapshots.
///
/// A failing run does not stop the others.
pub fn run_batch(configs: &[ModelConfiguration]) -> Vec<BatchRun> {
    log::info!("batch: {} runs", configs.len());

    #[cfg(feature = "parallel")]
    let runs: Vec<BatchRun> = configs.par_iter().map(run_one).collect();

    #[cfg(not(feature = "parallel"))]
    let runs: Vec<BatchRun> = configs.iter().map(run_one).collect();

    let failed = runs.iter().filter(|r| r.result.is_err()).count();
    log::info!("batch: {} succeeded, {failed} failed", runs.len() - failed);
    runs
}
