//! `ModelConfiguration` — one validated, immutable scenario.

use std::sync::Arc;

use ndarray::{Array1, Array2};

use ssm_core::ProjectionConfig;
use ssm_forcing::{EffortSchedule, ForcingSeries, TimeIndexOffset};
use ssm_rates::{Community, RateSet};

/// A shared [`Community`] plus the per-scenario overlay: rate bindings,
/// forcing attachments, effort, time offset, initial state and horizon.
///
/// Produced by [`ProjectionBuilder`][crate::ProjectionBuilder]; every field
/// has been checked against every other.  Cloning is cheap apart from the
/// initial state arrays.
#[derive(Clone, Debug)]
pub struct ModelConfiguration {
    pub label:       String,
    pub community:   Arc<Community>,
    pub rates:       RateSet,
    pub temperature: Option<Arc<ForcingSeries>>,
    pub effort:      Option<Arc<EffortSchedule>>,
    /// Per species: effort-schedule column of its gear.  Empty without effort.
    pub gear_columns: Vec<usize>,
    pub t_idx:       TimeIndexOffset,
    pub projection:  ProjectionConfig,
    pub initial_abundance: Array2<f64>,
    pub initial_resource:  Array1<f64>,
}
