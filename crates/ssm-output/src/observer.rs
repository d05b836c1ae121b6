//! `ProjectionOutputObserver<W>` — bridges `ProjectionObserver` to an `OutputWriter`.

use std::sync::Arc;

use ssm_core::Step;
use ssm_rates::Community;
use ssm_sim::{ProjectionObserver, SimulationState, StepRates};

use crate::row::{BiomassRow, SpectrumRow};
use crate::writer::OutputWriter;
use crate::OutputError;

/// Label of the background resource in spectrum rows.
pub const RESOURCE_LABEL: &str = "resource";

/// A [`ProjectionObserver`] that writes per-step species totals and
/// snapshot spectra to any [`OutputWriter`] backend (CSV, SQLite, Parquet, …).
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  After `projection.run()` returns, check for errors
/// with [`take_error`][Self::take_error].
pub struct ProjectionOutputObserver<W: OutputWriter> {
    writer:     W,
    community:  Arc<Community>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> ProjectionOutputObserver<W> {
    /// Create an observer backed by `writer`; `community` supplies species
    /// names and the size grid used to integrate the spectra.
    pub fn new(writer: W, community: Arc<Community>) -> Self {
        Self { writer, community, last_error: None }
    }

    /// Take the stored write error (if any) after the projection returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                log::warn!("output write failed: {e}");
                self.last_error = Some(e);
            }
        }
    }

    fn biomass_rows(&self, state: &SimulationState, rates: &StepRates) -> Vec<BiomassRow> {
        let biomass = state.biomass(&self.community);
        let numbers = state.numbers(&self.community);

        self.community
            .species()
            .names()
            .enumerate()
            .map(|(i, name)| BiomassRow {
                step:       state.step.0,
                time:       state.time,
                species:    name.to_string(),
                biomass:    biomass[i],
                numbers:    numbers[i],
                catch_rate: rates.catch[i],
            })
            .collect()
    }

    fn spectrum_rows(&self, state: &SimulationState) -> Vec<SpectrumRow> {
        let grid = self.community.grid();
        let mut rows = Vec::with_capacity(state.abundance.len() + state.resource.len());

        for (name, density) in self.community.species().names().zip(state.abundance.rows()) {
            rows.extend(density.iter().zip(&grid.w).enumerate().map(|(bin, (&n, &w))| SpectrumRow {
                step:    state.step.0,
                time:    state.time,
                species: name.to_string(),
                bin:     bin as u32,
                w,
                density: n,
            }));
        }
        rows.extend(state.resource.iter().zip(&grid.w_full).enumerate().map(|(bin, (&r, &w))| {
            SpectrumRow {
                step:    state.step.0,
                time:    state.time,
                species: RESOURCE_LABEL.to_string(),
                bin:     bin as u32,
                w,
                density: r,
            }
        }));
        rows
    }
}

impl<W: OutputWriter> ProjectionObserver for ProjectionOutputObserver<W> {
    fn on_step_end(&mut self, _step: Step, state: &SimulationState, rates: &StepRates) {
        let rows = self.biomass_rows(state, rates);
        let result = self.writer.write_biomass(&rows);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, state: &SimulationState) {
        let rows = self.spectrum_rows(state);
        if !rows.is_empty() {
            let result = self.writer.write_spectra(&rows);
            self.store_err(result);
        }
    }

    fn on_projection_end(&mut self, _final_state: &SimulationState) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
