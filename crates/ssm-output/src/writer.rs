//! The `OutputWriter` trait implemented by all backend writers.

use crate::{BiomassRow, OutputResult, SpectrumRow};

/// Trait implemented by CSV, SQLite, and Parquet writers.
///
/// The observer treats every method as infallible: errors are
/// stored internally and retrieved with
/// [`ProjectionOutputObserver::take_error`][crate::ProjectionOutputObserver::take_error].
pub trait OutputWriter {
    /// Write the per-species totals of one step.
    fn write_biomass(&mut self, rows: &[BiomassRow]) -> OutputResult<()>;

    /// Write a batch of snapshot spectrum rows.
    fn write_spectra(&mut self, rows: &[SpectrumRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
