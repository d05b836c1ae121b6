//! `ssm-output` — projection output writers for the ssm framework.
//!
//! Three backends are provided behind Cargo features:
//!
//! | Feature   | Backend     | Files created                          |
//! |-----------|-------------|----------------------------------------|
//! | *(none)*  | CSV         | `biomass.csv`, `spectra.csv`           |
//! | `sqlite`  | SQLite      | `output.db`                            |
//! | `parquet` | Parquet     | `biomass.parquet`, `spectra.parquet`   |
//!
//! All backends implement [`OutputWriter`] and are driven by
//! [`ProjectionOutputObserver`], which implements
//! `ssm_sim::ProjectionObserver`: one biomass row per species after every
//! step, and the full size spectra (species plus resource) at every
//! snapshot.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ssm_output::{CsvWriter, ProjectionOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output")).unwrap();
//! let mut obs = ProjectionOutputObserver::new(writer, config.community.clone());
//! projection.run(&mut obs).unwrap();
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::{ProjectionOutputObserver, RESOURCE_LABEL};
pub use row::{BiomassRow, SpectrumRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

#[cfg(feature = "parquet")]
pub use parquet::ParquetWriter;
