//! `ssm-species` — static species definitions for the `ssm` framework.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                    |
//! |-----------------|-------------------------------------------------------------|
//! | [`params`]      | `SpeciesParams`, `Selectivity`                              |
//! | [`thermal`]     | Arrhenius form, thermal-performance cubic, `ThermalResponse` |
//! | [`selectivity`] | `knife_edge`, `knife_edge_phased`                           |
//! | [`interaction`] | `InteractionMatrix` (predator × prey)                       |
//! | [`set`]         | `SpeciesSet` (validated params + precomputed thermal bounds) |
//! | [`builder`]     | `SpeciesSetBuilder` (fluent construction)                   |
//! | [`loader`]      | `load_species_reader`, `load_interaction_reader`            |
//! | [`error`]       | `SpeciesError`, `SpeciesResult<T>`                          |
//!
//! Everything here is built once per species set and is immutable afterwards;
//! scenario runs share it behind an `Arc`.

pub mod builder;
pub mod error;
pub mod interaction;
pub mod loader;
pub mod params;
pub mod selectivity;
pub mod set;
pub mod thermal;


pub use builder::SpeciesSetBuilder;
pub use error::{SpeciesError, SpeciesResult};
pub use interaction::InteractionMatrix;
pub use loader::{load_interaction_csv, load_interaction_reader, load_species_csv, load_species_reader};
pub use params::{Selectivity, SpeciesParams};
pub use selectivity::{knife_edge, knife_edge_phased};
pub use set::SpeciesSet;
pub use thermal::{ThermalConstants, ThermalResponse, arrhenius, thermal_performance};
