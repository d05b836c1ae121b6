//! `ssm-rates` — rate strategies for the size-spectrum projection engine.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                      |
//! |---------------|---------------------------------------------------------------|
//! | [`community`] | `Community` — species + interactions + grid + physiology      |
//! | [`context`]   | `RateContext<'a>`, `StepForcing` — read-only step snapshot    |
//! | [`strategy`]  | `EncounterRate`, `GrowthEnergy`, `ResourceDynamics` traits    |
//! | [`kernels`]   | default encounter, feeding level, predation, net energy       |
//! | [`thermal`]   | `ThermalEncounter`, `ThermalGrowthEnergy`                     |
//! | [`resource`]  | `SemichemostatResource`, `ForcedResource`, `ResourceParams`   |
//! | [`rates`]     | `RateSet` — one binding per capability slot                   |
//! | [`sweep`]     | shape-checked per-species row broadcasts                      |
//! | [`error`]     | `RateError`, `RateResult<T>`                                  |
//!
//! # Design notes
//!
//! Each step the engine:
//!
//! 1. resolves a [`StepForcing`] (temperature row + tolerance mask), then
//! 2. calls the bound strategies through a shared `&RateContext`, in the
//!    order encounter → feeding level → net energy → predation → resource.
//!
//! Strategies never mutate projection state, so they only need to be
//! `Send + Sync` to be shared by concurrent runs.

pub mod community;
pub mod context;
pub mod error;
pub mod kernels;
pub mod rates;
pub mod resource;
pub mod strategy;
pub mod sweep;
pub mod thermal;


pub use community::Community;
pub use context::{RateContext, StepForcing};
pub use error::{RateError, RateResult};
pub use rates::RateSet;
pub use resource::{ForcedResource, ResourceParams, SemichemostatResource};
pub use strategy::{DefaultEncounter, DefaultGrowthEnergy, EncounterRate, GrowthEnergy, ResourceDynamics};
pub use thermal::{ThermalEncounter, ThermalGrowthEnergy};
