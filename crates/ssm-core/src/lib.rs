//! `ssm-core` — foundational types for the `ssm` size-spectrum framework.
//!
//! This crate is a dependency of every other `ssm-*` crate.  It has no
//! `ssm-*` dependencies and minimal external ones (`ndarray` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `SpeciesId`, `GearId`                                 |
//! | [`time`]        | `Step`, `ProjectionClock`, `ProjectionConfig`         |
//! | [`grid`]        | `SizeGrid` (consumer + resource size bins)            |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to config and grid types.   |

pub mod error;
pub mod grid;
pub mod ids;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use grid::SizeGrid;
pub use ids::{GearId, SpeciesId};
pub use time::{ProjectionClock, ProjectionConfig, Step};
