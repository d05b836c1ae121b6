//! `ssm-sim` — forced projection engine for the ssm framework.
//!
//! # Step loop
//!
//! ```text
//! for step in 0..config.total_steps:            (time = first_time + step)
//!   ① Forcing   — temperature row at time + t_idx → StepForcing (temps + mask);
//!                 effort row at step → fishing mortality at size.
//!   ② Rates     — encounter → feeding level → net energy → reproduction /
//!                 growth / starvation split → predation → next resource.
//!   ③ Advance   — recruitment (Beverton–Holt) into the w_min bin, then the
//!                 implicit upwind sweep over size for every species.
//!   ④ Check     — NaN / infinite / negative density → SimError::Numerical.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs [`batch::run_batch`] on Rayon's thread pool.      |
//! | `serde`    | Serde derives on the config types of the lower crates. |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ssm_sim::{NoopObserver, Projection, ProjectionBuilder};
//!
//! let config = ProjectionBuilder::new(community, ProjectionConfig::default())
//!     .initial_abundance(n0)
//!     .build()?;
//! Projection::new(config).run(&mut NoopObserver)?;
//! ```

pub mod batch;
pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod projection;
pub mod state;
pub mod trajectory;

#[cfg(test)]
mod tests;

pub use batch::{BatchRun, run_batch};
pub use builder::ProjectionBuilder;
pub use config::ModelConfiguration;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, ProjectionObserver, Recorder};
pub use projection::{Projection, STARVATION_XI};
pub use state::{SimulationState, StepRates};
pub use trajectory::Trajectory;
