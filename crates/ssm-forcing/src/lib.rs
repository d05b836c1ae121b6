//! `ssm-forcing` — environmental forcing tables and their time indexing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`offset`]  | `TimeIndexOffset` (`t_idx`) and its derivation rule          |
//! | [`series`]  | `ForcingSeries` (time × column), spin-up, plankton transform |
//! | [`effort`]  | `EffortSchedule` (step × gear)                               |
//! | [`loader`]  | `load_series_reader`, `load_effort_reader`                   |
//! | [`error`]   | `ForcingError`, `ForcingResult<T>`                           |
//!
//! # Indexing model (summary)
//!
//! Forcing rows are addressed by a 1-based *row number*:
//!
//! ```text
//! row_number = time + t_idx          (1 ..= rows)
//! t_idx      = -(origin - 1)         (origin = the series' own first time)
//! ```
//!
//! so the series' first time always lands on row 1, whether its axis starts
//! at 0, 1, or a calendar year.  There is no interpolation: each step reads
//! exactly one row.

pub mod effort;
pub mod error;
pub mod loader;
pub mod offset;
pub mod series;


pub use effort::EffortSchedule;
pub use error::{ForcingError, ForcingResult};
pub use loader::{TimedSeries, load_effort_reader, load_series_csv, load_series_reader};
pub use offset::TimeIndexOffset;
pub use series::ForcingSeries;
