//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`, which keeps `?` usable across crate boundaries.

use thiserror::Error;

/// The top-level error type for `ssm-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `ssm-core`.
pub type CoreResult<T> = Result<T, CoreError>;
