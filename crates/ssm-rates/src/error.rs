use ssm_core::CoreError;
use ssm_forcing::ForcingError;
use ssm_species::SpeciesError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RateError {
    #[error("rate configuration error: {0}")]
    Config(String),

    #[error("{what}: expected shape {expected:?}, got {got:?}")]
    Shape {
        what:     &'static str,
        expected: (usize, usize),
        got:      (usize, usize),
    },

    #[error("{strategy} needs {forcing} forcing but none is attached")]
    MissingForcing {
        strategy: &'static str,
        forcing:  &'static str,
    },

    #[error(transparent)]
    Forcing(#[from] ForcingError),

    #[error(transparent)]
    Species(#[from] SpeciesError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type RateResult<T> = Result<T, RateError>;
