use ssm_core::{CoreError, Step};
use ssm_forcing::ForcingError;
use ssm_rates::RateError;
use ssm_species::SpeciesError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("projection configuration error: {0}")]
    Config(String),

    #[error("{what}: expected shape {expected:?}, got {got:?}")]
    DimensionMismatch {
        what:     &'static str,
        expected: (usize, usize),
        got:      (usize, usize),
    },

    #[error("{strategy} needs {forcing} forcing but none is attached")]
    MissingForcing {
        strategy: &'static str,
        forcing:  &'static str,
    },

    #[error("species {species:?} fishes with gear {gear:?}, which the effort schedule does not have")]
    UnknownGear { species: String, gear: String },

    #[error("numerical failure at {step} (time {time}): {what} bin {bin} became {value}")]
    Numerical {
        step:  Step,
        time:  i64,
        /// Species name, `"<species> net energy"`, or `"resource"`.
        what:  String,
        bin:   usize,
        value: f64,
    },

    #[error(transparent)]
    Rate(#[from] RateError),

    #[error(transparent)]
    Forcing(#[from] ForcingError),

    #[error(transparent)]
    Species(#[from] SpeciesError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl SimError {
    /// `true` for errors detected while assembling a configuration, including
    /// forcing-table index errors; `false` for numerical failures.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, SimError::Numerical { .. })
    }
}

pub type SimResult<T> = Result<T, SimError>;
