use ssm_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpeciesError {
    #[error("species configuration error: {0}")]
    Config(String),

    #[error("species {species:?}: thermal range is degenerate (temp_min {temp_min} >= temp_max {temp_max})")]
    DegenerateThermalRange {
        species:  String,
        temp_min: f64,
        temp_max: f64,
    },

    #[error("species {species:?}: encounter scale {scale} is not positive on [{temp_min}, {temp_max}]")]
    NonPositiveEncounterScale {
        species:  String,
        scale:    f64,
        temp_min: f64,
        temp_max: f64,
    },

    #[error("species {species:?}: no size bin lies below selectivity size {size}")]
    EmptySelectivityRange {
        species: String,
        size:    f64,
    },

    #[error("{what}: expected {expected}, got {got}")]
    DimensionMismatch {
        what:     &'static str,
        expected: usize,
        got:      usize,
    },

    #[error("species parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SpeciesResult<T> = Result<T, SpeciesError>;
