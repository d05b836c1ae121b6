use ssm_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForcingError {
    #[error("{what}: expected {expected} columns, got {got}")]
    Shape {
        what:     String,
        expected: usize,
        got:      usize,
    },

    #[error("{what}: table is empty")]
    Empty { what: String },

    #[error("{what}: invalid value {value} at row {row}, column {col}")]
    InvalidValue {
        what:  String,
        row:   usize,
        col:   usize,
        value: f64,
    },

    #[error("{what}: horizon needs rows {first_row}..={last_row} but the table has rows 1..={rows}")]
    HorizonOutOfRange {
        what:      String,
        first_row: i64,
        last_row:  i64,
        rows:      usize,
    },

    #[error("{what}: time {time} maps to row {row}, outside 1..={rows}")]
    RowOutOfRange {
        what: String,
        time: i64,
        row:  i64,
        rows: usize,
    },

    #[error("unknown gear {0:?}")]
    UnknownGear(String),

    #[error("forcing parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type ForcingResult<T> = Result<T, ForcingError>;
