//! CSV forcing-table loader.
//!
//! # CSV format
//!
//! First column is the integer time label; the remaining columns are the
//! table columns (species names for temperature, size bins for plankton,
//! gear names for effort).  Time labels must be consecutive.
//!
//! ```csv
//! time,skipjack,bigeye
//! 1350,27.1,18.4
//! 1351,27.3,18.2
//! ```

use std::io::Read;
use std::path::Path;

use ndarray::Array2;

use crate::{EffortSchedule, ForcingError, ForcingResult, ForcingSeries, TimeIndexOffset};

/// A forcing table together with its own time axis.
#[derive(Clone, Debug)]
pub struct TimedSeries {
    pub times:   Vec<i64>,
    pub columns: Vec<String>,
    pub series:  ForcingSeries,
}

impl TimedSeries {
    /// First time label of the table.
    pub fn origin(&self) -> i64 {
        self.times[0]
    }

    /// `t_idx` that maps the table's own first time to row 1.
    pub fn offset(&self) -> TimeIndexOffset {
        TimeIndexOffset::from_origin(self.origin())
    }
}

struct RawTable {
    times:   Vec<i64>,
    columns: Vec<String>,
    values:  Array2<f64>,
}

fn read_table<R: Read>(what: &str, reader: R) -> ForcingResult<RawTable> {
    let parse_err = |e: csv::Error| ForcingError::Parse(format!("{what}: {e}"));

    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers().map_err(parse_err)?.clone();
    if headers.len() < 2 {
        return Err(ForcingError::Parse(format!("{what}: need a time column and at least one value column")));
    }
    let columns: Vec<String> = headers.iter().skip(1).map(|h| h.trim().to_string()).collect();

    let mut times = Vec::new();
    let mut flat = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(parse_err)?;
        if record.len() != headers.len() {
            return Err(ForcingError::Shape {
                what:     format!("{what} row {}", times.len() + 1),
                expected: columns.len(),
                got:      record.len().saturating_sub(1),
            });
        }
        let time = record[0]
            .trim()
            .parse::<f64>()
            .map_err(|e| ForcingError::Parse(format!("{what}: time {:?}: {e}", &record[0])))?;
        if time.fract() != 0.0 {
            return Err(ForcingError::Parse(format!("{what}: time {time} is not an integer")));
        }
        let time = time as i64;
        if let Some(&prev) = times.last() {
            if time != prev + 1 {
                return Err(ForcingError::Parse(format!(
                    "{what}: time labels must be consecutive, {prev} followed by {time}"
                )));
            }
        }
        times.push(time);
        for field in record.iter().skip(1) {
            flat.push(
                field
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| ForcingError::Parse(format!("{what}: value {field:?}: {e}")))?,
            );
        }
    }
    if times.is_empty() {
        return Err(ForcingError::Empty { what: what.to_string() });
    }

    let values = Array2::from_shape_vec((times.len(), columns.len()), flat)
        .map_err(|e| ForcingError::Parse(format!("{what}: {e}")))?;
    Ok(RawTable { times, columns, values })
}

/// Load a forcing table from a CSV file.
pub fn load_series_csv(name: &str, path: &Path) -> ForcingResult<TimedSeries> {
    let file = std::fs::File::open(path)?;
    load_series_reader(name, file)
}

/// Like [`load_series_csv`] but accepts any `Read` source.
pub fn load_series_reader<R: Read>(name: &str, reader: R) -> ForcingResult<TimedSeries> {
    let raw = read_table(name, reader)?;
    log::debug!(
        "loaded forcing {name:?}: {} rows x {} columns, times {}..={}",
        raw.times.len(),
        raw.columns.len(),
        raw.times[0],
        raw.times[raw.times.len() - 1],
    );
    Ok(TimedSeries {
        series:  ForcingSeries::new(name, raw.values)?,
        times:   raw.times,
        columns: raw.columns,
    })
}

/// Load an effort schedule (`time,<gear>,<gear>,…`).  Row order defines the
/// step order; the time labels are only checked for consecutiveness.
pub fn load_effort_reader<R: Read>(reader: R) -> ForcingResult<EffortSchedule> {
    let raw = read_table("effort schedule", reader)?;
    EffortSchedule::new(raw.columns, raw.values)
}
