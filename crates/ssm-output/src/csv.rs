//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `biomass.csv`
//! - `spectra.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{BiomassRow, OutputResult, SpectrumRow};

/// Writes projection output to two CSV files.
pub struct CsvWriter {
    biomass:  Writer<File>,
    spectra:  Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut biomass = Writer::from_path(dir.join("biomass.csv"))?;
        biomass.write_record(["step", "time", "species", "biomass", "numbers", "catch_rate"])?;

        let mut spectra = Writer::from_path(dir.join("spectra.csv"))?;
        spectra.write_record(["step", "time", "species", "bin", "w", "density"])?;

        Ok(Self { biomass, spectra, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_biomass(&mut self, rows: &[BiomassRow]) -> OutputResult<()> {
        for row in rows {
            self.biomass.write_record(&[
                row.step.to_string(),
                row.time.to_string(),
                row.species.clone(),
                row.biomass.to_string(),
                row.numbers.to_string(),
                row.catch_rate.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_spectra(&mut self, rows: &[SpectrumRow]) -> OutputResult<()> {
        for row in rows {
            self.spectra.write_record(&[
                row.step.to_string(),
                row.time.to_string(),
                row.species.clone(),
                row.bin.to_string(),
                row.w.to_string(),
                row.density.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.biomass.flush()?;
        self.spectra.flush()?;
        Ok(())
    }
}
