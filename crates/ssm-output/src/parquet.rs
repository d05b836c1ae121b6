//! Parquet output backend (feature `parquet`).
//!
//! Creates two files in the configured output directory:
//! - `biomass.parquet`
//! - `spectra.parquet`

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Float64Builder, Int64Builder, StringBuilder, UInt32Builder, UInt64Builder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::OutputWriter;
use crate::{BiomassRow, OutputResult, SpectrumRow};

fn biomass_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("step",       DataType::UInt64,  false),
        Field::new("time",       DataType::Int64,   false),
        Field::new("species",    DataType::Utf8,    false),
        Field::new("biomass",    DataType::Float64, false),
        Field::new("numbers",    DataType::Float64, false),
        Field::new("catch_rate", DataType::Float64, false),
    ]))
}

fn spectrum_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("step",    DataType::UInt64,  false),
        Field::new("time",    DataType::Int64,   false),
        Field::new("species", DataType::Utf8,    false),
        Field::new("bin",     DataType::UInt32,  false),
        Field::new("w",       DataType::Float64, false),
        Field::new("density", DataType::Float64, false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// Writes projection output to two Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footer; files
/// written without calling `finish()` cannot be opened by Parquet readers.
pub struct ParquetWriter {
    biomass:        Option<ArrowWriter<File>>,
    spectra:        Option<ArrowWriter<File>>,
    biomass_schema: Arc<Schema>,
    spectra_schema: Arc<Schema>,
}

impl ParquetWriter {
    /// Create both Parquet files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let biomass_schema = biomass_schema();
        let spectra_schema = spectrum_schema();

        let biomass = ArrowWriter::try_new(
            File::create(dir.join("biomass.parquet"))?,
            Arc::clone(&biomass_schema),
            Some(snappy_props()),
        )?;
        let spectra = ArrowWriter::try_new(
            File::create(dir.join("spectra.parquet"))?,
            Arc::clone(&spectra_schema),
            Some(snappy_props()),
        )?;

        Ok(Self {
            biomass: Some(biomass),
            spectra: Some(spectra),
            biomass_schema,
            spectra_schema,
        })
    }
}

impl OutputWriter for ParquetWriter {
    fn write_biomass(&mut self, rows: &[BiomassRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.biomass.as_mut() else {
            return Ok(());
        };

        let mut steps   = UInt64Builder::new();
        let mut times   = Int64Builder::new();
        let mut species = StringBuilder::new();
        let mut biomass = Float64Builder::new();
        let mut numbers = Float64Builder::new();
        let mut catches = Float64Builder::new();

        for row in rows {
            steps.append_value(row.step);
            times.append_value(row.time);
            species.append_value(&row.species);
            biomass.append_value(row.biomass);
            numbers.append_value(row.numbers);
            catches.append_value(row.catch_rate);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.biomass_schema),
            vec![
                Arc::new(steps.finish()),
                Arc::new(times.finish()),
                Arc::new(species.finish()),
                Arc::new(biomass.finish()),
                Arc::new(numbers.finish()),
                Arc::new(catches.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_spectra(&mut self, rows: &[SpectrumRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.spectra.as_mut() else {
            return Ok(());
        };

        let mut steps     = UInt64Builder::new();
        let mut times     = Int64Builder::new();
        let mut species   = StringBuilder::new();
        let mut bins      = UInt32Builder::new();
        let mut sizes     = Float64Builder::new();
        let mut densities = Float64Builder::new();

        for row in rows {
            steps.append_value(row.step);
            times.append_value(row.time);
            species.append_value(&row.species);
            bins.append_value(row.bin);
            sizes.append_value(row.w);
            densities.append_value(row.density);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.spectra_schema),
            vec![
                Arc::new(steps.finish()),
                Arc::new(times.finish()),
                Arc::new(species.finish()),
                Arc::new(bins.finish()),
                Arc::new(sizes.finish()),
                Arc::new(densities.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if let Some(w) = self.biomass.take() {
            w.close()?;
        }
        if let Some(w) = self.spectra.take() {
            w.close()?;
        }
        Ok(())
    }
}
