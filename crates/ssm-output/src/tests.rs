//! Integration tests for ssm-output.

#[cfg(test)]
fn biomass_row(step: u64, species: &str) -> crate::BiomassRow {
    crate::BiomassRow {
        step,
        time:       1_950 + step as i64,
        species:    species.to_string(),
        biomass:    12.5,
        numbers:    3.0,
        catch_rate: 0.25,
    }
}

#[cfg(test)]
fn spectrum_row(step: u64, species: &str, bin: u32) -> crate::SpectrumRow {
    crate::SpectrumRow {
        step,
        time:    1_950 + step as i64,
        species: species.to_string(),
        bin,
        w:       10f64.powi(bin as i32),
        density: 1e-3,
    }
}

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use super::{biomass_row, spectrum_row};
    use crate::csv::CsvWriter;
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("biomass.csv").exists());
        assert!(dir.path().join("spectra.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("biomass.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["step", "time", "species", "biomass", "numbers", "catch_rate"]);

        let mut rdr2 = csv::Reader::from_path(dir.path().join("spectra.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2, ["step", "time", "species", "bin", "w", "density"]);
    }

    #[test]
    fn csv_biomass_rows_written_in_order() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_biomass(&[biomass_row(1, "skipjack"), biomass_row(1, "bigeye")]).unwrap();
        w.write_biomass(&[biomass_row(2, "skipjack")]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("biomass.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "1");
        assert_eq!(&rows[0][1], "1951");
        assert_eq!(&rows[0][2], "skipjack");
        assert_eq!(&rows[1][2], "bigeye");
        assert_eq!(&rows[2][0], "2");
        assert_eq!(rows[2][3].parse::<f64>().unwrap(), 12.5);
        assert_eq!(rows[2][5].parse::<f64>().unwrap(), 0.25);
    }

    #[test]
    fn csv_spectrum_values_parse_back_exactly() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let mut row = spectrum_row(0, "resource", 3);
        row.density = 1.234_567_890_123e-17;
        w.write_spectra(&[row.clone()]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("spectra.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][3], "3");
        assert_eq!(rows[0][4].parse::<f64>().unwrap(), row.w);
        assert_eq!(rows[0][5].parse::<f64>().unwrap(), row.density);
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_empty_batches_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_biomass(&[]).unwrap();
        w.write_spectra(&[]).unwrap();
    }

    #[test]
    fn missing_directory_is_io_error() {
        let dir = tmp();
        let result = CsvWriter::new(&dir.path().join("does-not-exist"));
        assert!(result.is_err());
    }
}

// ── Observer tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use std::sync::Arc;

    use ndarray::Array2;
    use tempfile::TempDir;

    use ssm_core::{ProjectionConfig, SizeGrid, SpeciesId};
    use ssm_forcing::{EffortSchedule, ForcingSeries};
    use ssm_rates::Community;
    use ssm_sim::{Projection, ProjectionBuilder};
    use ssm_species::{SpeciesParams, SpeciesSetBuilder};

    use crate::csv::CsvWriter;
    use crate::observer::{ProjectionOutputObserver, RESOURCE_LABEL};
    use crate::row::{BiomassRow, SpectrumRow};
    use crate::writer::OutputWriter;
    use crate::{OutputError, OutputResult};

    const STEPS: u64 = 6;

    fn community() -> Arc<Community> {
        let (species, theta) = SpeciesSetBuilder::new()
            .species(SpeciesParams::new("small", 100.0, 10.0, 10.0, 30.0))
            .species(SpeciesParams::new("large", 10_000.0, 1_000.0, 5.0, 25.0))
            .build()
            .unwrap();
        let grid = SizeGrid::new(0.001, 10_000.0, 30, 1e-8).unwrap();
        Arc::new(Community::new(species, theta, grid).unwrap())
    }

    fn initial_abundance(c: &Community) -> Array2<f64> {
        Array2::from_shape_fn(c.shape(), |(i, j)| {
            let w = c.grid().w[j];
            if w <= c.species().get(SpeciesId(i as u16)).w_max { 1e10 * w.powf(-2.05) } else { 0.0 }
        })
    }

    fn projection(c: &Arc<Community>, effort: f64) -> Projection {
        let abundance = initial_abundance(c);
        let resource: Vec<f64> = c.grid().w_full.iter().map(|w| 1e11 * w.powf(-2.05)).collect();
        let plankton = ForcingSeries::constant("plankton", STEPS as usize, &resource).unwrap();
        let effort = EffortSchedule::constant(&["Longline"], STEPS as usize, effort).unwrap();

        let config = ProjectionBuilder::new(
            c.clone(),
            ProjectionConfig { first_time: 1, total_steps: STEPS, dt: 0.1, output_interval_steps: 2 },
        )
        .plankton_forcing(Arc::new(plankton))
        .effort(Arc::new(effort))
        .initial_abundance(abundance)
        .build()
        .unwrap();
        Projection::new(config)
    }

    /// Keeps rows in memory; optionally fails every spectrum batch.
    #[derive(Default)]
    struct MemoryWriter {
        biomass:      Vec<BiomassRow>,
        spectra:      Vec<SpectrumRow>,
        fail_spectra:  bool,
        finish_calls:  usize,
    }

    impl OutputWriter for MemoryWriter {
        fn write_biomass(&mut self, rows: &[BiomassRow]) -> OutputResult<()> {
            self.biomass.extend_from_slice(rows);
            Ok(())
        }

        fn write_spectra(&mut self, rows: &[SpectrumRow]) -> OutputResult<()> {
            if self.fail_spectra {
                return Err(OutputError::Io(std::io::Error::other("disk full")));
            }
            self.spectra.extend_from_slice(rows);
            Ok(())
        }

        fn finish(&mut self) -> OutputResult<()> {
            self.finish_calls += 1;
            Ok(())
        }
    }

    #[test]
    fn one_biomass_row_per_species_per_step() {
        let c = community();
        let mut p = projection(&c, 0.5);
        let mut obs = ProjectionOutputObserver::new(MemoryWriter::default(), c.clone());
        p.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());

        let w = obs.into_writer();
        assert_eq!(w.biomass.len(), STEPS as usize * 2);
        assert_eq!(w.finish_calls, 1);
        assert_eq!(w.biomass[0].step, 1);
        assert_eq!(w.biomass[0].time, 2);
        assert_eq!(w.biomass[0].species, "small");
        assert_eq!(w.biomass[1].species, "large");

        let biomass = p.state().biomass(&c);
        let numbers = p.state().numbers(&c);
        let last = &w.biomass[w.biomass.len() - 2..];
        for (i, row) in last.iter().enumerate() {
            assert_eq!(row.step, STEPS);
            assert_eq!(row.biomass, biomass[i]);
            assert_eq!(row.numbers, numbers[i]);
        }
    }

    #[test]
    fn catch_follows_effort() {
        let c = community();

        let mut fished = projection(&c, 0.5);
        let mut obs = ProjectionOutputObserver::new(MemoryWriter::default(), c.clone());
        fished.run(&mut obs).unwrap();
        let w = obs.into_writer();
        assert!(w.biomass.iter().all(|r| r.catch_rate >= 0.0));
        assert!(w.biomass.iter().all(|r| r.catch_rate > 0.0), "knife edge at w_mat lies inside both spectra");

        let mut unfished = projection(&c, 0.0);
        let mut obs = ProjectionOutputObserver::new(MemoryWriter::default(), c.clone());
        unfished.run(&mut obs).unwrap();
        assert!(obs.into_writer().biomass.iter().all(|r| r.catch_rate == 0.0));
    }

    #[test]
    fn first_catch_is_taken_from_initial_abundance() {
        let c = community();
        let mut p = projection(&c, 0.5);
        let mut obs = ProjectionOutputObserver::new(MemoryWriter::default(), c.clone());
        p.run_steps(1, &mut obs).unwrap();
        let w = obs.into_writer();

        let n0 = initial_abundance(&c);
        let weight = &c.grid().w * &c.grid().dw;
        for (i, row) in w.biomass.iter().enumerate() {
            let f = c.selectivity().row(i).mapv(|s| s * 0.5);
            let expected = (&f * &n0.row(i) * &weight).sum();
            assert!((row.catch_rate - expected).abs() <= 1e-12 * expected, "{}", row.species);
        }
    }

    #[test]
    fn spectra_written_at_snapshots_including_resource() {
        let c = community();
        let mut p = projection(&c, 0.5);
        let mut obs = ProjectionOutputObserver::new(MemoryWriter::default(), c.clone());
        p.run(&mut obs).unwrap();
        let w = obs.into_writer();

        let per_snapshot = 2 * c.grid().len() + c.grid().len_full();
        // Snapshots at steps 0, 2, 4, 6.
        assert_eq!(w.spectra.len(), 4 * per_snapshot);

        let steps: Vec<u64> = w.spectra.iter().step_by(per_snapshot).map(|r| r.step).collect();
        assert_eq!(steps, vec![0, 2, 4, 6]);

        let resource: Vec<&SpectrumRow> =
            w.spectra[..per_snapshot].iter().filter(|r| r.species == RESOURCE_LABEL).collect();
        assert_eq!(resource.len(), c.grid().len_full());
        assert_eq!(resource[0].w, c.grid().w_full[0]);
        assert_eq!(resource[0].bin, 0);
    }

    #[test]
    fn first_write_error_is_kept() {
        let c = community();
        let mut p = projection(&c, 0.5);
        let writer = MemoryWriter { fail_spectra: true, ..MemoryWriter::default() };
        let mut obs = ProjectionOutputObserver::new(writer, c.clone());
        p.run(&mut obs).unwrap();

        assert!(matches!(obs.take_error(), Some(OutputError::Io(_))));
        assert!(obs.take_error().is_none());
        let w = obs.into_writer();
        assert_eq!(w.biomass.len(), STEPS as usize * 2);
        assert!(w.spectra.is_empty());
    }

    #[test]
    fn integration_csv() {
        let c = community();
        let mut p = projection(&c, 0.5);
        let dir: TempDir = tempfile::tempdir().expect("create temp dir");
        let writer = CsvWriter::new(dir.path()).unwrap();
        let mut obs = ProjectionOutputObserver::new(writer, c.clone());
        p.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");

        let mut rdr = csv::Reader::from_path(dir.path().join("biomass.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), STEPS as usize * 2);

        let mut rdr = csv::Reader::from_path(dir.path().join("spectra.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 4 * (2 * c.grid().len() + c.grid().len_full()));
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use super::{biomass_row, spectrum_row};
    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("output.db").exists());
    }

    #[test]
    fn sqlite_biomass_count() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_biomass(&[biomass_row(1, "a"), biomass_row(1, "b"), biomass_row(2, "a")]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM biomass", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn sqlite_biomass_values() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_biomass(&[biomass_row(7, "skipjack")]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let (time, species, biomass, catch): (i64, String, f64, f64) = conn
            .query_row(
                "SELECT time, species, biomass, catch_rate FROM biomass WHERE step = 7",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
            )
            .unwrap();
        assert_eq!(time, 1_957);
        assert_eq!(species, "skipjack");
        assert_eq!(biomass, 12.5);
        assert_eq!(catch, 0.25);
    }

    #[test]
    fn sqlite_duplicate_species_step_rejected() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_biomass(&[biomass_row(1, "a")]).unwrap();
        assert!(w.write_biomass(&[biomass_row(1, "a")]).is_err());
    }

    #[test]
    fn sqlite_spectra_by_species() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        let rows: Vec<_> = (0..4)
            .map(|bin| spectrum_row(0, "a", bin))
            .chain((0..6).map(|bin| spectrum_row(0, "resource", bin)))
            .collect();
        w.write_spectra(&rows).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM spectra WHERE species = 'resource'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 6);
        let w3: f64 = conn
            .query_row("SELECT w FROM spectra WHERE species = 'a' AND bin = 3", [], |r| r.get(0))
            .unwrap();
        assert_eq!(w3, 1_000.0);
    }
}

// ── Parquet tests ─────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "parquet"))]
mod parquet_tests {
    use tempfile::TempDir;

    use arrow::datatypes::DataType;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    use super::{biomass_row, spectrum_row};
    use crate::parquet::ParquetWriter;
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn parquet_files_created() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        assert!(dir.path().join("biomass.parquet").exists());
        assert!(dir.path().join("spectra.parquet").exists());
    }

    #[test]
    fn parquet_biomass_round_trip() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.write_biomass(&[biomass_row(1, "a"), biomass_row(1, "b")]).unwrap();
        w.finish().unwrap();

        let file = std::fs::File::open(dir.path().join("biomass.parquet")).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        let schema = builder.schema().clone();
        let reader = builder.build().unwrap();

        let total_rows: usize = reader.map(|b| b.unwrap().num_rows()).sum();
        assert_eq!(total_rows, 2);

        let field_names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(field_names, ["step", "time", "species", "biomass", "numbers", "catch_rate"]);
    }

    #[test]
    fn parquet_spectrum_column_types() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.write_spectra(&[spectrum_row(0, "resource", 2)]).unwrap();
        w.finish().unwrap();

        let file = std::fs::File::open(dir.path().join("spectra.parquet")).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        let schema = builder.schema().clone();

        assert_eq!(*schema.field_with_name("species").unwrap().data_type(), DataType::Utf8);
        assert_eq!(*schema.field_with_name("bin").unwrap().data_type(), DataType::UInt32);
        assert_eq!(*schema.field_with_name("density").unwrap().data_type(), DataType::Float64);
    }

    #[test]
    fn parquet_finish_required() {
        // Dropping the writer without finish() leaves the footer unwritten.
        let dir = tmp();
        {
            let mut w = ParquetWriter::new(dir.path()).unwrap();
            w.write_biomass(&[biomass_row(1, "a")]).unwrap();
        }

        let file = std::fs::File::open(dir.path().join("biomass.parquet")).unwrap();
        let result = ParquetRecordBatchReaderBuilder::try_new(file);
        assert!(result.is_err(), "file without Parquet footer should fail to open");
    }
}
