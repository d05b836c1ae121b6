//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `biomass` and `spectra`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{BiomassRow, OutputResult, SpectrumRow};

/// Writes projection output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS biomass (
                 step       INTEGER NOT NULL,
                 time       INTEGER NOT NULL,
                 species    TEXT    NOT NULL,
                 biomass    REAL    NOT NULL,
                 numbers    REAL    NOT NULL,
                 catch_rate REAL    NOT NULL,
                 PRIMARY KEY (step, species)
             );
             CREATE TABLE IF NOT EXISTS spectra (
                 step    INTEGER NOT NULL,
                 time    INTEGER NOT NULL,
                 species TEXT    NOT NULL,
                 bin     INTEGER NOT NULL,
                 w       REAL    NOT NULL,
                 density REAL    NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_biomass(&mut self, rows: &[BiomassRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO biomass (step, time, species, biomass, numbers, catch_rate) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.step as i64,
                    row.time,
                    row.species,
                    row.biomass,
                    row.numbers,
                    row.catch_rate,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_spectra(&mut self, rows: &[SpectrumRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO spectra (step, time, species, bin, w, density) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.step as i64,
                    row.time,
                    row.species,
                    row.bin,
                    row.w,
                    row.density,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
