use std::io::{Read, Write};
use std::path::Path;

use installment_core::{RateTable, RateTableError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading or writing markup tables.
#[derive(Debug, Error)]
pub enum RateTableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write rate table: {0}")]
    Write(#[source] std::io::Error),

    #[error("invalid rate table: {0}")]
    Table(#[from] RateTableError),
}

impl From<csv::Error> for RateTableLoaderError {
    fn from(err: csv::Error) -> Self {
        RateTableLoaderError::CsvParse(err.to_string())
    }
}

/// Like the `From` conversion, but I/O failures become [`RateTableLoaderError::Write`].
fn write_error(err: csv::Error) -> RateTableLoaderError {
    if !err.is_io_error() {
        return err.into();
    }
    match err.into_kind() {
        csv::ErrorKind::Io(source) => RateTableLoaderError::Write(source),
        other => RateTableLoaderError::CsvParse(format!("{other:?}")),
    }
}

/// A single row of a markup-table CSV file.
///
/// - `month`: term length in months (1 to 15)
/// - `rate_pct`: markup percentage for that term (e.g. `55` for 55%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRecord {
    pub month: u32,
    pub rate_pct: Decimal,
}

/// Reads and writes markup tables as CSV.
///
/// The file carries a `month,rate_pct` header (column order does not matter)
/// and exactly one row per month.
pub struct RateTableLoader;

impl RateTableLoader {
    /// Parse rate records from a CSV reader, in file order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<RateRecord>, RateTableLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: RateRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Build a complete table from parsed records.
    ///
    /// Fails if a month is missing, repeated, out of range, or carries a
    /// negative rate.
    pub fn build(records: &[RateRecord]) -> Result<RateTable, RateTableLoaderError> {
        let table = RateTable::from_entries(records.iter().map(|r| (r.month, r.rate_pct)))?;
        Ok(table)
    }

    /// Parse and build in one step.
    pub fn load<R: Read>(reader: R) -> Result<RateTable, RateTableLoaderError> {
        let records = Self::parse(reader)?;
        Self::build(&records)
    }

    /// Read a table from a file on disk.
    pub fn load_from_file(path: &Path) -> Result<RateTable, RateTableLoaderError> {
        let file = std::fs::File::open(path).map_err(|source| RateTableLoaderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let table = Self::load(file)?;
        tracing::debug!(path = %path.display(), "loaded rate table");
        Ok(table)
    }

    /// Write `table` in the same format [`parse`](Self::parse) reads.
    pub fn write<W: Write>(
        table: &RateTable,
        writer: W,
    ) -> Result<(), RateTableLoaderError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for (month, rate_pct) in table.iter() {
            csv_writer
                .serialize(RateRecord { month, rate_pct })
                .map_err(write_error)?;
        }
        csv_writer.flush().map_err(RateTableLoaderError::Write)?;
        Ok(())
    }
}
