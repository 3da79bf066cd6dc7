//! Row output.
//!
//! The artifact is a single comma-separated UTF-8 file with minimal quoting
//! and a fixed header row written before any data. Rows are append-only;
//! the schema is chosen once per run and never varies per row.

use std::io;

use crate::error::ScraperError;
use crate::types::{OutputRow, OutputSchema};

/// Destination for output rows.
pub trait RowSink {
    /// Writes the header row for `schema`. Called exactly once, before any
    /// [`RowSink::append`].
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying destination rejects the write.
    fn write_header(&mut self, schema: OutputSchema) -> Result<(), ScraperError>;

    /// Appends one data row.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying destination rejects the write.
    fn append(&mut self, row: &OutputRow) -> Result<(), ScraperError>;

    /// Flushes buffered rows to the destination.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying destination rejects the flush.
    fn flush(&mut self) -> Result<(), ScraperError>;
}

/// CSV sink over any writer.
pub struct CsvSink<W: io::Write> {
    writer: csv::Writer<W>,
}

impl<W: io::Write> CsvSink<W> {
    /// Wraps `inner` in a CSV writer with minimal quoting. `csv::Writer`
    /// buffers internally, so `inner` does not need its own buffering.
    pub fn from_writer(inner: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Necessary)
            .from_writer(inner);
        Self { writer }
    }

    /// Flushes and unwraps the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Io`] if the final flush fails.
    pub fn into_inner(self) -> Result<W, ScraperError> {
        self.writer
            .into_inner()
            .map_err(|e| ScraperError::Io(e.into_error()))
    }
}

impl<W: io::Write> RowSink for CsvSink<W> {
    fn write_header(&mut self, schema: OutputSchema) -> Result<(), ScraperError> {
        match schema {
            OutputSchema::Postcode => self.writer.write_record(["postcode"])?,
            OutputSchema::PostcodeGrid => {
                self.writer.write_record(["postcode", "easting", "northing"])?;
            }
        }
        Ok(())
    }

    fn append(&mut self, row: &OutputRow) -> Result<(), ScraperError> {
        match row.grid {
            Some(grid) => {
                let easting = grid.easting.to_string();
                let northing = grid.northing.to_string();
                self.writer.write_record([
                    row.postcode.as_str(),
                    easting.as_str(),
                    northing.as_str(),
                ])?;
            }
            None => self.writer.write_record([row.postcode.as_str()])?,
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ScraperError> {
        self.writer.flush()?;
        Ok(())
    }
}
