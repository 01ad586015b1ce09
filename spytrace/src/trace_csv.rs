use std::io::Write;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::{bucket::Bucket, error::Result};

pub const HEADER: [&str; 2] = ["Time,", "Events"];

/// Space-delimited two-column CSV: `"<start_ms>," "<count>"` per bucket.
///
/// The trailing comma on the first column is part of the format; downstream
/// plotting scripts split on it.
pub struct TraceCsvWriter<W: Write> {
    writer: csv::Writer<W>,
    rows: u64,
}

impl<W: Write> TraceCsvWriter<W> {
    /// Wraps `sink` and writes the header row.
    pub fn new(sink: W) -> Result<Self> {
        let mut writer = WriterBuilder::new()
            .delimiter(b' ')
            .quote(b'|')
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::CRLF)
            .from_writer(sink);
        writer.write_record(HEADER)?;
        Ok(Self { writer, rows: 0 })
    }

    pub fn write_bucket(&mut self, bucket: &Bucket) -> Result<()> {
        let Bucket {
            start_ms,
            event_count,
        } = bucket;
        self.writer
            .write_record([format!("{start_ms},"), event_count.to_string()])?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn flush(&mut self) -> Result<()> {
        Ok(self.writer.flush()?)
    }

    /// Flushes and hands back the underlying sink.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|err| err.into_error().into())
    }
}
