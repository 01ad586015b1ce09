use std::io::{BufRead, Write};

use crate::{
    bucket::{EventBucketizer, IntervalMs},
    error::{Result, TraceError},
    record::{EventRecord, TimestampColumn},
    trace_csv::TraceCsvWriter,
};

#[derive(Debug, Clone, Copy)]
pub struct TraceSettings {
    pub interval: IntervalMs,
    pub column: TimestampColumn,
}

impl TraceSettings {
    pub fn new(interval: IntervalMs) -> Self {
        Self {
            interval,
            column: TimestampColumn::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub events: u64,
    pub buckets: u64,
    pub regressions: u64,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "events.{}.buckets.{}.regressions.{}",
            self.events, self.buckets, self.regressions
        )
    }
}

/// Reads one event per line from `input` and writes the bucketed counts to `output`.
///
/// The first malformed line aborts the run. Buckets already closed by then have
/// been written to `output`.
pub fn run<R: BufRead, W: Write>(
    settings: TraceSettings,
    input: R,
    output: W,
) -> Result<RunSummary> {
    let TraceSettings { interval, column } = settings;
    let mut bucketizer = EventBucketizer::new(interval);
    let mut csv = TraceCsvWriter::new(output)?;
    let mut events = 0;
    for (i, line) in input.split(b'\n').enumerate() {
        let line = line?;
        let record = EventRecord::parse_bytes(&line, column)
            .map_err(|source| TraceError::MalformedRecord { line: i + 1, source })?;
        events += 1;
        let regressions = bucketizer.regressions();
        if let Some(bucket) = bucketizer.push(record.timestamp_ms) {
            tracing::trace!(start_ms = bucket.start_ms, events = bucket.event_count, "bucket");
            csv.write_bucket(&bucket)?;
        }
        if regressions == 0 && bucketizer.regressions() == 1 {
            tracing::warn!(
                line = i + 1,
                timestamp_ms = record.timestamp_ms,
                "timestamps are not monotonic; counting late events in the current bucket"
            );
        }
    }
    if let Some(bucket) = bucketizer.finish() {
        tracing::trace!(start_ms = bucket.start_ms, events = bucket.event_count, "bucket");
        csv.write_bucket(&bucket)?;
    }
    csv.flush()?;
    Ok(RunSummary {
        events,
        buckets: csv.rows(),
        regressions: bucketizer.regressions(),
    })
}
