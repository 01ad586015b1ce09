pub mod bucket;
pub mod error;
pub mod record;
pub mod sweep;
pub mod trace;
pub mod trace_csv;

pub use bucket::{Bucket, EventBucketizer, IntervalMs};
pub use error::{ConfigError, RecordError, TraceError};
pub use record::{EventRecord, TimestampColumn};
pub use trace::{run, RunSummary, TraceSettings};
