use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing time interval in ms")]
    MissingInterval,
    #[error("time interval `{0}` is not an integer number of ms")]
    NonNumericInterval(String),
    #[error("time interval must be positive, got {0}")]
    NonPositiveInterval(i128),
    #[error("timestamp column `{0}` is not a token index")]
    InvalidColumn(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("no timestamp token at column {column}")]
    MissingTimestamp { column: usize },
    #[error("timestamp token `{token}` is not an integer")]
    InvalidTimestamp { token: String },
    #[error("line is not valid UTF-8")]
    InvalidUtf8,
}

#[derive(Debug, Error)]
pub enum TraceError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("malformed record on line {line}: {source}")]
    MalformedRecord {
        line: usize,
        #[source]
        source: RecordError,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T, E = TraceError> = core::result::Result<T, E>;
