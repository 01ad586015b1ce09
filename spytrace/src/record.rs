use core::str::FromStr;

use crate::error::{ConfigError, RecordError};

/// Whitespace token index holding the millisecond timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimestampColumn(pub usize);

impl FromStr for TimestampColumn {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse()
            .map(Self)
            .map_err(|_| ConfigError::InvalidColumn(s.to_owned()))
    }
}

impl std::fmt::Display for TimestampColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRecord {
    pub timestamp_ms: i64,
}

impl EventRecord {
    /// Reads the timestamp token of one log line. The remaining tokens are ignored.
    pub fn parse(line: &str, column: TimestampColumn) -> Result<Self, RecordError> {
        let TimestampColumn(column) = column;
        let token = line
            .split_whitespace()
            .nth(column)
            .ok_or(RecordError::MissingTimestamp { column })?;
        let timestamp_ms = token.parse().map_err(|_| RecordError::InvalidTimestamp {
            token: token.to_owned(),
        })?;
        Ok(Self { timestamp_ms })
    }

    /// Like [`EventRecord::parse`], for a raw line that may not be UTF-8.
    pub fn parse_bytes(line: &[u8], column: TimestampColumn) -> Result<Self, RecordError> {
        let line = core::str::from_utf8(line).map_err(|_| RecordError::InvalidUtf8)?;
        Self::parse(line, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use equator::assert;

    #[test]
    fn first_token_is_the_default_timestamp() {
        let record = EventRecord::parse("1024 0x7f12 invalid", TimestampColumn::default());
        assert!(record == Ok(EventRecord { timestamp_ms: 1024 }));
    }

    #[test]
    fn other_columns_can_carry_the_timestamp() {
        let record = EventRecord::parse("  rank3\t17  x ", TimestampColumn(1));
        assert!(record == Ok(EventRecord { timestamp_ms: 17 }));
    }

    #[test]
    fn blank_line_has_no_timestamp() {
        let record = EventRecord::parse("   ", TimestampColumn(0));
        assert!(record == Err(RecordError::MissingTimestamp { column: 0 }));
        let record = EventRecord::parse("12", TimestampColumn(2));
        assert!(record == Err(RecordError::MissingTimestamp { column: 2 }));
    }

    #[test]
    fn non_integer_timestamps_are_rejected() {
        for token in ["12.5", "0x10", "ms", "1e3"] {
            let record = EventRecord::parse(token, TimestampColumn(0));
            assert!(
                record
                    == Err(RecordError::InvalidTimestamp {
                        token: token.to_owned()
                    })
            );
        }
    }

    #[test]
    fn raw_lines_must_be_utf8() {
        let record = EventRecord::parse_bytes(b"42 \xff\r", TimestampColumn(0));
        assert!(record == Err(RecordError::InvalidUtf8));
        let record = EventRecord::parse_bytes(b"42 ok\r", TimestampColumn(0));
        assert!(record == Ok(EventRecord { timestamp_ms: 42 }));
    }

    #[test]
    fn column_parses_from_cli_text() {
        assert!(" 3 ".parse::<TimestampColumn>().ok() == Some(TimestampColumn(3)));
        assert!("-1".parse::<TimestampColumn>().is_err());
    }
}
