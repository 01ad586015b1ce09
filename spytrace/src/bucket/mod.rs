use core::str::FromStr;

use crate::error::ConfigError;


/// Width of a bucket, in milliseconds. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalMs(i64);

impl IntervalMs {
    pub fn new(interval_ms: i64) -> Result<Self, ConfigError> {
        if interval_ms > 0 {
            Ok(Self(interval_ms))
        } else {
            Err(ConfigError::NonPositiveInterval(interval_ms.into()))
        }
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl FromStr for IntervalMs {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ConfigError::MissingInterval);
        }
        let interval: i128 = s
            .parse()
            .map_err(|_| ConfigError::NonNumericInterval(s.to_owned()))?;
        if interval <= 0 {
            return Err(ConfigError::NonPositiveInterval(interval));
        }
        let interval = i64::try_from(interval)
            .map_err(|_| ConfigError::NonNumericInterval(s.to_owned()))?;
        Self::new(interval)
    }
}

impl std::fmt::Display for IntervalMs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub start_ms: i64,
    pub event_count: u64,
}

impl Bucket {
    fn open(start_ms: i64) -> Self {
        Self {
            start_ms,
            event_count: 1,
        }
    }

    fn contains(&self, timestamp_ms: i64, interval: IntervalMs) -> bool {
        timestamp_ms.saturating_sub(self.start_ms) < interval.get()
    }
}

/// Groups a stream of timestamps into fixed-width buckets.
///
/// A bucket starts at the timestamp of the event that opened it and holds every
/// following event less than `interval` after that start. Each event is counted
/// in exactly one bucket, provided [`EventBucketizer::finish`] is called once the
/// input is exhausted.
#[derive(Debug)]
pub struct EventBucketizer {
    interval: IntervalMs,
    current: Option<Bucket>,
    regressions: u64,
}

impl EventBucketizer {
    pub fn new(interval: IntervalMs) -> Self {
        Self {
            interval,
            current: None,
            regressions: 0,
        }
    }

    pub fn interval(&self) -> IntervalMs {
        self.interval
    }

    /// Number of timestamps seen so far that were earlier than their bucket start.
    pub fn regressions(&self) -> u64 {
        self.regressions
    }

    /// Counts one event, returning the bucket it closed, if any.
    pub fn push(&mut self, timestamp_ms: i64) -> Option<Bucket> {
        let Self {
            interval,
            current,
            regressions,
        } = self;
        if let Some(bucket) = current {
            if bucket.contains(timestamp_ms, *interval) {
                if timestamp_ms < bucket.start_ms {
                    *regressions += 1;
                }
                bucket.event_count += 1;
                return None;
            }
        }
        current.replace(Bucket::open(timestamp_ms))
    }

    /// Closes the trailing bucket, leaving the bucketizer empty.
    pub fn finish(&mut self) -> Option<Bucket> {
        self.current.take()
    }

    /// Buckets a whole sequence, trailing bucket included.
    pub fn bucketize(
        interval: IntervalMs,
        timestamps: impl IntoIterator<Item = i64>,
    ) -> Vec<Bucket> {
        let mut bucketizer = Self::new(interval);
        let mut buckets: Vec<Bucket> = timestamps
            .into_iter()
            .filter_map(|t| bucketizer.push(t))
            .collect();
        buckets.extend(bucketizer.finish());
        buckets
    }
}
