//! Queryable timestamp value type.
//!
//! Stores a timestamp twice: as an RFC 3339 date-time and as redundant epoch
//! seconds, so stored documents can be range-filtered on a plain integer
//! field while staying human-readable. The two representations must agree;
//! construction and deserialization both reject disagreeing pairs.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AggregateStoreError, AggregateStoreResult};

/// An immutable timestamp carrying its epoch-seconds value alongside the
/// date-time.
///
/// Ordering and equality follow the epoch seconds; sub-second precision on
/// the date-time is preserved but ignored by comparisons.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "QueryableDateTimeParts", into = "QueryableDateTimeParts")]
pub struct QueryableDateTime {
    date_time: DateTime<Utc>,
    epoch_second: i64,
}

/// Raw serialized shape, validated on the way back in.
#[derive(Serialize, Deserialize)]
struct QueryableDateTimeParts {
    date_time: DateTime<Utc>,
    epoch_second: i64,
}

impl QueryableDateTime {
    /// Builds a timestamp from both representations.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when `epoch_second` disagrees with
    /// `date_time.timestamp()`.
    pub fn from_parts(
        date_time: DateTime<Utc>,
        epoch_second: i64,
    ) -> AggregateStoreResult<Self> {
        if epoch_second != date_time.timestamp() {
            return Err(AggregateStoreError::InvalidArgument(format!(
                "incompatible epoch {epoch_second} with date-time {date_time}"
            )));
        }

        Ok(Self { date_time, epoch_second })
    }

    /// Builds a timestamp from a date-time, deriving the epoch seconds.
    pub fn new(date_time: DateTime<Utc>) -> Self {
        Self { date_time, epoch_second: date_time.timestamp() }
    }

    /// Builds a timestamp from epoch seconds.
    pub fn from_epoch_second(epoch_second: i64) -> AggregateStoreResult<Self> {
        let date_time = Utc
            .timestamp_opt(epoch_second, 0)
            .single()
            .ok_or_else(|| {
                AggregateStoreError::InvalidArgument(format!(
                    "epoch second {epoch_second} is out of range"
                ))
            })?;

        Ok(Self { date_time, epoch_second })
    }

    /// The current time.
    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    /// The date-time representation.
    pub fn date_time(&self) -> DateTime<Utc> {
        self.date_time
    }

    /// The redundant epoch-seconds representation.
    pub fn epoch_second(&self) -> i64 {
        self.epoch_second
    }
}

impl TryFrom<QueryableDateTimeParts> for QueryableDateTime {
    type Error = AggregateStoreError;

    fn try_from(parts: QueryableDateTimeParts) -> Result<Self, Self::Error> {
        Self::from_parts(parts.date_time, parts.epoch_second)
    }
}

impl From<QueryableDateTime> for QueryableDateTimeParts {
    fn from(value: QueryableDateTime) -> Self {
        Self {
            date_time: value.date_time,
            epoch_second: value.epoch_second,
        }
    }
}

impl PartialEq for QueryableDateTime {
    fn eq(&self, other: &Self) -> bool {
        self.epoch_second == other.epoch_second
    }
}

impl Eq for QueryableDateTime {}

impl PartialOrd for QueryableDateTime {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueryableDateTime {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.epoch_second.cmp(&other.epoch_second)
    }
}
