//! Calendar-day partition used to coalesce notifications

use chrono::{DateTime, FixedOffset, NaiveTime, Offset, TimeZone, Utc};

/// Calendar day boundaries in the server timezone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBucket {
    offset: FixedOffset,
}

impl DayBucket {
    /// Bucket days in UTC
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    /// Bucket days at a fixed offset from UTC; out-of-range offsets fall back to UTC
    pub fn with_offset_minutes(minutes: i32) -> Self {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map_or_else(Self::utc, |offset| Self { offset })
    }

    /// The offset used for day boundaries
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Midnight of the day containing `now`
    pub fn start_of_day(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let local_midnight = now
            .with_timezone(&self.offset)
            .date_naive()
            .and_time(NaiveTime::MIN);

        self.offset
            .from_local_datetime(&local_midnight)
            .earliest()
            .map_or(now, |start| start.with_timezone(&Utc))
    }

    /// Whether `created_at` falls in the same day as `now` (or later)
    pub fn is_current(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        created_at >= self.start_of_day(now)
    }
}

impl Default for DayBucket {
    fn default() -> Self {
        Self::utc()
    }
}
