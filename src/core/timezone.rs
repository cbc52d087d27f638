use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

/// America/Lima has no daylight saving time, so a fixed UTC-5 offset is exact.
const LIMA_OFFSET_SECS: i32 = -5 * 3600;

/// Business-calendar helpers. Timestamps are stored as UTC; batch ids and exchange
/// rate lookups use the Lima calendar day.
pub struct LimaClock;

impl LimaClock {
    pub fn offset() -> FixedOffset {
        FixedOffset::east_opt(LIMA_OFFSET_SECS).expect("Valid offset")
    }

    /// Convert a UTC timestamp to Lima local time
    pub fn to_lima(utc_time: DateTime<Utc>) -> DateTime<FixedOffset> {
        utc_time.with_timezone(&Self::offset())
    }

    /// Lima calendar date for a UTC timestamp
    pub fn business_date(utc_time: DateTime<Utc>) -> NaiveDate {
        Self::to_lima(utc_time).date_naive()
    }

    /// Today's Lima calendar date
    pub fn today() -> NaiveDate {
        Self::business_date(Utc::now())
    }
}
