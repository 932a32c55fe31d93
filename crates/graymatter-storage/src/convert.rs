//! Conversions between the `chrono` types `sqlx` decodes and the `jiff`
//! types of the domain model.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::error::StorageError;

pub fn timestamp(value: DateTime<Utc>) -> Result<jiff::Timestamp, StorageError> {
    let nanos = value
        .timestamp_nanos_opt()
        .ok_or_else(|| StorageError::OutOfRange(value.to_rfc3339()))?;
    jiff::Timestamp::from_nanosecond(i128::from(nanos))
        .map_err(|e| StorageError::OutOfRange(e.to_string()))
}

pub fn chrono_timestamp(value: jiff::Timestamp) -> Result<DateTime<Utc>, StorageError> {
    let nanos = i64::try_from(value.as_nanosecond())
        .map_err(|_| StorageError::OutOfRange(value.to_string()))?;
    Ok(DateTime::from_timestamp_nanos(nanos))
}

pub fn date(value: NaiveDate) -> Result<jiff::civil::Date, StorageError> {
    let year = i16::try_from(value.year()).map_err(|_| StorageError::OutOfRange(value.to_string()))?;
    // chrono months and days always fit in i8.
    jiff::civil::Date::new(year, value.month() as i8, value.day() as i8)
        .map_err(|e| StorageError::OutOfRange(e.to_string()))
}

pub fn naive_date(value: jiff::civil::Date) -> Result<NaiveDate, StorageError> {
    NaiveDate::from_ymd_opt(
        i32::from(value.year()),
        value.month() as u32,
        value.day() as u32,
    )
    .ok_or_else(|| StorageError::OutOfRange(value.to_string()))
}
