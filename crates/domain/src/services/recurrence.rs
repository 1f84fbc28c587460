//! Recurring schedule conversion and dated booking generation.
//!
//! Weekly slots are picked in the teacher's own time zone and stored in
//! UTC. Conversion is anchored on a fixed reference week so the same wall
//! clock slot in the same zone always maps to the same UTC slot, and
//! day-of-week shifts across midnight fall out of real date arithmetic
//! instead of offset math.

use crate::models::schedule::{UtcSlot, WeeklySlot};
use chrono::{Datelike, Days, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use shared::validation::parse_wall_clock;
use thiserror::Error;

/// Errors from slot conversion.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecurrenceError {
    #[error("Invalid wall clock time: {0}")]
    InvalidTime(String),

    #[error("Day of week out of range: {0}")]
    InvalidDayOfWeek(i16),
}

/// Sunday of the fixed reference week conversions are anchored on.
fn reference_sunday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 7).expect("reference week date is valid")
}

/// Converts a teacher-local weekly slot to its UTC equivalent.
///
/// The slot is realized on the reference week in the given zone, converted
/// to UTC, and read back as (day of week, HH:MM). The end instant is the
/// start instant plus the local duration, so ranges that wrap past local
/// midnight keep their length.
pub fn convert_slot_to_utc(slot: &WeeklySlot, tz: Tz) -> Result<UtcSlot, RecurrenceError> {
    if !(0..=6).contains(&slot.day_of_week) {
        return Err(RecurrenceError::InvalidDayOfWeek(slot.day_of_week));
    }
    let (start_hour, start_min) = parse_wall_clock(&slot.start_time)
        .ok_or_else(|| RecurrenceError::InvalidTime(slot.start_time.clone()))?;
    let (end_hour, end_min) = parse_wall_clock(&slot.end_time)
        .ok_or_else(|| RecurrenceError::InvalidTime(slot.end_time.clone()))?;

    let local_date = reference_sunday() + Days::new(slot.day_of_week as u64);
    let start_time = NaiveTime::from_hms_opt(start_hour, start_min, 0)
        .ok_or_else(|| RecurrenceError::InvalidTime(slot.start_time.clone()))?;
    let local_start = NaiveDateTime::new(local_date, start_time);

    let zoned_start = resolve_local(tz, local_start);
    let utc_start = zoned_start.with_timezone(&Utc);

    // Local duration; a range ending past midnight wraps to the next day.
    let mut duration_min =
        (end_hour as i64 * 60 + end_min as i64) - (start_hour as i64 * 60 + start_min as i64);
    if duration_min <= 0 {
        duration_min += 24 * 60;
    }
    let utc_end = utc_start + Duration::minutes(duration_min);

    Ok(UtcSlot {
        day_of_week: utc_start.weekday().num_days_from_sunday() as i16,
        start_time: utc_start.format("%H:%M").to_string(),
        end_time: utc_end.format("%H:%M").to_string(),
    })
}

/// Resolves a naive local timestamp in a zone. DST gaps on the reference
/// week are skipped forward an hour; ambiguous times take the earlier
/// offset, keeping the mapping deterministic.
fn resolve_local(tz: Tz, naive: NaiveDateTime) -> chrono::DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => match tz.from_local_datetime(&(naive + Duration::hours(1))) {
            LocalResult::Single(dt) => dt,
            LocalResult::Ambiguous(earliest, _) => earliest,
            LocalResult::None => tz.from_utc_datetime(&naive),
        },
    }
}

/// Every UTC calendar date between `max(today, period_start)` and
/// `period_end` inclusive that falls on the given UTC day of week.
pub fn booking_dates(
    period_start: NaiveDate,
    period_end: NaiveDate,
    today: NaiveDate,
    day_of_week: i16,
) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut day = today.max(period_start);
    while day <= period_end {
        if day.weekday().num_days_from_sunday() as i16 == day_of_week {
            dates.push(day);
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    dates
}

/// Booking date label, `YYYY-MM-DD`.
pub fn format_day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
