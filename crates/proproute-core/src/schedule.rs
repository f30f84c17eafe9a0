//! Clock arithmetic for itinerary display.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeDelta, TimeZone};

use crate::CoreError;

/// Parses a local `HH:MM` start time.
///
/// # Errors
///
/// Returns [`CoreError::InvalidStartTime`] when the input is not a valid
/// 24-hour clock time.
pub fn parse_start_time(raw: &str) -> Result<NaiveTime, CoreError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|_| CoreError::InvalidStartTime(raw.to_string()))
}

#[must_use]
pub fn format_clock(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Computes the displayed arrival time for each step.
///
/// Step 1 shows the start time as-is. Step N shows step N-1's time plus
/// step N's travel minutes, wrapping past midnight.
#[must_use]
pub fn arrival_times(start: NaiveTime, leg_minutes: &[u32]) -> Vec<NaiveTime> {
    let mut times = Vec::with_capacity(leg_minutes.len());
    let mut current = start;
    for (idx, minutes) in leg_minutes.iter().enumerate() {
        if idx > 0 {
            current += TimeDelta::minutes(i64::from(*minutes));
        }
        times.push(current);
    }
    times
}

/// Epoch seconds for `start` on `date` in a fixed UTC offset.
#[must_use]
pub fn start_epoch_seconds(date: NaiveDate, start: NaiveTime, utc_offset_minutes: i32) -> i64 {
    let naive = date.and_time(start);
    FixedOffset::east_opt(utc_offset_minutes * 60)
        .and_then(|offset| offset.from_local_datetime(&naive).single())
        .map_or_else(|| naive.and_utc().timestamp(), |dt| dt.timestamp())
}

/// Local clock time of an epoch-seconds instant in a fixed UTC offset.
///
/// # Errors
///
/// Returns [`CoreError::InvalidStartTime`] when the instant or the offset is
/// out of range.
pub fn local_time_from_epoch(
    epoch_seconds: i64,
    utc_offset_minutes: i32,
) -> Result<NaiveTime, CoreError> {
    let offset = FixedOffset::east_opt(utc_offset_minutes * 60);
    DateTime::from_timestamp(epoch_seconds, 0)
        .zip(offset)
        .map(|(instant, offset)| instant.with_timezone(&offset).time())
        .ok_or_else(|| CoreError::InvalidStartTime(epoch_seconds.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn parse_start_time_accepts_clock_strings() {
        assert_eq!(parse_start_time("09:00").unwrap(), hm(9, 0));
        assert_eq!(parse_start_time(" 17:45 ").unwrap(), hm(17, 45));
    }

    #[test]
    fn parse_start_time_rejects_garbage() {
        for raw in ["", "9", "25:00", "09:61", "nine"] {
            assert!(
                matches!(parse_start_time(raw), Err(CoreError::InvalidStartTime(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn arrival_times_accumulate_leg_minutes() {
        let times: Vec<String> = arrival_times(hm(9, 0), &[0, 25, 40])
            .into_iter()
            .map(format_clock)
            .collect();
        assert_eq!(times, vec!["09:00", "09:25", "10:05"]);
    }

    #[test]
    fn first_step_ignores_its_own_minutes() {
        let times = arrival_times(hm(8, 30), &[45, 10]);
        assert_eq!(times, vec![hm(8, 30), hm(8, 40)]);
    }

    #[test]
    fn arrival_times_wrap_past_midnight() {
        let times: Vec<String> = arrival_times(hm(23, 50), &[0, 20, 45])
            .into_iter()
            .map(format_clock)
            .collect();
        assert_eq!(times, vec!["23:50", "00:10", "00:55"]);
    }

    #[test]
    fn arrival_times_empty_input() {
        assert!(arrival_times(hm(9, 0), &[]).is_empty());
    }

    #[test]
    fn start_epoch_seconds_applies_offset() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        // 09:00 at UTC+07:00 is 02:00 UTC.
        assert_eq!(start_epoch_seconds(date, hm(9, 0), 420), 1_672_538_400);
        assert_eq!(start_epoch_seconds(date, hm(2, 0), 0), 1_672_538_400);
    }

    #[test]
    fn local_time_from_epoch_applies_offset() {
        // 2023-01-01 06:30 UTC.
        assert_eq!(local_time_from_epoch(1_672_554_600, 420).unwrap(), hm(13, 30));
        assert_eq!(local_time_from_epoch(1_672_554_600, 0).unwrap(), hm(6, 30));
    }

    #[test]
    fn local_time_from_epoch_round_trips_start_epoch_seconds() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let epoch = start_epoch_seconds(date, hm(17, 45), 420);
        assert_eq!(local_time_from_epoch(epoch, 420).unwrap(), hm(17, 45));
    }

    #[test]
    fn local_time_from_epoch_rejects_out_of_range_instants() {
        assert!(matches!(
            local_time_from_epoch(i64::MAX, 420),
            Err(CoreError::InvalidStartTime(_))
        ));
    }
}
