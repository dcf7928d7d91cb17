//! Weekly availability validation and normalization.
//!
//! The registration wizard collects one entry per weekday (an enabled flag
//! plus "HH:MM" start/end times). Before anything is sent to the backend the
//! week is run through [`normalize`], which filters to the enabled days,
//! converts clock times to minute-of-day offsets and enforces the minimum
//! interval length. The backend runs [`validate_normalized`] over the same
//! rules before storing, so client and server can never disagree on what a
//! valid week looks like.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of entries a submitted week must contain.
pub const DAYS_PER_WEEK: usize = 7;

/// Minimum length of an enabled interval, in minutes.
pub const MIN_SPAN_MINUTES: u16 = 60;

/// One weekday row of the availability form, as edited by the user.
///
/// `weekday` is 0 = Sunday through 6 = Saturday, index-aligned with its
/// position in the week array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayInterval {
    pub weekday: u8,
    pub enabled: bool,
    /// 24-hour clock time, "HH:MM"
    pub start_time: String,
    /// 24-hour clock time, "HH:MM"
    pub end_time: String,
}

/// An enabled weekday interval with clock times converted to minute offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedInterval {
    pub weekday: u8,
    pub start_time_in_minutes: u16,
    pub end_time_in_minutes: u16,
}

/// Why a submitted week was rejected.
///
/// The variants are mutually exclusive and checked in declaration order:
/// shape first, then non-empty selection, then minimum span.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AvailabilityError {
    #[error("Expected exactly 7 weekday entries, got {0}.")]
    Shape(usize),
    #[error("You must select at least one day of the week.")]
    EmptySelection,
    #[error("The time interval must be at least 1 hour.")]
    MinimumSpan,
}

/// Validates a full week of form entries and converts the enabled days to
/// minute offsets.
///
/// The result is all-or-nothing: a single day with a too-short interval
/// rejects the whole week rather than dropping the offending row.
pub fn normalize(
    intervals: &[WeekdayInterval],
) -> Result<Vec<NormalizedInterval>, AvailabilityError> {
    if intervals.len() != DAYS_PER_WEEK {
        return Err(AvailabilityError::Shape(intervals.len()));
    }

    let enabled: Vec<&WeekdayInterval> =
        intervals.iter().filter(|interval| interval.enabled).collect();

    if enabled.is_empty() {
        return Err(AvailabilityError::EmptySelection);
    }

    let converted: Vec<NormalizedInterval> = enabled
        .iter()
        .map(|interval| NormalizedInterval {
            weekday: interval.weekday,
            start_time_in_minutes: time_to_minutes(&interval.start_time),
            end_time_in_minutes: time_to_minutes(&interval.end_time),
        })
        .collect();

    if converted
        .iter()
        .any(|interval| !has_minimum_span(interval))
    {
        return Err(AvailabilityError::MinimumSpan);
    }

    Ok(converted)
}

/// Re-checks the invariants of an already-normalized interval list.
///
/// Used by the backend on submitted payloads: at least one interval, and
/// every interval spanning at least [`MIN_SPAN_MINUTES`].
pub fn validate_normalized(intervals: &[NormalizedInterval]) -> Result<(), AvailabilityError> {
    if intervals.is_empty() {
        return Err(AvailabilityError::EmptySelection);
    }
    if intervals.iter().any(|interval| !has_minimum_span(interval)) {
        return Err(AvailabilityError::MinimumSpan);
    }
    Ok(())
}

fn has_minimum_span(interval: &NormalizedInterval) -> bool {
    interval.end_time_in_minutes >= MIN_SPAN_MINUTES
        && interval.end_time_in_minutes - MIN_SPAN_MINUTES >= interval.start_time_in_minutes
}

/// Converts a 24-hour "HH:MM" clock time to minutes since midnight.
///
/// # Panics
///
/// Panics if `time` is not a well-formed "HH:MM" string. Values reach this
/// function from `<input type="time">` fields, which only produce valid
/// 24-hour times; anything else is a caller bug.
pub fn time_to_minutes(time: &str) -> u16 {
    let parsed = time.split_once(':').and_then(|(hours, minutes)| {
        Some((hours.parse::<u16>().ok()?, minutes.parse::<u16>().ok()?))
    });
    match parsed {
        Some((hours, minutes)) => hours * 60 + minutes,
        None => panic!("malformed clock time: {time:?}"),
    }
}

/// The week as the form first presents it: Monday through Friday enabled
/// from 08:00 to 18:00, weekend disabled.
pub fn default_week() -> Vec<WeekdayInterval> {
    (0..DAYS_PER_WEEK as u8)
        .map(|weekday| WeekdayInterval {
            weekday,
            enabled: (1..=5).contains(&weekday),
            start_time: "08:00".to_string(),
            end_time: "18:00".to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week_with(enabled_days: &[u8], start: &str, end: &str) -> Vec<WeekdayInterval> {
        (0..DAYS_PER_WEEK as u8)
            .map(|weekday| WeekdayInterval {
                weekday,
                enabled: enabled_days.contains(&weekday),
                start_time: start.to_string(),
                end_time: end.to_string(),
            })
            .collect()
    }

    #[test]
    fn rejects_short_weeks() {
        let mut week = default_week();
        week.pop();

        assert_eq!(normalize(&week), Err(AvailabilityError::Shape(6)));
    }

    #[test]
    fn rejects_long_weeks() {
        let mut week = default_week();
        week.push(week[0].clone());

        assert_eq!(normalize(&week), Err(AvailabilityError::Shape(8)));
    }

    #[test]
    fn rejects_empty_selection() {
        let week = week_with(&[], "08:00", "18:00");

        assert_eq!(normalize(&week), Err(AvailabilityError::EmptySelection));
    }

    #[test]
    fn converts_clock_times_exactly() {
        assert_eq!(time_to_minutes("08:00"), 480);
        assert_eq!(time_to_minutes("18:00"), 1080);
        assert_eq!(time_to_minutes("00:00"), 0);
        assert_eq!(time_to_minutes("23:59"), 1439);
    }

    #[test]
    #[should_panic(expected = "malformed clock time")]
    fn panics_on_malformed_clock_time() {
        time_to_minutes("8 o'clock");
    }

    #[test]
    fn conversion_survives_round_trip() {
        let normalized = normalize(&week_with(&[2, 4], "09:15", "17:45")).unwrap();

        // Re-tag the output as form input and run the conversion again; the
        // minute values must come out identical.
        let retagged: Vec<WeekdayInterval> = (0..DAYS_PER_WEEK as u8)
            .map(|weekday| {
                let row = normalized.iter().find(|i| i.weekday == weekday);
                WeekdayInterval {
                    weekday,
                    enabled: row.is_some(),
                    start_time: row.map_or("08:00".to_string(), |i| {
                        format!(
                            "{:02}:{:02}",
                            i.start_time_in_minutes / 60,
                            i.start_time_in_minutes % 60
                        )
                    }),
                    end_time: row.map_or("18:00".to_string(), |i| {
                        format!(
                            "{:02}:{:02}",
                            i.end_time_in_minutes / 60,
                            i.end_time_in_minutes % 60
                        )
                    }),
                }
            })
            .collect();

        assert_eq!(normalize(&retagged).unwrap(), normalized);
    }

    #[test]
    fn accepts_exactly_one_hour() {
        let normalized = normalize(&week_with(&[1], "08:00", "09:00")).unwrap();

        assert_eq!(normalized[0].start_time_in_minutes, 480);
        assert_eq!(normalized[0].end_time_in_minutes, 540);
    }

    #[test]
    fn rejects_fifty_nine_minutes() {
        let week = week_with(&[1], "08:00", "08:59");

        assert_eq!(normalize(&week), Err(AvailabilityError::MinimumSpan));
    }

    #[test]
    fn normalizes_a_single_enabled_day() {
        let week = week_with(&[1], "08:00", "18:00");

        assert_eq!(
            normalize(&week).unwrap(),
            vec![NormalizedInterval {
                weekday: 1,
                start_time_in_minutes: 480,
                end_time_in_minutes: 1080,
            }]
        );
    }

    #[test]
    fn one_bad_day_rejects_the_whole_week() {
        let mut week = week_with(&[0, 1, 2, 3, 4, 5, 6], "08:00", "18:00");
        week[3].start_time = "10:00".to_string();
        week[3].end_time = "10:30".to_string();

        assert_eq!(normalize(&week), Err(AvailabilityError::MinimumSpan));
    }

    #[test]
    fn keeps_enabled_days_in_weekday_order() {
        let normalized = normalize(&week_with(&[0, 3, 6], "07:00", "12:00")).unwrap();
        let weekdays: Vec<u8> = normalized.iter().map(|i| i.weekday).collect();

        assert_eq!(weekdays, vec![0, 3, 6]);
    }

    #[test]
    fn default_week_enables_monday_through_friday() {
        let week = default_week();

        assert_eq!(week.len(), DAYS_PER_WEEK);
        for interval in &week {
            assert_eq!(interval.enabled, (1..=5).contains(&interval.weekday));
            assert_eq!(interval.start_time, "08:00");
            assert_eq!(interval.end_time, "18:00");
        }
    }

    #[test]
    fn validate_normalized_mirrors_the_form_rules() {
        assert_eq!(
            validate_normalized(&[]),
            Err(AvailabilityError::EmptySelection)
        );
        assert_eq!(
            validate_normalized(&[NormalizedInterval {
                weekday: 2,
                start_time_in_minutes: 480,
                end_time_in_minutes: 500,
            }]),
            Err(AvailabilityError::MinimumSpan)
        );
        assert!(validate_normalized(&[NormalizedInterval {
            weekday: 2,
            start_time_in_minutes: 480,
            end_time_in_minutes: 1080,
        }])
        .is_ok());
    }

    #[test]
    fn serializes_with_camel_case_wire_names() {
        let interval = NormalizedInterval {
            weekday: 1,
            start_time_in_minutes: 480,
            end_time_in_minutes: 1080,
        };

        let json = serde_json::to_string(&interval).unwrap();
        assert_eq!(
            json,
            r#"{"weekday":1,"startTimeInMinutes":480,"endTimeInMinutes":1080}"#
        );
    }
}
