//! Schedule evaluator (§4.C): timezone-aware, midnight-crossing-capable
//! dispatch over the [`Schedule`] tagged union.

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;

use crate::model::{BusinessHourRow, IsoWeekday, Schedule, TimeOfDay};
use crate::time_range::time_in_range;

/// Converts an absolute instant to the local wall-clock in `tz`. An empty
/// or unloadable timezone falls back to UTC silently (§4.C step 1) — this
/// is a documented fallback, logged at `trace` level, never an error.
fn to_local(instant: DateTime<Utc>, tz: &str) -> DateTime<Tz> {
    match tz.parse::<Tz>() {
        Ok(zone) => instant.with_timezone(&zone),
        Err(_) => {
            tracing::trace!(timezone = tz, "unloadable or empty timezone, falling back to UTC");
            instant.with_timezone(&chrono_tz::UTC)
        }
    }
}

/// Entry point: decide whether `schedule` is active at `instant`, given the
/// bot's `tz` and its `business_hours` table. Never panics, never fails —
/// any malformed input resolves to `false` for that window/entry.
pub fn schedule_matches(
    schedule: &Schedule,
    instant: DateTime<Utc>,
    tz: &str,
    business_hours: &[BusinessHourRow],
) -> bool {
    let local = to_local(instant, tz);
    let local_time = TimeOfDay::from_chrono(local.time());

    match schedule {
        Schedule::Daily(windows) => windows.iter().any(|w| time_in_range(local_time, *w)),
        Schedule::Monthly(entries) => {
            let day_of_month = local.day() as u8;
            entries
                .iter()
                .any(|e| e.day == day_of_month && time_in_range(local_time, e.window))
        }
        Schedule::BusinessHour => is_business_hour(local_time, local.weekday().into(), business_hours),
        Schedule::NonBusinessHour => {
            !is_business_hour(local_time, local.weekday().into(), business_hours)
        }
        Schedule::DateRange(ranges) => {
            let local_date = local.date_naive();
            ranges
                .iter()
                .any(|r| r.start <= local_date && local_date <= r.end)
        }
    }
}

fn is_business_hour(
    local_time: TimeOfDay,
    weekday: IsoWeekday,
    business_hours: &[BusinessHourRow],
) -> bool {
    business_hours
        .iter()
        .any(|row| row.weekday == weekday && time_in_range(local_time, row.window))
}

impl From<chrono::Weekday> for IsoWeekday {
    fn from(w: chrono::Weekday) -> Self {
        IsoWeekday::from_chrono(w)
    }
}
