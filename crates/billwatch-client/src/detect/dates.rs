use chrono::{Duration, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Parses a stored timestamp: a full datetime, or a bare date taken as
/// midnight. Returns `None` for anything unparseable so callers can skip
/// the row instead of failing the run.
pub fn parse_transaction_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim().trim_end_matches('Z');

    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

pub fn format_iso_datetime(value: &NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Whole-day gap between two postings, truncating partial days.
pub fn day_gap(earlier: NaiveDateTime, later: NaiveDateTime) -> i64 {
    (later - earlier).num_days()
}

/// Middle element of the sorted gap list. Even-length lists take the
/// single element at index `len / 2` with no interpolation; changing this
/// to an interpolated median would shift which series sit inside the
/// cadence band, so the behavior is kept as-is.
pub fn gap_median(gaps: &[i64]) -> Option<i64> {
    if gaps.is_empty() {
        return None;
    }
    let mut sorted = gaps.to_vec();
    sorted.sort_unstable();
    Some(sorted[sorted.len() / 2])
}

/// Advances from the last observed date in `step_days` increments until
/// the result is on or after `now`. A bill whose charge was missed or ran
/// late still predicts a future date rather than one in the past.
pub fn next_due_on_or_after(
    last: NaiveDateTime,
    step_days: i64,
    now: NaiveDateTime,
) -> NaiveDateTime {
    let step = Duration::days(step_days);
    let mut next = last + step;
    while next < now {
        next += step;
    }
    next
}
