use chrono::{NaiveDateTime, TimeDelta};

/// Parse the API's naive ISO timestamps (`2024-05-01T12:34:56.123456`).
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

/// Coarse relative time: "just now", "5 minutes ago", "3 days ago".
pub fn time_ago(then: NaiveDateTime, now: NaiveDateTime) -> String {
    let elapsed = now.signed_duration_since(then);
    if elapsed < TimeDelta::minutes(1) {
        return "just now".to_string();
    }

    let (count, unit) = if elapsed < TimeDelta::hours(1) {
        (elapsed.num_minutes(), "minute")
    } else if elapsed < TimeDelta::days(1) {
        (elapsed.num_hours(), "hour")
    } else if elapsed < TimeDelta::days(30) {
        (elapsed.num_days(), "day")
    } else if elapsed < TimeDelta::days(365) {
        (elapsed.num_days() / 30, "month")
    } else {
        (elapsed.num_days() / 365, "year")
    };

    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}
