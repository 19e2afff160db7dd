use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

pub const DEFAULT_EVENT_HOURS: i64 = 2;

/// A date field as it arrives from a source: either a server timestamp
/// wrapper or a datetime string.
#[derive(Deserialize, Clone, Debug)]
#[serde(untagged)]
pub enum RawInstant {
    Timestamp {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(default, alias = "_nanoseconds", alias = "nanos")]
        nanoseconds: u32,
    },
    Text(String),
}

pub fn clean_text(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Start-time resolution: timestamp wrapper, then datetime string, then
/// absent. An absent field resolves to `now`; a present but unparseable
/// value resolves to `None` so the event matches no date bucket except All.
pub fn resolve_start(raw: Option<&RawInstant>, tz: Tz, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match raw {
        None => Some(now),
        Some(raw) => resolve_raw(raw, tz),
    }
}

/// End-time resolution. Falls back to start + 2h when the source omits the
/// field, yields garbage, or puts the end before the start.
pub fn resolve_end(
    raw: Option<&RawInstant>,
    tz: Tz,
    start: Option<DateTime<Utc>>,
) -> Option<DateTime<Utc>> {
    let resolved = raw.and_then(|raw| resolve_raw(raw, tz));
    match (resolved, start) {
        (Some(end), Some(start)) if end >= start => Some(end),
        (Some(end), None) => Some(end),
        _ => default_end(start),
    }
}

pub fn default_end(start: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    start.map(|start| start + Duration::hours(DEFAULT_EVENT_HOURS))
}

pub fn resolve_raw(raw: &RawInstant, tz: Tz) -> Option<DateTime<Utc>> {
    match raw {
        RawInstant::Timestamp {
            seconds,
            nanoseconds,
        } => Utc.timestamp_opt(*seconds, *nanoseconds).single(),
        RawInstant::Text(text) => parse_instant_text(text, tz),
    }
}

fn parse_instant_text(text: &str, tz: Tz) -> Option<DateTime<Utc>> {
    let cleaned = clean_text(text);
    if cleaned.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(&cleaned) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&cleaned, fmt) {
            return to_timezone_datetime(naive, tz);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(&cleaned, "%Y-%m-%d") {
        return to_timezone_datetime(date.and_hms_opt(0, 0, 0)?, tz);
    }
    None
}

fn to_timezone_datetime(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(dt, _) => Some(dt.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}

/// Ids arrive as strings or bare numbers depending on the source.
pub fn id_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Stable fallback id for records carrying no identifier of their own, so
/// repeated feed refreshes keep ids stable within a session.
pub fn fallback_id(title: &str, start: Option<&DateTime<Utc>>, address: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update(b"|");
    if let Some(start) = start {
        hasher.update(start.to_rfc3339().as_bytes());
    }
    hasher.update(b"|");
    hasher.update(address.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TZ: Tz = chrono_tz::Asia::Tbilisi;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 12, 10, 0, 0).unwrap()
    }

    #[test]
    fn timestamp_wrapper_wins_over_everything() {
        let raw = RawInstant::Timestamp {
            seconds: 1_718_000_000,
            nanoseconds: 0,
        };
        let resolved = resolve_start(Some(&raw), TZ, now()).expect("instant");
        assert_eq!(resolved.timestamp(), 1_718_000_000);
    }

    #[test]
    fn naive_strings_are_anchored_in_the_feed_timezone() {
        let raw = RawInstant::Text("2024-06-14T19:00:00".to_string());
        let resolved = resolve_start(Some(&raw), TZ, now()).expect("instant");
        // Tbilisi is UTC+4.
        assert_eq!(resolved, Utc.with_ymd_and_hms(2024, 6, 14, 15, 0, 0).unwrap());
    }

    #[test]
    fn absent_start_defaults_to_now_but_garbage_does_not() {
        assert_eq!(resolve_start(None, TZ, now()), Some(now()));
        let garbage = RawInstant::Text("N/A".to_string());
        assert_eq!(resolve_start(Some(&garbage), TZ, now()), None);
    }

    #[test]
    fn end_defaults_to_start_plus_two_hours() {
        let start = Some(now());
        assert_eq!(resolve_end(None, TZ, start), Some(now() + Duration::hours(2)));

        // An end before the start is discarded the same way.
        let backwards = RawInstant::Text("2024-06-01T00:00:00".to_string());
        assert_eq!(
            resolve_end(Some(&backwards), TZ, start),
            Some(now() + Duration::hours(2))
        );
    }

    #[test]
    fn fallback_ids_are_stable() {
        let a = fallback_id("Jazz Night", Some(&now()), "Tbilisi");
        let b = fallback_id("Jazz Night", Some(&now()), "Tbilisi");
        let c = fallback_id("Jazz Night", None, "Tbilisi");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
