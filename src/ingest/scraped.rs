use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use serde_json::Value;

use super::base;
use crate::models::{Category, Event, GeoPoint, Host, DEFAULT_ADDRESS, DEFAULT_CAPACITY};

pub const SOURCE_ID: &str = "tkt-ge";
pub const SOURCE_NAME: &str = "tkt.ge";

// The feed lists wall-clock times for venues in Georgia.
const TIMEZONE: Tz = chrono_tz::Asia::Tbilisi;

/// A listing from the scraped third-party feed: snake_case keys, flat
/// coordinates, the address in a plain `location` string, no host or
/// attendee data. The feed's shape is not contractually guaranteed, so
/// every field is optional.
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct ScrapedRecord {
    pub id: Option<Value>,
    pub unique_id: Option<Value>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub time: Option<base::RawInstant>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location: Option<String>,
    pub location_name: Option<String>,
    pub picture: Option<String>,
}

pub fn to_event(record: ScrapedRecord, now: DateTime<Utc>) -> Event {
    let start = base::resolve_start(record.time.as_ref(), TIMEZONE, now);
    let end = base::default_end(start);

    let address = record
        .location
        .or(record.location_name)
        .map(|a| base::clean_text(&a))
        .filter(|a| !a.is_empty() && a != "N/A");
    let address = address.unwrap_or_else(|| DEFAULT_ADDRESS.to_string());
    let location = match (record.latitude, record.longitude) {
        (Some(lat), Some(lng)) => GeoPoint { lat, lng, address },
        _ => GeoPoint {
            address,
            ..GeoPoint::default()
        },
    };

    let title = record
        .title
        .map(|t| base::clean_text(&t))
        .filter(|t| !t.is_empty() && t != "N/A")
        .unwrap_or_else(|| "Untitled Event".to_string());

    let id = base::id_string(record.id.as_ref())
        .or_else(|| base::id_string(record.unique_id.as_ref()))
        .unwrap_or_else(|| base::fallback_id(&title, start.as_ref(), &location.address));

    Event {
        id,
        source: SOURCE_ID.to_string(),
        title,
        description: record
            .description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| "No details available.".to_string()),
        category: Category::from_source(record.category.as_deref()),
        start_time: start,
        end_time: end,
        location,
        host: source_host(),
        capacity: DEFAULT_CAPACITY,
        attendees: Vec::new(),
        attendee_ids: Vec::new(),
        is_private: false,
        picture: record
            .picture
            .filter(|p| !p.trim().is_empty() && p != "N/A"),
    }
}

/// Synthetic host identity for listings that come from the scrape rather
/// than a created event.
pub fn source_host() -> Host {
    Host {
        id: SOURCE_ID.to_string(),
        name: SOURCE_NAME.to_string(),
        avatar_url: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SAMPLE_LISTING: &str = r#"{
        "id": 48213,
        "title": "  Open Air Festival ",
        "description": "Two stages by the lake.",
        "category": "Festival",
        "time": "2024-06-15T20:00:00",
        "latitude": 41.7151,
        "longitude": 44.8271,
        "location": "Lisi Lake, Tbilisi",
        "picture": "https://static.tkt.ge/img/posters/v3/48213.jpg"
    }"#;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 12, 10, 0, 0).unwrap()
    }

    #[test]
    fn parses_a_feed_listing() {
        let record: ScrapedRecord = serde_json::from_str(SAMPLE_LISTING).expect("parse listing");
        let event = to_event(record, now());

        assert_eq!(event.id, "48213");
        assert_eq!(event.title, "Open Air Festival");
        assert_eq!(event.category.name(), "Festival");
        assert_eq!(event.location.address, "Lisi Lake, Tbilisi");
        assert_eq!(event.host.name, SOURCE_NAME);
        assert!(!event.is_private);
        assert!(event.attendee_ids.is_empty());

        // 20:00 Tbilisi time is 16:00 UTC.
        assert_eq!(
            event.start_time,
            Some(Utc.with_ymd_and_hms(2024, 6, 15, 16, 0, 0).unwrap())
        );
        assert_eq!(
            event.end_time,
            Some(Utc.with_ymd_and_hms(2024, 6, 15, 18, 0, 0).unwrap())
        );
    }

    #[test]
    fn feed_placeholders_do_not_leak_into_events() {
        let record: ScrapedRecord = serde_json::from_str(
            r#"{ "unique_id": "x-91", "title": "N/A", "time": "N/A", "picture": "N/A" }"#,
        )
        .expect("parse");
        let event = to_event(record, now());

        assert_eq!(event.id, "x-91");
        assert_eq!(event.title, "Untitled Event");
        assert_eq!(event.description, "No details available.");
        assert_eq!(event.picture, None);
        // "N/A" is present but unparseable, not absent: no instant.
        assert_eq!(event.start_time, None);
        assert_eq!(event.end_time, None);
        assert_eq!(event.location, GeoPoint::default());
    }

    #[test]
    fn missing_ids_hash_to_a_stable_fallback() {
        let listing = r#"{ "title": "Jazz Night", "time": "2024-06-14T21:00:00" }"#;
        let a: ScrapedRecord = serde_json::from_str(listing).expect("parse");
        let b: ScrapedRecord = serde_json::from_str(listing).expect("parse");
        assert_eq!(to_event(a, now()).id, to_event(b, now()).id);
    }
}
