use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Deserialize;

use super::base;
use crate::models::{Category, Event, GeoPoint, Host, DEFAULT_ADDRESS, DEFAULT_CAPACITY};

pub const SOURCE_ID: &str = "native";

// Native documents carry RFC 3339 strings or timestamp wrappers; a bare
// datetime with no offset is read as UTC, matching the store's exports.
const TIMEZONE: Tz = chrono_tz::UTC;

/// An event document as the native app writes it: camelCase keys, nested
/// location, denormalized host and attendee snapshots.
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct NativeRecord {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub start_time: Option<base::RawInstant>,
    pub end_time: Option<base::RawInstant>,
    pub location: Option<NativeLocation>,
    pub host: Option<Host>,
    pub capacity: Option<u32>,
    pub attendees: Option<Vec<Host>>,
    pub attendee_ids: Option<Vec<String>>,
    pub is_private: Option<bool>,
    pub picture: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct NativeLocation {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub address: Option<String>,
}

pub fn to_event(record: NativeRecord, now: DateTime<Utc>) -> Event {
    let start = base::resolve_start(record.start_time.as_ref(), TIMEZONE, now);
    let end = base::resolve_end(record.end_time.as_ref(), TIMEZONE, start);

    let location = record
        .location
        .and_then(to_point)
        .unwrap_or_default();

    let title = record
        .title
        .map(|t| base::clean_text(&t))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Untitled Event".to_string());

    let id = record
        .id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| base::fallback_id(&title, start.as_ref(), &location.address));

    Event {
        id,
        source: SOURCE_ID.to_string(),
        title,
        description: record.description.unwrap_or_default(),
        category: Category::from_source(record.category.as_deref()),
        start_time: start,
        end_time: end,
        location,
        host: record.host.unwrap_or_default(),
        capacity: record.capacity.unwrap_or(DEFAULT_CAPACITY),
        attendees: record.attendees.unwrap_or_default(),
        attendee_ids: record.attendee_ids.unwrap_or_default(),
        is_private: record.is_private.unwrap_or(false),
        picture: record.picture.filter(|p| !p.trim().is_empty()),
    }
}

fn to_point(location: NativeLocation) -> Option<GeoPoint> {
    match (location.lat, location.lng) {
        (Some(lat), Some(lng)) => Some(GeoPoint {
            lat,
            lng,
            address: location
                .address
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
        }),
        _ => None,
    }
}
