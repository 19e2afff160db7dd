use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CAPACITY: u32 = 100;

// Fallback point for records with no usable coordinates: Tbilisi city centre.
pub const DEFAULT_LAT: f64 = 41.7151;
pub const DEFAULT_LNG: f64 = 44.8271;
pub const DEFAULT_ADDRESS: &str = "Tbilisi";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

impl Default for GeoPoint {
    fn default() -> Self {
        GeoPoint {
            lat: DEFAULT_LAT,
            lng: DEFAULT_LNG,
            address: DEFAULT_ADDRESS.to_string(),
        }
    }
}

/// Open string-backed category. The set of names grows with whatever the
/// scraped feed sends; anything missing or blank normalizes to `General`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub const GENERAL: &'static str = "General";

    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.trim().is_empty() {
            Category::general()
        } else {
            Category(name)
        }
    }

    pub fn general() -> Self {
        Category(Self::GENERAL.to_string())
    }

    pub fn from_source(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(name) if !name.is_empty() => Category(name.to_string()),
            _ => Category::general(),
        }
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::general()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Denormalized person snapshot, used for both hosts and attendees.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Host {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "avatarUrl")]
    pub avatar_url: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Event {
    pub id: String,
    pub source: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    /// `None` only when the source carried a date that could not be parsed;
    /// such events match no date bucket except All.
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub location: GeoPoint,
    pub host: Host,
    pub capacity: u32,
    pub attendees: Vec<Host>,
    pub attendee_ids: Vec<String>,
    pub is_private: bool,
    pub picture: Option<String>,
}

impl Event {
    /// Membership test. `attendee_ids` is authoritative even when the
    /// `attendees` snapshots have drifted out of sync upstream.
    pub fn is_attending(&self, user_id: &str) -> bool {
        self.attendee_ids.iter().any(|id| id == user_id)
    }

    pub fn spots_left(&self) -> u32 {
        self.capacity.saturating_sub(self.attendee_ids.len() as u32)
    }
}

/// Opaque map-pin treatment token. Resolved here, rendered elsewhere.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(transparent)]
pub struct MarkerStyle(&'static str);

impl MarkerStyle {
    pub fn token(&self) -> &'static str {
        self.0
    }
}

pub const DEFAULT_MARKER: MarkerStyle = MarkerStyle("pin-default");

static MARKER_STYLES: Lazy<HashMap<&'static str, MarkerStyle>> = Lazy::new(|| {
    [
        ("Party", "pin-party"),
        ("Picnic", "pin-picnic"),
        ("Sports", "pin-sports"),
        ("Club", "pin-club"),
        ("Gaming", "pin-gaming"),
        ("Study", "pin-study"),
        ("Music", "pin-music"),
        ("Concert", "pin-concert"),
        ("Cinema", "pin-cinema"),
        ("Theatre", "pin-theatre"),
        ("Festival", "pin-festival"),
    ]
    .into_iter()
    .map(|(category, token)| (category, MarkerStyle(token)))
    .collect()
});

pub fn marker_style_for(category: &Category) -> MarkerStyle {
    MARKER_STYLES
        .get(category.name())
        .copied()
        .unwrap_or(DEFAULT_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_categories_normalize_to_general() {
        assert_eq!(Category::from_source(None).name(), "General");
        assert_eq!(Category::from_source(Some("  ")).name(), "General");
        assert_eq!(Category::from_source(Some("Concert")).name(), "Concert");
    }

    #[test]
    fn unknown_category_gets_default_marker() {
        let style = marker_style_for(&Category::new("UnknownXYZ"));
        assert_eq!(style, DEFAULT_MARKER);
        for named in MARKER_STYLES.values() {
            assert_ne!(style, *named);
        }
    }

    #[test]
    fn attendee_ids_are_authoritative_for_membership() {
        let event = Event {
            id: "e1".to_string(),
            source: "native".to_string(),
            title: "Rooftop Sunset Party".to_string(),
            description: String::new(),
            category: Category::new("Party"),
            start_time: None,
            end_time: None,
            location: GeoPoint::default(),
            host: Host::default(),
            capacity: 20,
            attendees: Vec::new(),
            attendee_ids: vec!["u1".to_string(), "u4".to_string()],
            is_private: false,
            picture: None,
        };
        assert!(event.is_attending("u4"));
        assert!(!event.is_attending("u2"));
        assert_eq!(event.spots_left(), 18);
    }
}
