use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::buckets::{self, DateBucket};
use crate::models::{marker_style_for, Event, GeoPoint, MarkerStyle};

pub const CATEGORY_ALL: &str = "All";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PrivacyFilter {
    #[default]
    All,
    Public,
    Private,
}

/// The filter selections as the UI control surface hands them over. Plain
/// data, one immutable value per pipeline call. A chosen `explicit_date`
/// always overrides the named `date_bucket`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct FilterState {
    pub category: String,
    pub date_bucket: DateBucket,
    pub explicit_date: Option<NaiveDate>,
    pub privacy: PrivacyFilter,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            category: CATEGORY_ALL.to_string(),
            date_bucket: DateBucket::All,
            explicit_date: None,
            privacy: PrivacyFilter::All,
        }
    }
}

pub fn category_matches(event: &Event, active_category: &str) -> bool {
    active_category == CATEGORY_ALL || event.category.name() == active_category
}

pub fn privacy_matches(event: &Event, filter: PrivacyFilter) -> bool {
    match filter {
        PrivacyFilter::All => true,
        PrivacyFilter::Public => !event.is_private,
        PrivacyFilter::Private => event.is_private,
    }
}

pub fn date_matches(event: &Event, state: &FilterState, now: DateTime<Utc>, tz: Tz) -> bool {
    buckets::in_bucket(
        event.start_time,
        state.date_bucket,
        state.explicit_date,
        now,
        tz,
    )
}

/// Pure AND of the three predicates; each is independent of the others.
pub fn matches(event: &Event, state: &FilterState, now: DateTime<Utc>, tz: Tz) -> bool {
    category_matches(event, &state.category)
        && date_matches(event, state, now, tz)
        && privacy_matches(event, state.privacy)
}

/// The render-ready slice of a discovery session: the events that passed the
/// filter, in their original relative order.
#[derive(Serialize, Clone, Debug)]
pub struct DiscoveryView {
    pub visible: Vec<Event>,
}

/// One map-marker row: the event, its pin treatment, and where to place it.
#[derive(Serialize, Clone, Debug)]
pub struct MapPin<'a> {
    pub event: &'a Event,
    pub style: MarkerStyle,
    pub location: &'a GeoPoint,
}

impl DiscoveryView {
    pub fn marker_style(&self, event: &Event) -> MarkerStyle {
        marker_style_for(&event.category)
    }

    pub fn pins(&self) -> Vec<MapPin<'_>> {
        self.visible
            .iter()
            .map(|event| MapPin {
                event,
                style: marker_style_for(&event.category),
                location: &event.location,
            })
            .collect()
    }
}

/// Runs the predicate set over a materialized collection. Stable: input
/// order is preserved, and one bad record never excludes the rest. `now` is
/// injected rather than read from the system clock so repeated calls with
/// the same inputs agree.
pub fn filter_and_classify(
    events: &[Event],
    state: &FilterState,
    now: DateTime<Utc>,
    tz: Tz,
) -> DiscoveryView {
    let visible = events
        .iter()
        .filter(|event| matches(event, state, now, tz))
        .cloned()
        .collect();
    DiscoveryView { visible }
}
