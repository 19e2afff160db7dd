pub mod base;
pub mod native;
pub mod scraped;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::models::Event;

/// One raw event record, tagged by the source shape it arrived in.
#[derive(Clone, Debug)]
pub enum RawRecord {
    Native(native::NativeRecord),
    Scraped(scraped::ScrapedRecord),
}

/// Anything that can deliver normalized events to a discovery session.
pub trait EventSource: Send + Sync {
    fn source_id(&self) -> &'static str;
    fn source_name(&self) -> &'static str;
    fn fetch(&self) -> Result<Vec<Event>>;
}

/// Decides which source shape a JSON value carries and decodes it.
///
/// A nested `location.{lat,lng}` object marks the native shape and wins over
/// flat `latitude`/`longitude` fields when a record shows traces of both.
/// Returns `None` for values that are not plausibly an event; callers drop
/// those without failing the rest of the batch.
pub fn classify(value: &Value) -> Option<RawRecord> {
    let object = value.as_object()?;

    let nested = object
        .get("location")
        .and_then(Value::as_object)
        .map_or(false, |loc| {
            loc.get("lat").map_or(false, Value::is_number)
                && loc.get("lng").map_or(false, Value::is_number)
        });
    let flat = object.get("latitude").map_or(false, Value::is_number)
        && object.get("longitude").map_or(false, Value::is_number);
    let scraped_markers = object.contains_key("unique_id")
        || object.contains_key("time")
        || object.get("location").map_or(false, Value::is_string);

    if nested || (!flat && !scraped_markers) {
        serde_json::from_value(value.clone())
            .ok()
            .map(RawRecord::Native)
    } else {
        serde_json::from_value(value.clone())
            .ok()
            .map(RawRecord::Scraped)
    }
}

/// Normalizes one recognized record into a canonical event. Total: every
/// missing or malformed field falls back to its default instead of erroring.
/// `now` is injected so callers stay deterministic.
pub fn normalize(raw: RawRecord, now: DateTime<Utc>) -> Event {
    match raw {
        RawRecord::Native(record) => native::to_event(record, now),
        RawRecord::Scraped(record) => scraped::to_event(record, now),
    }
}

/// Classifies and normalizes a heterogeneous batch, dropping values that are
/// not recognizable as events.
pub fn normalize_all(values: &[Value], now: DateTime<Utc>) -> Vec<Event> {
    values
        .iter()
        .filter_map(classify)
        .map(|raw| normalize(raw, now))
        .collect()
}
