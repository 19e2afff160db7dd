use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use serde_json::Value;
use thiserror::Error;

use crate::ingest::{self, scraped, EventSource};
use crate::models::Event;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("http error: {0}")]
    Http(String),
    #[error("feed decode error: {0}")]
    Decode(String),
    #[error("feed is not a JSON array")]
    NotAnArray,
}

/// Parses one refresh of the scraped feed: a JSON array of listings.
/// Values that are not recognizable as events are dropped silently; the
/// hosting application owns ingestion reporting.
pub fn parse_feed(body: &str, now: DateTime<Utc>) -> Result<Vec<Event>, FeedError> {
    let value: Value =
        serde_json::from_str(body).map_err(|err| FeedError::Decode(err.to_string()))?;
    let items = value.as_array().ok_or(FeedError::NotAnArray)?;
    Ok(ingest::normalize_all(items, now))
}

pub fn fetch_feed(url: &str) -> Result<Vec<Event>, FeedError> {
    static CLIENT: Lazy<Client> = Lazy::new(|| {
        Client::builder()
            .timeout(Duration::from_secs(20))
            .user_agent("EventDiscovery/0.1")
            .build()
            .expect("http client")
    });

    let response = CLIENT
        .get(url)
        .send()
        .map_err(|err| FeedError::Http(err.to_string()))?;
    let response = response
        .error_for_status()
        .map_err(|err| FeedError::Http(err.to_string()))?;
    let body = response
        .text()
        .map_err(|err| FeedError::Http(err.to_string()))?;
    parse_feed(&body, Utc::now())
}

/// The periodically refreshed third-party feed, plugged into a discovery
/// session through the `EventSource` seam.
pub struct ScrapedFeed {
    pub url: String,
}

impl EventSource for ScrapedFeed {
    fn source_id(&self) -> &'static str {
        scraped::SOURCE_ID
    }

    fn source_name(&self) -> &'static str {
        scraped::SOURCE_NAME
    }

    fn fetch(&self) -> Result<Vec<Event>> {
        Ok(fetch_feed(&self.url)?)
    }
}
