//! Filter-and-classification core for event discovery: normalizes event
//! records from heterogeneous sources, applies category/date/privacy
//! filters against a viewer-local calendar, and resolves map marker styles.

pub mod buckets;
pub mod feed;
pub mod filter;
pub mod ingest;
pub mod models;

pub use buckets::DateBucket;
pub use feed::{FeedError, ScrapedFeed};
pub use filter::{
    filter_and_classify, DiscoveryView, FilterState, MapPin, PrivacyFilter, CATEGORY_ALL,
};
pub use ingest::{classify, normalize, normalize_all, EventSource, RawRecord};
pub use models::{
    marker_style_for, Category, Event, GeoPoint, Host, MarkerStyle, DEFAULT_MARKER,
};
