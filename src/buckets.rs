//! Date-bucket membership tests.
//!
//! All calendar-day comparisons use the viewer's local calendar day: both the
//! event instant and the reference instant are converted to Y-M-D in the
//! supplied timezone before comparing. The UI's date picker collects a local
//! calendar date, so anything else would disagree with the explicit-date
//! path. Whether "Today" should instead follow the event's own listed
//! timezone is a product decision; the viewer's timezone is what ships.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DateBucket {
    #[default]
    All,
    Today,
    Tomorrow,
    #[serde(rename = "This Weekend")]
    ThisWeekend,
}

/// True when the event's start falls in the given bucket, relative to `now`.
///
/// A chosen calendar date overrides any named bucket. An event whose start
/// could not be parsed matches nothing except `All`.
pub fn in_bucket(
    start: Option<DateTime<Utc>>,
    bucket: DateBucket,
    explicit_date: Option<NaiveDate>,
    now: DateTime<Utc>,
    tz: Tz,
) -> bool {
    if let Some(day) = explicit_date {
        return match start {
            Some(start) => local_day(start, tz) == day,
            None => false,
        };
    }

    let start = match start {
        Some(start) => start,
        None => return matches!(bucket, DateBucket::All),
    };
    let event_day = local_day(start, tz);
    let today = local_day(now, tz);

    match bucket {
        DateBucket::All => true,
        DateBucket::Today => event_day == today,
        DateBucket::Tomorrow => event_day == today + Duration::days(1),
        DateBucket::ThisWeekend => {
            let friday = weekend_friday(today);
            event_day >= friday && event_day <= friday + Duration::days(2)
        }
    }
}

fn local_day(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Friday of the weekend in effect: Mon-Fri step forward to the upcoming
/// Friday, Sat/Sun step back to the Friday already past.
fn weekend_friday(today: NaiveDate) -> NaiveDate {
    let from_monday = today.weekday().num_days_from_monday() as i64;
    today + Duration::days(4 - from_monday)
}
