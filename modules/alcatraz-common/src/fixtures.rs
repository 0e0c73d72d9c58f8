//! Demo account and the synthetic event feed the API serves.

use chrono::{DateTime, Duration, SubsecRound, Utc};

use crate::types::{Event, EventMetadata, User};

pub const DEMO_USER_ID: &str = "1";
pub const DEMO_EMAIL: &str = "test@demo.com";
pub const DEMO_NAME: &str = "Test User";
pub const DEMO_PASSWORD: &str = "password";
pub const DEMO_TOKEN: &str = "dummy-token";

/// Every fifth event carries a downloadable log.
const DOWNLOAD_EVERY: usize = 5;

pub fn demo_user() -> User {
    User {
        id: DEMO_USER_ID.to_string(),
        email: DEMO_EMAIL.to_string(),
        name: DEMO_NAME.to_string(),
    }
}

/// Generate `count` events, newest first: event `i` happened `i` hours before `now`.
/// Timestamps are truncated to whole seconds.
pub fn synthetic_events(count: usize, now: DateTime<Utc>) -> Vec<Event> {
    let now = now.trunc_subsecs(0);
    (1..=count)
        .map(|i| Event {
            id: format!("evt_{i}"),
            title: format!("Event #{i}"),
            description: format!("This is event number {i}"),
            timestamp: now - Duration::hours(i as i64),
            has_download: i % DOWNLOAD_EVERY == 0,
        })
        .collect()
}

/// Fixed device metadata attached to every event detail.
pub fn detail_metadata() -> EventMetadata {
    [
        ("deviceId", "sensor-42"),
        ("severity", "high"),
        ("region", "eu-central"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn ids_are_sequential_and_unique() {
        let events = synthetic_events(100, Utc::now());
        assert_eq!(events.len(), 100);
        assert_eq!(events[0].id, "evt_1");
        assert_eq!(events[99].id, "evt_100");

        let mut ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn ordered_by_descending_recency() {
        let events = synthetic_events(10, Utc::now());
        assert!(events.windows(2).all(|w| w[0].timestamp > w[1].timestamp));
    }

    #[test]
    fn timestamps_drop_subseconds() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap() + Duration::milliseconds(750);
        let events = synthetic_events(2, now);
        assert_eq!(
            events[0].timestamp,
            Utc.with_ymd_and_hms(2026, 3, 1, 11, 0, 0).unwrap()
        );
    }

    #[test]
    fn every_fifth_event_has_download() {
        let events = synthetic_events(20, Utc::now());
        let with_download: Vec<&str> = events
            .iter()
            .filter(|e| e.has_download)
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(with_download, vec!["evt_5", "evt_10", "evt_15", "evt_20"]);
    }

    #[test]
    fn metadata_has_fixed_fields() {
        let meta = detail_metadata();
        assert_eq!(meta.len(), 3);
        assert_eq!(meta["deviceId"], "sensor-42");
        assert_eq!(meta["severity"], "high");
        assert_eq!(meta["region"], "eu-central");
    }
}
