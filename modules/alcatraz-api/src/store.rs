//! Read-only, in-memory event collection with page/limit windowing.

use serde::Serialize;

use alcatraz_common::{detail_metadata, Event, EventDetails};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 50;

/// A sanitized pagination request: `page >= 1`, `limit` in `[1, MAX_LIMIT]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Pages below 1 become 1; limits outside `[1, MAX_LIMIT]` become the default.
    pub fn sanitize(page: i64, limit: i64) -> Self {
        let page = if page < 1 { DEFAULT_PAGE } else { page };
        let limit = if (1..=MAX_LIMIT).contains(&limit) {
            limit
        } else {
            DEFAULT_LIMIT
        };
        Self { page, limit }
    }

    /// The `[start, end)` index range of this page, clamped to `[0, total]`.
    pub fn window(&self, total: usize) -> (usize, usize) {
        let start = (self.page - 1).saturating_mul(self.limit);
        let end = start.saturating_add(self.limit);
        let clamp = |i: i64| usize::try_from(i).map_or(total, |i| i.min(total));
        (clamp(start), clamp(end))
    }
}

#[derive(Debug, Serialize)]
pub struct EventPage<'a> {
    pub page: i64,
    pub limit: i64,
    pub total: usize,
    pub events: &'a [Event],
}

/// Owns the event sequence for the lifetime of the process. Never mutated after
/// construction, so handlers share it without locking.
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn list(&self, page: i64, limit: i64) -> EventPage<'_> {
        let req = PageRequest::sanitize(page, limit);
        let (start, end) = req.window(self.events.len());
        EventPage {
            page: req.page,
            limit: req.limit,
            total: self.events.len(),
            events: &self.events[start..end],
        }
    }

    /// Exact id match only.
    pub fn get_by_id(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn details(&self, id: &str) -> Option<EventDetails> {
        self.get_by_id(id)
            .map(|event| EventDetails::new(event.clone(), detail_metadata()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alcatraz_common::synthetic_events;
    use chrono::Utc;

    fn store() -> EventStore {
        EventStore::new(synthetic_events(100, Utc::now()))
    }

    fn ids(page: &EventPage<'_>) -> Vec<String> {
        page.events.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn third_page_of_ten() {
        let store = store();
        let page = store.list(3, 10);
        assert_eq!(page.page, 3);
        assert_eq!(page.limit, 10);
        assert_eq!(page.total, 100);
        let expected: Vec<String> = (21..=30).map(|i| format!("evt_{i}")).collect();
        assert_eq!(ids(&page), expected);
    }

    #[test]
    fn page_length_matches_remaining_items() {
        let store = store();
        for limit in 1..=MAX_LIMIT {
            for page in 1..=12 {
                let result = store.list(page, limit);
                let start = (page - 1) * limit;
                let expected = (100 - start).clamp(0, limit) as usize;
                assert_eq!(result.events.len(), expected, "page={page} limit={limit}");
                assert_eq!(result.total, 100);
            }
        }
    }

    #[test]
    fn page_below_one_is_first_page() {
        let store = store();
        for page in [0, -1, i64::MIN] {
            let result = store.list(page, 10);
            assert_eq!(result.page, 1);
            assert_eq!(result.events[0].id, "evt_1");
        }
    }

    #[test]
    fn out_of_range_limit_falls_back_to_default() {
        let store = store();
        for limit in [0, -5, 51, 1000, i64::MAX] {
            let result = store.list(1, limit);
            assert_eq!(result.limit, DEFAULT_LIMIT);
            assert_eq!(result.events.len(), 20);
        }
    }

    #[test]
    fn limit_bounds_are_inclusive() {
        let store = store();
        assert_eq!(store.list(1, 1).events.len(), 1);
        assert_eq!(store.list(1, 50).events.len(), 50);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let store = store();
        let result = store.list(11, 10);
        assert!(result.events.is_empty());
        assert_eq!(result.total, 100);

        let result = store.list(i64::MAX, 50);
        assert!(result.events.is_empty());
    }

    #[test]
    fn partial_last_page() {
        let store = store();
        let result = store.list(3, 40);
        assert_eq!(result.events.len(), 20);
        assert_eq!(result.events[0].id, "evt_81");
    }

    #[test]
    fn empty_store_pages_are_empty() {
        let store = EventStore::default();
        let result = store.list(1, 20);
        assert!(result.events.is_empty());
        assert_eq!(result.total, 0);
    }

    #[test]
    fn every_known_id_resolves() {
        let store = store();
        for i in 1..=100 {
            let id = format!("evt_{i}");
            assert_eq!(store.get_by_id(&id).map(|e| e.id.as_str()), Some(id.as_str()));
        }
    }

    #[test]
    fn unknown_ids_miss() {
        let store = store();
        for id in ["", "evt_0", "evt_101", "evt_", "EVT_1", "evt_1 ", "1", "evt_01"] {
            assert!(store.get_by_id(id).is_none(), "{id:?} should not match");
        }
    }

    #[test]
    fn details_attach_fixed_metadata() {
        let store = store();
        let details = store.details("evt_5").unwrap();
        assert!(details.event.has_download);
        assert_eq!(details.metadata["deviceId"], "sensor-42");
        assert_eq!(details.metadata["severity"], "high");
        assert_eq!(details.metadata["region"], "eu-central");
        assert!(store.details("evt_999").is_none());
    }
}
