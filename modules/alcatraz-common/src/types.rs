use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Account ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
}

// --- Events ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub has_download: bool,
}

/// Per-request metadata attached to an event detail view.
pub type EventMetadata = BTreeMap<String, String>;

/// An event plus its metadata. The event fields are flattened so the detail
/// JSON is a superset of the list item JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetails {
    #[serde(flatten)]
    pub event: Event,
    pub metadata: EventMetadata,
}

impl EventDetails {
    pub fn new(event: Event, metadata: EventMetadata) -> Self {
        Self { event, metadata }
    }
}

// --- Auth payloads ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Issued bearer token plus the account it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}
