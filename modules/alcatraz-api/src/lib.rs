pub mod auth;
pub mod download;
pub mod error;
pub mod rest;
pub mod routes;
pub mod store;

use std::sync::Arc;

use chrono::Utc;

use alcatraz_common::{synthetic_events, Config};

use auth::{CredentialVerifier, StaticCredentials};
use download::DownloadSpec;
use store::EventStore;

pub use error::ApiError;
pub use routes::build_router;

/// Process-wide, read-only dependencies shared by every handler.
pub struct AppState {
    pub store: EventStore,
    pub credentials: Arc<dyn CredentialVerifier>,
    pub download: DownloadSpec,
}

impl AppState {
    /// Demo account, `config.event_count` synthetic events, full-size download.
    pub fn from_config(config: &Config) -> Self {
        Self {
            store: EventStore::new(synthetic_events(config.event_count, Utc::now())),
            credentials: Arc::new(StaticCredentials::demo()),
            download: DownloadSpec::default(),
        }
    }
}
