use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use alcatraz_common::{demo_user, Session, User, DEMO_PASSWORD, DEMO_TOKEN};

use crate::error::ApiError;
use crate::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity provider seam: checks login credentials and bearer tokens.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Exchange an email/password pair for a session.
    async fn login(&self, email: &str, password: &str) -> Option<Session>;

    /// Resolve a bearer token to the account it was issued for.
    async fn authorize(&self, token: &str) -> Option<User>;
}

/// A single account with one shared, never-expiring token.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    user: User,
    password: String,
    token: String,
}

impl StaticCredentials {
    pub fn new(user: User, password: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user,
            password: password.into(),
            token: token.into(),
        }
    }

    /// The built-in demo account.
    pub fn demo() -> Self {
        Self::new(demo_user(), DEMO_PASSWORD, DEMO_TOKEN)
    }
}

#[async_trait]
impl CredentialVerifier for StaticCredentials {
    async fn login(&self, email: &str, password: &str) -> Option<Session> {
        let email_ok = constant_time_eq(email.as_bytes(), self.user.email.as_bytes());
        let password_ok = constant_time_eq(password.as_bytes(), self.password.as_bytes());
        (email_ok && password_ok).then(|| Session {
            token: self.token.clone(),
            user: self.user.clone(),
        })
    }

    async fn authorize(&self, token: &str) -> Option<User> {
        constant_time_eq(token.as_bytes(), self.token.as_bytes()).then(|| self.user.clone())
    }
}

/// An authorized caller. Extract this in handlers that require auth; a missing
/// or rejected bearer token short-circuits with 401 before the handler runs.
pub struct BearerSession {
    pub user: User,
}

impl FromRequestParts<Arc<AppState>> for BearerSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_bearer)
            .ok_or(ApiError::Unauthorized)?;

        state
            .credentials
            .authorize(token)
            .await
            .map(|user| BearerSession { user })
            .ok_or(ApiError::Unauthorized)
    }
}

/// Parse `Bearer <token>`. The scheme is matched exactly.
fn parse_bearer(header: &str) -> Option<&str> {
    header
        .strip_prefix(BEARER_PREFIX)
        .filter(|token| !token.is_empty())
}

/// Constant-time comparison to prevent timing attacks.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
