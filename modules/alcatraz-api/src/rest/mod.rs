use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, Method},
    response::{IntoResponse, Json, Response},
};
use serde_json::{Map, Value};
use tracing::{info, warn};

use alcatraz_common::{EventDetails, LoginRequest, Session, User};

use crate::auth::BearerSession;
use crate::download::{channel_body, PayloadStream, StreamOutcome};
use crate::error::ApiError;
use crate::AppState;

// --- Query structs ---

/// Raw query pairs in order. Repeated keys are allowed; the first one wins.
type QueryPairs = Vec<(String, String)>;

fn first_param<'a>(params: &'a QueryPairs, name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// Anything that is not an integer reads as 0 and is then sanitized by the
/// store, so bad pagination input never fails the request.
fn lenient_int(value: Option<&str>) -> i64 {
    value.and_then(|v| v.parse().ok()).unwrap_or(0)
}

// --- Handlers ---

pub async fn api_login(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Bytes,
) -> Result<Json<Session>, ApiError> {
    if method != Method::POST {
        return Err(ApiError::MethodNotAllowed);
    }

    let req = decode_login(&body)?;

    match state.credentials.login(&req.email, &req.password).await {
        Some(session) => {
            info!(user_id = session.user.id.as_str(), "Login succeeded");
            Ok(Json(session))
        }
        None => {
            warn!("Login rejected: invalid credentials");
            Err(ApiError::InvalidCredentials)
        }
    }
}

/// Decode the first JSON value in the body; anything after it is ignored.
/// Field names match exactly first, then case-insensitively.
fn decode_login(body: &[u8]) -> Result<LoginRequest, ApiError> {
    let value = serde_json::Deserializer::from_slice(body)
        .into_iter::<Value>()
        .next()
        .ok_or(ApiError::BadRequest)?
        .map_err(|_| ApiError::BadRequest)?;

    let fields = match value {
        Value::Object(fields) => fields,
        Value::Null => return Ok(LoginRequest::default()),
        _ => return Err(ApiError::BadRequest),
    };

    Ok(LoginRequest {
        email: string_field(&fields, "email")?,
        password: string_field(&fields, "password")?,
    })
}

fn string_field(fields: &Map<String, Value>, name: &str) -> Result<String, ApiError> {
    let value = fields.get(name).or_else(|| {
        fields
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    });
    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ApiError::BadRequest),
    }
}

pub async fn api_me(session: BearerSession) -> Json<User> {
    Json(session.user)
}

pub async fn api_events(
    _session: BearerSession,
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryPairs>,
) -> Response {
    let page = lenient_int(first_param(&params, "page"));
    let limit = lenient_int(first_param(&params, "limit"));
    Json(state.store.list(page, limit)).into_response()
}

pub async fn api_event_detail(
    _session: BearerSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<EventDetails>, ApiError> {
    state
        .store
        .details(&id)
        .map(Json)
        .ok_or(ApiError::EventNotFound)
}

pub async fn api_event_download(
    _session: BearerSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let spec = state.download;
    let (sink, body) = channel_body();
    let stream = PayloadStream::prepare(sink, spec)?;

    info!(event_id = id.as_str(), total_bytes = spec.total_bytes(), "Download started");
    tokio::spawn(async move {
        match stream.run().await {
            StreamOutcome::Completed { bytes_written } => {
                info!(event_id = id.as_str(), bytes_written, "Download completed");
            }
            StreamOutcome::Aborted { bytes_written } => {
                info!(event_id = id.as_str(), bytes_written, "Download aborted by client");
            }
        }
    });

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain".to_string()),
            (header::CONTENT_DISPOSITION, spec.content_disposition()),
        ],
        body,
    )
        .into_response())
}

pub async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}
