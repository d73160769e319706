//! Single entry point multiplexing every read and write.
//!
//! Reads are selected by the `endpoint` query parameter, writes by the
//! `action` field of a JSON body. Unknown selectors are answered with a 200
//! `{error}` payload rather than an HTTP failure.

use std::collections::HashMap;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, info_span, Instrument};

use service::devices::{self, DeviceFilter, NewDevice};
use service::errors::ServiceError;
use service::{dashboard, import_history, providers, users};

use crate::errors::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";

const UNKNOWN_ENDPOINT: &str = "Unknown endpoint";
const UNKNOWN_ACTION: &str = "Unknown action";
const METHOD_NOT_ALLOWED: &str = "Method not allowed";

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(db: DatabaseConnection, request_timeout: Duration) -> Self {
        Self { db, request_timeout }
    }
}

/// Read selector. A missing `endpoint` means the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Dashboard,
    Devices,
    Ofd,
    Users,
    ImportHistory,
}

impl Endpoint {
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match raw {
            None | Some("dashboard") => Some(Endpoint::Dashboard),
            Some("devices") => Some(Endpoint::Devices),
            Some("ofd") => Some(Endpoint::Ofd),
            Some("users") => Some(Endpoint::Users),
            Some("import_history") => Some(Endpoint::ImportHistory),
            Some(_) => None,
        }
    }
}

/// Write selector, already decoded from the request body.
#[derive(Debug)]
pub enum Action {
    UpdateDeviceStatus(StatusUpdate),
    AddDevice(NewDevice),
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusUpdate {
    pub device_id: Option<String>,
    pub status: Option<String>,
}

impl Action {
    /// `Ok(None)` when the action is missing or not one we know.
    pub fn from_body(body: &[u8]) -> Result<Option<Self>, ServiceError> {
        let value: Value = if body.iter().all(u8::is_ascii_whitespace) {
            json!({})
        } else {
            serde_json::from_slice(body).map_err(|e| ServiceError::Validation(format!("malformed JSON body: {e}")))?
        };
        let decode = |e: serde_json::Error| ServiceError::Validation(format!("invalid payload: {e}"));
        let action = match value.get("action").and_then(Value::as_str) {
            Some("update_device_status") => Action::UpdateDeviceStatus(serde_json::from_value(value).map_err(decode)?),
            Some("add_device") => Action::AddDevice(serde_json::from_value(value).map_err(decode)?),
            _ => return Ok(None),
        };
        Ok(Some(action))
    }
}

fn error_payload(message: &str) -> Response {
    Json(json!({ "error": message })).into_response()
}

fn parse_limit(params: &HashMap<String, String>) -> Result<Option<u64>, ServiceError> {
    match params.get("limit").map(|s| s.trim()).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ServiceError::Validation(format!("limit must be a non-negative integer, got {raw:?}"))),
    }
}

async fn handle_get(
    db: &DatabaseConnection,
    params: &HashMap<String, String>,
    now: DateTime<Utc>,
) -> Result<Response, ServiceError> {
    let Some(endpoint) = Endpoint::parse(params.get("endpoint").map(String::as_str)) else {
        return Ok(error_payload(UNKNOWN_ENDPOINT));
    };
    let body = match endpoint {
        Endpoint::Dashboard => {
            let view = dashboard::dashboard(db, now).await?;
            json!({ "stats": view.stats, "expiringDevices": view.expiring_devices })
        }
        Endpoint::Devices => {
            let filter = DeviceFilter::new(
                params.get("search").map(String::as_str),
                params.get("status").map(String::as_str),
            );
            json!({ "devices": devices::list_devices(db, &filter, now).await? })
        }
        Endpoint::Ofd => json!({ "providers": providers::list_providers(db, now).await? }),
        Endpoint::Users => json!({ "users": users::list_users(db).await? }),
        Endpoint::ImportHistory => {
            let limit = parse_limit(params)?;
            json!({ "history": import_history::list_import_history(db, limit).await? })
        }
    };
    Ok(Json(body).into_response())
}

async fn handle_post(db: &DatabaseConnection, body: &[u8], now: DateTime<Utc>) -> Result<Response, ServiceError> {
    let message = match Action::from_body(body)? {
        None => return Ok(error_payload(UNKNOWN_ACTION)),
        Some(Action::UpdateDeviceStatus(update)) => {
            devices::update_device_status(
                db,
                update.device_id.as_deref().unwrap_or_default(),
                update.status.as_deref().unwrap_or_default(),
                now,
            )
            .await?;
            "Статус обновлен"
        }
        Some(Action::AddDevice(input)) => {
            devices::create_device(db, input, now).await?;
            "Устройство добавлено"
        }
    };
    Ok(Json(json!({ "success": true, "message": message })).into_response())
}

/// Any-method handler behind `/` and `/api`.
pub async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    // trusted upstream identity, recorded only
    let user_id = headers.get(USER_ID_HEADER).and_then(|v| v.to_str().ok()).unwrap_or_default();
    let span = info_span!("dispatch", %method, user_id = %user_id);

    async move {
        if method == Method::OPTIONS {
            return StatusCode::OK.into_response();
        }
        let now = Utc::now();
        let work = async {
            match method {
                Method::GET => handle_get(&state.db, &params, now).await,
                Method::POST => handle_post(&state.db, &body, now).await,
                _ => Ok(error_payload(METHOD_NOT_ALLOWED)),
            }
        };
        match tokio::time::timeout(state.request_timeout, work).await {
            Ok(Ok(response)) => {
                info!(status = response.status().as_u16(), "dispatched");
                response
            }
            Ok(Err(e)) => ApiError::from(e).into_response(),
            Err(_) => ApiError::from(ServiceError::Timeout(state.request_timeout)).into_response(),
        }
    }
    .instrument(span)
    .await
}
