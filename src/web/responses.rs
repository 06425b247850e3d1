//! Response helpers and error mapping for the HTTP layer

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::config::defaults::CARD_CACHE_MAX_AGE_SECS;
use crate::errors::AppError;

/// PNG card body with long-lived caching headers
pub fn card_response(data: Bytes) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CONTENT_LENGTH, data.len().to_string()),
            (
                header::CACHE_CONTROL,
                format!("max-age={}", CARD_CACHE_MAX_AGE_SECS),
            ),
        ],
        data,
    )
        .into_response()
}

/// `301 Moved Permanently`; axum's `Redirect::permanent` answers 308
pub fn moved_permanently(location: String) -> Response {
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

/// Every request failure is answered with 404; only the log level differs.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Lookup(e) => warn!("Token metadata lookup failed: {}", e),
            AppError::Asset(e) => error!("Failed to read card: {}", e),
            AppError::Unresolved { .. }
            | AppError::AssetNotFound { .. }
            | AppError::InvalidRequest { .. } => debug!("{}", self),
        }
        not_found()
    }
}

/// Body of the health endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: i64,
    pub resolved_tokens: usize,
    pub known_groups: usize,
}

impl HealthResponse {
    pub fn healthy(start_time: DateTime<Utc>, resolved_tokens: usize, known_groups: usize) -> Self {
        let now = Utc::now();
        Self {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: now,
            uptime_seconds: (now - start_time).num_seconds(),
            resolved_tokens,
            known_groups,
        }
    }
}
