use axum::{http::StatusCode, Json};
use thiserror::Error;

use crate::models::common::ErrorResponse;
use crate::services::reconciliation::{ReconcileError, RefreshError};

/// Errors raised while talking to the upstream fantasy API
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("upstream returned {status} for {url}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("request to upstream failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("could not decode upstream response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("gave up on {url} after {attempts} attempts: {last}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last: Box<FetchError>,
    },
}

impl FetchError {
    /// Rate limits, upstream 5xx and dropped connections are worth another try.
    /// Every other 4xx and undecodable payloads are permanent.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Status { status, .. } => *status == 429 || (500..600).contains(status),
            FetchError::Transport(e) => e.is_timeout() || e.is_connect(),
            FetchError::Decode { .. } | FetchError::RetriesExhausted { .. } => false,
        }
    }

    /// Upstream HTTP status behind this error, looking through exhausted retries
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::RetriesExhausted { last, .. } => last.upstream_status(),
            _ => None,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.upstream_status() == Some(429)
    }
}

/// Errors raised by the persisted event store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("event store error: {0}")]
    Backend(String),
}

/// Error payload returned by every handler
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

impl From<FetchError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: FetchError) -> Self {
        if err.is_rate_limited() {
            return api_error(
                StatusCode::TOO_MANY_REQUESTS,
                "Fantasy API rate limit reached. Please try again later.",
            );
        }

        let status = match err.upstream_status() {
            Some(404) => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_GATEWAY,
        };
        api_error(
            status,
            format!("Failed to fetch data from the fantasy API: {}", err),
        )
    }
}

impl From<StoreError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: StoreError) -> Self {
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Event store error: {}", err),
        )
    }
}

impl From<ReconcileError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: ReconcileError) -> Self {
        api_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}

impl From<RefreshError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: RefreshError) -> Self {
        match err {
            RefreshError::Fetch(e) => e.into(),
            RefreshError::Reconcile(e) => e.into(),
        }
    }
}
