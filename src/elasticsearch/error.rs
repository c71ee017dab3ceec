use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Error kind returned when creating an index that already exists.
pub const RESOURCE_ALREADY_EXISTS: &str = "resource_already_exists_exception";

#[derive(Debug, Error)]
pub enum StoreError {
    /// Elasticsearch answered with a structured error body.
    #[error("{kind}: {reason} ({status})")]
    Response {
        status: StatusCode,
        kind: String,
        reason: String,
    },
    #[error("unexpected response status {0}")]
    Status(StatusCode),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorCause,
}

#[derive(Debug, Deserialize)]
pub struct ErrorCause {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub reason: String,
}

impl StoreError {
    /// Build the error for a non-successful response from its raw body.
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        match serde_json::from_slice::<ErrorResponse>(body) {
            Ok(ErrorResponse { error }) => StoreError::Response {
                status,
                kind: error.kind,
                reason: error.reason,
            },
            Err(_) => StoreError::Status(status),
        }
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, StoreError::Response { kind, .. } if kind == RESOURCE_ALREADY_EXISTS)
    }
}
