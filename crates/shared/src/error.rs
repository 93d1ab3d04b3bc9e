use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Validation,
    Conflict,
    Internal,
    Unavailable,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            404 => ErrorCode::NotFound,
            400 | 422 => ErrorCode::Validation,
            409 => ErrorCode::Conflict,
            502..=504 => ErrorCode::Unavailable,
            _ => ErrorCode::Internal,
        }
    }
}

/// Error body returned by the contacts backend.
///
/// Backends differ on the key they use for the text, so both `message` and
/// `error` are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    #[serde(alias = "error")]
    pub message: String,
}

#[derive(Debug, Error)]
#[error("{code:?}: {message}")]
pub struct ApiException {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiException {
    /// Builds an exception from an HTTP status and an optional decoded body.
    pub fn from_response(status: u16, body: Option<ApiError>) -> Self {
        match body {
            Some(body) => Self {
                code: body.code.unwrap_or_else(|| ErrorCode::from_status(status)),
                message: body.message,
            },
            None => Self {
                code: ErrorCode::from_status(status),
                message: format!("backend responded with status {status}"),
            },
        }
    }
}
