use shared::{domain::ContactField, error::ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContactsApiError {
    #[error("invalid api base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("{operation} request failed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{operation} failed with status {status}: {message}")]
    Status {
        operation: &'static str,
        status: u16,
        code: ErrorCode,
        message: String,
    },
    #[error("{operation} returned an unreadable body: {reason}")]
    Decode {
        operation: &'static str,
        reason: String,
    },
}

impl ContactsApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ContactsApiError::Status {
                code: ErrorCode::NotFound,
                ..
            }
        )
    }
}

/// Rejected view-state transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewStateError {
    #[error("no contact form is open")]
    FormClosed,
    #[error("{} is required", .0.label())]
    MissingRequiredField(ContactField),
    #[error("contact is already being saved")]
    SubmissionInFlight,
    #[error("edited contact has no identifier")]
    MissingIdentifier,
}
