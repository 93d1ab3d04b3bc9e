//! UI/backend events and error modeling for desktop GUI controller.

use client_core::{ContactPage, ContactsApiError, ViewStateError};
use shared::{domain::ContactId, error::ErrorCode, protocol::Contact};

#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    PageLoaded {
        seq: u64,
        page: ContactPage,
    },
    PageFetchFailed {
        seq: u64,
        error: UiError,
    },
    ContactSaved {
        contact: Option<Contact>,
        updated: bool,
    },
    SaveFailed(UiError),
    ContactDeleted {
        id: ContactId,
    },
    DeleteFailed(UiError),
    Error(UiError),
}

/// User input from the panels, applied to the view state by the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    AddNew,
    Edit(ContactId),
    SortBy(shared::domain::ContactField),
    GoToPage(u32),
    SubmitForm,
    CloseForm,
    RequestDelete(ContactId),
    ConfirmDelete,
    CancelDelete,
    DismissError,
    Refresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    NotFound,
    Validation,
    Server,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    LoadPage,
    SaveContact,
    DeleteContact,
    General,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("404") || message_lower.contains("not found") {
            UiErrorCategory::NotFound
        } else if message_lower.contains("required")
            || message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("transport")
            || message_lower.contains("unavailable")
            || message_lower.contains("disconnected")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("status 5") || message_lower.contains("server error") {
            UiErrorCategory::Server
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn from_api_error(context: UiErrorContext, err: &ContactsApiError) -> Self {
        let category = match err {
            ContactsApiError::Transport { .. } => UiErrorCategory::Transport,
            ContactsApiError::InvalidBaseUrl { .. } => UiErrorCategory::Validation,
            ContactsApiError::Status { code, .. } => match code {
                ErrorCode::NotFound => UiErrorCategory::NotFound,
                ErrorCode::Validation | ErrorCode::Conflict => UiErrorCategory::Validation,
                ErrorCode::Unavailable => UiErrorCategory::Transport,
                ErrorCode::Internal => UiErrorCategory::Server,
            },
            ContactsApiError::Decode { .. } => UiErrorCategory::Server,
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    pub fn from_view_state(err: &ViewStateError) -> Self {
        Self {
            category: UiErrorCategory::Validation,
            context: UiErrorContext::SaveContact,
            message: err.to_string(),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Banner text for a failure: what was being done, then the likely cause.
pub fn describe_failure(error: &UiError) -> String {
    let action = match error.context {
        UiErrorContext::BackendStartup => "Backend worker failed to start",
        UiErrorContext::LoadPage => "Could not load contacts",
        UiErrorContext::SaveContact => "Could not save contact",
        UiErrorContext::DeleteContact => "Could not delete contact",
        UiErrorContext::General => "Something went wrong",
    };
    match error.category {
        UiErrorCategory::Transport => {
            format!("{action}: contacts server unreachable; check the API URL and retry.")
        }
        UiErrorCategory::NotFound => {
            format!("{action}: the contact no longer exists. Refresh to see current data.")
        }
        _ => format!("{action}: {}", error.message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::ContactField;

    #[test]
    fn classifies_queue_disconnect_as_transport_error() {
        let err = UiError::from_message(
            UiErrorContext::General,
            "Backend command processor disconnected",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
    }

    #[test]
    fn backend_status_codes_map_to_categories() {
        let not_found = ContactsApiError::Status {
            operation: "delete contact",
            status: 404,
            code: ErrorCode::NotFound,
            message: "Contact not found".into(),
        };
        let err = UiError::from_api_error(UiErrorContext::DeleteContact, &not_found);
        assert_eq!(err.category(), UiErrorCategory::NotFound);
        assert_eq!(err.context(), UiErrorContext::DeleteContact);

        let internal = ContactsApiError::Status {
            operation: "create contact",
            status: 500,
            code: ErrorCode::Internal,
            message: "E11000 duplicate key".into(),
        };
        let err = UiError::from_api_error(UiErrorContext::SaveContact, &internal);
        assert_eq!(err.category(), UiErrorCategory::Server);
        assert_eq!(
            describe_failure(&err),
            "Could not save contact: create contact failed with status 500: E11000 duplicate key"
        );
    }

    #[test]
    fn validation_failures_name_the_field() {
        let err = UiError::from_view_state(&ViewStateError::MissingRequiredField(
            ContactField::Email,
        ));
        assert_eq!(err.category(), UiErrorCategory::Validation);
        assert_eq!(describe_failure(&err), "Could not save contact: Email is required");
    }

    #[test]
    fn transport_failures_point_at_the_api_url() {
        let err = UiError::from_message(UiErrorContext::LoadPage, "connection refused");
        assert_eq!(
            describe_failure(&err),
            "Could not load contacts: contacts server unreachable; check the API URL and retry."
        );
    }
}
