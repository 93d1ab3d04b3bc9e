//! Applies UI actions and backend events to the contact view state.

use client_core::{ContactViewState, PageApply, ViewCommand};

use crate::controller::events::{describe_failure, UiAction, UiError, UiErrorContext, UiEvent};

/// Follow-up work produced by a backend event.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Reduction {
    pub command: Option<ViewCommand>,
    pub status: Option<String>,
}

pub fn apply_action(
    state: &mut ContactViewState,
    action: UiAction,
) -> Result<Option<ViewCommand>, UiError> {
    match action {
        UiAction::AddNew => {
            if !state.open_create() {
                tracing::debug!("save in flight; keeping the open form");
            }
        }
        UiAction::Edit(id) => {
            if state.is_submitting() {
                tracing::debug!(contact_id = %id, "save in flight; keeping the open form");
            } else if !state.open_edit(&id) {
                return Err(UiError::from_message(
                    UiErrorContext::General,
                    format!("contact {id} not found on this page"),
                ));
            }
        }
        UiAction::SortBy(field) => state.click_sort_header(field),
        UiAction::GoToPage(page) => return Ok(state.change_page(page)),
        UiAction::SubmitForm => {
            return state
                .submit()
                .map(Some)
                .map_err(|err| UiError::from_view_state(&err));
        }
        UiAction::CloseForm => {
            state.close_modal();
        }
        UiAction::RequestDelete(id) => {
            state.request_delete(&id);
        }
        UiAction::ConfirmDelete => return Ok(state.confirm_delete()),
        UiAction::CancelDelete => state.cancel_delete(),
        UiAction::DismissError => state.dismiss_error(),
        UiAction::Refresh => return Ok(Some(state.refresh())),
    }
    Ok(None)
}

pub fn reduce_event(state: &mut ContactViewState, event: UiEvent) -> Reduction {
    match event {
        UiEvent::Info(message) => Reduction {
            command: None,
            status: Some(message),
        },
        UiEvent::PageLoaded { seq, page } => match state.apply_page_loaded(seq, page) {
            PageApply::Applied => Reduction {
                command: None,
                status: Some(page_status(state)),
            },
            PageApply::Stale => {
                tracing::debug!(seq, "dropping stale page result");
                Reduction::default()
            }
            PageApply::Moved(command) => Reduction {
                command: Some(command),
                status: Some(format!("Page no longer exists; showing page {}", state.page())),
            },
        },
        UiEvent::PageFetchFailed { seq, error } => {
            if state.apply_page_fetch_failed(seq, describe_failure(&error)) {
                Reduction {
                    command: None,
                    status: Some("Failed to load contacts".to_string()),
                }
            } else {
                tracing::debug!(seq, "dropping failure of superseded fetch");
                Reduction::default()
            }
        }
        UiEvent::ContactSaved { contact, updated } => {
            let verb = if updated { "Updated" } else { "Created" };
            let status = match contact {
                Some(contact) => format!("{verb} {}", contact.display_name()),
                None => format!("{verb} contact"),
            };
            Reduction {
                command: Some(state.apply_save_succeeded()),
                status: Some(status),
            }
        }
        UiEvent::SaveFailed(error) => {
            state.apply_save_failed(describe_failure(&error));
            Reduction {
                command: None,
                status: Some("Save failed".to_string()),
            }
        }
        UiEvent::ContactDeleted { id } => {
            tracing::debug!(contact_id = %id, "delete confirmed by backend");
            Reduction {
                command: Some(state.apply_delete_succeeded()),
                status: Some("Contact deleted".to_string()),
            }
        }
        UiEvent::DeleteFailed(error) => {
            state.apply_delete_failed(describe_failure(&error));
            Reduction {
                command: None,
                status: Some("Delete failed".to_string()),
            }
        }
        UiEvent::Error(error) => {
            state.report_error(describe_failure(&error));
            Reduction {
                command: None,
                status: Some(error.message().to_string()),
            }
        }
    }
}

/// Unwinds the pending transition of a command that never reached the worker.
pub fn command_not_queued(state: &mut ContactViewState, command: &ViewCommand, reason: &str) {
    match command {
        ViewCommand::FetchPage(request) => {
            state.apply_page_fetch_failed(request.seq, reason);
        }
        ViewCommand::Save(_) => state.apply_save_failed(reason),
        ViewCommand::Delete(_) => state.apply_delete_failed(reason),
    }
}

fn page_status(state: &ContactViewState) -> String {
    format!(
        "Page {} of {} ({} contacts)",
        state.page(),
        state.total_pages().max(1),
        state.total_contacts()
    )
}

#[cfg(test)]
#[path = "../tests/reducer_tests.rs"]
mod tests;
