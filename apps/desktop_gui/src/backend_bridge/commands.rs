//! Backend commands queued from UI to backend worker.

use client_core::{PageRequest, SaveRequest, ViewCommand};
use shared::domain::ContactId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    FetchPage { request: PageRequest },
    SaveContact { request: SaveRequest },
    DeleteContact { id: ContactId },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::FetchPage { .. } => "fetch_page",
            BackendCommand::SaveContact { .. } => "save_contact",
            BackendCommand::DeleteContact { .. } => "delete_contact",
        }
    }
}

impl From<ViewCommand> for BackendCommand {
    fn from(command: ViewCommand) -> Self {
        match command {
            ViewCommand::FetchPage(request) => BackendCommand::FetchPage { request },
            ViewCommand::Save(request) => BackendCommand::SaveContact { request },
            ViewCommand::Delete(id) => BackendCommand::DeleteContact { id },
        }
    }
}
