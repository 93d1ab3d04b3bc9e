//! View state of the contact manager and the transitions that mutate it.
//!
//! The presentation layer owns one [`ContactViewState`] and changes it only
//! through the methods below. Transitions that need the backend return a
//! [`ViewCommand`]; the caller runs it and feeds the outcome back through the
//! matching `apply_*` method.

use serde::{Deserialize, Serialize};
use shared::{
    domain::{ContactField, ContactId, SortConfig},
    protocol::{Contact, ContactPayload},
};

use crate::{
    error::ViewStateError,
    pagination::{clamp_page, ContactPage},
    sort::sort_page,
    PageRequest, SaveRequest,
};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactDraft {
    pub id: Option<ContactId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub job_title: String,
}

impl ContactDraft {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_contact(contact: &Contact) -> Self {
        Self {
            id: Some(contact.id.clone()),
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            company: contact.company.clone().unwrap_or_default(),
            job_title: contact.job_title.clone().unwrap_or_default(),
        }
    }

    pub fn field(&self, field: ContactField) -> &str {
        match field {
            ContactField::FirstName => &self.first_name,
            ContactField::LastName => &self.last_name,
            ContactField::Email => &self.email,
            ContactField::Phone => &self.phone,
            ContactField::Company => &self.company,
            ContactField::JobTitle => &self.job_title,
        }
    }

    pub fn field_mut(&mut self, field: ContactField) -> &mut String {
        match field {
            ContactField::FirstName => &mut self.first_name,
            ContactField::LastName => &mut self.last_name,
            ContactField::Email => &mut self.email,
            ContactField::Phone => &mut self.phone,
            ContactField::Company => &mut self.company,
            ContactField::JobTitle => &mut self.job_title,
        }
    }

    /// First required field left blank, in form order.
    pub fn missing_required(&self) -> Option<ContactField> {
        ContactField::ALL
            .into_iter()
            .filter(|field| field.is_required())
            .find(|field| self.field(*field).trim().is_empty())
    }

    pub fn to_payload(&self) -> ContactPayload {
        let optional = |value: &str| {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        };
        ContactPayload {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            company: optional(&self.company),
            job_title: optional(&self.job_title),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormMode {
    Create,
    Edit,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ModalState {
    #[default]
    Closed,
    Open {
        mode: FormMode,
        draft: ContactDraft,
        submitting: bool,
    },
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        matches!(self, ModalState::Open { .. })
    }

    pub fn mode(&self) -> Option<FormMode> {
        match self {
            ModalState::Open { mode, .. } => Some(*mode),
            ModalState::Closed => None,
        }
    }

    pub fn draft(&self) -> Option<&ContactDraft> {
        match self {
            ModalState::Open { draft, .. } => Some(draft),
            ModalState::Closed => None,
        }
    }
}

/// Backend work requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCommand {
    FetchPage(PageRequest),
    Save(SaveRequest),
    Delete(ContactId),
}

/// Outcome of feeding a fetched page into the view state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageApply {
    Applied,
    /// A newer fetch was issued after this one; the result was dropped.
    Stale,
    /// The page no longer exists (e.g. the last row of the last page was
    /// deleted); the view moved to the last existing page, or page 1 when
    /// there are none, and needs this fetch.
    Moved(ViewCommand),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactViewState {
    page: u32,
    total_pages: u32,
    total_contacts: u64,
    sort: SortConfig,
    loaded: Vec<Contact>,
    rows: Vec<Contact>,
    modal: ModalState,
    pending_delete: Option<ContactId>,
    deleting: bool,
    fetch_seq: u64,
    loading: bool,
    last_error: Option<String>,
}

impl Default for ContactViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactViewState {
    pub fn new() -> Self {
        Self {
            page: 1,
            total_pages: 1,
            total_contacts: 0,
            sort: SortConfig::default(),
            loaded: Vec::new(),
            rows: Vec::new(),
            modal: ModalState::Closed,
            pending_delete: None,
            deleting: false,
            fetch_seq: 0,
            loading: false,
            last_error: None,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn total_contacts(&self) -> u64 {
        self.total_contacts
    }

    pub fn sort(&self) -> SortConfig {
        self.sort
    }

    /// Current page in display order.
    pub fn rows(&self) -> &[Contact] {
        &self.rows
    }

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// A save is in flight; the form can be neither replaced nor closed.
    pub fn is_submitting(&self) -> bool {
        matches!(
            self.modal,
            ModalState::Open {
                submitting: true,
                ..
            }
        )
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn latest_fetch_seq(&self) -> u64 {
        self.fetch_seq
    }

    pub fn contact(&self, id: &ContactId) -> Option<&Contact> {
        self.loaded.iter().find(|contact| &contact.id == id)
    }

    pub fn pending_delete(&self) -> Option<&Contact> {
        self.pending_delete.as_ref().and_then(|id| self.contact(id))
    }

    /// Issues a fetch of the current page; any earlier fetch becomes stale.
    pub fn refresh(&mut self) -> ViewCommand {
        self.fetch_seq += 1;
        self.loading = true;
        ViewCommand::FetchPage(PageRequest {
            seq: self.fetch_seq,
            page: self.page,
        })
    }

    pub fn change_page(&mut self, page: u32) -> Option<ViewCommand> {
        if page == self.page || page < 1 || page > self.total_pages.max(1) {
            return None;
        }
        self.page = page;
        Some(self.refresh())
    }

    /// Column-header click. Reorders the loaded page without a refetch.
    pub fn click_sort_header(&mut self, field: ContactField) {
        self.sort = self.sort.toggled(field);
        self.rows = sort_page(&self.loaded, self.sort);
    }

    pub fn open_create(&mut self) -> bool {
        if self.is_submitting() {
            return false;
        }
        self.modal = ModalState::Open {
            mode: FormMode::Create,
            draft: ContactDraft::empty(),
            submitting: false,
        };
        true
    }

    pub fn open_edit(&mut self, id: &ContactId) -> bool {
        if self.is_submitting() {
            return false;
        }
        let Some(draft) = self.contact(id).map(ContactDraft::from_contact) else {
            return false;
        };
        self.modal = ModalState::Open {
            mode: FormMode::Edit,
            draft,
            submitting: false,
        };
        true
    }

    pub fn draft_field_mut(&mut self, field: ContactField) -> Option<&mut String> {
        match &mut self.modal {
            ModalState::Open {
                draft,
                submitting: false,
                ..
            } => Some(draft.field_mut(field)),
            _ => None,
        }
    }

    pub fn close_modal(&mut self) -> bool {
        if self.is_submitting() {
            return false;
        }
        self.modal = ModalState::Closed;
        true
    }

    pub fn submit(&mut self) -> Result<ViewCommand, ViewStateError> {
        let ModalState::Open {
            mode,
            draft,
            submitting,
        } = &mut self.modal
        else {
            return Err(ViewStateError::FormClosed);
        };
        if *submitting {
            return Err(ViewStateError::SubmissionInFlight);
        }
        if let Some(field) = draft.missing_required() {
            return Err(ViewStateError::MissingRequiredField(field));
        }

        let payload = draft.to_payload();
        let request = match mode {
            FormMode::Edit => {
                let id = draft.id.clone().ok_or(ViewStateError::MissingIdentifier)?;
                SaveRequest::Update { id, payload }
            }
            FormMode::Create => SaveRequest::Create(payload),
        };
        *submitting = true;
        Ok(ViewCommand::Save(request))
    }

    pub fn apply_save_succeeded(&mut self) -> ViewCommand {
        self.modal = ModalState::Closed;
        self.last_error = None;
        self.refresh()
    }

    /// Keeps the form open with the draft as typed.
    pub fn apply_save_failed(&mut self, message: impl Into<String>) {
        if let ModalState::Open { submitting, .. } = &mut self.modal {
            *submitting = false;
        }
        self.last_error = Some(message.into());
    }

    pub fn request_delete(&mut self, id: &ContactId) -> bool {
        if self.deleting || self.contact(id).is_none() {
            return false;
        }
        self.pending_delete = Some(id.clone());
        true
    }

    pub fn cancel_delete(&mut self) {
        if !self.deleting {
            self.pending_delete = None;
        }
    }

    pub fn confirm_delete(&mut self) -> Option<ViewCommand> {
        if self.deleting {
            return None;
        }
        let id = self.pending_delete.clone()?;
        self.deleting = true;
        Some(ViewCommand::Delete(id))
    }

    pub fn apply_delete_succeeded(&mut self) -> ViewCommand {
        self.pending_delete = None;
        self.deleting = false;
        self.last_error = None;
        self.refresh()
    }

    /// Rows stay as displayed; nothing was removed locally.
    pub fn apply_delete_failed(&mut self, message: impl Into<String>) {
        self.pending_delete = None;
        self.deleting = false;
        self.last_error = Some(message.into());
    }

    pub fn apply_page_loaded(&mut self, seq: u64, page: ContactPage) -> PageApply {
        if seq != self.fetch_seq || page.page != self.page {
            return PageApply::Stale;
        }

        self.total_contacts = page.total;
        self.total_pages = page.total_pages;

        if page.contacts.is_empty() && self.page > page.total_pages.max(1) {
            self.page = clamp_page(self.page, page.total_pages);
            return PageApply::Moved(self.refresh());
        }

        self.loading = false;
        self.loaded = page.contacts;
        self.rows = sort_page(&self.loaded, self.sort);
        PageApply::Applied
    }

    /// Returns false when the failure belongs to a superseded fetch.
    pub fn apply_page_fetch_failed(&mut self, seq: u64, message: impl Into<String>) -> bool {
        if seq != self.fetch_seq {
            return false;
        }
        self.loading = false;
        self.last_error = Some(message.into());
        true
    }

    /// Failure not tied to a pending transition, such as a lost backend worker.
    pub fn report_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }
}

#[cfg(test)]
#[path = "tests/view_state_tests.rs"]
mod tests;
