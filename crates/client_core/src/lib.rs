use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    domain::ContactId,
    protocol::{Contact, ContactListResponse, ContactPayload, CONTACTS_PAGE_SIZE},
};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

pub mod config;
pub mod error;
pub mod http;
pub mod pagination;
pub mod sort;
pub mod view_state;

pub use config::{load_settings, ClientSettings};
pub use error::{ContactsApiError, ViewStateError};
pub use http::HttpContactsApi;
pub use pagination::ContactPage;
pub use view_state::{ContactDraft, ContactViewState, FormMode, ModalState, PageApply, ViewCommand};

/// Transport seam for the contacts REST resource.
#[async_trait]
pub trait ContactsApi: Send + Sync {
    async fn list_contacts(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<ContactListResponse, ContactsApiError>;
    async fn create_contact(
        &self,
        payload: &ContactPayload,
    ) -> Result<Option<Contact>, ContactsApiError>;
    async fn update_contact(
        &self,
        id: &ContactId,
        payload: &ContactPayload,
    ) -> Result<Option<Contact>, ContactsApiError>;
    async fn delete_contact(&self, id: &ContactId) -> Result<(), ContactsApiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub seq: u64,
    pub page: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveRequest {
    Create(ContactPayload),
    Update {
        id: ContactId,
        payload: ContactPayload,
    },
}

impl SaveRequest {
    pub fn is_update(&self) -> bool {
        matches!(self, SaveRequest::Update { .. })
    }
}

#[derive(Debug, Clone)]
pub enum ClientEvent {
    PageLoaded {
        seq: u64,
        page: ContactPage,
    },
    PageFetchFailed {
        seq: u64,
        page: u32,
        message: String,
    },
}

#[async_trait]
pub trait ContactsHandle: Send + Sync {
    /// Starts a background fetch, aborting any fetch still in flight. The
    /// outcome arrives as a [`ClientEvent`].
    async fn fetch_page(&self, request: PageRequest);
    async fn load_page(&self, page: u32) -> Result<ContactPage, ContactsApiError>;
    async fn save_contact(&self, request: SaveRequest)
        -> Result<Option<Contact>, ContactsApiError>;
    async fn delete_contact(&self, id: &ContactId) -> Result<(), ContactsApiError>;
    fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent>;
}

struct InflightFetch {
    seq: u64,
    task: JoinHandle<()>,
}

pub struct ContactsClient<A: ContactsApi + 'static> {
    api: Arc<A>,
    page_size: u32,
    inflight_fetch: Mutex<Option<InflightFetch>>,
    events: broadcast::Sender<ClientEvent>,
}

impl<A: ContactsApi + 'static> ContactsClient<A> {
    pub fn new(api: A) -> Arc<Self> {
        Self::with_page_size(api, CONTACTS_PAGE_SIZE)
    }

    pub fn with_page_size(api: A, page_size: u32) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            api: Arc::new(api),
            page_size: page_size.max(1),
            inflight_fetch: Mutex::new(None),
            events,
        })
    }

    async fn load_page_impl(&self, page: u32) -> Result<ContactPage, ContactsApiError> {
        let page = page.max(1);
        let response = self.api.list_contacts(page, self.page_size).await?;
        Ok(ContactPage::from_response(page, self.page_size, response))
    }

    async fn start_fetch(self: &Arc<Self>, request: PageRequest) {
        let mut inflight = self.inflight_fetch.lock().await;
        if let Some(previous) = inflight.take() {
            if !previous.task.is_finished() {
                debug!(
                    superseded_seq = previous.seq,
                    seq = request.seq,
                    "aborting superseded page fetch"
                );
                previous.task.abort();
            }
        }

        let client = Arc::clone(self);
        let task = tokio::spawn(async move {
            let event = match client.load_page_impl(request.page).await {
                Ok(page) => {
                    info!(
                        seq = request.seq,
                        page = page.page,
                        rows = page.contacts.len(),
                        total = page.total,
                        "page fetched"
                    );
                    ClientEvent::PageLoaded {
                        seq: request.seq,
                        page,
                    }
                }
                Err(err) => {
                    warn!(seq = request.seq, page = request.page, "page fetch failed: {err}");
                    ClientEvent::PageFetchFailed {
                        seq: request.seq,
                        page: request.page,
                        message: err.to_string(),
                    }
                }
            };
            let _ = client.events.send(event);
        });

        *inflight = Some(InflightFetch {
            seq: request.seq,
            task,
        });
    }

    async fn save_contact_impl(
        &self,
        request: SaveRequest,
    ) -> Result<Option<Contact>, ContactsApiError> {
        match request {
            SaveRequest::Create(payload) => {
                info!("creating contact");
                self.api.create_contact(&payload).await
            }
            SaveRequest::Update { id, payload } => {
                info!(contact_id = %id, "updating contact");
                self.api.update_contact(&id, &payload).await
            }
        }
    }
}

#[async_trait]
impl<A: ContactsApi + 'static> ContactsHandle for Arc<ContactsClient<A>> {
    async fn fetch_page(&self, request: PageRequest) {
        self.start_fetch(request).await
    }

    async fn load_page(&self, page: u32) -> Result<ContactPage, ContactsApiError> {
        self.load_page_impl(page).await
    }

    async fn save_contact(
        &self,
        request: SaveRequest,
    ) -> Result<Option<Contact>, ContactsApiError> {
        self.save_contact_impl(request).await
    }

    async fn delete_contact(&self, id: &ContactId) -> Result<(), ContactsApiError> {
        info!(contact_id = %id, "deleting contact");
        self.api.delete_contact(id).await
    }

    fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
