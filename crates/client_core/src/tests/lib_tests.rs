use super::*;
use std::{collections::HashMap, time::Duration};

use shared::error::ErrorCode;
use tokio::time::timeout;

struct TestContactsApi {
    contacts: Mutex<Vec<Contact>>,
    calls: Mutex<Vec<String>>,
    list_delays: HashMap<u32, Duration>,
    fail_list_with: Option<String>,
    fail_delete_with: Option<String>,
}

impl TestContactsApi {
    fn with_contacts(count: usize) -> Self {
        let contacts = (1..=count)
            .map(|n| Contact {
                id: ContactId::new(format!("c{n}")),
                first_name: format!("First{n:02}"),
                last_name: format!("Last{n:02}"),
                email: format!("person{n}@example.com"),
                phone: format!("555-{n:04}"),
                company: None,
                job_title: None,
            })
            .collect();
        Self {
            contacts: Mutex::new(contacts),
            calls: Mutex::new(Vec::new()),
            list_delays: HashMap::new(),
            fail_list_with: None,
            fail_delete_with: None,
        }
    }

    fn delay_page(mut self, page: u32, delay: Duration) -> Self {
        self.list_delays.insert(page, delay);
        self
    }

    fn failing_list(mut self, message: &str) -> Self {
        self.fail_list_with = Some(message.to_string());
        self
    }

    fn failing_delete(mut self, message: &str) -> Self {
        self.fail_delete_with = Some(message.to_string());
        self
    }

    async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }
}

fn backend_error(operation: &'static str, message: &str) -> ContactsApiError {
    ContactsApiError::Status {
        operation,
        status: 500,
        code: ErrorCode::Internal,
        message: message.to_string(),
    }
}

#[async_trait]
impl ContactsApi for TestContactsApi {
    async fn list_contacts(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<ContactListResponse, ContactsApiError> {
        self.calls.lock().await.push(format!("list:{page}:{limit}"));
        if let Some(delay) = self.list_delays.get(&page) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(message) = &self.fail_list_with {
            return Err(backend_error("list contacts", message));
        }
        let contacts = self.contacts.lock().await;
        let start = ((page.saturating_sub(1)) * limit) as usize;
        Ok(ContactListResponse {
            contacts: contacts
                .iter()
                .skip(start)
                .take(limit as usize)
                .cloned()
                .collect(),
            total: contacts.len() as u64,
        })
    }

    async fn create_contact(
        &self,
        payload: &ContactPayload,
    ) -> Result<Option<Contact>, ContactsApiError> {
        self.calls.lock().await.push("create".to_string());
        let mut contacts = self.contacts.lock().await;
        let created = Contact {
            id: ContactId::new(format!("c{}", contacts.len() + 1)),
            first_name: payload.first_name.clone(),
            last_name: payload.last_name.clone(),
            email: payload.email.clone(),
            phone: payload.phone.clone(),
            company: payload.company.clone(),
            job_title: payload.job_title.clone(),
        };
        contacts.push(created.clone());
        Ok(Some(created))
    }

    async fn update_contact(
        &self,
        id: &ContactId,
        payload: &ContactPayload,
    ) -> Result<Option<Contact>, ContactsApiError> {
        self.calls.lock().await.push(format!("update:{id}"));
        let mut contacts = self.contacts.lock().await;
        let Some(existing) = contacts.iter_mut().find(|c| &c.id == id) else {
            return Err(ContactsApiError::Status {
                operation: "update contact",
                status: 404,
                code: ErrorCode::NotFound,
                message: "Contact not found".into(),
            });
        };
        existing.first_name = payload.first_name.clone();
        existing.email = payload.email.clone();
        Ok(Some(existing.clone()))
    }

    async fn delete_contact(&self, id: &ContactId) -> Result<(), ContactsApiError> {
        self.calls.lock().await.push(format!("delete:{id}"));
        if let Some(message) = &self.fail_delete_with {
            return Err(backend_error("delete contact", message));
        }
        self.contacts.lock().await.retain(|c| &c.id != id);
        Ok(())
    }
}

async fn next_event(events: &mut broadcast::Receiver<ClientEvent>) -> ClientEvent {
    timeout(Duration::from_secs(2), events.recv())
        .await
        .expect("event before timeout")
        .expect("event channel open")
}

fn payload(first: &str) -> ContactPayload {
    ContactPayload {
        first_name: first.into(),
        last_name: "Hopper".into(),
        email: "grace@example.com".into(),
        phone: "555-0101".into(),
        company: None,
        job_title: None,
    }
}

#[tokio::test]
async fn load_page_returns_requested_slice_and_page_count() {
    let client = ContactsClient::new(TestContactsApi::with_contacts(12));

    let page = client.load_page(2).await.expect("page 2");
    assert_eq!(page.page, 2);
    assert_eq!(page.total, 12);
    assert_eq!(page.total_pages, 3);
    let ids: Vec<&str> = page.contacts.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["c6", "c7", "c8", "c9", "c10"]);

    let calls = client.api.calls().await;
    assert_eq!(calls, vec!["list:2:5".to_string()]);
}

#[tokio::test]
async fn load_page_treats_page_zero_as_first_page() {
    let client = ContactsClient::new(TestContactsApi::with_contacts(3));
    let page = client.load_page(0).await.expect("page");
    assert_eq!(page.page, 1);
    assert_eq!(page.contacts.len(), 3);
}

#[tokio::test]
async fn fetch_page_emits_page_loaded_event() {
    let client = ContactsClient::new(TestContactsApi::with_contacts(7));
    let mut events = client.subscribe_events();

    client.fetch_page(PageRequest { seq: 1, page: 2 }).await;

    match next_event(&mut events).await {
        ClientEvent::PageLoaded { seq, page } => {
            assert_eq!(seq, 1);
            assert_eq!(page.page, 2);
            assert_eq!(page.contacts.len(), 2);
            assert_eq!(page.total_pages, 2);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn newer_fetch_aborts_in_flight_fetch() {
    let api = TestContactsApi::with_contacts(12).delay_page(1, Duration::from_millis(400));
    let client = ContactsClient::new(api);
    let mut events = client.subscribe_events();

    client.fetch_page(PageRequest { seq: 1, page: 1 }).await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    client.fetch_page(PageRequest { seq: 2, page: 2 }).await;

    match next_event(&mut events).await {
        ClientEvent::PageLoaded { seq, page } => {
            assert_eq!(seq, 2);
            assert_eq!(page.page, 2);
        }
        other => panic!("unexpected event {other:?}"),
    }

    let late = timeout(Duration::from_millis(700), events.recv()).await;
    assert!(late.is_err(), "superseded fetch must not report: {late:?}");
}

#[tokio::test]
async fn fetch_failure_emits_failed_event() {
    let client = ContactsClient::new(TestContactsApi::with_contacts(3).failing_list("db offline"));
    let mut events = client.subscribe_events();

    client.fetch_page(PageRequest { seq: 4, page: 1 }).await;

    match next_event(&mut events).await {
        ClientEvent::PageFetchFailed { seq, page, message } => {
            assert_eq!(seq, 4);
            assert_eq!(page, 1);
            assert!(message.contains("db offline"), "message: {message}");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn save_with_identifier_issues_update_not_create() {
    let client = ContactsClient::new(TestContactsApi::with_contacts(3));

    let saved = client
        .save_contact(SaveRequest::Update {
            id: ContactId::new("c2"),
            payload: payload("Grace"),
        })
        .await
        .expect("update");

    assert_eq!(saved.map(|c| c.id), Some(ContactId::new("c2")));
    assert_eq!(client.api.calls().await, vec!["update:c2".to_string()]);
}

#[tokio::test]
async fn save_without_identifier_creates() {
    let client = ContactsClient::new(TestContactsApi::with_contacts(3));
    let saved = client
        .save_contact(SaveRequest::Create(payload("Grace")))
        .await
        .expect("create")
        .expect("created contact");
    assert_eq!(saved.id, ContactId::new("c4"));
    assert_eq!(client.api.calls().await, vec!["create".to_string()]);
}

#[tokio::test]
async fn edit_flow_updates_and_refetches_current_page() {
    let client = ContactsClient::new(TestContactsApi::with_contacts(12));
    let mut state = ContactViewState::new();

    let ViewCommand::FetchPage(request) = state.refresh() else {
        panic!("expected fetch");
    };
    let page = client.load_page(request.page).await.expect("page");
    assert_eq!(state.apply_page_loaded(request.seq, page), PageApply::Applied);

    assert!(state.open_edit(&ContactId::new("c3")));
    *state
        .draft_field_mut(shared::domain::ContactField::FirstName)
        .expect("draft") = "Ada".into();
    let ViewCommand::Save(save) = state.submit().expect("submit") else {
        panic!("expected save");
    };
    assert!(save.is_update());
    client.save_contact(save).await.expect("saved");

    let ViewCommand::FetchPage(request) = state.apply_save_succeeded() else {
        panic!("expected refetch");
    };
    let page = client.load_page(request.page).await.expect("page");
    state.apply_page_loaded(request.seq, page);

    assert_eq!(state.rows()[0].first_name, "Ada");
    assert_eq!(state.rows()[0].id, ContactId::new("c3"));
    assert!(!state.modal().is_open());
}

#[tokio::test]
async fn failed_delete_leaves_row_displayed() {
    let client =
        ContactsClient::new(TestContactsApi::with_contacts(5).failing_delete("network error"));
    let mut state = ContactViewState::new();

    let ViewCommand::FetchPage(request) = state.refresh() else {
        panic!("expected fetch");
    };
    let page = client.load_page(request.page).await.expect("page");
    state.apply_page_loaded(request.seq, page);

    let target = ContactId::new("c4");
    assert!(state.request_delete(&target));
    let Some(ViewCommand::Delete(id)) = state.confirm_delete() else {
        panic!("expected delete");
    };

    let err = client.delete_contact(&id).await.expect_err("delete must fail");
    state.apply_delete_failed(err.to_string());

    assert!(state.rows().iter().any(|c| c.id == target));
    assert_eq!(state.rows().len(), 5);
    assert!(state
        .last_error()
        .is_some_and(|message| message.contains("network error")));
}

#[tokio::test]
async fn successful_delete_removes_row_after_refetch() {
    let client = ContactsClient::new(TestContactsApi::with_contacts(6));
    let mut state = ContactViewState::new();

    let ViewCommand::FetchPage(request) = state.refresh() else {
        panic!("expected fetch");
    };
    state.apply_page_loaded(request.seq, client.load_page(request.page).await.expect("page"));

    state.request_delete(&ContactId::new("c1"));
    let Some(ViewCommand::Delete(id)) = state.confirm_delete() else {
        panic!("expected delete");
    };
    client.delete_contact(&id).await.expect("delete");

    let ViewCommand::FetchPage(request) = state.apply_delete_succeeded() else {
        panic!("expected refetch");
    };
    state.apply_page_loaded(request.seq, client.load_page(request.page).await.expect("page"));

    assert!(state.rows().iter().all(|c| c.id != ContactId::new("c1")));
    assert_eq!(state.rows().len(), 5);
    assert_eq!(state.total_pages(), 1);
}
