use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    domain::ContactId,
    error::{ApiError, ApiException},
    protocol::{Contact, ContactListResponse, ContactPayload, ListContactsQuery},
};
use tracing::{debug, warn};
use url::Url;

use crate::{
    config::{normalize_base_url, ClientSettings},
    error::ContactsApiError,
    ContactsApi,
};

const CONTACTS_PATH: [&str; 2] = ["api", "contacts"];

/// REST transport against `{base}/api/contacts`.
pub struct HttpContactsApi {
    http: Client,
    base_url: Url,
}

impl HttpContactsApi {
    pub fn new(settings: &ClientSettings) -> Result<Self, ContactsApiError> {
        let base_url = normalize_base_url(&settings.api_base_url)?;
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|source| ContactsApiError::Transport {
                operation: "build http client",
                source,
            })?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, id: Option<&ContactId>) -> Result<Url, ContactsApiError> {
        let mut url = self.base_url.clone();
        {
            let mut segments =
                url.path_segments_mut()
                    .map_err(|_| ContactsApiError::InvalidBaseUrl {
                        url: self.base_url.to_string(),
                        reason: "url cannot carry a path".into(),
                    })?;
            segments.pop_if_empty().extend(CONTACTS_PATH);
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        Ok(url)
    }
}

async fn ensure_success(
    operation: &'static str,
    response: Response,
) -> Result<Response, ContactsApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let parsed = serde_json::from_str::<ApiError>(&body).ok();
    let exception = ApiException::from_response(status.as_u16(), parsed);
    warn!(operation, status = status.as_u16(), "backend rejected request: {}", exception.message);
    Err(ContactsApiError::Status {
        operation,
        status: status.as_u16(),
        code: exception.code,
        message: exception.message,
    })
}

/// Create and update answer with the stored contact, but only success matters
/// to the caller, so an empty or unexpected body is not an error.
async fn read_saved_contact(
    operation: &'static str,
    response: Response,
) -> Result<Option<Contact>, ContactsApiError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|source| ContactsApiError::Transport { operation, source })?;
    if bytes.is_empty() {
        return Ok(None);
    }
    match serde_json::from_slice::<Contact>(&bytes) {
        Ok(contact) => Ok(Some(contact)),
        Err(err) => {
            debug!(operation, "response body is not a contact: {err}");
            Ok(None)
        }
    }
}

#[async_trait]
impl ContactsApi for HttpContactsApi {
    async fn list_contacts(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<ContactListResponse, ContactsApiError> {
        const OPERATION: &str = "list contacts";
        let response = self
            .http
            .get(self.endpoint(None)?)
            .query(&ListContactsQuery { page, limit })
            .send()
            .await
            .map_err(|source| ContactsApiError::Transport {
                operation: OPERATION,
                source,
            })?;
        ensure_success(OPERATION, response)
            .await?
            .json()
            .await
            .map_err(|err| ContactsApiError::Decode {
                operation: OPERATION,
                reason: err.to_string(),
            })
    }

    async fn create_contact(
        &self,
        payload: &ContactPayload,
    ) -> Result<Option<Contact>, ContactsApiError> {
        const OPERATION: &str = "create contact";
        let response = self
            .http
            .post(self.endpoint(None)?)
            .json(payload)
            .send()
            .await
            .map_err(|source| ContactsApiError::Transport {
                operation: OPERATION,
                source,
            })?;
        let response = ensure_success(OPERATION, response).await?;
        read_saved_contact(OPERATION, response).await
    }

    async fn update_contact(
        &self,
        id: &ContactId,
        payload: &ContactPayload,
    ) -> Result<Option<Contact>, ContactsApiError> {
        const OPERATION: &str = "update contact";
        let response = self
            .http
            .put(self.endpoint(Some(id))?)
            .json(payload)
            .send()
            .await
            .map_err(|source| ContactsApiError::Transport {
                operation: OPERATION,
                source,
            })?;
        let response = ensure_success(OPERATION, response).await?;
        read_saved_contact(OPERATION, response).await
    }

    async fn delete_contact(&self, id: &ContactId) -> Result<(), ContactsApiError> {
        const OPERATION: &str = "delete contact";
        let response = self
            .http
            .delete(self.endpoint(Some(id))?)
            .send()
            .await
            .map_err(|source| ContactsApiError::Transport {
                operation: OPERATION,
                source,
            })?;
        ensure_success(OPERATION, response).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
