use serde::{Deserialize, Serialize};

use crate::domain::{ContactField, ContactId};

/// Fixed number of contacts requested per page.
pub const CONTACTS_PAGE_SIZE: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(rename = "_id", alias = "id")]
    pub id: ContactId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
}

impl Contact {
    /// Value of a column, with absent optional fields read as empty.
    pub fn field_value(&self, field: ContactField) -> &str {
        match field {
            ContactField::FirstName => &self.first_name,
            ContactField::LastName => &self.last_name,
            ContactField::Email => &self.email,
            ContactField::Phone => &self.phone,
            ContactField::Company => self.company.as_deref().unwrap_or_default(),
            ContactField::JobTitle => self.job_title.as_deref().unwrap_or_default(),
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Body of create and update requests. Never carries the identifier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListContactsQuery {
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactListResponse {
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_backend_contact_with_underscore_id() {
        let raw = r#"{
            "_id": "65f0c1",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "phone": "555-0100",
            "company": "Analytical Engines",
            "__v": 0
        }"#;
        let contact: Contact = serde_json::from_str(raw).expect("decode");
        assert_eq!(contact.id, ContactId::new("65f0c1"));
        assert_eq!(contact.company.as_deref(), Some("Analytical Engines"));
        assert_eq!(contact.job_title, None);
        assert_eq!(contact.field_value(ContactField::JobTitle), "");
    }

    #[test]
    fn payload_omits_blank_optional_fields_and_identifier() {
        let payload = ContactPayload {
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            email: "grace@example.com".into(),
            phone: "555-0101".into(),
            company: None,
            job_title: Some("Rear Admiral".into()),
        };
        let value = serde_json::to_value(&payload).expect("encode");
        assert_eq!(value["firstName"], "Grace");
        assert_eq!(value["jobTitle"], "Rear Admiral");
        assert!(value.get("company").is_none());
        assert!(value.get("_id").is_none());
    }
}
