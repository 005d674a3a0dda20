use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub company: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub jobs_count: u32,
    #[serde(default)]
    pub resources_count: u32,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contacts: Vec<Contact>,
}

impl Client {
    /// Label captured by navigation when the client is selected.
    pub fn display_name(&self) -> &str {
        if self.company.is_empty() {
            &self.name
        } else {
            &self.company
        }
    }
}

impl Entity for Client {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Point of contact on a client or vendor record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[validate(length(min = 1, message = "Contact name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Contact role is required"))]
    pub role: String,
    #[validate(length(min = 1, message = "Contact phone is required"))]
    pub phone: String,
    #[validate(
        length(min = 1, message = "Contact email is required"),
        email(message = "Invalid email")
    )]
    pub email: String,
}
