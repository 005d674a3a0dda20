use std::fmt;

use serde::{Deserialize, Serialize};

use super::Entity;

/// Access roles a back-office user can hold. The upstream speaks the
/// constant codes (`ACCOUNT_MANAGER`); the dashboard shows the labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessRole {
    #[serde(alias = "Admin")]
    Admin,
    #[serde(alias = "Account Manager")]
    AccountManager,
    #[serde(alias = "Recruiter")]
    Recruiter,
    #[serde(alias = "Delivery Manager")]
    DeliveryManager,
    #[serde(alias = "Practice Lead")]
    PracticeLead,
    #[serde(alias = "Sales Manager")]
    SalesManager,
}

impl AccessRole {
    pub const ALL: [AccessRole; 6] = [
        AccessRole::Admin,
        AccessRole::AccountManager,
        AccessRole::Recruiter,
        AccessRole::DeliveryManager,
        AccessRole::PracticeLead,
        AccessRole::SalesManager,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            AccessRole::Admin => "ADMIN",
            AccessRole::AccountManager => "ACCOUNT_MANAGER",
            AccessRole::Recruiter => "RECRUITER",
            AccessRole::DeliveryManager => "DELIVERY_MANAGER",
            AccessRole::PracticeLead => "PRACTICE_LEAD",
            AccessRole::SalesManager => "SALES_MANAGER",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AccessRole::Admin => "Admin",
            AccessRole::AccountManager => "Account Manager",
            AccessRole::Recruiter => "Recruiter",
            AccessRole::DeliveryManager => "Delivery Manager",
            AccessRole::PracticeLead => "Practice Lead",
            AccessRole::SalesManager => "Sales Manager",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.code() == code.trim())
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.label().eq_ignore_ascii_case(label.trim()))
    }

    /// Accepts either a constant code or a display label.
    pub fn parse(value: &str) -> Option<Self> {
        Self::from_code(value).or_else(|| Self::from_label(value))
    }

    pub fn labels() -> Vec<String> {
        Self::ALL.iter().map(|r| r.label().to_string()).collect()
    }
}

impl fmt::Display for AccessRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<AccessRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

impl User {
    pub fn role_labels(&self) -> String {
        self.roles
            .iter()
            .map(|r| r.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Entity for User {
    fn id(&self) -> &str {
        &self.id
    }
}
