use std::fmt;

use serde::{Deserialize, Serialize};

use super::Entity;

/// Seniority of a requisition template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoleLevel {
    Entry,
    Mid,
    Senior,
    Lead,
    Manager,
    Director,
}

impl RoleLevel {
    pub const ALL: [RoleLevel; 6] = [
        RoleLevel::Entry,
        RoleLevel::Mid,
        RoleLevel::Senior,
        RoleLevel::Lead,
        RoleLevel::Manager,
        RoleLevel::Director,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RoleLevel::Entry => "Entry",
            RoleLevel::Mid => "Mid",
            RoleLevel::Senior => "Senior",
            RoleLevel::Lead => "Lead",
            RoleLevel::Manager => "Manager",
            RoleLevel::Director => "Director",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|l| l.label().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for RoleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Job requisition template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub department: String,
    pub level: RoleLevel,
    #[serde(default)]
    pub skills_required: Vec<String>,
    #[serde(default)]
    pub experience_min: u32,
    #[serde(default)]
    pub experience_max: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

impl Entity for Role {
    fn id(&self) -> &str {
        &self.id
    }
}
