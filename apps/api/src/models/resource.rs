use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Attachment, Entity, FileValue};

/// How a candidate reached the pipeline. Older payloads use `Self` and
/// `Freelancer`; both are read as their current names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceType {
    #[serde(alias = "Self")]
    Cognine,
    #[serde(alias = "Freelancer")]
    Contract,
    Vendor,
    Direct,
}

impl ResourceType {
    pub const ALL: [ResourceType; 4] = [
        ResourceType::Cognine,
        ResourceType::Contract,
        ResourceType::Vendor,
        ResourceType::Direct,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ResourceType::Cognine => "Cognine",
            ResourceType::Contract => "Contract",
            ResourceType::Vendor => "Vendor",
            ResourceType::Direct => "Direct",
        }
    }

    /// Name the type had in older payloads, if it was renamed.
    pub fn legacy_label(&self) -> Option<&'static str> {
        match self {
            ResourceType::Cognine => Some("Self"),
            ResourceType::Contract => Some("Freelancer"),
            ResourceType::Vendor | ResourceType::Direct => None,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|t| {
            t.label().eq_ignore_ascii_case(value)
                || t.legacy_label().is_some_and(|l| l.eq_ignore_ascii_case(value))
        })
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterviewStatus {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    Passed,
    Failed,
    #[serde(rename = "On Hold")]
    OnHold,
}

impl InterviewStatus {
    pub const ALL: [InterviewStatus; 5] = [
        InterviewStatus::NotStarted,
        InterviewStatus::InProgress,
        InterviewStatus::Passed,
        InterviewStatus::Failed,
        InterviewStatus::OnHold,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            InterviewStatus::NotStarted => "Not Started",
            InterviewStatus::InProgress => "In Progress",
            InterviewStatus::Passed => "Passed",
            InterviewStatus::Failed => "Failed",
            InterviewStatus::OnHold => "On Hold",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.label().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A candidate tracked through an interview pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub job_id: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_name: String,
    pub resource_type: ResourceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,
    #[serde(default)]
    pub interview_status: InterviewStatus,
    #[serde(default)]
    pub rounds_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_round: Option<u32>,
    #[serde(default)]
    pub experience: f64,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume: Option<FileValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub created_at: String,
}

impl Entity for Resource {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundStatus {
    #[default]
    Scheduled,
    Completed,
    Passed,
    Failed,
    #[serde(rename = "No Show")]
    NoShow,
}

impl RoundStatus {
    pub const ALL: [RoundStatus; 5] = [
        RoundStatus::Scheduled,
        RoundStatus::Completed,
        RoundStatus::Passed,
        RoundStatus::Failed,
        RoundStatus::NoShow,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RoundStatus::Scheduled => "Scheduled",
            RoundStatus::Completed => "Completed",
            RoundStatus::Passed => "Passed",
            RoundStatus::Failed => "Failed",
            RoundStatus::NoShow => "No Show",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.label().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for RoundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One interview session in a resource's pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRound {
    pub id: String,
    pub resource_id: String,
    pub round_number: u32,
    pub round_type: String,
    pub interviewer: String,
    pub date: String,
    #[serde(default)]
    pub status: RoundStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub created_at: String,
}

impl Entity for InterviewRound {
    fn id(&self) -> &str {
        &self.id
    }
}
