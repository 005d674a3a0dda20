use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Attachment, Entity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JobStatus {
    #[default]
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Closed,
}

impl JobStatus {
    pub const ALL: [JobStatus; 3] = [JobStatus::Open, JobStatus::InProgress, JobStatus::Closed];

    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Open => "Open",
            JobStatus::InProgress => "In Progress",
            JobStatus::Closed => "Closed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.label().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub title: String,
    pub client_id: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub role_id: String,
    #[serde(default)]
    pub role_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub resources_count: u32,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl Entity for Job {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_value(JobStatus::InProgress).unwrap(),
            serde_json::json!("In Progress")
        );
        let parsed: JobStatus = serde_json::from_str("\"Closed\"").unwrap();
        assert_eq!(parsed, JobStatus::Closed);
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!(JobStatus::parse("in progress"), Some(JobStatus::InProgress));
        assert_eq!(JobStatus::parse("archived"), None);
    }
}
