use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use super::{into_draft, non_empty, require_ref, text, Draft, EntityForm, FieldErrors};
use crate::models::{Attachment, JobStatus};
use crate::store::Store;

/// Job creation. Status is not asked for and always starts as Open.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct JobForm {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Client is required"))]
    pub client_id: String,
    #[validate(length(min = 1, message = "Role is required"))]
    pub role_id: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[serde(deserialize_with = "text")]
    pub deadline: String,
    #[validate(nested)]
    pub attachments: Vec<Attachment>,
}

fn check_refs(client_id: &str, role_id: &str, store: &Store, errors: &mut FieldErrors) {
    require_ref(
        errors,
        "clientId",
        client_id,
        store.clients().contains(client_id),
        "client",
    );
    require_ref(
        errors,
        "roleId",
        role_id,
        store.roles().contains(role_id),
        "role",
    );
}

impl EntityForm for JobForm {
    fn cross_check(&self, store: &Store, errors: &mut FieldErrors) {
        check_refs(&self.client_id, &self.role_id, store, errors);
    }
}

impl JobForm {
    pub fn payload(&self) -> Draft {
        job_payload(
            &self.title,
            &self.client_id,
            &self.role_id,
            &self.description,
            &self.deadline,
            JobStatus::Open,
            &self.attachments,
        )
    }
}

/// Job editing, where the status must be chosen.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct JobEditForm {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Client is required"))]
    pub client_id: String,
    #[validate(length(min = 1, message = "Role is required"))]
    pub role_id: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[serde(deserialize_with = "text")]
    pub deadline: String,
    #[serde(deserialize_with = "text")]
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
    #[validate(nested)]
    pub attachments: Vec<Attachment>,
}

impl EntityForm for JobEditForm {
    fn cross_check(&self, store: &Store, errors: &mut FieldErrors) {
        check_refs(&self.client_id, &self.role_id, store, errors);
        if !self.status.is_empty() && JobStatus::parse(&self.status).is_none() {
            errors.add("status", "Unknown status");
        }
    }
}

impl JobEditForm {
    pub fn payload(&self) -> Draft {
        job_payload(
            &self.title,
            &self.client_id,
            &self.role_id,
            &self.description,
            &self.deadline,
            JobStatus::parse(&self.status).unwrap_or_default(),
            &self.attachments,
        )
    }
}

fn job_payload(
    title: &str,
    client_id: &str,
    role_id: &str,
    description: &str,
    deadline: &str,
    status: JobStatus,
    attachments: &[Attachment],
) -> Draft {
    let mut body = into_draft(json!({
        "title": title,
        "clientId": client_id,
        "roleId": role_id,
        "description": description,
        "status": status,
        "attachments": attachments,
    }));
    if let Some(deadline) = non_empty(deadline) {
        body.insert("deadline".into(), json!(deadline));
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::parse;
    use crate::store::fixtures::seeded;

    fn draft() -> Draft {
        into_draft(json!({
            "title": "QA Engineer",
            "clientId": "1",
            "roleId": "1",
            "description": "desc",
            "deadline": ""
        }))
    }

    #[test]
    fn test_create_defaults_status_to_open() {
        let form: JobForm = parse(&draft(), &seeded()).unwrap();
        let body = form.payload();
        assert_eq!(body["status"], "Open");
        assert_eq!(body["title"], "QA Engineer");
        assert!(body.get("deadline").is_none());
    }

    #[test]
    fn test_create_ignores_status_in_draft() {
        let mut d = draft();
        d.insert("status".into(), json!("Closed"));
        let form: JobForm = parse(&d, &seeded()).unwrap();
        assert_eq!(form.payload()["status"], "Open");
    }

    #[test]
    fn test_unknown_client_is_rejected() {
        let mut d = draft();
        d.insert("clientId".into(), json!("404"));
        let errors = parse::<JobForm>(&d, &seeded()).unwrap_err();
        assert_eq!(errors.get("clientId").unwrap(), ["Unknown client"]);
    }

    #[test]
    fn test_edit_requires_status() {
        let errors = parse::<JobEditForm>(&draft(), &seeded()).unwrap_err();
        assert_eq!(errors.get("status").unwrap(), ["Status is required"]);

        let mut d = draft();
        d.insert("status".into(), json!("in progress"));
        let form: JobEditForm = parse(&d, &seeded()).unwrap();
        assert_eq!(form.payload()["status"], "In Progress");
    }

    #[test]
    fn test_incomplete_attachment_is_reported() {
        let mut d = draft();
        d.insert(
            "attachments".into(),
            json!([{ "filename": "jd.pdf", "filetype": "application/pdf", "filedata": "" }]),
        );
        let errors = parse::<JobForm>(&d, &seeded()).unwrap_err();
        assert_eq!(
            errors.get("attachments[0].filedata").unwrap(),
            ["File content is required"]
        );
    }
}
