use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use super::{
    coerce_number, into_draft, list_or_csv, non_empty, require_ref, text, Draft, EntityForm,
    FieldErrors,
};
use crate::models::{Attachment, FileValue, InterviewStatus, ResourceType, RoundStatus};
use crate::store::Store;

const EXPERIENCE: &str = "Experience";

/// Rules shared by resource creation and editing: the job must exist,
/// experience must be a non-negative number, and a vendor is required
/// exactly when the resource is vendor supplied.
fn check_resource(
    store: &Store,
    errors: &mut FieldErrors,
    job_id: &str,
    resource_type: &str,
    vendor_id: &str,
    experience: &Value,
) {
    require_ref(errors, "jobId", job_id, store.jobs().contains(job_id), "job");
    coerce_number(errors, "experience", EXPERIENCE, experience);

    if resource_type.is_empty() {
        return;
    }
    match ResourceType::parse(resource_type) {
        None => errors.add("resourceType", "Unknown type"),
        Some(ResourceType::Vendor) if vendor_id.trim().is_empty() => {
            errors.add("vendorId", "Vendor is required")
        }
        Some(ResourceType::Vendor) => require_ref(
            errors,
            "vendorId",
            vendor_id,
            store.vendors().contains(vendor_id),
            "vendor",
        ),
        Some(_) => {}
    }
}

fn experience_value(value: &Value) -> f64 {
    coerce_number(&mut FieldErrors::new(), "experience", EXPERIENCE, value).unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn resource_payload(
    name: &str,
    email: &str,
    phone: &str,
    job_id: &str,
    resource_type: &str,
    vendor_id: &str,
    experience: &Value,
    skills: &[String],
    attachments: &[Attachment],
) -> Draft {
    let kind = ResourceType::parse(resource_type).unwrap_or(ResourceType::Direct);
    let mut body = into_draft(json!({
        "name": name,
        "email": email,
        "phone": phone,
        "jobId": job_id,
        "resourceType": kind,
        "experience": experience_value(experience),
        "skills": skills,
        "attachments": attachments,
    }));
    // a vendor id on a non-vendor resource is dropped, never sent
    if kind == ResourceType::Vendor {
        if let Some(vendor_id) = non_empty(vendor_id) {
            body.insert("vendorId".into(), json!(vendor_id));
        }
    }
    body
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Invalid email")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Job is required"))]
    pub job_id: String,
    #[serde(deserialize_with = "text")]
    #[validate(length(min = 1, message = "Type is required"))]
    pub resource_type: String,
    #[serde(deserialize_with = "text")]
    pub vendor_id: String,
    pub experience: Value,
    #[serde(deserialize_with = "list_or_csv")]
    #[validate(length(min = 1, message = "Select at least one skill"))]
    pub skills: Vec<String>,
    #[validate(nested)]
    pub resume: Option<Attachment>,
    #[validate(nested)]
    pub attachments: Vec<Attachment>,
}

impl EntityForm for ResourceForm {
    fn cross_check(&self, store: &Store, errors: &mut FieldErrors) {
        check_resource(
            store,
            errors,
            &self.job_id,
            &self.resource_type,
            &self.vendor_id,
            &self.experience,
        );
    }
}

impl ResourceForm {
    pub fn payload(&self) -> Draft {
        let mut body = resource_payload(
            &self.name,
            &self.email,
            &self.phone,
            &self.job_id,
            &self.resource_type,
            &self.vendor_id,
            &self.experience,
            &self.skills,
            &self.attachments,
        );
        body.insert("interviewStatus".into(), json!(InterviewStatus::NotStarted));
        if let Some(resume) = &self.resume {
            body.insert("resume".into(), json!(FileValue::from(resume.clone())));
        }
        body
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceEditForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Invalid email")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Job is required"))]
    pub job_id: String,
    #[serde(deserialize_with = "text")]
    #[validate(length(min = 1, message = "Status is required"))]
    pub interview_status: String,
    #[serde(deserialize_with = "text")]
    #[validate(length(min = 1, message = "Type is required"))]
    pub resource_type: String,
    #[serde(deserialize_with = "text")]
    pub vendor_id: String,
    pub experience: Value,
    #[serde(deserialize_with = "list_or_csv")]
    #[validate(length(min = 1, message = "Select at least one skill"))]
    pub skills: Vec<String>,
    #[validate(nested)]
    pub attachments: Vec<Attachment>,
}

impl EntityForm for ResourceEditForm {
    fn cross_check(&self, store: &Store, errors: &mut FieldErrors) {
        check_resource(
            store,
            errors,
            &self.job_id,
            &self.resource_type,
            &self.vendor_id,
            &self.experience,
        );
        if !self.interview_status.is_empty()
            && InterviewStatus::parse(&self.interview_status).is_none()
        {
            errors.add("interviewStatus", "Unknown status");
        }
    }
}

impl ResourceEditForm {
    pub fn payload(&self) -> Draft {
        let mut body = resource_payload(
            &self.name,
            &self.email,
            &self.phone,
            &self.job_id,
            &self.resource_type,
            &self.vendor_id,
            &self.experience,
            &self.skills,
            &self.attachments,
        );
        body.insert(
            "interviewStatus".into(),
            json!(InterviewStatus::parse(&self.interview_status).unwrap_or_default()),
        );
        // switching away from Vendor clears the stored vendor
        if !body.contains_key("vendorId") {
            body.insert("vendorId".into(), Value::Null);
        }
        body
    }
}

fn scheduled() -> String {
    RoundStatus::Scheduled.label().to_string()
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct RoundForm {
    #[validate(length(min = 1, message = "Resource is required"))]
    pub resource_id: String,
    #[serde(deserialize_with = "text")]
    #[validate(length(min = 1, message = "Round type is required"))]
    pub round_type: String,
    #[serde(deserialize_with = "text")]
    #[validate(length(min = 1, message = "Interviewer is required"))]
    pub interviewer: String,
    #[serde(deserialize_with = "text")]
    #[validate(length(min = 1, message = "Date is required"))]
    pub date: String,
    #[serde(default = "scheduled", deserialize_with = "text")]
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
    #[serde(deserialize_with = "text")]
    pub feedback: String,
    #[validate(nested)]
    pub attachments: Vec<Attachment>,
}

impl EntityForm for RoundForm {
    fn cross_check(&self, store: &Store, errors: &mut FieldErrors) {
        require_ref(
            errors,
            "resourceId",
            &self.resource_id,
            store.resources().contains(&self.resource_id),
            "resource",
        );
        if !self.status.is_empty() && RoundStatus::parse(&self.status).is_none() {
            errors.add("status", "Unknown status");
        }
    }
}

impl RoundForm {
    pub fn payload(&self, round_number: u32) -> Draft {
        let mut body = into_draft(json!({
            "resourceId": self.resource_id,
            "roundNumber": round_number,
            "roundType": self.round_type,
            "interviewer": self.interviewer,
            "date": self.date,
            "status": RoundStatus::parse(&self.status).unwrap_or_default(),
            "attachments": self.attachments,
        }));
        if let Some(feedback) = non_empty(&self.feedback) {
            body.insert("feedback".into(), json!(feedback));
        }
        body
    }
}
