use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use super::{coerce_number, into_draft, list_or_csv, non_empty, text, Draft, EntityForm, FieldErrors};
use crate::models::{AccessRole, RoleLevel};
use crate::store::Store;

/// Requisition template.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct RoleForm {
    #[validate(length(min = 1, message = "Role name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Department is required"))]
    pub department: String,
    #[serde(deserialize_with = "text")]
    #[validate(length(min = 1, message = "Level is required"))]
    pub level: String,
    #[serde(deserialize_with = "list_or_csv")]
    #[validate(length(min = 1, message = "Add at least one skill"))]
    pub skills_required: Vec<String>,
    pub experience_min: Value,
    pub experience_max: Value,
    #[serde(deserialize_with = "text")]
    pub description: String,
}

impl EntityForm for RoleForm {
    fn cross_check(&self, _store: &Store, errors: &mut FieldErrors) {
        if !self.level.is_empty() && RoleLevel::parse(&self.level).is_none() {
            errors.add("level", "Unknown level");
        }
        let min = coerce_number(errors, "experienceMin", "Minimum experience", &self.experience_min);
        let max = coerce_number(errors, "experienceMax", "Maximum experience", &self.experience_max);
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                errors.add(
                    "experienceMax",
                    "Maximum experience must not be below the minimum",
                );
            }
        }
    }
}

impl RoleForm {
    fn years(value: &Value) -> u32 {
        coerce_number(&mut FieldErrors::new(), "", "", value)
            .map(|n| n.round() as u32)
            .unwrap_or_default()
    }

    pub fn payload(&self) -> Draft {
        let mut body = into_draft(json!({
            "name": self.name,
            "department": self.department,
            "level": RoleLevel::parse(&self.level).unwrap_or(RoleLevel::Entry),
            "skillsRequired": self.skills_required,
            "experienceMin": Self::years(&self.experience_min),
            "experienceMax": Self::years(&self.experience_max),
        }));
        if let Some(description) = non_empty(&self.description) {
            body.insert("description".into(), json!(description));
        }
        body
    }
}

/// Grants one or more access roles to a user. Roles may be given as codes
/// (`ACCOUNT_MANAGER`) or labels (`Account Manager`).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct RoleAssignmentForm {
    #[validate(length(min = 1, message = "User is required"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "Select at least one role"))]
    pub roles: Vec<String>,
}

impl EntityForm for RoleAssignmentForm {
    fn cross_check(&self, store: &Store, errors: &mut FieldErrors) {
        super::require_ref(
            errors,
            "userId",
            &self.user_id,
            store.users().contains(&self.user_id),
            "user",
        );
        for (i, role) in self.roles.iter().enumerate() {
            if AccessRole::parse(role).is_none() {
                errors.add(format!("roles[{i}]"), format!("Unknown role {role}"));
            }
        }
    }
}

impl RoleAssignmentForm {
    /// Selected roles in submission order, duplicates dropped.
    pub fn access_roles(&self) -> Vec<AccessRole> {
        let mut out = Vec::new();
        for role in self.roles.iter().filter_map(|r| AccessRole::parse(r)) {
            if !out.contains(&role) {
                out.push(role);
            }
        }
        out
    }
}
