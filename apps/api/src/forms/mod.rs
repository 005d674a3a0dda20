//! Entity forms: draft parsing, validation and upstream payloads.
//!
//! A form arrives as a loose JSON draft (whatever the drawer holds). Parsing
//! goes through serde, field rules through `validator`'s derive, and rules
//! that span fields or consult the store through [`EntityForm::cross_check`].
//! Errors are keyed by the camelCase field path the dashboard binds to, with
//! list items addressed as `contacts[0].email`.

pub mod client;
pub mod handlers;
pub mod job;
pub mod resource;
pub mod role;

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::models::EntityKind;
use crate::store::Store;

pub use client::{ClientForm, VendorForm};
pub use job::{JobEditForm, JobForm};
pub use resource::{ResourceEditForm, ResourceForm, RoundForm};
pub use role::{RoleAssignmentForm, RoleForm};

/// Raw field values held by a drawer.
pub type Draft = Map<String, Value>;

/// Key used for errors that do not belong to a single field.
pub const FORM_KEY: &str = "form";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormKind {
    Client,
    Vendor,
    Job,
    JobEdit,
    Resource,
    ResourceEdit,
    Round,
    Role,
    RoleAssignment,
}

impl FormKind {
    pub const ALL: [FormKind; 9] = [
        FormKind::Client,
        FormKind::Vendor,
        FormKind::Job,
        FormKind::JobEdit,
        FormKind::Resource,
        FormKind::ResourceEdit,
        FormKind::Round,
        FormKind::Role,
        FormKind::RoleAssignment,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            FormKind::Client => "client",
            FormKind::Vendor => "vendor",
            FormKind::Job => "job",
            FormKind::JobEdit => "job-edit",
            FormKind::Resource => "resource",
            FormKind::ResourceEdit => "resource-edit",
            FormKind::Round => "round",
            FormKind::Role => "role",
            FormKind::RoleAssignment => "role-assignment",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.slug() == slug)
    }

    /// Entity a successful submission produces or changes.
    pub fn entity(&self) -> EntityKind {
        match self {
            FormKind::Client => EntityKind::Client,
            FormKind::Vendor => EntityKind::Vendor,
            FormKind::Job | FormKind::JobEdit => EntityKind::Job,
            FormKind::Resource | FormKind::ResourceEdit => EntityKind::Resource,
            FormKind::Round => EntityKind::Round,
            FormKind::Role => EntityKind::Role,
            FormKind::RoleAssignment => EntityKind::User,
        }
    }

    /// Default drawer title when the caller gives none.
    pub fn title(&self) -> &'static str {
        match self {
            FormKind::Client => "Create New Client",
            FormKind::Vendor => "Create New Vendor",
            FormKind::Job => "Create New Job",
            FormKind::JobEdit => "Edit Job",
            FormKind::Resource => "Add Resource",
            FormKind::ResourceEdit => "Edit Resource",
            FormKind::Round => "Schedule Round",
            FormKind::Role => "Create New Role",
            FormKind::RoleAssignment => "Assign Role",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Field errors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Folds `validator` output in under `prefix`, converting field names to camelCase.
    pub fn absorb(&mut self, prefix: &str, errors: &ValidationErrors) {
        for (field, kind) in errors.errors() {
            let path = join_path(prefix, &camel_case(&field.to_string()));
            match kind {
                ValidationErrorsKind::Field(list) => {
                    for error in list {
                        let message = error
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("Invalid value ({})", error.code));
                        self.add(path.clone(), message);
                    }
                }
                ValidationErrorsKind::Struct(inner) => self.absorb(&path, inner),
                ValidationErrorsKind::List(items) => {
                    for (index, inner) in items {
                        self.absorb(&format!("{path}[{index}]"), inner);
                    }
                }
            }
        }
    }

    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

fn join_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

pub(crate) fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for c in snake.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Parsing
// ────────────────────────────────────────────────────────────────────────────

pub trait EntityForm: DeserializeOwned + Validate {
    /// Rules spanning several fields or the store's contents.
    fn cross_check(&self, _store: &Store, _errors: &mut FieldErrors) {}
}

/// Parses and validates a draft. No partial result on failure.
pub fn parse<F: EntityForm>(draft: &Draft, store: &Store) -> Result<F, FieldErrors> {
    let form: F = serde_json::from_value(Value::Object(draft.clone())).map_err(|e| {
        let mut errors = FieldErrors::new();
        errors.add(FORM_KEY, e.to_string());
        errors
    })?;
    let mut errors = FieldErrors::new();
    if let Err(e) = form.validate() {
        errors.absorb("", &e);
    }
    form.cross_check(store, &mut errors);
    errors.into_result(form)
}

/// Validates a draft of any form kind without submitting it.
pub fn validate_draft(kind: FormKind, draft: &Draft, store: &Store) -> FieldErrors {
    fn check<F: EntityForm>(draft: &Draft, store: &Store) -> FieldErrors {
        parse::<F>(draft, store).err().unwrap_or_default()
    }
    match kind {
        FormKind::Client => check::<ClientForm>(draft, store),
        FormKind::Vendor => check::<VendorForm>(draft, store),
        FormKind::Job => check::<JobForm>(draft, store),
        FormKind::JobEdit => check::<JobEditForm>(draft, store),
        FormKind::Resource => check::<ResourceForm>(draft, store),
        FormKind::ResourceEdit => check::<ResourceEditForm>(draft, store),
        FormKind::Round => check::<RoundForm>(draft, store),
        FormKind::Role => check::<RoleForm>(draft, store),
        FormKind::RoleAssignment => check::<RoleAssignmentForm>(draft, store),
    }
}

/// Checks that a select field names something the store knows.
pub(crate) fn require_ref(
    errors: &mut FieldErrors,
    field: &str,
    id: &str,
    exists: bool,
    what: &str,
) {
    if !id.is_empty() && !exists {
        errors.add(field, format!("Unknown {what}"));
    }
}

/// Reads a numeric field that may arrive as a number or as text typed into an input.
pub(crate) fn coerce_number(
    errors: &mut FieldErrors,
    field: &str,
    label: &str,
    value: &Value,
) -> Option<f64> {
    let parsed = match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::Number(n) => Some(n.as_f64()),
        Value::String(s) => Some(s.trim().parse::<f64>().ok()),
        _ => Some(None),
    };
    match parsed {
        None => {
            errors.add(field, format!("{label} is required"));
            None
        }
        Some(None) => {
            errors.add(field, format!("{label} must be a number"));
            None
        }
        Some(Some(n)) if n < 0.0 => {
            errors.add(field, format!("{label} must be at least 0"));
            None
        }
        Some(Some(n)) => Some(n),
    }
}

/// Accepts either a JSON array of strings or one comma separated string.
pub(crate) fn list_or_csv<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<String>),
        Text(String),
        Null,
    }

    let items = match Raw::deserialize(deserializer)? {
        Raw::List(list) => list,
        Raw::Text(text) => text.split(',').map(str::to_string).collect(),
        Raw::Null => Vec::new(),
    };
    Ok(items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

/// Treats `null` as the empty string so optional text inputs can be cleared.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub(crate) fn into_draft(value: Value) -> Draft {
    match value {
        Value::Object(map) => map,
        _ => Draft::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("vendor_id"), "vendorId");
        assert_eq!(camel_case("skills_required"), "skillsRequired");
        assert_eq!(camel_case("name"), "name");
    }

    #[test]
    fn test_coerce_number() {
        let mut errors = FieldErrors::new();
        assert_eq!(coerce_number(&mut errors, "experience", "Experience", &json!("4.5")), Some(4.5));
        assert_eq!(coerce_number(&mut errors, "experience", "Experience", &json!(2)), Some(2.0));
        assert!(errors.is_empty());

        assert_eq!(coerce_number(&mut errors, "a", "A", &json!("abc")), None);
        assert_eq!(coerce_number(&mut errors, "b", "B", &json!("")), None);
        assert_eq!(coerce_number(&mut errors, "c", "C", &json!(-1)), None);
        assert_eq!(errors.get("a").unwrap(), ["A must be a number"]);
        assert_eq!(errors.get("b").unwrap(), ["B is required"]);
        assert_eq!(errors.get("c").unwrap(), ["C must be at least 0"]);
    }

    #[test]
    fn test_form_slugs() {
        for kind in FormKind::ALL {
            assert_eq!(FormKind::from_slug(kind.slug()), Some(kind));
            let wire = serde_json::to_value(kind).unwrap();
            assert_eq!(wire, json!(kind.slug()));
        }
    }

    #[test]
    fn test_type_mismatch_is_a_form_error() {
        let store = Store::new();
        let draft = into_draft(json!({ "contacts": "not a list" }));
        let errors = validate_draft(FormKind::Client, &draft, &store);
        assert!(errors.contains(FORM_KEY));
    }
}
