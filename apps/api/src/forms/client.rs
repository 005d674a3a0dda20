use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use super::{into_draft, non_empty, text, Draft, EntityForm, FieldErrors};
use crate::models::{Attachment, Contact, FileValue};
use crate::store::Store;

fn yes() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Invalid email")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Company is required"))]
    pub company: String,
    #[validate(length(min = 1, message = "Industry is required"))]
    pub industry: String,
    /// Contacts section toggle; on unless the draft turns it off.
    #[serde(default = "yes")]
    pub include_contacts: bool,
    #[validate(nested)]
    pub contacts: Vec<Contact>,
}

impl EntityForm for ClientForm {
    fn cross_check(&self, _store: &Store, errors: &mut FieldErrors) {
        if self.include_contacts && self.contacts.is_empty() {
            errors.add("contacts", "At least one contact is required");
        }
    }
}

impl ClientForm {
    pub fn payload(&self) -> Draft {
        let mut body = into_draft(json!({
            "name": self.name,
            "email": self.email,
            "phone": self.phone,
            "company": self.company,
            "industry": self.industry,
        }));
        if self.include_contacts {
            body.insert("contacts".into(), json!(self.contacts));
        }
        body
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct VendorForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Invalid email")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Company is required"))]
    pub company: String,
    #[validate(length(min = 1, message = "Industry is required"))]
    pub industry: String,
    #[serde(deserialize_with = "text")]
    pub location: String,
    #[validate(nested)]
    pub logo: Option<Attachment>,
    #[validate(nested)]
    pub contacts: Vec<Contact>,
}

impl EntityForm for VendorForm {}

impl VendorForm {
    pub fn payload(&self) -> Draft {
        let mut body = into_draft(json!({
            "name": self.name,
            "email": self.email,
            "phone": self.phone,
            "company": self.company,
            "industry": self.industry,
            "contacts": self.contacts,
        }));
        if let Some(location) = non_empty(&self.location) {
            body.insert("location".into(), json!(location));
        }
        if let Some(logo) = &self.logo {
            body.insert("logo".into(), json!(FileValue::from(logo.clone())));
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{into_draft, parse};
    use serde_json::json;

    fn client_draft() -> Draft {
        into_draft(json!({
            "name": "Jane Doe",
            "email": "jane@techcorp.com",
            "phone": "(555) 123-4567",
            "company": "TechCorp Inc",
            "industry": "Technology",
            "contacts": [
                { "name": "Bob", "role": "CTO", "phone": "1", "email": "bob@techcorp.com" }
            ]
        }))
    }

    #[test]
    fn test_valid_client() {
        let form: ClientForm = parse(&client_draft(), &Store::new()).unwrap();
        let body = form.payload();
        assert_eq!(body["company"], "TechCorp Inc");
        assert_eq!(body["contacts"][0]["role"], "CTO");
        assert!(body.get("includeContacts").is_none());
    }

    #[test]
    fn test_client_requires_a_contact_unless_disabled() {
        let mut draft = client_draft();
        draft.insert("contacts".into(), json!([]));
        let errors = parse::<ClientForm>(&draft, &Store::new()).unwrap_err();
        assert_eq!(errors.get("contacts").unwrap(), ["At least one contact is required"]);

        draft.insert("includeContacts".into(), json!(false));
        let form: ClientForm = parse(&draft, &Store::new()).unwrap();
        assert!(form.payload().get("contacts").is_none());
    }

    #[test]
    fn test_nested_contact_errors_are_addressed_by_index() {
        let mut draft = client_draft();
        draft.insert(
            "contacts".into(),
            json!([{ "name": "Bob", "role": "CTO", "phone": "1", "email": "not-an-email" }]),
        );
        let errors = parse::<ClientForm>(&draft, &Store::new()).unwrap_err();
        assert_eq!(errors.get("contacts[0].email").unwrap(), ["Invalid email"]);
    }

    #[test]
    fn test_empty_client_reports_every_required_field() {
        let errors = parse::<ClientForm>(&Draft::new(), &Store::new()).unwrap_err();
        for field in ["name", "email", "phone", "company", "industry", "contacts"] {
            assert!(errors.contains(field), "missing error for {field}");
        }
    }

    #[test]
    fn test_vendor_contacts_are_optional() {
        let draft = into_draft(json!({
            "name": "Sarah",
            "email": "sarah@abc.com",
            "phone": "1",
            "company": "ABC Staffing",
            "industry": "Staffing",
            "location": null,
            "logo": { "filename": "logo.png", "filetype": "image/png", "filedata": "eA==" }
        }));
        let form: VendorForm = parse(&draft, &Store::new()).unwrap();
        let body = form.payload();
        assert_eq!(body["logo"]["fileName"], "logo.png");
        assert!(body.get("location").is_none());
        assert_eq!(body["contacts"], json!([]));
    }
}
