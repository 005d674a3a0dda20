//! Column sets for every list level.

use serde::Serialize;
use serde_json::json;

use crate::forms::{into_draft, Draft, FormKind};
use crate::models::{
    AccessRole, Client, InterviewStatus, Job, JobStatus, Resource, ResourceType, Role, RoleLevel,
    User, Vendor,
};
use crate::navigation::{Level, NavCommand};
use crate::table::{CellAction, Column};

pub const CLIENT_INDUSTRIES: [&str; 4] = ["Technology", "Consulting", "Finance", "Healthcare"];
pub const VENDOR_INDUSTRIES: [&str; 4] = ["Staffing", "Consulting", "Technology", "Healthcare"];

fn open(into: Level, id: &str) -> Option<CellAction> {
    Some(CellAction::Navigate {
        command: NavCommand::Open {
            into,
            id: id.to_string(),
        },
    })
}

pub(crate) fn form(
    form: FormKind,
    title: impl Into<String>,
    target: Option<&str>,
    defaults: Draft,
) -> CellAction {
    CellAction::OpenForm {
        form,
        title: title.into(),
        target: target.map(str::to_string),
        defaults,
    }
}

/// Current values of an entity as form defaults.
pub(crate) fn as_draft<T: Serialize>(entity: &T) -> Draft {
    serde_json::to_value(entity).map(into_draft).unwrap_or_default()
}

fn plural(n: u32, one: &str, many: &str) -> String {
    format!("{n} {}", if n == 1 { one } else { many })
}

pub fn clients() -> Vec<Column<Client>> {
    vec![
        Column::new("name", "Client Name", |c: &Client| c.name.clone()).text_filter(),
        Column::new("email", "Email", |c: &Client| c.email.clone()).text_filter(),
        Column::new("company", "Company", |c: &Client| c.company.clone()).text_filter(),
        Column::new("industry", "Industry", |c: &Client| c.industry.clone())
            .options(CLIENT_INDUSTRIES),
        Column::new("jobsCount", "Jobs", |c: &Client| c.jobs_count.to_string()).render(
            |c: &Client| (plural(c.jobs_count, "job", "jobs"), open(Level::Jobs, &c.id)),
        ),
        Column::new("resourcesCount", "Resources", |c: &Client| {
            c.resources_count.to_string()
        })
        .render(|c: &Client| {
            (
                plural(c.resources_count, "resource", "resources"),
                open(Level::Resources, &c.id),
            )
        }),
        Column::new("actions", "Actions", |_: &Client| String::new()).render(|c: &Client| {
            (
                "Add Job".to_string(),
                Some(form(
                    FormKind::Job,
                    format!("Add Job for {}", c.display_name()),
                    None,
                    into_draft(json!({ "clientId": c.id })),
                )),
            )
        }),
    ]
}

pub fn vendors() -> Vec<Column<Vendor>> {
    vec![
        Column::new("company", "Company Name", |v: &Vendor| v.company.clone()).text_filter(),
        Column::new("name", "Contact Name", |v: &Vendor| v.name.clone()).text_filter(),
        Column::new("email", "Email", |v: &Vendor| v.email.clone()).text_filter(),
        Column::new("phone", "Phone", |v: &Vendor| v.phone.clone()).text_filter(),
        Column::new("industry", "Industry", |v: &Vendor| v.industry.clone())
            .options(VENDOR_INDUSTRIES),
        Column::new("resourcesCount", "Resources", |v: &Vendor| {
            v.resources_count.to_string()
        })
        .render(|v: &Vendor| {
            (
                plural(v.resources_count, "resource", "resources"),
                open(Level::Resources, &v.id),
            )
        }),
        Column::new("createdAt", "Created Date", |v: &Vendor| v.created_at.clone()),
        Column::new("actions", "Actions", |_: &Vendor| String::new()).render(|v: &Vendor| {
            (
                "Add Resource".to_string(),
                Some(form(
                    FormKind::Resource,
                    format!("Add Resource for {}", v.display_name()),
                    None,
                    into_draft(json!({
                        "resourceType": ResourceType::Vendor,
                        "vendorId": v.id,
                    })),
                )),
            )
        }),
        Column::new("edit", "", |_: &Vendor| String::new()).render(|v: &Vendor| {
            (
                "Edit".to_string(),
                Some(form(
                    FormKind::Vendor,
                    format!("Edit Vendor - {}", v.display_name()),
                    Some(&v.id),
                    as_draft(v),
                )),
            )
        }),
    ]
}

pub fn jobs() -> Vec<Column<Job>> {
    vec![
        Column::new("title", "Job Title", |j: &Job| j.title.clone()).text_filter(),
        Column::new("clientName", "Client", |j: &Job| j.client_name.clone()).text_filter(),
        Column::new("roleName", "Role", |j: &Job| j.role_name.clone()).text_filter(),
        Column::new("status", "Status", |j: &Job| j.status.label().to_string())
            .options(JobStatus::ALL.iter().map(|s| s.label())),
        Column::new("resourcesCount", "Resources", |j: &Job| {
            j.resources_count.to_string()
        })
        .render(|j: &Job| {
            (
                plural(j.resources_count, "resource", "resources"),
                open(Level::Resources, &j.id),
            )
        }),
        Column::new("deadline", "Deadline", |j: &Job| {
            j.deadline.clone().unwrap_or_default()
        }),
        Column::new("actions", "Actions", |_: &Job| String::new()).render(|j: &Job| {
            (
                "Edit".to_string(),
                Some(form(
                    FormKind::JobEdit,
                    format!("Edit Job - {}", j.title),
                    Some(&j.id),
                    as_draft(j),
                )),
            )
        }),
    ]
}

pub fn resources() -> Vec<Column<Resource>> {
    vec![
        Column::new("name", "Candidate Name", |r: &Resource| r.name.clone())
            .text_filter()
            .render(|r: &Resource| (r.name.clone(), open(Level::ResourceDetail, &r.id))),
        Column::new("email", "Email", |r: &Resource| r.email.clone()).text_filter(),
        Column::new("clientName", "Client", |r: &Resource| r.client_name.clone()).text_filter(),
        Column::new("jobTitle", "Job", |r: &Resource| r.job_title.clone()).text_filter(),
        Column::new("resourceType", "Type", |r: &Resource| {
            r.resource_type.label().to_string()
        })
        .options(ResourceType::ALL.iter().map(|t| t.label()))
        .terms(|r: &Resource| {
            let mut terms = vec![r.resource_type.label().to_string()];
            terms.extend(r.resource_type.legacy_label().map(str::to_string));
            terms
        }),
        Column::new("interviewStatus", "Status", |r: &Resource| {
            r.interview_status.label().to_string()
        })
        .options(InterviewStatus::ALL.iter().map(|s| s.label())),
        Column::new("roundsCount", "Rounds", |r: &Resource| r.rounds_count.to_string()),
        Column::new("experience", "Experience (years)", |r: &Resource| {
            r.experience.to_string()
        }),
        Column::new("actions", "Actions", |_: &Resource| String::new()).render(|r: &Resource| {
            (
                "Edit".to_string(),
                Some(form(
                    FormKind::ResourceEdit,
                    format!("Edit Resource - {}", r.name),
                    Some(&r.id),
                    as_draft(r),
                )),
            )
        }),
    ]
}

pub fn roles() -> Vec<Column<Role>> {
    vec![
        Column::new("name", "Role Name", |r: &Role| r.name.clone()).text_filter(),
        Column::new("department", "Department", |r: &Role| r.department.clone()).text_filter(),
        Column::new("level", "Level", |r: &Role| r.level.label().to_string())
            .options(RoleLevel::ALL.iter().map(|l| l.label())),
        Column::new("skillsRequired", "Skills", |r: &Role| r.skills_required.join(", "))
            .text_filter(),
        Column::new("experience", "Experience (years)", |r: &Role| {
            format!("{}-{}", r.experience_min, r.experience_max)
        }),
    ]
}

pub fn users() -> Vec<Column<User>> {
    vec![
        Column::new("name", "Name", |u: &User| u.name.clone()).text_filter(),
        Column::new("email", "Email", |u: &User| u.email.clone()).text_filter(),
        Column::new("roles", "Roles", |u: &User| u.role_labels())
            .options(AccessRole::labels())
            .terms(|u: &User| u.roles.iter().map(|r| r.label().to_string()).collect()),
        Column::new("department", "Department", |u: &User| {
            u.department.clone().unwrap_or_default()
        })
        .text_filter(),
        Column::new("actions", "Actions", |_: &User| String::new()).render(|u: &User| {
            let labels: Vec<_> = u.roles.iter().map(|r| r.label()).collect();
            (
                "Edit Role".to_string(),
                Some(form(
                    FormKind::RoleAssignment,
                    format!("Edit Role - {}", u.name),
                    Some(&u.id),
                    into_draft(json!({ "userId": u.id, "roles": labels })),
                )),
            )
        }),
    ]
}
