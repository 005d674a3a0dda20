//! Page views: what the dashboard draws for a page at its current level.
//!
//! Rendering is a pure function of the store, the page's session state and
//! the session's layout flags.
//! Rows are scoped by the crumbs on the drill-down path, then run through
//! the view's column filters.

pub mod columns;
pub mod handlers;

use serde::Serialize;
use serde_json::json;

use crate::errors::AppError;
use crate::forms::{into_draft, FormKind};
use crate::models::{EntityKind, InterviewRound, Job, Resource};
use crate::navigation::{BreadcrumbItem, Crumb, DrillDown, Level, NavCommand, Page, Scope};
use crate::sessions::{PageState, UiFlags};
use crate::store::Store;
use crate::table::{CellAction, TableView};

use columns::{as_draft, form};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAction {
    pub label: String,
    pub action: CellAction,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundEntry {
    #[serde(flatten)]
    pub round: InterviewRound,
    pub edit: CellAction,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PageBody {
    Table(TableView),
    Detail {
        resource: Resource,
        rounds: Vec<RoundEntry>,
    },
    /// A crumb on the path points at something the store no longer holds.
    NotFound {
        entity: EntityKind,
        id: String,
        message: String,
        action: PageAction,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub page: Page,
    pub level: Level,
    pub title: String,
    pub breadcrumbs: Vec<BreadcrumbItem>,
    pub body: PageBody,
    pub actions: Vec<PageAction>,
    pub ui: UiFlags,
}

fn exists(store: &Store, crumb: &Crumb) -> bool {
    match crumb.kind {
        EntityKind::Client => store.clients().contains(&crumb.id),
        EntityKind::Vendor => store.vendors().contains(&crumb.id),
        EntityKind::Job => store.jobs().contains(&crumb.id),
        EntityKind::Resource => store.resources().contains(&crumb.id),
        EntityKind::Round => store.rounds().contains(&crumb.id),
        EntityKind::Role => store.roles().contains(&crumb.id),
        EntityKind::User => store.users().contains(&crumb.id),
    }
}

fn scoped_jobs(store: &Store, scope: &Scope) -> Vec<Job> {
    store
        .jobs()
        .iter()
        .filter(|j| scope.client_id.as_deref().map_or(true, |id| j.client_id == id))
        .cloned()
        .collect()
}

fn scoped_resources(store: &Store, scope: &Scope) -> Vec<Resource> {
    store
        .resources()
        .iter()
        .filter(|r| scope.client_id.as_deref().map_or(true, |id| r.client_id == id))
        .filter(|r| scope.job_id.as_deref().map_or(true, |id| r.job_id == id))
        .filter(|r| {
            scope
                .vendor_id
                .as_deref()
                .map_or(true, |id| r.vendor_id.as_deref() == Some(id))
        })
        .cloned()
        .collect()
}

/// Finds row `id` among the rows currently listed and captures its label.
pub fn resolve_crumb(store: &Store, nav: &DrillDown, id: &str) -> Result<Crumb, AppError> {
    let scope = nav.scope();
    let level = nav.level();
    let label = match level {
        Level::Clients => store.clients().get(id).map(|c| c.display_name().to_string()),
        Level::Vendors => store.vendors().get(id).map(|v| v.display_name().to_string()),
        Level::Jobs => scoped_jobs(store, &scope)
            .into_iter()
            .find(|j| j.id == id)
            .map(|j| j.title),
        Level::Resources => scoped_resources(store, &scope)
            .into_iter()
            .find(|r| r.id == id)
            .map(|r| r.name),
        Level::Roles => store.roles().get(id).map(|r| r.name.clone()),
        Level::Users => store.users().get(id).map(|u| u.name.clone()),
        Level::ResourceDetail => None,
    };
    let kind = level.row_kind();
    match (kind, label) {
        (Some(kind), Some(label)) => Ok(Crumb {
            kind,
            id: id.to_string(),
            label,
        }),
        (Some(kind), None) => Err(AppError::NotFound(format!(
            "{} {id} is not listed in this view",
            kind.label()
        ))),
        (None, _) => Err(AppError::InvalidTransition(format!(
            "{} has no rows to open",
            level.label()
        ))),
    }
}

fn not_found(nav: &DrillDown, crumb: &Crumb) -> PageBody {
    PageBody::NotFound {
        entity: crumb.kind,
        id: crumb.id.clone(),
        message: format!("{} Not Found", crumb.kind.label()),
        action: PageAction {
            label: format!("Back to {}", nav.page().root().label()),
            action: CellAction::Navigate {
                command: NavCommand::Home,
            },
        },
    }
}

fn header_actions(store: &Store, level: Level, scope: &Scope) -> Vec<PageAction> {
    let action = |label: &str, kind: FormKind, defaults: serde_json::Value| PageAction {
        label: label.to_string(),
        action: form(kind, kind.title(), None, into_draft(defaults)),
    };
    match level {
        Level::Clients => vec![action("Add Client", FormKind::Client, json!({}))],
        Level::Vendors => vec![action("Add Vendor", FormKind::Vendor, json!({}))],
        Level::Jobs => vec![action(
            "Add Job",
            FormKind::Job,
            json!({ "clientId": scope.client_id }),
        )],
        Level::Resources => {
            let defaults = match &scope.vendor_id {
                Some(vendor) => json!({ "jobId": scope.job_id, "resourceType": "Vendor", "vendorId": vendor }),
                None => json!({ "jobId": scope.job_id }),
            };
            vec![action("Add Resource", FormKind::Resource, defaults)]
        }
        Level::ResourceDetail => {
            let Some(resource) = scope
                .resource_id
                .as_deref()
                .and_then(|id| store.resources().get(id))
            else {
                return Vec::new();
            };
            vec![
                PageAction {
                    label: "Add Round".to_string(),
                    action: form(
                        FormKind::Round,
                        format!("Add Interview Round - {}", resource.name),
                        None,
                        into_draft(json!({ "resourceId": resource.id })),
                    ),
                },
                PageAction {
                    label: "Edit Resource".to_string(),
                    action: form(
                        FormKind::ResourceEdit,
                        format!("Edit Resource - {}", resource.name),
                        Some(&resource.id),
                        as_draft(resource),
                    ),
                },
            ]
        }
        Level::Roles => vec![action("Add Role", FormKind::Role, json!({}))],
        Level::Users => vec![action("Assign Role", FormKind::RoleAssignment, json!({}))],
    }
    .into_iter()
    .map(|mut a| {
        // null defaults come from an unscoped view
        if let CellAction::OpenForm { defaults, .. } = &mut a.action {
            defaults.retain(|_, v| !v.is_null());
        }
        a
    })
    .collect()
}

fn detail(store: &Store, resource: &Resource) -> PageBody {
    let rounds = store
        .rounds_for(&resource.id)
        .into_iter()
        .map(|round| RoundEntry {
            edit: form(
                FormKind::Round,
                format!("Edit Round {} - {}", round.round_number, round.round_type),
                Some(&round.id),
                as_draft(round),
            ),
            round: round.clone(),
        })
        .collect();
    PageBody::Detail {
        resource: resource.clone(),
        rounds,
    }
}

fn table(
    store: &Store,
    state: &PageState,
    ui: UiFlags,
    level: Level,
    scope: &Scope,
) -> TableView {
    let loading = ui.global_loading;
    let t = &state.table;
    match level {
        Level::Clients => t.view(
            &columns::clients(),
            store.clients().as_slice(),
            loading,
            "No clients found. Create your first client to get started.",
        ),
        Level::Vendors => t.view(
            &columns::vendors(),
            store.vendors().as_slice(),
            loading,
            "No vendors found. Create your first vendor partnership to get started.",
        ),
        Level::Jobs => t.view(
            &columns::jobs(),
            &scoped_jobs(store, scope),
            loading,
            "No jobs found. Create your first job posting to get started.",
        ),
        Level::Resources => t.view(
            &columns::resources(),
            &scoped_resources(store, scope),
            loading,
            "No resources found. Add your first candidate to get started.",
        ),
        Level::Roles => t.view(
            &columns::roles(),
            store.roles().as_slice(),
            loading,
            "No roles found. Create your first role to get started.",
        ),
        // the detail level never reaches here with a resource in scope
        Level::Users | Level::ResourceDetail => t.view(
            &columns::users(),
            store.users().as_slice(),
            loading,
            "No users found. Add users to assign roles.",
        ),
    }
}

pub fn render(store: &Store, state: &PageState, ui: UiFlags) -> PageView {
    let nav = &state.nav;
    let level = nav.level();
    let scope = nav.scope();
    let breadcrumbs = nav.breadcrumbs();

    let missing = nav.crumbs().find(|c| !exists(store, c));
    let (title, body, actions) = match missing {
        Some(crumb) => (
            format!("{} Not Found", crumb.kind.label()),
            not_found(nav, crumb),
            Vec::new(),
        ),
        None => {
            let resource = scope
                .resource_id
                .as_deref()
                .and_then(|id| store.resources().get(id));
            match (level, resource) {
                (Level::ResourceDetail, Some(resource)) => (
                    resource.name.clone(),
                    detail(store, resource),
                    header_actions(store, level, &scope),
                ),
                _ => (
                    level.label().to_string(),
                    PageBody::Table(table(store, state, ui, level, &scope)),
                    header_actions(store, level, &scope),
                ),
            }
        }
    };

    PageView {
        page: nav.page(),
        level,
        title,
        breadcrumbs,
        body,
        actions,
        ui,
    }
}
