//! Drill-down navigation for the list pages.
//!
//! Each page starts at its root list. Selecting a count cell or a row
//! descends one level and records the selected parent as a [`Crumb`] whose
//! label is captured at selection time. Breadcrumbs are derived from that
//! recorded chain only, never recomputed from the store.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Page {
    Clients,
    Vendors,
    Jobs,
    Resources,
    Roles,
    Users,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Clients,
        Page::Vendors,
        Page::Jobs,
        Page::Resources,
        Page::Roles,
        Page::Users,
    ];

    /// Path segment used by `/api/v1/pages/:page`.
    pub fn slug(&self) -> &'static str {
        match self {
            Page::Clients => "clients",
            Page::Vendors => "vendors",
            Page::Jobs => "jobs",
            Page::Resources => "resources",
            Page::Roles => "roles",
            Page::Users => "users",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.slug() == slug)
    }

    pub fn root(&self) -> Level {
        match self {
            Page::Clients => Level::Clients,
            Page::Vendors => Level::Vendors,
            Page::Jobs => Level::Jobs,
            Page::Resources => Level::Resources,
            Page::Roles => Level::Roles,
            Page::Users => Level::Users,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Level {
    Clients,
    Vendors,
    Jobs,
    Resources,
    ResourceDetail,
    Roles,
    Users,
}

impl Level {
    pub fn label(&self) -> &'static str {
        match self {
            Level::Clients => "Clients",
            Level::Vendors => "Vendors",
            Level::Jobs => "Jobs",
            Level::Resources => "Resources",
            Level::ResourceDetail => "Resource Details",
            Level::Roles => "Roles",
            Level::Users => "Role Assignment",
        }
    }

    /// Levels reachable in one step from this one.
    pub fn children(&self) -> &'static [Level] {
        match self {
            Level::Clients => &[Level::Jobs, Level::Resources],
            Level::Vendors => &[Level::Resources],
            Level::Jobs => &[Level::Resources],
            Level::Resources => &[Level::ResourceDetail],
            Level::ResourceDetail | Level::Roles | Level::Users => &[],
        }
    }

    /// Kind of the rows listed at this level, i.e. what a selection here points at.
    pub fn row_kind(&self) -> Option<EntityKind> {
        match self {
            Level::Clients => Some(EntityKind::Client),
            Level::Vendors => Some(EntityKind::Vendor),
            Level::Jobs => Some(EntityKind::Job),
            Level::Resources => Some(EntityKind::Resource),
            Level::Roles => Some(EntityKind::Role),
            Level::Users => Some(EntityKind::User),
            Level::ResourceDetail => None,
        }
    }
}

/// A selected parent: what it is, which one, and its label at selection time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crumb {
    pub kind: EntityKind,
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub into: Level,
    pub crumb: Crumb,
}

/// Commands the dashboard sends to move through a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum NavCommand {
    /// Descend into `into`, scoped by the row `id` of the current level.
    Open { into: Level, id: String },
    /// Breadcrumb click: return to the view at `depth`.
    Crumb { depth: usize },
    Home,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavError {
    #[error("cannot open {into:?} from {from:?}")]
    IllegalDescent { from: Level, into: Level },

    #[error("a {found:?} cannot scope {from:?} rows")]
    WrongParent { from: Level, found: EntityKind },

    #[error("breadcrumb depth {depth} is beyond the current depth {current}")]
    DepthOutOfRange { depth: usize, current: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbItem {
    pub label: String,
    /// Depth this item returns to; `None` on the current (last) item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<usize>,
}

/// Ids the current view is restricted to, collected from the crumb chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    pub client_id: Option<String>,
    pub vendor_id: Option<String>,
    pub job_id: Option<String>,
    pub resource_id: Option<String>,
}

/// Navigation state of one page: root level plus the ordered selection path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrillDown {
    page: Page,
    path: Vec<Step>,
}

impl DrillDown {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            path: Vec::new(),
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn path(&self) -> &[Step] {
        &self.path
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub fn level(&self) -> Level {
        self.path
            .last()
            .map(|s| s.into)
            .unwrap_or_else(|| self.page.root())
    }

    pub fn crumbs(&self) -> impl Iterator<Item = &Crumb> {
        self.path.iter().map(|s| &s.crumb)
    }

    pub fn scope(&self) -> Scope {
        let mut scope = Scope::default();
        for crumb in self.crumbs() {
            let id = Some(crumb.id.clone());
            match crumb.kind {
                EntityKind::Client => scope.client_id = id,
                EntityKind::Vendor => scope.vendor_id = id,
                EntityKind::Job => scope.job_id = id,
                EntityKind::Resource => scope.resource_id = id,
                _ => {}
            }
        }
        scope
    }

    /// Descends one level. The state is untouched on error.
    pub fn open(&mut self, into: Level, crumb: Crumb) -> Result<(), NavError> {
        let from = self.level();
        if !from.children().contains(&into) {
            return Err(NavError::IllegalDescent { from, into });
        }
        if from.row_kind() != Some(crumb.kind) {
            return Err(NavError::WrongParent {
                from,
                found: crumb.kind,
            });
        }
        self.path.push(Step { into, crumb });
        Ok(())
    }

    /// Returns to the view at `depth`, dropping every deeper selection.
    pub fn back_to(&mut self, depth: usize) -> Result<(), NavError> {
        if depth > self.path.len() {
            return Err(NavError::DepthOutOfRange {
                depth,
                current: self.path.len(),
            });
        }
        self.path.truncate(depth);
        Ok(())
    }

    pub fn home(&mut self) {
        self.path.clear();
    }

    pub fn breadcrumbs(&self) -> Vec<BreadcrumbItem> {
        let mut items = vec![
            BreadcrumbItem {
                label: "Home".to_string(),
                depth: Some(0),
            },
            BreadcrumbItem {
                label: self.page.root().label().to_string(),
                depth: Some(0),
            },
        ];
        for (i, step) in self.path.iter().enumerate() {
            items.push(BreadcrumbItem {
                label: step.crumb.label.clone(),
                depth: Some(i + 1),
            });
            if step.into != Level::ResourceDetail {
                items.push(BreadcrumbItem {
                    label: step.into.label().to_string(),
                    depth: Some(i + 1),
                });
            }
        }
        if let Some(last) = items.last_mut() {
            last.depth = None;
        }
        items
    }
}
