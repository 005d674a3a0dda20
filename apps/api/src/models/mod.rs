//! Entity types shared by the store, the upstream API layer and the page views.
//!
//! Wire format is the upstream's camelCase JSON. Display names held next to
//! foreign keys (`client_name`, `job_title`, ...) are read conveniences; the
//! referenced entity stays authoritative.

pub mod attachment;
pub mod client;
pub mod envelope;
pub mod job;
pub mod resource;
pub mod role;
pub mod user;
pub mod vendor;

pub use attachment::{Attachment, FileValue};
pub use client::{Client, Contact};
pub use envelope::Envelope;
pub use job::{Job, JobStatus};
pub use resource::{InterviewRound, InterviewStatus, Resource, ResourceType, RoundStatus};
pub use role::{Role, RoleLevel};
pub use user::{AccessRole, User};
pub use vendor::Vendor;

/// Anything the store keeps in an id-addressed collection.
pub trait Entity: Clone {
    fn id(&self) -> &str;
}

/// Which collection a navigation crumb or a not-found error points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Client,
    Vendor,
    Job,
    Resource,
    Round,
    Role,
    User,
}

impl EntityKind {
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Client => "Client",
            EntityKind::Vendor => "Vendor",
            EntityKind::Job => "Job",
            EntityKind::Resource => "Resource",
            EntityKind::Round => "Interview round",
            EntityKind::Role => "Role",
            EntityKind::User => "User",
        }
    }
}

/// Today's date in the `YYYY-MM-DD` form the upstream uses for `createdAt`.
pub fn today() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}
